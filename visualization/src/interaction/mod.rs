//! Pointer interaction for parameter space figures
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod mapper;

pub use self::mapper::{format_coord, DisplayCommand, HoverValue, InteractionMapper};
