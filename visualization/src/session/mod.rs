//! Figure sessions and the explorer that creates them
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod explorer;
pub mod figure;

pub use self::explorer::{DisplayParameters, ExplorationDisplay, ParameterSpaceExplorer};
pub use self::figure::ExplorationSession;
