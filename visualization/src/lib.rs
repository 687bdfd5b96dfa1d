//! Isocline visualization: heat-map figures of parameter space explorations
//!
//! Builds on `isocline_core` to render one figure per metric and to answer
//! pointer queries on those figures.
//!
//! - [`view`]: heatmap rendering and figure metadata
//! - [`interaction`]: pointer to grid cell mapping, click and hover commands
//! - [`session`]: per-figure sessions and the explorer creating them
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod config;
pub mod error;
pub mod interaction;
pub mod session;
pub mod view;

pub use crate::config::{ExplorerConfig, HeatmapConfig};
pub use crate::error::{VisualizationError, VisualizationResult};
pub use crate::interaction::{format_coord, DisplayCommand, HoverValue, InteractionMapper};
pub use crate::session::{DisplayParameters, ExplorationDisplay, ExplorationSession, ParameterSpaceExplorer};
pub use crate::view::{ColorBar, FigureHandle, FigureMetadata, HeatmapImage, HeatmapRenderer};
