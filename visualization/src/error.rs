//! Errors of the rendering and interaction layer
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use thiserror::Error;

use isocline_core::ExplorationError;

/// Errors associated with parameter space visualization
#[derive(Debug, Error)]
pub enum VisualizationError {
    #[error(transparent)]
    Exploration(#[from] ExplorationError),

    #[error("Invalid heatmap configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for visualization operations
pub type VisualizationResult<T> = std::result::Result<T, VisualizationError>;
