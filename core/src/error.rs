//! Error taxonomy for parameter space exploration
//!
//! Every variant is fatal to the build attempt that raised it and carries
//! enough context (run, parameter, metric) to diagnose the inconsistency.
//! Individual runs without a usable result are never reported here; they
//! become missing cells instead.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use thiserror::Error;

use crate::exploration::run::{RunId, RunStatus};

/// Comprehensive error types for grid assembly and surface reconstruction
#[derive(Debug, Error)]
pub enum ExplorationError {
    #[error("Can not display until all runs of the exploration are finished: run {run} is {status}")]
    IncompleteExploration { run: RunId, status: RunStatus },

    #[error("Run {run} assigns {parameter} = {value}, which is not a declared axis value")]
    AxisLookup {
        run: RunId,
        parameter: String,
        value: f64,
    },

    #[error("Run {run} has no value for varied parameter {parameter}")]
    MissingParameter { run: RunId, parameter: String },

    #[error("No results were generated for {}. Nothing to display.", .metric.as_deref().unwrap_or("any metric"))]
    NoResults { metric: Option<String> },

    #[error("Invalid axis {name}: {reason}")]
    InvalidAxis { name: String, reason: String },

    #[error("Invalid parameter assignment {input:?}: {reason}")]
    ParameterParse { input: String, reason: String },

    #[error("Spline collocation system along {axis} is singular")]
    SingularFit { axis: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

/// Result type for exploration operations
pub type ExplorationResult<T> = Result<T, ExplorationError>;
