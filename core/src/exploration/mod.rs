//! Two-parameter exploration model
//! Axes, run records and raw grid assembly
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod axis;
pub mod grid;
pub mod run;

pub use self::axis::{AxisValues, ParameterAxis};
pub use self::grid::{CellIndex, GridBuilder, IdentifierGrid, MissingMask, RawGrid};
pub use self::run::{ParameterAssignment, ResultId, RunId, RunRecord, RunResult, RunStatus};

use serde::{Deserialize, Serialize};

use crate::error::{ExplorationError, ExplorationResult};

/// A finished or in-flight sweep over two numeric parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exploration {
    pub axis1: ParameterAxis,
    pub axis2: ParameterAxis,
    pub runs: Vec<RunRecord>,
}

impl Exploration {
    pub fn new(axis1: ParameterAxis, axis2: ParameterAxis, runs: Vec<RunRecord>) -> ExplorationResult<Self> {
        if axis1.name == axis2.name {
            return Err(ExplorationError::InvalidAxis {
                name: axis2.name,
                reason: "both varied parameters share one name".to_string(),
            });
        }
        Ok(Self { axis1, axis2, runs })
    }

    /// Grid builder over this exploration's axes
    pub fn grid_builder(&self) -> GridBuilder<'_> {
        GridBuilder::new(&self.axis1, &self.axis2)
    }

    /// Metric names to display, in name order.
    ///
    /// Taken from the first completed result holding at least one finite
    /// metric; an empty list means no run produced anything to display.
    pub fn metrics(&self) -> Vec<String> {
        self.runs
            .iter()
            .filter_map(RunRecord::completed_result)
            .find(|result| result.metrics.values().any(|value| value.is_finite()))
            .map(|result| result.metrics.keys().cloned().collect())
            .unwrap_or_default()
    }
}
