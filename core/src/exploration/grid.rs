//! Raw result grid assembly
//!
//! Turns the run set of an exploration into a dense `axis1 × axis2` matrix of
//! one metric, a mask of missing cells and the parallel grid of result
//! handles used for navigation. Cells without a usable result are missing:
//! they hold the sentinel value, are flagged in the mask and have no handle.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, warn};
use ndarray::Array2;

use crate::error::{ExplorationError, ExplorationResult};
use crate::exploration::axis::ParameterAxis;
use crate::exploration::run::{ResultId, RunId, RunRecord};

/// Position of a cell in the raw grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex {
    /// Index along the first varied parameter
    pub axis1: usize,

    /// Index along the second varied parameter
    pub axis2: usize,
}

impl CellIndex {
    #[inline]
    pub fn new(axis1: usize, axis2: usize) -> Self {
        Self { axis1, axis2 }
    }

    #[inline]
    fn as_pattern(self) -> [usize; 2] {
        [self.axis1, self.axis2]
    }
}

/// Boolean grid, true where the raw cell is missing
#[derive(Debug, Clone, PartialEq)]
pub struct MissingMask(Array2<bool>);

impl MissingMask {
    /// Mask with every cell missing
    pub fn all_missing(shape: (usize, usize)) -> Self {
        Self(Array2::from_elem(shape, true))
    }

    #[inline]
    pub fn is_missing(&self, cell: CellIndex) -> bool {
        self.0.get(cell.as_pattern()).copied().unwrap_or(true)
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.0.dim()
    }

    pub fn missing_count(&self) -> usize {
        self.0.iter().filter(|&&missing| missing).count()
    }

    /// Missing cells in row-major order
    pub fn missing_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.0
            .indexed_iter()
            .filter(|&(_, &missing)| missing)
            .map(|((i, j), _)| CellIndex::new(i, j))
    }

    pub fn as_array(&self) -> &Array2<bool> {
        &self.0
    }

    fn set(&mut self, cell: CellIndex, missing: bool) {
        self.0[cell.as_pattern()] = missing;
    }
}

impl From<Array2<bool>> for MissingMask {
    fn from(mask: Array2<bool>) -> Self {
        Self(mask)
    }
}

/// Result handles per raw cell, absent for missing cells
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierGrid(Array2<Option<ResultId>>);

impl IdentifierGrid {
    pub fn empty(shape: (usize, usize)) -> Self {
        Self(Array2::from_elem(shape, None))
    }

    #[inline]
    pub fn get(&self, cell: CellIndex) -> Option<&ResultId> {
        self.0.get(cell.as_pattern()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.0.dim()
    }

    fn set(&mut self, cell: CellIndex, id: Option<ResultId>) {
        self.0[cell.as_pattern()] = id;
    }
}

/// Dense per-metric grid of one exploration
#[derive(Debug, Clone)]
pub struct RawGrid {
    /// Metric name the values were extracted for
    pub metric: String,

    /// Metric values, sentinel where missing
    pub values: Array2<f64>,

    /// Missing cell flags
    pub missing: MissingMask,

    /// Result handles for navigation
    pub identifiers: IdentifierGrid,
}

impl RawGrid {
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Recorded value of a cell, `None` when missing
    pub fn value(&self, cell: CellIndex) -> Option<f64> {
        if self.missing.is_missing(cell) {
            None
        } else {
            self.values.get(cell.as_pattern()).copied()
        }
    }

    pub fn usable_count(&self) -> usize {
        let (rows, cols) = self.shape();
        rows * cols - self.missing.missing_count()
    }
}

/// Assembles raw grids from the run set of an exploration
#[derive(Debug, Clone)]
pub struct GridBuilder<'a> {
    axis1: &'a ParameterAxis,
    axis2: &'a ParameterAxis,
    sentinel: f64,
}

impl<'a> GridBuilder<'a> {
    pub fn new(axis1: &'a ParameterAxis, axis2: &'a ParameterAxis) -> Self {
        Self {
            axis1,
            axis2,
            sentinel: 0.0,
        }
    }

    /// Value stored in missing cells
    pub fn with_sentinel(mut self, sentinel: f64) -> Self {
        self.sentinel = sentinel;
        self
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.axis1.len(), self.axis2.len())
    }

    /// Fail if any run has not reached a terminal state
    pub fn ensure_finished(runs: &[RunRecord]) -> ExplorationResult<()> {
        match runs.iter().find(|run| !run.status.is_finished()) {
            Some(run) => Err(ExplorationError::IncompleteExploration {
                run: run.id,
                status: run.status,
            }),
            None => Ok(()),
        }
    }

    /// Cell addressed by the run's parameter assignment, exact value match
    pub fn locate(&self, run: &RunRecord) -> ExplorationResult<CellIndex> {
        let axis1 = Self::axis_index(self.axis1, run)?;
        let axis2 = Self::axis_index(self.axis2, run)?;
        Ok(CellIndex::new(axis1, axis2))
    }

    fn axis_index(axis: &ParameterAxis, run: &RunRecord) -> ExplorationResult<usize> {
        let value = run
            .parameters
            .get(&axis.name)
            .ok_or_else(|| ExplorationError::MissingParameter {
                run: run.id,
                parameter: axis.name.clone(),
            })?;

        axis.values
            .index_of(value)
            .ok_or_else(|| ExplorationError::AxisLookup {
                run: run.id,
                parameter: axis.name.clone(),
                value,
            })
    }

    /// Build the raw grid of `metric` from the run set.
    ///
    /// # Errors
    /// - `IncompleteExploration` when any run is pending or running
    /// - `MissingParameter` / `AxisLookup` for inconsistent assignments
    /// - `NoResults` when no run yields a value for the metric
    pub fn build(&self, metric: &str, runs: &[RunRecord]) -> ExplorationResult<RawGrid> {
        Self::ensure_finished(runs)?;

        let shape = self.shape();
        let mut values = Array2::from_elem(shape, self.sentinel);
        let mut missing = MissingMask::all_missing(shape);
        let mut identifiers = IdentifierGrid::empty(shape);
        let mut owners: Array2<Option<RunId>> = Array2::from_elem(shape, None);

        for run in runs {
            let cell = self.locate(run)?;

            if let Some(previous) = owners[cell.as_pattern()].replace(run.id) {
                warn!(
                    "Runs {} and {} share cell ({}, {}); keeping {}",
                    previous, run.id, cell.axis1, cell.axis2, run.id
                );
            }

            let measured = run
                .completed_result()
                .and_then(|result| result.metric(metric).map(|value| (value, result)));

            match measured {
                Some((value, result)) => {
                    values[cell.as_pattern()] = value;
                    missing.set(cell, false);
                    identifiers.set(cell, Some(result.result_id.clone()));
                }
                None => {
                    values[cell.as_pattern()] = self.sentinel;
                    missing.set(cell, true);
                    identifiers.set(cell, None);
                }
            }
        }

        let grid = RawGrid {
            metric: metric.to_string(),
            values,
            missing,
            identifiers,
        };

        if grid.usable_count() == 0 {
            return Err(ExplorationError::NoResults {
                metric: Some(metric.to_string()),
            });
        }

        debug!(
            "Built {}x{} grid for metric {}: {} missing cells",
            shape.0,
            shape.1,
            metric,
            grid.missing.missing_count()
        );

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exploration::run::{ParameterAssignment, RunResult, RunStatus};

    fn axes() -> (ParameterAxis, ParameterAxis) {
        (
            ParameterAxis::new("speed", vec![0.0, 1.0, 2.0]).unwrap(),
            ParameterAxis::new("coupling", vec![10.0, 20.0]).unwrap(),
        )
    }

    fn run(id: u64, x: f64, y: f64, status: RunStatus, metric: Option<f64>) -> RunRecord {
        let parameters = ParameterAssignment::new().with("speed", x).with("coupling", y);
        let record = RunRecord::new(RunId(id), parameters, status);
        match metric {
            Some(value) => record.with_result(
                RunResult::new(ResultId::new(format!("gid-{id}"))).with_metric("m", value),
            ),
            None => record,
        }
    }

    fn full_runs() -> Vec<RunRecord> {
        let mut runs = Vec::new();
        let mut id = 0;
        for x in [0.0, 1.0, 2.0] {
            for y in [10.0, 20.0] {
                runs.push(run(id, x, y, RunStatus::Complete, Some(x * 10.0 + y)));
                id += 1;
            }
        }
        runs
    }

    #[test]
    fn test_complete_grid() {
        let (a1, a2) = axes();
        let grid = GridBuilder::new(&a1, &a2).build("m", &full_runs()).unwrap();

        assert_eq!(grid.shape(), (3, 2));
        assert_eq!(grid.missing.missing_count(), 0);
        assert_eq!(grid.value(CellIndex::new(2, 1)), Some(40.0));
        assert_eq!(
            grid.identifiers.get(CellIndex::new(1, 0)).map(ResultId::as_str),
            Some("gid-2")
        );
    }

    #[test]
    fn test_failed_and_unmeasured_runs_are_missing() {
        let (a1, a2) = axes();
        let mut runs = full_runs();
        runs[1] = run(1, 0.0, 20.0, RunStatus::Failed, None);
        runs[4] = run(4, 2.0, 10.0, RunStatus::Complete, None);
        runs[5] = RunRecord::new(
            RunId(5),
            ParameterAssignment::new().with("speed", 2.0).with("coupling", 20.0),
            RunStatus::Complete,
        )
        .with_result(RunResult::new(ResultId::new("gid-5")).with_metric("other", 1.0));

        let grid = GridBuilder::new(&a1, &a2).build("m", &runs).unwrap();

        assert_eq!(grid.missing.missing_count(), 3);
        assert!(grid.missing.is_missing(CellIndex::new(0, 1)));
        assert!(grid.missing.is_missing(CellIndex::new(2, 0)));
        assert!(grid.missing.is_missing(CellIndex::new(2, 1)));
        assert_eq!(grid.values[[0, 1]], 0.0);
        assert!(grid.identifiers.get(CellIndex::new(0, 1)).is_none());
        assert!(grid.identifiers.get(CellIndex::new(2, 1)).is_none());
    }

    #[test]
    fn test_cells_without_runs_are_missing() {
        let (a1, a2) = axes();
        let runs = vec![run(0, 1.0, 10.0, RunStatus::Complete, Some(5.0))];
        let grid = GridBuilder::new(&a1, &a2).with_sentinel(-1.0).build("m", &runs).unwrap();

        assert_eq!(grid.missing.missing_count(), 5);
        assert_eq!(grid.usable_count(), 1);
        assert_eq!(grid.values[[0, 0]], -1.0);
        assert_eq!(grid.missing.missing_cells().count(), 5);
    }

    #[test]
    fn test_running_run_fails_build() {
        let (a1, a2) = axes();
        let mut runs = full_runs();
        runs[3].status = RunStatus::Running;

        let err = GridBuilder::new(&a1, &a2).build("m", &runs).unwrap_err();
        assert!(matches!(
            err,
            ExplorationError::IncompleteExploration { run: RunId(3), status: RunStatus::Running }
        ));
    }

    #[test]
    fn test_unknown_axis_value_fails_build() {
        let (a1, a2) = axes();
        let mut runs = full_runs();
        runs.push(run(99, 1.5, 10.0, RunStatus::Complete, Some(1.0)));

        match GridBuilder::new(&a1, &a2).build("m", &runs) {
            Err(ExplorationError::AxisLookup { run, parameter, value }) => {
                assert_eq!(run, RunId(99));
                assert_eq!(parameter, "speed");
                assert_eq!(value, 1.5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_parameter_fails_build() {
        let (a1, a2) = axes();
        let runs = vec![RunRecord::new(
            RunId(0),
            ParameterAssignment::new().with("speed", 0.0),
            RunStatus::Complete,
        )];

        let err = GridBuilder::new(&a1, &a2).build("m", &runs).unwrap_err();
        assert!(matches!(err, ExplorationError::MissingParameter { .. }));
    }

    #[test]
    fn test_no_usable_metric() {
        let (a1, a2) = axes();
        let runs = vec![
            run(0, 0.0, 10.0, RunStatus::Failed, None),
            run(1, 1.0, 20.0, RunStatus::Complete, None),
        ];

        let err = GridBuilder::new(&a1, &a2).build("m", &runs).unwrap_err();
        assert!(matches!(err, ExplorationError::NoResults { metric: Some(ref m) } if m == "m"));
    }

    #[test]
    fn test_duplicate_run_last_wins() {
        let (a1, a2) = axes();
        let mut runs = full_runs();
        runs.push(run(42, 0.0, 10.0, RunStatus::Complete, Some(-7.0)));

        let grid = GridBuilder::new(&a1, &a2).build("m", &runs).unwrap();
        assert_eq!(grid.value(CellIndex::new(0, 0)), Some(-7.0));
    }
}
