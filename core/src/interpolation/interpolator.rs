//! High-resolution surface reconstruction of a raw grid
//!
//! One pass per metric: substitute missing cells, fit the spline surface,
//! sample it on the output mesh, blank the blocks of missing cells and rotate
//! the result into display orientation.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::debug;
use ndarray::{s, Array2};

use crate::config::InterpolatorConfig;
use crate::error::{ExplorationError, ExplorationResult};
use crate::exploration::axis::AxisValues;
use crate::exploration::grid::{MissingMask, RawGrid};
use crate::interpolation::surface::FittedSurface;

/// Sampled surface in display orientation
///
/// Rows run from the largest axis2 sample (row 0) down to the smallest,
/// columns from the smallest axis1 sample to the largest. Missing regions
/// hold NaN.
#[derive(Debug, Clone)]
pub struct HighResGrid {
    data: Array2<f64>,
    extent: Extent,
}

/// Axis-unit bounds of a rendered grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub axis1_min: f64,
    pub axis1_max: f64,
    pub axis2_min: f64,
    pub axis2_max: f64,
}

impl Extent {
    pub fn of(axis1: &AxisValues, axis2: &AxisValues) -> Self {
        Self {
            axis1_min: axis1.min(),
            axis1_max: axis1.max(),
            axis2_min: axis2.min(),
            axis2_max: axis2.max(),
        }
    }
}

impl HighResGrid {
    #[inline]
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// `(width, height)` in samples
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        let (rows, cols) = self.data.dim();
        (cols, rows)
    }

    #[inline]
    pub fn is_missing(&self, row: usize, col: usize) -> bool {
        self.data.get([row, col]).map_or(true, |v| v.is_nan())
    }

    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }

    /// Smallest and largest non-missing sample
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |range, &v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Output of one interpolation pass
#[derive(Debug, Clone)]
pub struct InterpolatedSurface {
    /// Model retained for point queries
    pub surface: FittedSurface,

    /// Sampled and blanked output for rendering
    pub high_res: HighResGrid,
}

/// Reconstructs a continuous surface from a raw grid
#[derive(Debug, Clone, Default)]
pub struct SurfaceInterpolator {
    config: InterpolatorConfig,
}

impl SurfaceInterpolator {
    pub fn new(config: InterpolatorConfig) -> ExplorationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &InterpolatorConfig {
        &self.config
    }

    /// Fit, sample, blank and rotate the grid of one metric
    ///
    /// # Errors
    /// `InvalidConfiguration` when the values or the mask do not match the axes
    pub fn interpolate(
        &self,
        grid: &RawGrid,
        axis1: &AxisValues,
        axis2: &AxisValues,
    ) -> ExplorationResult<InterpolatedSurface> {
        let expected = (axis1.len(), axis2.len());
        if grid.shape() != expected || grid.missing.shape() != expected {
            return Err(ExplorationError::InvalidConfiguration {
                reason: format!(
                    "grid of metric {} is {:?} with a {:?} mask, axes are {:?}",
                    grid.metric,
                    grid.shape(),
                    grid.missing.shape(),
                    expected
                ),
            });
        }

        let mut values = grid.values.clone();
        for cell in grid.missing.missing_cells() {
            values[[cell.axis1, cell.axis2]] = self.config.missing_sentinel;
        }

        let surface = FittedSurface::fit(axis1, axis2, &values)?;

        let resolution = self.config.resolution;
        let xs = mesh(axis1, resolution.axis1);
        let ys = mesh(axis2, resolution.axis2);
        let mut sampled = surface.evaluate_grid(&xs, &ys, self.config.parallel_evaluation)?;

        self.blank_missing(&mut sampled, &grid.missing);

        debug!(
            "Interpolated metric {} with {} fit onto {}x{} mesh",
            grid.metric, surface.degree(), resolution.axis1, resolution.axis2
        );

        Ok(InterpolatedSurface {
            surface,
            high_res: HighResGrid {
                data: rotate_counterclockwise(&sampled),
                extent: Extent::of(axis1, axis2),
            },
        })
    }

    /// Set every sample of a missing cell's block to NaN
    pub fn blank_missing(&self, sampled: &mut Array2<f64>, missing: &MissingMask) {
        let (samples1, samples2) = sampled.dim();
        let (len1, len2) = missing.shape();
        let rule = self.config.blanking;

        for cell in missing.missing_cells() {
            let (start1, end1) = rule.block(cell.axis1, len1, samples1);
            let (start2, end2) = rule.block(cell.axis2, len2, samples2);
            let (end1, end2) = (end1.min(samples1), end2.min(samples2));
            if start1 >= end1 || start2 >= end2 {
                continue;
            }
            sampled.slice_mut(s![start1..end1, start2..end2]).fill(f64::NAN);
        }
    }
}

/// `count` samples from the axis minimum, stepping `(max - min) / count`
fn mesh(axis: &AxisValues, count: usize) -> Vec<f64> {
    let start = axis.min();
    let step = (axis.max() - start) / count as f64;
    (0..count).map(|k| start + k as f64 * step).collect()
}

/// Quarter turn counterclockwise: `out[[r, c]] = a[[c, cols - 1 - r]]`
fn rotate_counterclockwise(a: &Array2<f64>) -> Array2<f64> {
    let (_, cols) = a.dim();
    Array2::from_shape_fn((cols, a.nrows()), |(r, c)| a[[c, cols - 1 - r]])
}
