//! Heatmap rendering of reconstructed parameter surfaces
//!
//! Maps every sample of a [`HighResGrid`] through a linear color gradient
//! into an RGBA8 image. Missing samples are painted with the configured
//! missing color so holes in the exploration stay visible. The figure
//! metadata (title, labels, extent, color bar) travels with the image.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use isocline_core::{Extent, HighResGrid};

use crate::config::HeatmapConfig;
use crate::error::VisualizationResult;

/// Handle of one rendered figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FigureHandle(pub u32);

impl fmt::Display for FigureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value range covered by the color gradient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorBar {
    pub min: f64,
    pub max: f64,
}

impl ColorBar {
    /// Position of `value` along the gradient, clamped to `[0, 1]`
    fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Labels and geometry of a figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureMetadata {
    pub title: String,
    pub x_label: String,
    pub y_label: String,

    /// `(axis1 min, axis1 max, axis2 min, axis2 max)`
    pub extent: (f64, f64, f64, f64),

    /// Missing when the surface has no finite sample
    pub color_bar: Option<ColorBar>,
}

impl FigureMetadata {
    pub fn new(metric: &str, x_label: &str, y_label: &str, extent: Extent) -> Self {
        Self {
            title: format!("Interpolated values for metric {metric}"),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            extent: (extent.axis1_min, extent.axis1_max, extent.axis2_min, extent.axis2_max),
            color_bar: None,
        }
    }
}

/// Rendered RGBA8 image, row 0 at the top
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[u8; 4]>,
}

impl HeatmapImage {
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> Option<[u8; 4]> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    /// Flatten to tightly packed RGBA bytes
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Colors high-resolution grids
#[derive(Debug, Clone)]
pub struct HeatmapRenderer {
    config: HeatmapConfig,
}

impl HeatmapRenderer {
    pub fn new(config: HeatmapConfig) -> VisualizationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Color bar for `grid`: the configured range, else the finite sample range
    pub fn color_bar(&self, grid: &HighResGrid) -> Option<ColorBar> {
        self.config
            .value_range
            .or_else(|| grid.value_range())
            .map(|(min, max)| ColorBar { min, max })
    }

    pub fn render(&self, grid: &HighResGrid) -> (HeatmapImage, Option<ColorBar>) {
        let color_bar = self.color_bar(grid);
        let missing = to_rgba8(self.config.missing_color);
        let (width, height) = grid.size();

        let pixels = grid
            .data()
            .iter()
            .map(|&value| match color_bar {
                Some(bar) if value.is_finite() => self.gradient_color(bar.normalize(value)),
                _ => missing,
            })
            .collect();

        debug!("Rendered {}x{} heatmap, color bar {:?}", width, height, color_bar);

        (HeatmapImage { width, height, pixels }, color_bar)
    }

    /// Linear blend between the two gradient stops around `t`
    fn gradient_color(&self, t: f64) -> [u8; 4] {
        let stops = &self.config.color_gradient;
        if stops.len() == 1 {
            return to_rgba8(stops[0]);
        }

        let scaled = t * (stops.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = (scaled - lower as f64) as f32;

        let (a, b) = (stops[lower], stops[lower + 1]);
        to_rgba8([
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
            a[3] + (b[3] - a[3]) * frac,
        ])
    }
}

impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self {
            config: HeatmapConfig::default(),
        }
    }
}

fn to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use isocline_core::{
        GridBuilder, InterpolatorConfig, ParameterAssignment, ParameterAxis, Resolution, ResultId, RunId,
        RunRecord, RunResult, RunStatus, SurfaceInterpolator,
    };

    fn surface_with_hole() -> HighResGrid {
        let a1 = ParameterAxis::new("x", vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let a2 = ParameterAxis::new("y", vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let mut runs = Vec::new();
        for (i, x) in [0.0, 1.0, 2.0, 3.0].into_iter().enumerate() {
            for (j, y) in [0.0, 1.0, 2.0, 3.0].into_iter().enumerate() {
                let id = (i * 4 + j) as u64;
                let params = ParameterAssignment::new().with("x", x).with("y", y);
                let mut run = RunRecord::new(RunId(id), params, RunStatus::Complete);
                if (i, j) != (0, 0) {
                    run = run.with_result(RunResult::new(ResultId::new(format!("r{id}"))).with_metric("m", x + y));
                }
                runs.push(run);
            }
        }
        let raw = GridBuilder::new(&a1, &a2).build("m", &runs).unwrap();
        let interpolator = SurfaceInterpolator::new(InterpolatorConfig {
            resolution: Resolution::new(8, 8),
            ..InterpolatorConfig::default()
        })
        .unwrap();
        interpolator.interpolate(&raw, &a1.values, &a2.values).unwrap().high_res
    }

    #[test]
    fn test_gradient_endpoints() {
        let renderer = HeatmapRenderer::default();
        assert_eq!(renderer.gradient_color(0.0), [0, 0, 255, 255]);
        assert_eq!(renderer.gradient_color(0.5), [0, 255, 0, 255]);
        assert_eq!(renderer.gradient_color(1.0), [255, 0, 0, 255]);
        assert_eq!(renderer.gradient_color(0.125), [0, 128, 255, 255]);
    }

    #[test]
    fn test_missing_samples_use_missing_color() {
        let grid = surface_with_hole();
        let (image, color_bar) = HeatmapRenderer::default().render(&grid);

        assert_eq!((image.width, image.height), (8, 8));
        assert_eq!(image.to_rgba_bytes().len(), 8 * 8 * 4);
        assert!(color_bar.is_some());

        // raw cell (0, 0) covers the bottom-left 2x2 block
        for row in 6..8 {
            for col in 0..2 {
                assert_eq!(image.pixel(row, col), Some([0, 0, 0, 0]));
            }
        }
        assert_ne!(image.pixel(5, 0), Some([0, 0, 0, 0]));
        assert_eq!(image.pixel(8, 0), None);
    }

    #[test]
    fn test_fixed_value_range() {
        let grid = surface_with_hole();
        let renderer = HeatmapRenderer::new(HeatmapConfig {
            value_range: Some((100.0, 200.0)),
            ..HeatmapConfig::default()
        })
        .unwrap();

        let (image, color_bar) = renderer.render(&grid);
        assert_eq!(color_bar, Some(ColorBar { min: 100.0, max: 200.0 }));
        // every finite sample is below the range and clamps to the first stop
        assert_eq!(image.pixel(0, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_degenerate_color_bar() {
        let bar = ColorBar { min: 3.0, max: 3.0 };
        assert_eq!(bar.normalize(3.0), 0.0);
    }

    #[test]
    fn test_metadata_title() {
        let extent = Extent {
            axis1_min: 0.0,
            axis1_max: 4.0,
            axis2_min: -1.0,
            axis2_max: 1.0,
        };
        let meta = FigureMetadata::new("variance", "speed", "coupling", extent);
        assert_eq!(meta.title, "Interpolated values for metric variance");
        assert_eq!(meta.extent, (0.0, 4.0, -1.0, 1.0));
    }
}
