//! Explorer configuration
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use isocline_core::InterpolatorConfig;

use crate::error::{VisualizationError, VisualizationResult};

/// Configuration for heatmap rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Color gradient stops from lowest to highest value (rgba in 0..=1)
    pub color_gradient: Vec<[f32; 4]>,

    /// Value range mapping (min, max), None for auto-detect
    pub value_range: Option<(f64, f64)>,

    /// Color painted into missing samples
    pub missing_color: [f32; 4],
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            color_gradient: vec![
                [0.0, 0.0, 1.0, 1.0], // Blue
                [0.0, 1.0, 1.0, 1.0], // Cyan
                [0.0, 1.0, 0.0, 1.0], // Green
                [1.0, 1.0, 0.0, 1.0], // Yellow
                [1.0, 0.0, 0.0, 1.0], // Red
            ],
            value_range: None,
            missing_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl HeatmapConfig {
    pub fn validate(&self) -> VisualizationResult<()> {
        if self.color_gradient.is_empty() {
            return Err(VisualizationError::InvalidConfiguration(
                "color gradient needs at least one stop".to_string(),
            ));
        }
        if let Some((min, max)) = self.value_range {
            if !(min.is_finite() && max.is_finite() && min <= max) {
                return Err(VisualizationError::InvalidConfiguration(format!(
                    "value range ({min}, {max}) is not an ordered finite pair"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration of a parameter space explorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Display title of the explorer
    pub title: String,

    /// Surface reconstruction settings
    pub interpolation: InterpolatorConfig,

    /// Heatmap rendering settings
    pub heatmap: HeatmapConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            title: "Isocline Parameter Space Exploration".to_string(),
            interpolation: InterpolatorConfig::default(),
            heatmap: HeatmapConfig::default(),
        }
    }
}

impl ExplorerConfig {
    pub fn validate(&self) -> VisualizationResult<()> {
        self.interpolation.validate()?;
        self.heatmap.validate()
    }

    /// Parse and validate a JSON configuration; absent fields take defaults
    pub fn from_json(json: &str) -> VisualizationResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
