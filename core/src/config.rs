//! Configuration of the surface reconstruction pass
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use crate::error::{ExplorationError, ExplorationResult};

/// Samples per axis of the high-resolution output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// Samples along the first varied parameter
    pub axis1: usize,

    /// Samples along the second varied parameter
    pub axis2: usize,
}

impl Resolution {
    pub const fn new(axis1: usize, axis2: usize) -> Self {
        Self { axis1, axis2 }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        // Resolution of the sampled surface, not the display size
        Self::new(600, 600)
    }
}

/// How missing raw cells map onto blocks of high-resolution samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankingRule {
    /// Block size is `resolution / axis_len` truncated; trailing rows and
    /// columns are left uncovered when the division is not exact
    #[default]
    Truncated,

    /// Block bounds are `floor(i * resolution / axis_len)`, covering every
    /// sample
    Proportional,
}

impl BlankingRule {
    /// Half-open range of high-resolution samples covered by raw index `idx`
    pub fn block(self, idx: usize, axis_len: usize, resolution: usize) -> (usize, usize) {
        match self {
            Self::Truncated => {
                let granularity = resolution / axis_len;
                (idx * granularity, (idx + 1) * granularity)
            }
            Self::Proportional => (
                idx * resolution / axis_len,
                (idx + 1) * resolution / axis_len,
            ),
        }
    }
}

/// Surface interpolation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolatorConfig {
    /// Output mesh resolution
    pub resolution: Resolution,

    /// Value substituted for missing cells before fitting
    pub missing_sentinel: f64,

    /// Mapping of missing cells onto the output mesh
    pub blanking: BlankingRule,

    /// Evaluate mesh rows on the rayon pool
    pub parallel_evaluation: bool,
}

impl Default for InterpolatorConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            missing_sentinel: 0.0,
            blanking: BlankingRule::default(),
            parallel_evaluation: false,
        }
    }
}

impl InterpolatorConfig {
    pub fn validate(&self) -> ExplorationResult<()> {
        if self.resolution.axis1 == 0 || self.resolution.axis2 == 0 {
            return Err(ExplorationError::InvalidConfiguration {
                reason: format!(
                    "resolution must be positive, got {}x{}",
                    self.resolution.axis1, self.resolution.axis2
                ),
            });
        }
        if !self.missing_sentinel.is_finite() {
            return Err(ExplorationError::InvalidConfiguration {
                reason: "missing sentinel must be finite".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration; absent fields take defaults
    pub fn from_json(json: &str) -> ExplorationResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ExplorationError::InvalidConfiguration {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InterpolatorConfig::default();
        assert_eq!(config.resolution, Resolution::new(600, 600));
        assert_eq!(config.missing_sentinel, 0.0);
        assert_eq!(config.blanking, BlankingRule::Truncated);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_truncated_blocks_leave_remainder() {
        // 600 / 7 = 85, so samples 595..600 belong to no block
        assert_eq!(BlankingRule::Truncated.block(0, 7, 600), (0, 85));
        assert_eq!(BlankingRule::Truncated.block(6, 7, 600), (510, 595));
    }

    #[test]
    fn test_proportional_blocks_cover_everything() {
        let mut covered = 0;
        for idx in 0..7 {
            let (start, end) = BlankingRule::Proportional.block(idx, 7, 600);
            assert_eq!(start, covered);
            covered = end;
        }
        assert_eq!(covered, 600);
    }

    #[test]
    fn test_from_json_partial() {
        let config = InterpolatorConfig::from_json(r#"{"resolution": {"axis1": 50, "axis2": 40}, "blanking": "proportional"}"#)
            .unwrap();
        assert_eq!(config.resolution, Resolution::new(50, 40));
        assert_eq!(config.blanking, BlankingRule::Proportional);
        assert_eq!(config.missing_sentinel, 0.0);

        assert!(InterpolatorConfig::from_json(r#"{"resolution": {"axis1": 0, "axis2": 40}}"#).is_err());
        assert!(InterpolatorConfig::from_json("not json").is_err());
    }
}
