//! Ordered values of one varied parameter
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{ExplorationError, ExplorationResult};

/// Strictly ascending, finite sample positions of a varied parameter
///
/// # Invariants
/// - At least two values
/// - Every value finite
/// - Strictly ascending order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct AxisValues(Vec<f64>);

impl AxisValues {
    /// Validate and wrap axis values
    pub fn new(values: Vec<f64>) -> ExplorationResult<Self> {
        Self::validated("axis", values)
    }

    fn validated(name: &str, values: Vec<f64>) -> ExplorationResult<Self> {
        let invalid = |reason: String| ExplorationError::InvalidAxis {
            name: name.to_string(),
            reason,
        };

        if values.len() < 2 {
            return Err(invalid(format!("expected at least 2 values, got {}", values.len())));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(invalid(format!("value {bad} is not finite")));
        }
        if let Some(pair) = values.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(invalid(format!(
                "values must be strictly ascending, found {} before {}",
                pair[0], pair[1]
            )));
        }

        Ok(Self(values))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a validated axis; present for API symmetry
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Index of the value equal to `value`, exact match only
    pub fn index_of(&self, value: f64) -> Option<usize> {
        self.0.iter().position(|&v| v == value)
    }

    /// Index of the value closest to `coordinate`.
    ///
    /// Linear scan; on an exact tie the earlier (smaller) value wins.
    /// Returns `None` only for a non-finite coordinate.
    pub fn nearest_index(&self, coordinate: f64) -> Option<usize> {
        if !coordinate.is_finite() {
            return None;
        }

        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (idx, &value) in self.0.iter().enumerate() {
            let distance = (value - coordinate).abs();
            if distance < best_distance {
                best_distance = distance;
                best = idx;
            }
        }
        Some(best)
    }
}

impl Index<usize> for AxisValues {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.0[idx]
    }
}

impl TryFrom<Vec<f64>> for AxisValues {
    type Error = ExplorationError;

    fn try_from(values: Vec<f64>) -> ExplorationResult<Self> {
        Self::new(values)
    }
}

impl From<AxisValues> for Vec<f64> {
    fn from(axis: AxisValues) -> Self {
        axis.0
    }
}

/// A varied parameter: its human-readable name and its sample positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAxis {
    pub name: String,
    pub values: AxisValues,
}

impl ParameterAxis {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> ExplorationResult<Self> {
        let name = name.into();
        let values = AxisValues::validated(&name, values)?;
        Ok(Self { name, values })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
