//! Tensor-product spline surface over a rectangular grid
//!
//! Represents `S(x, y) = Σᵢ Σⱼ cᵢⱼ Bᵢ(x) Bⱼ(y)` with coefficients chosen so
//! that the surface passes through every grid value. With collocation
//! matrices `Aₓ` and `Aᵧ` the coefficients solve `Aₓ C Aᵧᵀ = Z`, done as two
//! LU solves, one per axis.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use nalgebra::DMatrix;
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ExplorationError, ExplorationResult};
use crate::exploration::axis::AxisValues;
use crate::interpolation::bspline::{BSplineBasis, BasisSample};

/// Polynomial degree used on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplineDegree {
    /// Piecewise bilinear
    Linear,

    /// Piecewise bicubic
    Cubic,
}

impl SplineDegree {
    /// Cubic when both axes have more than three values, linear otherwise.
    ///
    /// A spline of degree `k` needs more than `k` sites per axis.
    pub fn for_axes(axis1_len: usize, axis2_len: usize) -> Self {
        if axis1_len <= 3 || axis2_len <= 3 {
            Self::Linear
        } else {
            Self::Cubic
        }
    }

    #[inline]
    pub fn order(self) -> usize {
        match self {
            Self::Linear => 1,
            Self::Cubic => 3,
        }
    }
}

impl fmt::Display for SplineDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("bilinear"),
            Self::Cubic => f.write_str("bicubic"),
        }
    }
}

/// Fitted bivariate interpolation model
#[derive(Debug, Clone)]
pub struct FittedSurface {
    basis1: BSplineBasis,
    basis2: BSplineBasis,
    coefficients: DMatrix<f64>,
    degree: SplineDegree,
}

impl FittedSurface {
    /// Fit an interpolating spline through `values[[i, j]] = f(axis1[i], axis2[j])`.
    ///
    /// `values` must be free of NaN; missing cells are substituted beforehand.
    pub fn fit(axis1: &AxisValues, axis2: &AxisValues, values: &Array2<f64>) -> ExplorationResult<Self> {
        let (rows, cols) = values.dim();
        if rows != axis1.len() || cols != axis2.len() {
            return Err(ExplorationError::InvalidConfiguration {
                reason: format!(
                    "value grid is {rows}x{cols} but axes are {}x{}",
                    axis1.len(),
                    axis2.len()
                ),
            });
        }

        let degree = SplineDegree::for_axes(rows, cols);
        let basis1 = BSplineBasis::interpolating(axis1.as_slice(), degree.order())?;
        let basis2 = BSplineBasis::interpolating(axis2.as_slice(), degree.order())?;

        let collocation1 = basis1.collocation_matrix(axis1.as_slice()).lu();
        let collocation2 = basis2.collocation_matrix(axis2.as_slice()).lu();

        let z = DMatrix::from_fn(rows, cols, |i, j| values[[i, j]]);

        // Aₓ W = Z, then Aᵧ Cᵀ = Wᵀ
        let w = collocation1.solve(&z).ok_or_else(|| ExplorationError::SingularFit {
            axis: "axis1".to_string(),
        })?;
        let c_t = collocation2
            .solve(&w.transpose())
            .ok_or_else(|| ExplorationError::SingularFit {
                axis: "axis2".to_string(),
            })?;

        Ok(Self {
            basis1,
            basis2,
            coefficients: c_t.transpose(),
            degree,
        })
    }

    #[inline]
    pub fn degree(&self) -> SplineDegree {
        self.degree
    }

    /// Surface value at `(x, y)`; outside the grid the boundary pieces extrapolate
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.combine(&self.basis1.sample(x), &self.basis2.sample(y))
    }

    /// Surface values on the tensor mesh `xs × ys`, shape `(xs.len(), ys.len())`
    pub fn evaluate_grid(&self, xs: &[f64], ys: &[f64], parallel: bool) -> ExplorationResult<Array2<f64>> {
        let samples1: Vec<BasisSample> = xs.iter().map(|&x| self.basis1.sample(x)).collect();
        let samples2: Vec<BasisSample> = ys.iter().map(|&y| self.basis2.sample(y)).collect();

        let row = |s1: &BasisSample| -> Vec<f64> { samples2.iter().map(|s2| self.combine(s1, s2)).collect() };

        let flat: Vec<f64> = if parallel {
            samples1.par_iter().flat_map_iter(|s1| row(s1)).collect()
        } else {
            samples1.iter().flat_map(|s1| row(s1)).collect()
        };

        Array2::from_shape_vec((xs.len(), ys.len()), flat).map_err(|e| ExplorationError::InvalidConfiguration {
            reason: e.to_string(),
        })
    }

    fn combine(&self, s1: &BasisSample, s2: &BasisSample) -> f64 {
        let mut total = 0.0;
        for (a, w1) in s1.weights.iter().enumerate() {
            let mut inner = 0.0;
            for (b, w2) in s2.weights.iter().enumerate() {
                inner += self.coefficients[(s1.first + a, s2.first + b)] * w2;
            }
            total += w1 * inner;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(values: &[f64]) -> AxisValues {
        AxisValues::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_degree_policy() {
        assert_eq!(SplineDegree::for_axes(4, 4), SplineDegree::Cubic);
        assert_eq!(SplineDegree::for_axes(10, 5), SplineDegree::Cubic);
        assert_eq!(SplineDegree::for_axes(3, 10), SplineDegree::Linear);
        assert_eq!(SplineDegree::for_axes(10, 3), SplineDegree::Linear);
        assert_eq!(SplineDegree::for_axes(2, 2), SplineDegree::Linear);
    }

    #[test]
    fn test_cubic_fit_passes_through_grid() {
        let a1 = axis(&[0.0, 0.5, 1.5, 2.0, 3.5]);
        let a2 = axis(&[-1.0, 0.0, 1.0, 4.0]);
        let values = Array2::from_shape_fn((5, 4), |(i, j)| (a1[i] * 1.7).sin() + a2[j] * a2[j] * 0.3);

        let surface = FittedSurface::fit(&a1, &a2, &values).unwrap();
        assert_eq!(surface.degree(), SplineDegree::Cubic);

        for i in 0..5 {
            for j in 0..4 {
                let fitted = surface.evaluate(a1[i], a2[j]);
                assert!((fitted - values[[i, j]]).abs() < 1e-9, "({i}, {j}): {fitted}");
            }
        }
    }

    #[test]
    fn test_linear_fit_is_bilinear() {
        let a1 = axis(&[0.0, 1.0, 2.0]);
        let a2 = axis(&[0.0, 2.0]);
        let values = Array2::from_shape_vec((3, 2), vec![0.0, 2.0, 1.0, 3.0, 4.0, 0.0]).unwrap();

        let surface = FittedSurface::fit(&a1, &a2, &values).unwrap();
        assert_eq!(surface.degree(), SplineDegree::Linear);

        // midpoint of cell (0, 0)..(1, 1): mean of 0, 2, 1, 3
        assert!((surface.evaluate(0.5, 1.0) - 1.5).abs() < 1e-12);
        assert!((surface.evaluate(1.5, 0.0) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_cubic_reproduces_polynomial_between_nodes() {
        let a1 = axis(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let a2 = axis(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let values = Array2::from_shape_fn((5, 5), |(i, j)| a1[i] * 10.0 + a2[j]);

        let surface = FittedSurface::fit(&a1, &a2, &values).unwrap();
        assert!((surface.evaluate(2.0, 2.0) - 22.0).abs() < 1e-9);
        assert!((surface.evaluate(1.25, 3.5) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_evaluation_matches_points() {
        let a1 = axis(&[0.0, 1.0, 2.0, 3.0]);
        let a2 = axis(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let values = Array2::from_shape_fn((4, 5), |(i, j)| ((i * 3 + j) % 4) as f64);
        let surface = FittedSurface::fit(&a1, &a2, &values).unwrap();

        let xs = [0.1, 1.7, 2.9];
        let ys = [0.0, 0.5, 3.3, 4.0];
        let sequential = surface.evaluate_grid(&xs, &ys, false).unwrap();
        let parallel = surface.evaluate_grid(&xs, &ys, true).unwrap();

        assert_eq!(sequential.dim(), (3, 4));
        assert_eq!(sequential, parallel);
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                assert!((sequential[[i, j]] - surface.evaluate(x, y)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let a1 = axis(&[0.0, 1.0]);
        let a2 = axis(&[0.0, 1.0]);
        let values = Array2::zeros((3, 2));
        assert!(matches!(
            FittedSurface::fit(&a1, &a2, &values),
            Err(ExplorationError::InvalidConfiguration { .. })
        ));
    }
}
