//! One-dimensional B-spline basis for interpolation on data sites
//!
//! Knots are clamped at both ends of the data range. Interior knots sit on
//! the data sites themselves, skipping `(k + 1) / 2` sites at each end, which
//! gives the not-a-knot layout for cubic splines and the hat-function basis
//! for linear ones. The number of basis functions equals the number of sites,
//! so interpolation reduces to a square collocation system.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use nalgebra::DMatrix;

use crate::error::{ExplorationError, ExplorationResult};

/// Evaluated non-zero basis functions at one coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct BasisSample {
    /// Index of the first non-zero basis function
    pub first: usize,

    /// Values of basis functions `first..=first + degree`
    pub weights: Vec<f64>,
}

/// Clamped B-spline basis of a fixed degree
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineBasis {
    knots: Vec<f64>,
    degree: usize,
}

impl BSplineBasis {
    /// Interpolation basis on strictly ascending `sites`.
    ///
    /// # Errors
    /// `InvalidConfiguration` unless `degree` is odd, there are more sites
    /// than `degree` and the sites are finite and strictly ascending.
    pub fn interpolating(sites: &[f64], degree: usize) -> ExplorationResult<Self> {
        let invalid = |reason: String| Err(ExplorationError::InvalidConfiguration { reason });
        if degree % 2 == 0 {
            return invalid(format!("interpolating spline degree must be odd, got {degree}"));
        }
        if sites.len() <= degree {
            return invalid(format!("degree {degree} spline needs more than {degree} sites, got {}", sites.len()));
        }
        if sites.iter().any(|site| !site.is_finite()) || sites.windows(2).any(|pair| pair[0] >= pair[1]) {
            return invalid("spline sites must be finite and strictly ascending".to_string());
        }

        let n = sites.len();
        let skip = (degree + 1) / 2;
        let first = sites[0];
        let last = sites[n - 1];

        let mut knots = Vec::with_capacity(n + degree + 1);
        knots.extend(std::iter::repeat(first).take(degree + 1));
        knots.extend_from_slice(&sites[skip..n - skip]);
        knots.extend(std::iter::repeat(last).take(degree + 1));

        Ok(Self { knots, degree })
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of basis functions
    #[inline]
    pub fn len(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Knot span holding `x`, clamped to the boundary spans outside the domain
    fn span(&self, x: f64) -> usize {
        let n = self.len();
        let k = self.degree;

        if x >= self.knots[n] {
            return n - 1;
        }
        if x <= self.knots[k] {
            return k;
        }

        // knots[low] <= x < knots[high]
        let mut low = k;
        let mut high = n;
        while high - low > 1 {
            let mid = (low + high) / 2;
            if x < self.knots[mid] {
                high = mid;
            } else {
                low = mid;
            }
        }
        low
    }

    /// Non-zero basis functions at `x` (Cox-de Boor recursion).
    ///
    /// Outside the knot range the boundary polynomial pieces are extended.
    pub fn sample(&self, x: f64) -> BasisSample {
        let k = self.degree;
        let span = self.span(x);
        let t = &self.knots;

        let mut weights = vec![0.0; k + 1];
        let mut left = vec![0.0; k + 1];
        let mut right = vec![0.0; k + 1];
        weights[0] = 1.0;

        for j in 1..=k {
            left[j] = x - t[span + 1 - j];
            right[j] = t[span + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                let temp = weights[r] / (right[r + 1] + left[j - r]);
                weights[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            weights[j] = saved;
        }

        BasisSample {
            first: span - k,
            weights,
        }
    }

    /// Square matrix `A[i][j] = B_j(sites[i])`
    pub fn collocation_matrix(&self, sites: &[f64]) -> DMatrix<f64> {
        let mut matrix = DMatrix::zeros(sites.len(), self.len());
        for (row, &site) in sites.iter().enumerate() {
            let sample = self.sample(site);
            for (offset, weight) in sample.weights.iter().enumerate() {
                matrix[(row, sample.first + offset)] = *weight;
            }
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_knot_layout() {
        let basis = BSplineBasis::interpolating(&[0.0, 1.0, 2.0, 3.0, 4.0], 3).unwrap();
        assert_eq!(basis.knots(), &[0.0, 0.0, 0.0, 0.0, 2.0, 4.0, 4.0, 4.0, 4.0]);
        assert_eq!(basis.len(), 5);

        let four = BSplineBasis::interpolating(&[0.0, 1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(four.knots(), &[0.0, 0.0, 0.0, 0.0, 3.0, 3.0, 3.0, 3.0]);
        assert_eq!(four.len(), 4);
    }

    #[test]
    fn test_rejects_unusable_sites() {
        assert!(BSplineBasis::interpolating(&[0.0, 1.0, 2.0], 3).is_err());
        assert!(BSplineBasis::interpolating(&[0.0], 1).is_err());
        assert!(BSplineBasis::interpolating(&[0.0, 1.0, 2.0], 2).is_err());
        assert!(BSplineBasis::interpolating(&[0.0, 2.0, 1.0], 1).is_err());
        assert!(matches!(
            BSplineBasis::interpolating(&[0.0, f64::NAN, 2.0], 1),
            Err(ExplorationError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_linear_knot_layout() {
        let basis = BSplineBasis::interpolating(&[0.0, 0.5, 2.0], 1).unwrap();
        assert_eq!(basis.knots(), &[0.0, 0.0, 0.5, 2.0, 2.0]);
        assert_eq!(basis.len(), 3);
    }

    #[test]
    fn test_partition_of_unity() {
        let basis = BSplineBasis::interpolating(&[0.0, 0.3, 1.1, 2.0, 2.5, 4.0], 3).unwrap();
        for step in 0..=40 {
            let x = step as f64 * 0.1;
            let sum: f64 = basis.sample(x).weights.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "sum {sum} at {x}");
        }
    }

    #[test]
    fn test_linear_collocation_is_identity() {
        let sites = [1.0, 2.0, 4.0, 8.0];
        let matrix = BSplineBasis::interpolating(&sites, 1).unwrap().collocation_matrix(&sites);
        assert_eq!(matrix, DMatrix::identity(4, 4));
    }

    #[test]
    fn test_endpoint_weights() {
        let sites = [0.0, 1.0, 2.0, 3.0, 4.0];
        let basis = BSplineBasis::interpolating(&sites, 3).unwrap();

        let start = basis.sample(0.0);
        assert_eq!(start.first, 0);
        assert!((start.weights[0] - 1.0).abs() < 1e-12);

        let end = basis.sample(4.0);
        assert_eq!(end.first, 1);
        assert!((end.weights[3] - 1.0).abs() < 1e-12);
    }
}
