//! Surface interpolation module
//!
//! Fits a smooth bivariate model to a raw result grid and samples it at
//! display resolution.
//!
//! - [`bspline`]: clamped one-dimensional B-spline basis
//! - [`surface`]: tensor-product spline fit and point evaluation
//! - [`interpolator`]: the per-metric reconstruction pass
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod bspline;
pub mod interpolator;
pub mod surface;

pub use self::bspline::{BSplineBasis, BasisSample};
pub use self::interpolator::{Extent, HighResGrid, InterpolatedSurface, SurfaceInterpolator};
pub use self::surface::{FittedSurface, SplineDegree};
