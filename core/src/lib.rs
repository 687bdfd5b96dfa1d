//! Isocline core: analytical part of the parameter space explorer
//!
//! Given a two-parameter sweep of simulation runs, assembles the per-metric
//! result grid, reconstructs a continuous surface from it and samples that
//! surface at display resolution while keeping failed or missing runs
//! visible as holes.
//!
//! # Pipeline
//!
//! 1. [`GridBuilder`] maps runs onto the `axis1 × axis2` grid
//! 2. [`SurfaceInterpolator`] fits a spline and produces a [`HighResGrid`]
//! 3. the retained [`FittedSurface`] answers point queries afterwards
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod config;
pub mod error;
pub mod exploration;
pub mod interpolation;

pub use crate::config::{BlankingRule, InterpolatorConfig, Resolution};
pub use crate::error::{ExplorationError, ExplorationResult};
pub use crate::exploration::{
    AxisValues, CellIndex, Exploration, GridBuilder, IdentifierGrid, MissingMask, ParameterAssignment,
    ParameterAxis, RawGrid, ResultId, RunId, RunRecord, RunResult, RunStatus,
};
pub use crate::interpolation::{
    Extent, FittedSurface, HighResGrid, InterpolatedSurface, SplineDegree, SurfaceInterpolator,
};
