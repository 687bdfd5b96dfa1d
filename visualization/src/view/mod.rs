//! Rendered views of parameter space figures
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod heatmap_view;

pub use self::heatmap_view::{ColorBar, FigureHandle, FigureMetadata, HeatmapImage, HeatmapRenderer};
