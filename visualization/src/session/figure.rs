//! Rendering session of one metric figure
//!
//! A session owns everything a figure needs after it was drawn: the
//! high-resolution surface, the rendered image with its metadata and the
//! interaction state. Nothing is shared between sessions; dropping a session
//! releases its fitted model and masks.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::info;

use isocline_core::{Exploration, HighResGrid, SplineDegree, SurfaceInterpolator};

use crate::error::VisualizationResult;
use crate::interaction::{format_coord, DisplayCommand, HoverValue, InteractionMapper};
use crate::view::{FigureHandle, FigureMetadata, HeatmapImage, HeatmapRenderer};

/// One rendered parameter space figure
#[derive(Debug, Clone)]
pub struct ExplorationSession {
    metric: String,
    metadata: FigureMetadata,
    high_res: HighResGrid,
    image: HeatmapImage,
    mapper: InteractionMapper,
}

impl ExplorationSession {
    /// Build, interpolate and render `metric` of the exploration
    pub fn build(
        figure: FigureHandle,
        exploration: &Exploration,
        metric: &str,
        interpolator: &SurfaceInterpolator,
        renderer: &HeatmapRenderer,
    ) -> VisualizationResult<Self> {
        let raw = exploration
            .grid_builder()
            .with_sentinel(interpolator.config().missing_sentinel)
            .build(metric, &exploration.runs)?;

        let axis1 = &exploration.axis1;
        let axis2 = &exploration.axis2;
        let interpolated = interpolator.interpolate(&raw, &axis1.values, &axis2.values)?;

        let (image, color_bar) = renderer.render(&interpolated.high_res);
        let mut metadata = FigureMetadata::new(metric, &axis1.name, &axis2.name, interpolated.high_res.extent());
        metadata.color_bar = color_bar;

        info!(
            "Figure {} for metric {}: {} fit, {} of {} cells missing",
            figure,
            metric,
            interpolated.surface.degree(),
            raw.missing.missing_count(),
            axis1.len() * axis2.len()
        );

        let mapper = InteractionMapper::new(
            figure,
            axis1.values.clone(),
            axis2.values.clone(),
            raw.missing,
            interpolated.surface,
            raw.identifiers,
        );

        Ok(Self {
            metric: metric.to_string(),
            metadata,
            high_res: interpolated.high_res,
            image,
            mapper,
        })
    }

    #[inline]
    pub fn figure(&self) -> FigureHandle {
        self.mapper.figure()
    }

    #[inline]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    #[inline]
    pub fn metadata(&self) -> &FigureMetadata {
        &self.metadata
    }

    #[inline]
    pub fn high_res(&self) -> &HighResGrid {
        &self.high_res
    }

    #[inline]
    pub fn image(&self) -> &HeatmapImage {
        &self.image
    }

    #[inline]
    pub fn mapper(&self) -> &InteractionMapper {
        &self.mapper
    }

    #[inline]
    pub fn degree(&self) -> SplineDegree {
        self.mapper.surface().degree()
    }

    pub fn click(&self, x: f64, y: f64) -> Option<DisplayCommand> {
        self.mapper.click(x, y)
    }

    pub fn hover(&self, x: f64, y: f64) -> Option<DisplayCommand> {
        self.mapper.hover(x, y)
    }

    pub fn hover_value(&self, x: f64, y: f64) -> Option<HoverValue> {
        self.mapper.hover_value(x, y)
    }

    pub fn format_coord(&self, x: f64, y: f64) -> String {
        format_coord(x, y)
    }
}
