//! Parameter space explorer
//!
//! Drives the per-metric pipeline for an exploration: checks that every run
//! has finished, discovers the metrics to display and builds one rendering
//! session per metric. The returned display owns those sessions keyed by
//! figure handle.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::Serialize;

use isocline_core::{Exploration, ExplorationError, GridBuilder, SurfaceInterpolator};

use crate::config::ExplorerConfig;
use crate::error::{VisualizationError, VisualizationResult};
use crate::session::figure::ExplorationSession;
use crate::view::{FigureHandle, HeatmapRenderer};

/// Display-facing summary of a launch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayParameters {
    pub title: String,
    pub metrics: Vec<String>,
    pub figure_numbers: BTreeMap<String, FigureHandle>,
}

/// All figures of one exploration launch
#[derive(Debug)]
pub struct ExplorationDisplay {
    parameters: DisplayParameters,
    sessions: BTreeMap<FigureHandle, ExplorationSession>,
}

impl ExplorationDisplay {
    #[inline]
    pub fn title(&self) -> &str {
        &self.parameters.title
    }

    #[inline]
    pub fn metrics(&self) -> &[String] {
        &self.parameters.metrics
    }

    #[inline]
    pub fn parameters(&self) -> &DisplayParameters {
        &self.parameters
    }

    /// Metric to figure handle map
    #[inline]
    pub fn figure_numbers(&self) -> &BTreeMap<String, FigureHandle> {
        &self.parameters.figure_numbers
    }

    pub fn figure_numbers_json(&self) -> VisualizationResult<String> {
        Ok(serde_json::to_string(&self.parameters.figure_numbers)?)
    }

    pub fn session(&self, figure: FigureHandle) -> Option<&ExplorationSession> {
        self.sessions.get(&figure)
    }

    pub fn session_for_metric(&self, metric: &str) -> Option<&ExplorationSession> {
        self.figure_numbers()
            .get(metric)
            .and_then(|figure| self.sessions.get(figure))
    }

    pub fn sessions(&self) -> impl Iterator<Item = &ExplorationSession> {
        self.sessions.values()
    }

    /// Discard a figure and everything retained for it
    pub fn close(&mut self, figure: FigureHandle) -> Option<ExplorationSession> {
        let session = self.sessions.remove(&figure)?;
        self.parameters.figure_numbers.remove(session.metric());
        debug!("Closed figure {} ({})", figure, session.metric());
        Some(session)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Builds parameter space figures for explorations
#[derive(Debug)]
pub struct ParameterSpaceExplorer {
    config: ExplorerConfig,
    interpolator: SurfaceInterpolator,
    renderer: HeatmapRenderer,
    next_figure: u32,
}

impl ParameterSpaceExplorer {
    pub fn new(config: ExplorerConfig) -> VisualizationResult<Self> {
        config.validate()?;
        Ok(Self {
            interpolator: SurfaceInterpolator::new(config.interpolation.clone())?,
            renderer: HeatmapRenderer::new(config.heatmap.clone())?,
            config,
            next_figure: 1,
        })
    }

    #[inline]
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Render one figure per metric of the exploration.
    ///
    /// # Errors
    /// - `IncompleteExploration` before any figure is built if a run is unfinished
    /// - `NoResults` when no metric has a single usable cell
    /// - any other grid or fit error of an individual metric
    ///
    /// A metric whose cells are all missing is skipped with a warning.
    pub fn launch(&mut self, exploration: &Exploration) -> VisualizationResult<ExplorationDisplay> {
        GridBuilder::ensure_finished(&exploration.runs)?;

        let metrics = exploration.metrics();
        if metrics.is_empty() {
            return Err(ExplorationError::NoResults { metric: None }.into());
        }

        let mut sessions = BTreeMap::new();
        let mut figure_numbers = BTreeMap::new();
        let mut rendered = Vec::with_capacity(metrics.len());
        for metric in metrics {
            let figure = FigureHandle(self.next_figure);
            match ExplorationSession::build(figure, exploration, &metric, &self.interpolator, &self.renderer) {
                Ok(session) => {
                    self.next_figure += 1;
                    figure_numbers.insert(metric.clone(), figure);
                    sessions.insert(figure, session);
                    rendered.push(metric);
                }
                Err(VisualizationError::Exploration(ExplorationError::NoResults { .. })) => {
                    warn!("Skipping metric {}: no usable cell in the sweep", metric);
                }
                Err(err) => return Err(err),
            }
        }

        if sessions.is_empty() {
            return Err(ExplorationError::NoResults { metric: None }.into());
        }

        info!(
            "Launched {} over {} x {} with {} figures",
            self.config.title,
            exploration.axis1.name,
            exploration.axis2.name,
            sessions.len()
        );

        Ok(ExplorationDisplay {
            parameters: DisplayParameters {
                title: self.config.title.clone(),
                metrics: rendered,
                figure_numbers,
            },
            sessions,
        })
    }
}

impl Default for ParameterSpaceExplorer {
    fn default() -> Self {
        Self {
            config: ExplorerConfig::default(),
            interpolator: SurfaceInterpolator::default(),
            renderer: HeatmapRenderer::default(),
            next_figure: 1,
        }
    }
}
