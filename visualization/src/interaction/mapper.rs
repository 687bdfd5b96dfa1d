//! Pointer interaction on a parameter space figure
//!
//! Translates pointer coordinates, given in axis units, to the nearest raw
//! grid cell. A click resolves the cell's result handle into a navigation
//! command; a hover reports the surface value at the exact coordinate, or
//! the missing marker when the nearest cell had no result. Queries only read
//! the retained figure state.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use isocline_core::{AxisValues, CellIndex, FittedSurface, IdentifierGrid, MissingMask, ResultId};

use crate::error::VisualizationResult;
use crate::view::FigureHandle;

/// Hovered value or the missing marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverValue {
    Value(f64),
    Missing,
}

impl HoverValue {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing => None,
        }
    }
}

/// Commands emitted towards the display layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DisplayCommand {
    /// Navigate to the result behind a clicked cell
    ClickedResult { result_id: ResultId },

    /// Show the value under the pointer
    HoverPlot {
        figure: FigureHandle,
        x: f64,
        y: f64,
        #[serde(with = "hover_value")]
        value: HoverValue,
    },
}

impl DisplayCommand {
    pub fn to_json(&self) -> VisualizationResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// `null` on the wire for the missing marker
mod hover_value {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::HoverValue;

    pub fn serialize<S: Serializer>(value: &HoverValue, serializer: S) -> Result<S::Ok, S::Error> {
        value.value().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HoverValue, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.map_or(HoverValue::Missing, HoverValue::Value))
    }
}

/// Status line text for a pointer position
pub fn format_coord(x: f64, y: f64) -> String {
    format!("x={x:1.4}, y={y:1.4}")
}

/// Interaction state of one figure
#[derive(Debug, Clone)]
pub struct InteractionMapper {
    figure: FigureHandle,
    axis1: AxisValues,
    axis2: AxisValues,
    missing: MissingMask,
    surface: FittedSurface,
    identifiers: IdentifierGrid,
}

impl InteractionMapper {
    pub fn new(
        figure: FigureHandle,
        axis1: AxisValues,
        axis2: AxisValues,
        missing: MissingMask,
        surface: FittedSurface,
        identifiers: IdentifierGrid,
    ) -> Self {
        Self {
            figure,
            axis1,
            axis2,
            missing,
            surface,
            identifiers,
        }
    }

    #[inline]
    pub fn figure(&self) -> FigureHandle {
        self.figure
    }

    #[inline]
    pub fn surface(&self) -> &FittedSurface {
        &self.surface
    }

    #[inline]
    pub fn missing(&self) -> &MissingMask {
        &self.missing
    }

    /// Nearest raw cell, `None` for non-finite coordinates
    pub fn nearest_cell(&self, x: f64, y: f64) -> Option<CellIndex> {
        let axis1 = self.axis1.nearest_index(x)?;
        let axis2 = self.axis2.nearest_index(y)?;
        Some(CellIndex::new(axis1, axis2))
    }

    /// Navigation command for a click, none inside a missing cell
    pub fn click(&self, x: f64, y: f64) -> Option<DisplayCommand> {
        let cell = self.nearest_cell(x, y)?;
        self.identifiers
            .get(cell)
            .map(|result_id| DisplayCommand::ClickedResult {
                result_id: result_id.clone(),
            })
    }

    /// Value under the pointer; the surface is evaluated at `(x, y)` itself
    pub fn hover_value(&self, x: f64, y: f64) -> Option<HoverValue> {
        let cell = self.nearest_cell(x, y)?;
        if self.missing.is_missing(cell) {
            Some(HoverValue::Missing)
        } else {
            Some(HoverValue::Value(self.surface.evaluate(x, y)))
        }
    }

    /// Hover command carrying the figure handle and the pointer position
    pub fn hover(&self, x: f64, y: f64) -> Option<DisplayCommand> {
        let value = self.hover_value(x, y)?;
        Some(DisplayCommand::HoverPlot {
            figure: self.figure,
            x,
            y,
            value,
        })
    }
}
