//! Wire types for the host message channels.
//!
//! Commands arrive from the host application as JSON objects tagged by
//! `type` (`{"type": "setSnap", "units": 10}`); events go back out the same
//! way. Field names are camelCase on the wire. Several commands accept the
//! older field names the host has used over time (`image` for `url`,
//! `angle` for `deg`, `enabled` for `on`).

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde::{Deserialize, Deserializer, Serialize};

use crate::background::BackgroundOptions;
use crate::cursor::ShapeTemplate;
use crate::doc::{Shape, ShapeId};
use crate::error::CanvasError;

/// Direction for the step-zoom toolbar command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

/// Inbound command from the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Replace the scene. `selected_id` is `None` when the key is absent,
    /// `Some(None)` when explicitly null.
    SetData {
        #[serde(default)]
        data: Vec<Shape>,
        #[serde(default, deserialize_with = "present")]
        selected_id: Option<Option<ShapeId>>,
        #[serde(default)]
        auto_fit: bool,
    },
    SetEditMode {
        #[serde(default)]
        on: bool,
    },
    SetSnap {
        #[serde(default)]
        units: f64,
    },
    /// Show the grid even when snapping is off.
    SetGrid {
        #[serde(default)]
        on: bool,
    },
    FitView,
    SetBackground {
        #[serde(default, alias = "image")]
        url: Option<String>,
        #[serde(default)]
        opts: BackgroundOptions,
    },
    SetRotation {
        #[serde(default, alias = "angle")]
        deg: f64,
    },
    SetBackgroundScale {
        #[serde(default)]
        scale: f64,
    },
    SetBackgroundOffset {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    SetBackgroundPanMode {
        #[serde(default, alias = "enabled")]
        on: bool,
    },
    SetBackgroundVisible {
        #[serde(default = "yes")]
        visible: bool,
    },
    SetZoom {
        direction: ZoomDirection,
    },
    ZoomTo {
        zoom: f64,
    },
    PanBy {
        dx: f64,
        dy: f64,
    },
    SetShapeCursor {
        #[serde(default)]
        template: Option<ShapeTemplate>,
    },
    SetTempShape {
        #[serde(default)]
        shape: Option<Shape>,
    },
    ClearTempShape,
    UpdateShape {
        shape: Shape,
    },
    /// Move a shape to center coordinates `(x, y)`.
    UpdateMovePosition {
        #[serde(alias = "shapeId")]
        id: ShapeId,
        x: f64,
        y: f64,
    },
    /// Select a shape and let it be dragged outside edit mode.
    SetMoveMode {
        #[serde(alias = "shapeId")]
        id: ShapeId,
        #[serde(default, alias = "on")]
        enabled: bool,
    },
    SetSelection {
        #[serde(default)]
        id: Option<ShapeId>,
    },
    CenterOnShape {
        id: ShapeId,
    },
    Call {
        id: ShapeId,
        method: String,
        #[serde(default)]
        args: Vec<serde_json::Value>,
    },
}

impl Command {
    /// Decode a command from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Decode`] for malformed or unknown commands.
    pub fn parse(raw: &str) -> Result<Self, CanvasError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Outbound event for the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    /// Selection changed (or was re-asserted by a click).
    ShapeSelected { id: Option<ShapeId> },
    /// A drag finished; `(x, y)` is the shape's center.
    ShapeMoved { id: ShapeId, x: f64, y: f64 },
    /// A background pan finished.
    BackgroundOffsetUpdated { x: f64, y: f64 },
    /// The user clicked while a template was pending.
    PlacementRequested { x: f64, y: f64, template_id: serde_json::Value },
    /// The pending template was dropped (Escape, or leaving edit mode).
    TemplateCleared,
}

impl Event {
    /// Encode the event as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Decode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, CanvasError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn yes() -> bool {
    true
}
