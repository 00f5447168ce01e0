//! Per-class shape behaviors reachable through the `call` command.
//!
//! A shape's `className` picks one of a closed set of behavior variants. Each
//! variant answers the same fixed interface (`click`, `toggleLabel`,
//! `setColor`); classes without a behavior ignore every method.

#[cfg(test)]
#[path = "behavior_test.rs"]
mod behavior_test;

use serde::{Deserialize, Serialize};

use crate::doc::Shape;
use crate::error::CanvasError;

/// Behavior tag carried on each shape as `className`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeClass {
    /// A storage silo: clickable, recolorable, label can be toggled.
    #[serde(alias = "silo")]
    Silo,
    /// Any other class. Methods are accepted and ignored.
    #[default]
    #[serde(other, rename = "generic")]
    Generic,
}

/// A method invocation decoded from `call(id, method, args)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeMethod {
    Click,
    ToggleLabel,
    SetColor(String),
}

impl ShapeMethod {
    /// Decode a method name and its positional arguments.
    ///
    /// # Errors
    ///
    /// [`CanvasError::UnknownMethod`] for names outside the interface and
    /// [`CanvasError::InvalidArgument`] when `setColor` lacks a string color.
    pub fn parse(method: &str, args: &[serde_json::Value]) -> Result<Self, CanvasError> {
        match method {
            "click" => Ok(Self::Click),
            "toggleLabel" => Ok(Self::ToggleLabel),
            "setColor" => args
                .first()
                .and_then(serde_json::Value::as_str)
                .map(|c| Self::SetColor(c.to_owned()))
                .ok_or_else(|| CanvasError::InvalidArgument("setColor expects a color string".into())),
            other => Err(CanvasError::UnknownMethod(other.to_owned())),
        }
    }
}

/// What the engine must do after a behavior ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed.
    None,
    /// The shape changed appearance; redraw.
    Redraw,
    /// Select the shape (and broadcast the selection).
    Select,
}

impl ShapeClass {
    /// Dispatch `method` to this class's behavior.
    pub fn invoke(self, shape: &mut Shape, method: &ShapeMethod) -> Effect {
        match method {
            ShapeMethod::Click => self.on_click(),
            ShapeMethod::ToggleLabel => self.on_toggle_label(shape),
            ShapeMethod::SetColor(color) => self.on_set_color(shape, color),
        }
    }

    fn on_click(self) -> Effect {
        match self {
            Self::Silo => Effect::Select,
            Self::Generic => Effect::None,
        }
    }

    fn on_toggle_label(self, shape: &mut Shape) -> Effect {
        match self {
            Self::Silo => {
                shape.show_label = !shape.show_label;
                Effect::Redraw
            }
            Self::Generic => Effect::None,
        }
    }

    fn on_set_color(self, shape: &mut Shape, color: &str) -> Effect {
        match self {
            Self::Silo => {
                shape.fill = Some(color.to_owned());
                Effect::Redraw
            }
            Self::Generic => Effect::None,
        }
    }
}
