//! Pointer cursors, including the generated "actual size" template cursor.
//!
//! While a shape template is pending, the cursor previews the shape at its
//! real on-screen size for the current zoom. Browsers refuse cursor images
//! larger than about 128px, so the preview is scaled down proportionally to
//! fit [`MAX_CURSOR_PX`].

#[cfg(test)]
#[path = "cursor_test.rs"]
mod cursor_test;

use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;

use crate::consts::{COS_30, CURSOR_PAD_PX, DEFAULT_SHAPE_RADIUS, MAX_CURSOR_PX};

const DEFAULT_TEMPLATE_SIDE: f64 = 40.0;

/// Shape family of a pending template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemplateShape {
    #[serde(alias = "circle")]
    Circle,
    #[serde(alias = "rect", alias = "RECT", alias = "rectangle")]
    Rectangle,
    #[serde(alias = "triangle")]
    Triangle,
    /// Anything else; previews fall back to the default cursor.
    #[serde(other)]
    Other,
}

/// A pending shape definition chosen before placing a new shape by click.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeTemplate {
    /// Opaque host identifier, echoed back in placement requests.
    #[serde(default)]
    pub template_id: serde_json::Value,
    pub shape_type: TemplateShape,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// Cursor the canvas element should show.
#[derive(Debug, Clone, PartialEq)]
pub enum CursorStyle {
    Grab,
    Grabbing,
    Move,
    /// Generated template preview (full CSS `cursor` value).
    Template(String),
}

impl CursorStyle {
    /// CSS `cursor` property value.
    #[must_use]
    pub fn css(&self) -> &str {
        match self {
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Move => "move",
            Self::Template(css) => css,
        }
    }
}

/// A rendered template cursor image.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCursor {
    /// Square image side in CSS pixels, never above [`MAX_CURSOR_PX`].
    pub size: f64,
    pub hotspot_x: f64,
    pub hotspot_y: f64,
    pub svg: String,
}

impl TemplateCursor {
    /// Build the preview for `template` at `zoom`. `None` for unknown shape types.
    #[must_use]
    pub fn build(template: &ShapeTemplate, zoom: f64) -> Option<Self> {
        let (needed, outline) = match template.shape_type {
            TemplateShape::Circle | TemplateShape::Triangle => {
                let r = template.radius.unwrap_or(DEFAULT_SHAPE_RADIUS) * zoom;
                (r * 2.0 + CURSOR_PAD_PX, Outline::Radial(r))
            }
            TemplateShape::Rectangle => {
                let w = template.width.unwrap_or(DEFAULT_TEMPLATE_SIDE) * zoom;
                let h = template.height.unwrap_or(DEFAULT_TEMPLATE_SIDE) * zoom;
                (w.max(h) + CURSOR_PAD_PX, Outline::Box(w, h))
            }
            TemplateShape::Other => return None,
        };

        let factor = if needed > MAX_CURSOR_PX { MAX_CURSOR_PX / needed } else { 1.0 };
        let size = needed.min(MAX_CURSOR_PX).ceil();
        let c = (size / 2.0).round();

        let body = match (template.shape_type, outline) {
            (TemplateShape::Circle, Outline::Radial(r)) => format!(
                r#"<circle cx="{c}" cy="{c}" r="{:.2}" fill="rgba(59,130,246,0.15)" stroke="rgba(59,130,246,0.8)" stroke-width="2"/>"#,
                r * factor
            ),
            (TemplateShape::Triangle, Outline::Radial(r)) => {
                let r = r * factor;
                format!(
                    r#"<polygon points="{c:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="rgba(168,85,247,0.15)" stroke="rgba(168,85,247,0.8)" stroke-width="2"/>"#,
                    c - r,
                    c - r * COS_30,
                    c + r * 0.5,
                    c + r * COS_30,
                    c + r * 0.5,
                )
            }
            (_, Outline::Box(w, h)) => {
                let (w, h) = (w * factor, h * factor);
                format!(
                    r#"<rect x="{:.2}" y="{:.2}" width="{w:.2}" height="{h:.2}" fill="rgba(34,197,94,0.15)" stroke="rgba(34,197,94,0.8)" stroke-width="2"/>"#,
                    c - w / 2.0,
                    c - h / 2.0,
                )
            }
            _ => return None,
        };

        let svg = format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}">{body}</svg>"#);
        Some(Self { size, hotspot_x: c, hotspot_y: c, svg })
    }

    /// Full CSS `cursor` value with a crosshair fallback.
    #[must_use]
    pub fn css(&self) -> String {
        let encoded = general_purpose::STANDARD.encode(self.svg.as_bytes());
        format!(
            "url('data:image/svg+xml;base64,{encoded}') {} {}, crosshair",
            self.hotspot_x, self.hotspot_y
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Outline {
    Radial(f64),
    Box(f64, f64),
}
