//! Rendering: draws the full canvas scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads engine state and produces pixels; it never mutates application state.
//!
//! Layers, bottom to top: background image, snap grid, shapes, temp shape,
//! labels. Line widths, dash lengths and label size are divided by zoom so
//! strokes keep the same on-screen weight at every zoom level.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use js_sys::Array;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::background::Background;
use crate::camera::Camera;
use crate::consts::{DASH_PX, LABEL_FONT_PX};
use crate::doc::{Shape, ShapeKind, triangle_vertices};
use crate::engine::EngineCore;
use crate::grid::GridSpan;

const SELECTED_STROKE: &str = "rgba(239,68,68,0.9)";
const SELECTED_WIDTH_PX: f64 = 3.0;
const TEMP_STROKE: &str = "rgba(100,116,139,0.9)";
const TEMP_FILL: &str = "rgba(148,163,184,0.25)";
const GRID_STROKE: &str = "rgba(0,0,0,0.08)";
const LABEL_FILL: &str = "#111827";

/// Draw the full scene.
///
/// `image` is the decoded background, passed only when it should be drawn.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore, image: Option<&HtmlImageElement>) -> Result<(), JsValue> {
    let camera = &core.camera;
    let dpr = core.dpr;

    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, core.viewport_width, core.viewport_height);

    if let Some(image) = image {
        draw_background(ctx, camera, &core.background, image)?;
    }

    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    if let Some(span) = GridSpan::visible(camera, core.viewport_width, core.viewport_height, core.ui.grid_step()) {
        draw_grid(ctx, &span, camera.zoom);
    }

    for shape in core.scene.iter() {
        draw_shape(ctx, shape, camera.zoom)?;
    }
    if let Some(temp) = &core.temp_shape {
        draw_temp_shape(ctx, temp, camera.zoom)?;
    }
    for shape in core.scene.iter().chain(core.temp_shape.iter()) {
        draw_label(ctx, shape, camera.zoom)?;
    }
    Ok(())
}

// =============================================================
// Background
// =============================================================

/// The image is centred on the world origin, rotated by the camera rotation,
/// then scaled and offset in its own rotated frame.
fn draw_background(
    ctx: &CanvasRenderingContext2d,
    camera: &Camera,
    background: &Background,
    image: &HtmlImageElement,
) -> Result<(), JsValue> {
    let scale = background.scale;
    ctx.save();
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;
    ctx.rotate(camera.rotation_deg.to_radians())?;
    ctx.scale(scale, scale)?;
    let result = ctx.draw_image_with_html_image_element(
        image,
        -background.image_width / 2.0 + background.offset_x / scale,
        -background.image_height / 2.0 + background.offset_y / scale,
    );
    ctx.restore();
    result
}

// =============================================================
// Grid
// =============================================================

fn draw_grid(ctx: &CanvasRenderingContext2d, span: &GridSpan, zoom: f64) {
    ctx.save();
    ctx.set_stroke_style_str(GRID_STROKE);
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();
    for x in span.xs() {
        ctx.move_to(x, span.start_y);
        ctx.line_to(x, span.end_y);
    }
    for y in span.ys() {
        ctx.move_to(span.start_x, y);
        ctx.line_to(span.end_x, y);
    }
    ctx.stroke();
    ctx.restore();
}

// =============================================================
// Shapes
// =============================================================

/// Default (fill, stroke) per shape kind.
fn palette(kind: ShapeKind) -> (&'static str, &'static str) {
    match kind {
        ShapeKind::Circle => ("rgba(59,130,246,0.3)", "rgba(59,130,246,0.9)"),
        ShapeKind::Rect => ("rgba(34,197,94,0.3)", "rgba(34,197,94,0.9)"),
        ShapeKind::Triangle => ("rgba(168,85,247,0.3)", "rgba(168,85,247,0.9)"),
    }
}

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape, zoom: f64) -> Result<(), JsValue> {
    let (default_fill, default_stroke) = palette(shape.kind);
    ctx.save();
    trace_path(ctx, shape)?;
    ctx.set_fill_style_str(shape.fill.as_deref().unwrap_or(default_fill));
    ctx.fill();

    if shape.selected {
        set_dash(ctx, DASH_PX / zoom)?;
        ctx.set_stroke_style_str(SELECTED_STROKE);
        ctx.set_line_width(SELECTED_WIDTH_PX / zoom);
    } else {
        ctx.set_stroke_style_str(shape.stroke.as_deref().unwrap_or(default_stroke));
        ctx.set_line_width(shape.stroke_width.unwrap_or(1.5) / zoom);
    }
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn draw_temp_shape(ctx: &CanvasRenderingContext2d, shape: &Shape, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    trace_path(ctx, shape)?;
    ctx.set_fill_style_str(shape.fill.as_deref().unwrap_or(TEMP_FILL));
    ctx.fill();
    set_dash(ctx, DASH_PX / zoom)?;
    ctx.set_stroke_style_str(shape.stroke.as_deref().unwrap_or(TEMP_STROKE));
    ctx.set_line_width(2.0 / zoom);
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn trace_path(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    ctx.begin_path();
    match shape.kind {
        ShapeKind::Circle => ctx.arc(shape.x, shape.y, shape.radius(), 0.0, 2.0 * PI)?,
        ShapeKind::Rect => ctx.rect(shape.x, shape.y, shape.width(), shape.height()),
        ShapeKind::Triangle => {
            let [apex, left, right] = triangle_vertices(shape.center(), shape.radius());
            ctx.move_to(apex.x, apex.y);
            ctx.line_to(left.x, left.y);
            ctx.line_to(right.x, right.y);
            ctx.close_path();
        }
    }
    Ok(())
}

fn set_dash(ctx: &CanvasRenderingContext2d, len: f64) -> Result<(), JsValue> {
    let segments = Array::of2(&JsValue::from_f64(len), &JsValue::from_f64(len));
    ctx.set_line_dash(&segments)
}

// =============================================================
// Labels
// =============================================================

fn draw_label(ctx: &CanvasRenderingContext2d, shape: &Shape, zoom: f64) -> Result<(), JsValue> {
    let Some(label) = shape.label.as_deref().filter(|l| shape.show_label && !l.is_empty()) else {
        return Ok(());
    };
    let center = shape.center();
    ctx.save();
    ctx.set_fill_style_str(LABEL_FILL);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("{:.2}px sans-serif", LABEL_FONT_PX / zoom));
    let result = ctx.fill_text(label, center.x, center.y);
    ctx.restore();
    result
}
