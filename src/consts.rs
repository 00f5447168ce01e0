//! Shared numeric constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.1;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 5.0;

/// Fit-to-bounds never zooms in further than this.
pub const MAX_FIT_ZOOM: f64 = 2.0;

/// Fraction of the viewport the fitted bounds may occupy.
pub const FIT_MARGIN: f64 = 0.9;

/// Zoom factor per wheel notch scrolling up.
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Zoom factor per wheel notch scrolling down.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Zoom factor for the toolbar zoom-in command.
pub const STEP_ZOOM_IN: f64 = 1.2;

/// Zoom factor for the toolbar zoom-out command.
pub const STEP_ZOOM_OUT: f64 = 0.8;

// ── Hit-testing ─────────────────────────────────────────────────

/// World-space slop added around shapes when hit-testing pointer events.
pub const HIT_PADDING: f64 = 4.0;

/// Pointer travel (screen pixels) below which a press/release counts as a click.
pub const CLICK_SLOP_PX: f64 = 3.0;

// ── Geometry ────────────────────────────────────────────────────

/// cos(30°): horizontal offset factor of the lower triangle vertices.
pub const COS_30: f64 = 0.866_025_403_784_438_6;

/// Radius used when a triangle or a round template arrives without one.
pub const DEFAULT_SHAPE_RADIUS: f64 = 20.0;

// ── Cursor ──────────────────────────────────────────────────────

/// Largest generated cursor image, in CSS pixels. Browsers reject cursors above ~128px.
pub const MAX_CURSOR_PX: f64 = 120.0;

/// Extra room around the template outline inside the cursor image.
pub const CURSOR_PAD_PX: f64 = 4.0;

// ── Rendering ───────────────────────────────────────────────────

/// Dash segment length for selection outlines and temp shapes, in screen pixels.
pub const DASH_PX: f64 = 5.0;

/// Grid spacing in world units when the grid is shown without snapping.
pub const DEFAULT_GRID_STEP: f64 = 20.0;

/// Grids denser than this many lines per frame are skipped.
pub const MAX_GRID_LINES: f64 = 4000.0;

/// Label font size in screen pixels.
pub const LABEL_FONT_PX: f64 = 12.0;
