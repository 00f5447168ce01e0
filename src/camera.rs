#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::doc::Bounds;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Camera state for pan/zoom over the placement canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels. `zoom` is a scale factor (1.0 = no
/// zoom) kept inside `[min_zoom, max_zoom]` by every setter.
///
/// `rotation_deg` rotates the background layer only. Shapes and the grid stay
/// axis-aligned so hit-testing never has to un-rotate a point.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
    pub rotation_deg: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0, rotation_deg: 0.0, min_zoom: MIN_ZOOM, max_zoom: MAX_ZOOM }
    }
}

impl Camera {
    /// Camera at identity with custom zoom limits.
    #[must_use]
    pub fn with_limits(min_zoom: f64, max_zoom: f64) -> Self {
        Self { min_zoom, max_zoom, ..Self::default() }
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Clamp `zoom` into the configured limits.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Set the zoom level (clamped) without moving the pan offset.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
    }

    /// Update any subset of zoom and pan. Zoom is clamped.
    pub fn set_view(&mut self, zoom: Option<f64>, pan_x: Option<f64>, pan_y: Option<f64>) {
        if let Some(z) = zoom {
            self.set_zoom(z);
        }
        if let Some(x) = pan_x {
            self.pan_x = x;
        }
        if let Some(y) = pan_y {
            self.pan_y = y;
        }
    }

    /// Multiply zoom by `factor` while keeping the world point under `pivot`
    /// (screen space) fixed on screen.
    pub fn zoom_at(&mut self, factor: f64, pivot: Point) {
        let before = self.screen_to_world(pivot);
        self.set_zoom(self.zoom * factor);
        self.pan_x = pivot.x - before.x * self.zoom;
        self.pan_y = pivot.y - before.y * self.zoom;
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Pan so that `world` lands in the middle of a `viewport_w × viewport_h` viewport.
    pub fn center_on(&mut self, world: Point, viewport_w: f64, viewport_h: f64) {
        self.pan_x = viewport_w / 2.0 - world.x * self.zoom;
        self.pan_y = viewport_h / 2.0 - world.y * self.zoom;
    }

    /// Zoom and pan so `bounds` fills `margin` of the viewport, capped at
    /// `max_fit_zoom`, with the bounds centered.
    ///
    /// Degenerate extents (a single point, a zero-width rect) only constrain
    /// the axes that have size. Returns `false` without touching the camera
    /// when the viewport has no size yet.
    pub fn fit_bounds(&mut self, bounds: Bounds, viewport_w: f64, viewport_h: f64, margin: f64, max_fit_zoom: f64) -> bool {
        if viewport_w <= 0.0 || viewport_h <= 0.0 {
            return false;
        }
        let mut zoom = max_fit_zoom;
        if bounds.width() > 0.0 {
            zoom = zoom.min(viewport_w * margin / bounds.width());
        }
        if bounds.height() > 0.0 {
            zoom = zoom.min(viewport_h * margin / bounds.height());
        }
        self.set_zoom(zoom);
        self.center_on(bounds.center(), viewport_w, viewport_h);
        true
    }

    /// Rotate a world-space delta by the negative of the view rotation, so a
    /// drag on screen maps onto the rotated background's own axes.
    #[must_use]
    pub fn unrotate(&self, dx: f64, dy: f64) -> (f64, f64) {
        let angle = (-self.rotation_deg).to_radians();
        let (sin, cos) = angle.sin_cos();
        (dx * cos - dy * sin, dx * sin + dy * cos)
    }
}
