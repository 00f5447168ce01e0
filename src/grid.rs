//! Snap grid: value rounding and the visible span of grid lines.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use crate::camera::Camera;
use crate::consts::MAX_GRID_LINES;

/// Round `value` to the nearest multiple of `grid`. A non-positive grid disables snapping.
#[must_use]
pub fn snap(value: f64, grid: f64) -> f64 {
    if grid > 0.0 { (value / grid).round() * grid } else { value }
}

/// World-space extent covered by grid lines for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpan {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub step: f64,
}

impl GridSpan {
    /// Grid covering the visible viewport, starting on the grid line at or
    /// before its top-left corner and overshooting by one step.
    ///
    /// Returns `None` when snapping is off or the grid would be too dense to draw.
    #[must_use]
    pub fn visible(camera: &Camera, viewport_w: f64, viewport_h: f64, step: f64) -> Option<Self> {
        if step <= 0.0 || !step.is_finite() {
            return None;
        }
        let start_x = (-camera.pan_x / camera.zoom / step).floor() * step;
        let start_y = (-camera.pan_y / camera.zoom / step).floor() * step;
        let span = Self {
            start_x,
            start_y,
            end_x: start_x + viewport_w / camera.zoom + step,
            end_y: start_y + viewport_h / camera.zoom + step,
            step,
        };
        let lines = (span.end_x - span.start_x) / step + (span.end_y - span.start_y) / step;
        (lines <= MAX_GRID_LINES).then_some(span)
    }

    /// X positions of the vertical lines.
    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        steps(self.start_x, self.end_x, self.step)
    }

    /// Y positions of the horizontal lines.
    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        steps(self.start_y, self.end_y, self.step)
    }
}

fn steps(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    (0_u32..)
        .map(move |i| start + f64::from(i) * step)
        .take_while(move |v| *v <= end)
}
