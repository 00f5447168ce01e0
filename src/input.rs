//! Input model: modifier keys, mouse buttons, mode flags, and the gesture state machine.
//!
//! `UiState` holds the host-controlled mode flags consulted on pointer-down.
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up, carrying the start snapshot needed to compute positions from
//! the total pointer delta and to emit the final event on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::{CLICK_SLOP_PX, DEFAULT_GRID_STEP};
use crate::cursor::ShapeTemplate;
use crate::doc::ShapeId;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key name as reported by the browser (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Mode flags set by host commands.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Shapes can be dragged.
    pub edit_mode: bool,
    /// Snap size in world units; 0 disables snapping.
    pub snap: f64,
    /// Drags move the background image instead of the camera.
    pub background_pan_mode: bool,
    /// Pending placement template, if any.
    pub template: Option<ShapeTemplate>,
    /// Grid drawn even when snapping is off.
    pub grid_visible: bool,
    /// Shape the host put into move mode; draggable outside edit mode.
    pub move_target: Option<ShapeId>,
}

impl UiState {
    /// Spacing of the drawn grid: the snap size when snapping, the default
    /// step when only the grid toggle is on, otherwise 0 (no grid).
    #[must_use]
    pub fn grid_step(&self) -> f64 {
        if self.snap > 0.0 {
            self.snap
        } else if self.grid_visible {
            DEFAULT_GRID_STEP
        } else {
            0.0
        }
    }
}

/// Gesture state machine.
///
/// `moved` flips once the pointer has travelled more than the click slop
/// from `start_screen`; a release without it counts as a click.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the camera.
    Panning {
        start_screen: Point,
        start_pan_x: f64,
        start_pan_y: f64,
        /// Shape under the pointer at press time, if any; used for click selection.
        pressed: Option<ShapeId>,
        moved: bool,
    },
    /// Moving a shape in edit mode.
    DraggingShape {
        id: ShapeId,
        start_screen: Point,
        /// Pointer world position at press time.
        start_world: Point,
        /// Shape `x`/`y` at press time.
        orig_x: f64,
        orig_y: f64,
        moved: bool,
    },
    /// Moving the background image.
    PanningBackground {
        start_screen: Point,
        orig_offset_x: f64,
        orig_offset_y: f64,
        moved: bool,
    },
    /// A press while a template is pending; releases as a placement request.
    PlacingNewShape { start_screen: Point },
}

impl InputState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Record pointer travel to `screen`; sets `moved` past the click slop.
    pub fn track(&mut self, screen: Point) {
        match self {
            Self::Panning { start_screen, moved, .. }
            | Self::DraggingShape { start_screen, moved, .. }
            | Self::PanningBackground { start_screen, moved, .. } => {
                if !*moved && start_screen.distance(screen) > CLICK_SLOP_PX {
                    *moved = true;
                }
            }
            Self::Idle | Self::PlacingNewShape { .. } => {}
        }
    }
}
