//! Background image layer state.
//!
//! The layer sits beneath the shapes, rotates with the camera's
//! `rotation_deg`, and has its own uniform scale and offset. Image decoding
//! happens in the browser; this module only tracks which request is current.
//! Every `begin_load` or `clear` bumps a generation counter, and a completion
//! carrying an older [`LoadTicket`] is ignored so a slow image can never
//! overwrite a newer state.

#[cfg(test)]
#[path = "background_test.rs"]
mod background_test;

use serde::Deserialize;

/// Identifies one background load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(pub u32);

/// Placement options sent alongside a background URL. Absent fields keep
/// their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct BackgroundOptions {
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// Background layer state.
#[derive(Debug, Clone)]
pub struct Background {
    /// Source of the current (possibly still loading) image.
    pub url: Option<String>,
    /// Set once the browser has decoded the current image.
    pub loaded: bool,
    pub visible: bool,
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Natural image size in pixels, valid when `loaded`.
    pub image_width: f64,
    pub image_height: f64,
    generation: u32,
    pending: BackgroundOptions,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            url: None,
            loaded: false,
            visible: true,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            image_width: 0.0,
            image_height: 0.0,
            generation: 0,
            pending: BackgroundOptions::default(),
        }
    }
}

impl Background {
    /// Start loading `url`. The previous image stops drawing immediately.
    pub fn begin_load(&mut self, url: String, options: BackgroundOptions) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.url = Some(url);
        self.loaded = false;
        self.pending = options;
        LoadTicket(self.generation)
    }

    /// Record a decoded image. Returns `false` (and changes nothing) for a
    /// stale ticket.
    pub fn complete_load(&mut self, ticket: LoadTicket, width: f64, height: f64) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.loaded = true;
        self.image_width = width;
        self.image_height = height;
        let pending = std::mem::take(&mut self.pending);
        if let Some(scale) = pending.scale {
            self.set_scale(scale);
        }
        if let Some(x) = pending.x {
            self.offset_x = x;
        }
        if let Some(y) = pending.y {
            self.offset_y = y;
        }
        true
    }

    /// Record a failed load: the layer reverts to "no background". Returns
    /// `false` for a stale ticket.
    pub fn fail_load(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.url = None;
        self.loaded = false;
        true
    }

    /// Drop the image. Any in-flight load becomes stale.
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.url = None;
        self.loaded = false;
        self.pending = BackgroundOptions::default();
    }

    /// Set the uniform scale. Non-positive or non-finite values reset to 1.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };
    }

    /// Whether `ticket` belongs to the most recent request.
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.url.is_some() && ticket.0 == self.generation
    }

    /// Whether the renderer should draw the image this frame.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.loaded && self.visible && self.url.is_some()
    }
}
