//! Per-instance engine options, supplied by the host as JSON at mount time.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{FIT_MARGIN, HIT_PADDING, MAX_FIT_ZOOM, MAX_ZOOM, MIN_ZOOM};
use crate::error::CanvasError;

/// Engine options. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// World-space slop for pointer hit-tests.
    pub hit_padding: f64,
    /// Fit-view never zooms past this.
    pub max_fit_zoom: f64,
    /// Share of the viewport the fitted bounds may occupy.
    pub fit_margin: f64,
    /// Only zoom on wheel events with Ctrl/Cmd held.
    pub wheel_requires_modifier: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            hit_padding: HIT_PADDING,
            max_fit_zoom: MAX_FIT_ZOOM,
            fit_margin: FIT_MARGIN,
            wheel_requires_modifier: false,
        }
    }
}

impl EngineConfig {
    /// Parse options from JSON. A blank string yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Decode`] for malformed JSON and
    /// [`CanvasError::InvalidArgument`] for inconsistent limits.
    pub fn from_json(raw: &str) -> Result<Self, CanvasError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check zoom limits and margins are usable.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidArgument`] describing the first bad field.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom && self.max_zoom.is_finite()) {
            return Err(CanvasError::InvalidArgument(format!(
                "zoom limits must satisfy 0 < min <= max, got {}..{}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.fit_margin > 0.0 && self.fit_margin <= 1.0) {
            return Err(CanvasError::InvalidArgument(format!("fitMargin must be in (0, 1], got {}", self.fit_margin)));
        }
        if !(self.max_fit_zoom > 0.0) {
            return Err(CanvasError::InvalidArgument(format!("maxFitZoom must be positive, got {}", self.max_fit_zoom)));
        }
        if !(self.hit_padding >= 0.0) {
            return Err(CanvasError::InvalidArgument(format!("hitPadding must be non-negative, got {}", self.hit_padding)));
        }
        Ok(())
    }
}
