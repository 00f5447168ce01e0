use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::background::{Background, LoadTicket};
use crate::behavior::{Effect, ShapeMethod};
use crate::camera::{Camera, Point};
use crate::config::EngineConfig;
use crate::consts::{STEP_ZOOM_IN, STEP_ZOOM_OUT, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
use crate::cursor::{CursorStyle, TemplateCursor};
use crate::doc::{SceneStore, Shape, ShapeId};
use crate::error::CanvasError;
use crate::grid::snap;
use crate::hit::hit_test;
use crate::input::{Button, InputState, Key, Modifiers, UiState, WheelDelta};
use crate::message::{Command, Event, ZoomDirection};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from command and input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Forward an event to the host listener.
    Emit(Event),
    SetCursor(CursorStyle),
    /// Start decoding a background image; report back with `ticket`.
    LoadBackground { url: String, ticket: LoadTicket },
    RenderNeeded,
}

/// Invalidate flag plus "a frame is already scheduled" flag.
///
/// Any number of invalidations between two frames schedule exactly one frame.
#[derive(Debug, Default)]
pub struct FrameGate {
    dirty: bool,
    scheduled: bool,
}

impl FrameGate {
    /// Mark the scene dirty. Returns `true` when the caller must schedule a frame.
    pub fn invalidate(&mut self) -> bool {
        self.dirty = true;
        if self.scheduled {
            return false;
        }
        self.scheduled = true;
        true
    }

    /// Called from the frame callback. Returns whether anything needs drawing.
    pub fn begin_frame(&mut self) -> bool {
        self.scheduled = false;
        std::mem::take(&mut self.dirty)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub scene: SceneStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub background: Background,
    /// Provisional shape drawn dashed on top of the scene.
    pub temp_shape: Option<Shape>,
    pub config: EngineConfig,
    pub frame: FrameGate,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            scene: SceneStore::new(),
            camera: Camera::with_limits(config.min_zoom, config.max_zoom),
            ui: UiState::default(),
            input: InputState::default(),
            background: Background::default(),
            temp_shape: None,
            config,
            frame: FrameGate::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    // --- Commands ---

    /// Apply a host command. Failures are logged and leave the state untouched.
    pub fn apply(&mut self, command: Command) -> Vec<Action> {
        match self.try_apply(command) {
            Ok(actions) => actions,
            Err(e) => {
                log::warn!("canvas: command ignored: {e}");
                Vec::new()
            }
        }
    }

    /// Apply a host command, reporting why it was rejected.
    ///
    /// # Errors
    ///
    /// [`CanvasError::UnknownShape`] for ids not in the scene, the decode error
    /// of a bad `call` method, or the validation error of a malformed shape.
    pub fn try_apply(&mut self, command: Command) -> Result<Vec<Action>, CanvasError> {
        let mut actions = Vec::new();
        match command {
            Command::SetData { data, selected_id, auto_fit } => {
                let previous = self.scene.selected_id().cloned();
                for e in self.scene.load(data) {
                    log::warn!("canvas: dropped shape: {e}");
                }
                match selected_id {
                    Some(selected) => {
                        if let Err(e) = self.scene.select(selected.as_ref()) {
                            log::warn!("canvas: initial selection ignored: {e}");
                        }
                    }
                    // No `selectedId` key: keep the current selection if it survived.
                    None if self.scene.selected_id().is_none() => {
                        if let Some(prev) = previous.filter(|p| self.scene.get(p).is_some()) {
                            self.scene.select(Some(&prev))?;
                        }
                    }
                    None => {}
                }
                if self.ui.move_target.as_ref().is_some_and(|t| self.scene.get(t).is_none()) {
                    self.ui.move_target = None;
                }
                let orphaned =
                    matches!(&self.input, InputState::DraggingShape { id, .. } if self.scene.get(id).is_none());
                if orphaned {
                    self.input = InputState::Idle;
                }
                if auto_fit {
                    self.fit_view();
                }
                log::debug!("canvas: scene loaded with {} shapes", self.scene.len());
            }
            Command::SetEditMode { on } => {
                self.ui.edit_mode = on;
                if !on && self.ui.template.take().is_some() {
                    actions.push(Action::Emit(Event::TemplateCleared));
                }
                actions.push(Action::SetCursor(self.current_cursor()));
            }
            Command::SetSnap { units } => {
                self.ui.snap = if units.is_finite() && units > 0.0 { units } else { 0.0 };
            }
            Command::SetGrid { on } => self.ui.grid_visible = on,
            Command::FitView => {
                self.fit_view();
            }
            Command::SetBackground { url, opts } => match url.filter(|u| !u.is_empty()) {
                Some(url) => {
                    let ticket = self.background.begin_load(url.clone(), opts);
                    log::debug!("canvas: loading background {url}");
                    actions.push(Action::LoadBackground { url, ticket });
                }
                None => self.background.clear(),
            },
            Command::SetRotation { deg } => {
                if !deg.is_finite() {
                    return Err(CanvasError::InvalidArgument(format!("rotation must be finite, got {deg}")));
                }
                self.camera.rotation_deg = deg;
            }
            Command::SetBackgroundScale { scale } => self.background.set_scale(scale),
            Command::SetBackgroundOffset { x, y } => {
                self.background.offset_x = x;
                self.background.offset_y = y;
            }
            Command::SetBackgroundPanMode { on } => {
                self.ui.background_pan_mode = on;
                actions.push(Action::SetCursor(self.current_cursor()));
            }
            Command::SetBackgroundVisible { visible } => self.background.visible = visible,
            Command::SetZoom { direction } => {
                let factor = match direction {
                    ZoomDirection::In => STEP_ZOOM_IN,
                    ZoomDirection::Out => STEP_ZOOM_OUT,
                };
                self.camera.zoom_at(factor, self.viewport_center());
                self.push_template_cursor(&mut actions);
            }
            Command::ZoomTo { zoom } => {
                if !(zoom.is_finite() && zoom > 0.0) {
                    return Err(CanvasError::InvalidArgument(format!("zoom must be positive, got {zoom}")));
                }
                let target = self.camera.clamp_zoom(zoom);
                self.camera.zoom_at(target / self.camera.zoom, self.viewport_center());
                self.push_template_cursor(&mut actions);
            }
            Command::PanBy { dx, dy } => self.camera.pan_by(dx, dy),
            Command::SetShapeCursor { template } => {
                self.ui.template = template;
                actions.push(Action::SetCursor(self.current_cursor()));
            }
            Command::SetTempShape { shape } => {
                if let Some(shape) = &shape {
                    shape.validate()?;
                }
                self.temp_shape = shape;
            }
            Command::ClearTempShape => self.temp_shape = None,
            Command::UpdateShape { shape } => self.scene.replace(shape)?,
            Command::UpdateMovePosition { id, x, y } => {
                let shape = self.scene.get_mut(&id).ok_or(CanvasError::UnknownShape(id))?;
                shape.set_center(Point::new(x, y));
            }
            Command::SetMoveMode { id, enabled } => {
                self.scene.select(Some(&id))?;
                log::debug!("canvas: move mode {enabled} for {id}");
                self.ui.move_target = enabled.then_some(id);
                actions.push(Action::SetCursor(self.current_cursor()));
            }
            Command::SetSelection { id } => {
                self.scene.select(id.as_ref())?;
            }
            Command::CenterOnShape { id } => {
                let shape = self.scene.get(&id).ok_or(CanvasError::UnknownShape(id))?;
                let center = shape.center();
                self.camera.center_on(center, self.viewport_width, self.viewport_height);
            }
            Command::Call { id, method, args } => {
                let method = ShapeMethod::parse(&method, &args)?;
                let shape = self.scene.get_mut(&id).ok_or_else(|| CanvasError::UnknownShape(id.clone()))?;
                let class = shape.class_name;
                match class.invoke(shape, &method) {
                    Effect::None => return Ok(actions),
                    Effect::Redraw => {}
                    Effect::Select => {
                        self.scene.select(Some(&id))?;
                        actions.push(Action::Emit(Event::ShapeSelected { id: Some(id) }));
                    }
                }
            }
        }
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    // --- Viewport ---

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.viewport_width = width_css.max(0.0);
        self.viewport_height = height_css.max(0.0);
        self.dpr = if dpr > 0.0 && dpr.is_finite() { dpr } else { 1.0 };
        vec![Action::RenderNeeded]
    }

    /// Zoom and pan so every shape is visible. Returns `false` when there is
    /// nothing to fit or the viewport has no area.
    pub fn fit_view(&mut self) -> bool {
        let Some(bounds) = self.scene.bounds() else {
            return false;
        };
        self.camera.fit_bounds(
            bounds,
            self.viewport_width,
            self.viewport_height,
            self.config.fit_margin,
            self.config.max_fit_zoom,
        )
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    // --- Background ---

    /// A background image finished decoding.
    pub fn background_loaded(&mut self, ticket: LoadTicket, width: f64, height: f64) -> Vec<Action> {
        if self.background.complete_load(ticket, width, height) {
            log::debug!("canvas: background loaded ({width}x{height})");
            vec![Action::RenderNeeded]
        } else {
            log::debug!("canvas: stale background load {} ignored", ticket.0);
            Vec::new()
        }
    }

    /// A background image failed to load.
    pub fn background_failed(&mut self, ticket: LoadTicket) -> Vec<Action> {
        let url = self.background.url.clone().unwrap_or_default();
        if self.background.fail_load(ticket) {
            log::error!("canvas: failed to load background image {url}");
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_active() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);

        if button != Button::Primary {
            self.start_panning(screen_pt, None);
        } else if self.ui.template.is_some() {
            self.input = InputState::PlacingNewShape { start_screen: screen_pt };
            return Vec::new();
        } else if self.ui.background_pan_mode {
            self.input = InputState::PanningBackground {
                start_screen: screen_pt,
                orig_offset_x: self.background.offset_x,
                orig_offset_y: self.background.offset_y,
                moved: false,
            };
        } else {
            let hit = hit_test(&self.scene, world, self.config.hit_padding).cloned();
            let draggable =
                hit.as_ref().is_some_and(|id| self.ui.edit_mode || self.ui.move_target.as_ref() == Some(id));
            match hit {
                Some(id) if draggable => {
                    let Some(origin) = self.scene.get(&id).map(Shape::position) else {
                        return Vec::new();
                    };
                    log::debug!("canvas: drag start {id}");
                    self.input = InputState::DraggingShape {
                        id,
                        start_screen: screen_pt,
                        start_world: world,
                        orig_x: origin.x,
                        orig_y: origin.y,
                        moved: false,
                    };
                }
                hit => self.start_panning(screen_pt, hit),
            }
        }
        vec![Action::SetCursor(CursorStyle::Grabbing)]
    }

    fn start_panning(&mut self, screen_pt: Point, pressed: Option<ShapeId>) {
        self.input = InputState::Panning {
            start_screen: screen_pt,
            start_pan_x: self.camera.pan_x,
            start_pan_y: self.camera.pan_y,
            pressed,
            moved: false,
        };
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        self.input.track(screen_pt);
        match &self.input {
            InputState::Idle | InputState::PlacingNewShape { .. } => return Vec::new(),
            InputState::Panning { start_screen, start_pan_x, start_pan_y, .. } => {
                self.camera.pan_x = start_pan_x + (screen_pt.x - start_screen.x);
                self.camera.pan_y = start_pan_y + (screen_pt.y - start_screen.y);
            }
            InputState::DraggingShape { id, start_world, orig_x, orig_y, moved, .. } => {
                if !moved {
                    return Vec::new();
                }
                let world = self.camera.screen_to_world(screen_pt);
                let x = snap(orig_x + (world.x - start_world.x), self.ui.snap);
                let y = snap(orig_y + (world.y - start_world.y), self.ui.snap);
                if let Some(shape) = self.scene.get_mut(id) {
                    shape.set_position(Point::new(x, y));
                }
            }
            InputState::PanningBackground { start_screen, orig_offset_x, orig_offset_y, .. } => {
                let dx = (screen_pt.x - start_screen.x) / self.camera.zoom;
                let dy = (screen_pt.y - start_screen.y) / self.camera.zoom;
                let (rx, ry) = self.camera.unrotate(dx, dy);
                self.background.offset_x = orig_offset_x + rx;
                self.background.offset_y = orig_offset_y + ry;
            }
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.input);
        let mut actions = Vec::new();
        match gesture {
            InputState::Idle => return actions,
            InputState::Panning { pressed, moved, .. } => {
                if !moved && button == Button::Primary {
                    self.click_select(pressed, &mut actions);
                }
            }
            InputState::DraggingShape { id, moved, .. } => {
                if moved {
                    if self.scene.selected_id() != Some(&id) {
                        self.select_and_emit(Some(id.clone()), &mut actions);
                    }
                    if let Some(center) = self.scene.get(&id).map(Shape::center) {
                        log::debug!("canvas: drag end {id} at ({}, {})", center.x, center.y);
                        actions.push(Action::Emit(Event::ShapeMoved { id, x: center.x, y: center.y }));
                    }
                } else {
                    self.click_select(Some(id), &mut actions);
                }
            }
            InputState::PanningBackground { moved, .. } => {
                if moved {
                    actions.push(Action::Emit(Event::BackgroundOffsetUpdated {
                        x: self.background.offset_x,
                        y: self.background.offset_y,
                    }));
                }
            }
            InputState::PlacingNewShape { start_screen } => {
                if let Some(template) = &self.ui.template {
                    let world = self.camera.screen_to_world(start_screen);
                    actions.push(Action::Emit(Event::PlacementRequested {
                        x: world.x,
                        y: world.y,
                        template_id: template.template_id.clone(),
                    }));
                }
            }
        }
        actions.push(Action::SetCursor(self.current_cursor()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// A click toggles the shape under the pointer; empty space clears.
    fn click_select(&mut self, pressed: Option<ShapeId>, actions: &mut Vec<Action>) {
        let next = match pressed {
            Some(id) if self.scene.selected_id() == Some(&id) => None,
            other => other,
        };
        self.select_and_emit(next, actions);
    }

    fn select_and_emit(&mut self, id: Option<ShapeId>, actions: &mut Vec<Action>) {
        match self.scene.select(id.as_ref()) {
            Ok(_) => actions.push(Action::Emit(Event::ShapeSelected { id })),
            Err(e) => log::warn!("canvas: selection ignored: {e}"),
        }
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if self.config.wheel_requires_modifier && !modifiers.command() {
            return Vec::new();
        }
        if delta.dy == 0.0 {
            return Vec::new();
        }
        let factor = if delta.dy > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
        self.camera.zoom_at(factor, screen_pt);
        let mut actions = Vec::new();
        self.push_template_cursor(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.0 != "Escape" || self.ui.template.take().is_none() {
            return Vec::new();
        }
        log::debug!("canvas: template cleared");
        if matches!(self.input, InputState::PlacingNewShape { .. }) {
            self.input = InputState::Idle;
        }
        vec![Action::Emit(Event::TemplateCleared), Action::SetCursor(self.current_cursor())]
    }

    // --- Queries ---

    /// Cursor for the current mode and gesture.
    #[must_use]
    pub fn current_cursor(&self) -> CursorStyle {
        if let Some(cursor) = self.ui.template.as_ref().and_then(|t| TemplateCursor::build(t, self.camera.zoom)) {
            return CursorStyle::Template(cursor.css());
        }
        match self.input {
            InputState::Panning { .. } | InputState::DraggingShape { .. } | InputState::PanningBackground { .. } => {
                CursorStyle::Grabbing
            }
            InputState::Idle | InputState::PlacingNewShape { .. } => {
                if self.ui.edit_mode || self.ui.background_pan_mode || self.ui.move_target.is_some() {
                    CursorStyle::Move
                } else {
                    CursorStyle::Grab
                }
            }
        }
    }

    /// The template cursor depends on zoom; refresh it after zoom changes.
    fn push_template_cursor(&self, actions: &mut Vec<Action>) {
        if self.ui.template.is_some() {
            actions.push(Action::SetCursor(self.current_cursor()));
        }
    }

    #[must_use]
    pub fn selection(&self) -> Option<&ShapeId> {
        self.scene.selected_id()
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.scene.get(id)
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    image: Option<HtmlImageElement>,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to `canvas`.
    ///
    /// # Errors
    ///
    /// [`CanvasError::MissingTarget`] when the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, config: EngineConfig) -> Result<Self, CanvasError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| CanvasError::MissingTarget("2d context unavailable".into()))?
            .ok_or_else(|| CanvasError::MissingTarget("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CanvasError::MissingTarget("2d context has unexpected type".into()))?;
        let mut core = EngineCore::new(config);
        core.set_viewport(f64::from(canvas.client_width()), f64::from(canvas.client_height()), 1.0);
        Ok(Self { canvas, ctx, image: None, core })
    }

    /// Resize the backing store for `dpr` and record the CSS viewport size.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let actions = self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((self.core.viewport_width * self.core.dpr).round() as u32);
        self.canvas.set_height((self.core.viewport_height * self.core.dpr).round() as u32);
        actions
    }

    /// Hand over a decoded image for `ticket`. Stale images are dropped.
    pub fn image_loaded(&mut self, ticket: LoadTicket, image: HtmlImageElement) -> Vec<Action> {
        let (w, h) = (f64::from(image.natural_width()), f64::from(image.natural_height()));
        let actions = self.core.background_loaded(ticket, w, h);
        if !actions.is_empty() {
            self.image = Some(image);
        }
        actions
    }

    pub fn image_failed(&mut self, ticket: LoadTicket) -> Vec<Action> {
        let actions = self.core.background_failed(ticket);
        if !actions.is_empty() {
            self.image = None;
        }
        actions
    }

    /// Apply a cursor to the canvas element.
    ///
    /// # Errors
    ///
    /// Propagates DOM style errors.
    pub fn set_cursor(&self, cursor: &CursorStyle) -> Result<(), JsValue> {
        self.canvas.style().set_property("cursor", cursor.css())
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Propagates canvas drawing errors.
    pub fn render(&self) -> Result<(), JsValue> {
        let image = self.image.as_ref().filter(|_| self.core.background.is_drawable());
        render::draw(&self.ctx, &self.core, image)
    }
}
