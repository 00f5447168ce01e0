//! Browser mount: binds one canvas element to one [`Engine`].
//!
//! Each mounted canvas gets its own [`SiloCanvas`] handle; DOM listeners hold a
//! weak reference to that instance's shared state, so nothing is keyed by a
//! global map and a dropped or destroyed instance simply stops reacting.
//!
//! Engine actions are executed here: events go to the host listener as JSON,
//! cursor changes go to the element style, background URLs are decoded with an
//! `HtmlImageElement`, and render requests are coalesced into at most one
//! pending `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Once;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, EventTarget, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent, WheelEvent,
};

use crate::background::LoadTicket;
use crate::camera::Point;
use crate::config::EngineConfig;
use crate::engine::{Action, Engine};
use crate::error::CanvasError;
use crate::input::{Button, Key, Modifiers, WheelDelta};
use crate::message::Command;

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("canvas: logger unavailable: {e}")));
        }
    });
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

struct Shared {
    engine: RefCell<Engine>,
    canvas: HtmlCanvasElement,
    listener: RefCell<Option<js_sys::Function>>,
    dom_listeners: RefCell<Vec<Listener>>,
}

/// Handle to one mounted canvas, exported to JavaScript.
#[wasm_bindgen]
pub struct SiloCanvas {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl SiloCanvas {
    /// Mount on the canvas with DOM id `canvas_id`. `options` is JSON for
    /// [`EngineConfig`] (may be empty).
    ///
    /// Returns `undefined` (and logs) when the element is missing, is not a
    /// canvas, or the options are invalid.
    #[must_use]
    pub fn mount(canvas_id: &str, options: &str) -> Option<SiloCanvas> {
        init_logging();
        match Self::try_mount(canvas_id, options) {
            Ok(handle) => {
                log::info!("canvas: mounted #{canvas_id}");
                Some(handle)
            }
            Err(e) => {
                log::error!("canvas: mount #{canvas_id} skipped: {e}");
                None
            }
        }
    }

    /// Apply one JSON command. Returns whether it decoded; failures are logged.
    pub fn command(&self, json: &str) -> bool {
        let command = match Command::parse(json) {
            Ok(command) => command,
            Err(e) => {
                log::warn!("canvas: bad command: {e}");
                return false;
            }
        };
        let actions = self.shared.engine.borrow_mut().core.apply(command);
        dispatch(&self.shared, actions);
        true
    }

    /// Register the host callback receiving outbound events as JSON strings.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: js_sys::Function) {
        *self.shared.listener.borrow_mut() = Some(callback);
    }

    /// Re-read the element size and device pixel ratio.
    pub fn resize(&self) {
        resize(&self.shared);
    }

    /// Id of the selected shape, if any.
    #[wasm_bindgen(js_name = selectedId)]
    #[must_use]
    pub fn selected_id(&self) -> Option<String> {
        self.shared.engine.borrow().core.selection().map(|id| id.as_str().to_owned())
    }

    /// Detach every DOM listener. The handle is inert afterwards.
    pub fn destroy(&self) {
        for l in self.shared.dom_listeners.borrow_mut().drain(..) {
            if let Err(e) = l.target.remove_event_listener_with_callback(l.kind, l.callback.as_ref().unchecked_ref()) {
                log::warn!("canvas: removing {} listener failed: {e:?}", l.kind);
            }
        }
        *self.shared.listener.borrow_mut() = None;
    }
}

impl SiloCanvas {
    fn try_mount(canvas_id: &str, options: &str) -> Result<Self, CanvasError> {
        let config = EngineConfig::from_json(options)?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| CanvasError::MissingTarget("no document".into()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| CanvasError::MissingTarget(format!("#{canvas_id} not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| CanvasError::MissingTarget(format!("#{canvas_id} is not a canvas")))?;

        let engine = Engine::new(canvas.clone(), config)?;
        let shared = Rc::new(Shared {
            engine: RefCell::new(engine),
            canvas,
            listener: RefCell::new(None),
            dom_listeners: RefCell::new(Vec::new()),
        });
        attach_listeners(&shared).map_err(|e| CanvasError::MissingTarget(format!("listeners: {e:?}")))?;
        resize(&shared);
        let cursor = shared.engine.borrow().core.current_cursor();
        dispatch(&shared, vec![Action::SetCursor(cursor)]);
        Ok(Self { shared })
    }
}

// =============================================================
// Action execution
// =============================================================

fn dispatch(shared: &Rc<Shared>, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::Emit(event) => emit(shared, &event),
            Action::SetCursor(cursor) => {
                if let Err(e) = shared.engine.borrow().set_cursor(&cursor) {
                    log::warn!("canvas: cursor update failed: {e:?}");
                }
            }
            Action::LoadBackground { url, ticket } => load_background(shared, &url, ticket),
            Action::RenderNeeded => request_render(shared),
        }
    }
}

fn emit(shared: &Shared, event: &crate::message::Event) {
    let Some(callback) = shared.listener.borrow().clone() else {
        return;
    };
    match event.to_json() {
        Ok(json) => {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                log::error!("canvas: event listener threw: {e:?}");
            }
        }
        Err(e) => log::error!("canvas: event encoding failed: {e}"),
    }
}

fn load_background(shared: &Rc<Shared>, url: &str, ticket: LoadTicket) {
    let image = match HtmlImageElement::new() {
        Ok(image) => image,
        Err(e) => {
            log::error!("canvas: cannot create image element: {e:?}");
            let actions = shared.engine.borrow_mut().image_failed(ticket);
            dispatch(shared, actions);
            return;
        }
    };

    let weak = Rc::downgrade(shared);
    let loaded = image.clone();
    let onload = Closure::once_into_js(move || {
        if let Some(shared) = weak.upgrade() {
            let actions = shared.engine.borrow_mut().image_loaded(ticket, loaded);
            dispatch(&shared, actions);
        }
    });
    let weak = Rc::downgrade(shared);
    let onerror = Closure::once_into_js(move || {
        if let Some(shared) = weak.upgrade() {
            let actions = shared.engine.borrow_mut().image_failed(ticket);
            dispatch(&shared, actions);
        }
    });
    image.set_onload(Some(onload.unchecked_ref()));
    image.set_onerror(Some(onerror.unchecked_ref()));
    image.set_src(url);
}

fn request_render(shared: &Rc<Shared>) {
    if !shared.engine.borrow_mut().core.frame.invalidate() {
        return;
    }

    let Some(window) = web_sys::window() else {
        render_now(shared);
        return;
    };

    let weak = Rc::downgrade(shared);
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        if let Some(shared) = weak.upgrade() {
            render_now(&shared);
        }
        holder_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
        *holder.borrow_mut() = Some(cb);
    } else {
        render_now(shared);
    }
}

fn render_now(shared: &Shared) {
    let mut engine = shared.engine.borrow_mut();
    if !engine.core.frame.begin_frame() {
        return;
    }
    if let Err(e) = engine.render() {
        log::error!("canvas: render failed: {e:?}");
    }
}

fn resize(shared: &Rc<Shared>) {
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    let width = f64::from(shared.canvas.client_width());
    let height = f64::from(shared.canvas.client_height());
    let actions = shared.engine.borrow_mut().set_viewport(width, height, dpr);
    dispatch(shared, actions);
}

// =============================================================
// DOM listeners
// =============================================================

fn local_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(f64::from(event.client_x()) - rect.left(), f64::from(event.client_y()) - rect.top())
}

fn modifiers(event: &MouseEvent) -> Modifiers {
    Modifiers { shift: event.shift_key(), ctrl: event.ctrl_key(), alt: event.alt_key(), meta: event.meta_key() }
}

fn listen(
    shared: &Rc<Shared>,
    target: &EventTarget,
    kind: &'static str,
    passive: bool,
    handler: impl Fn(&Rc<Shared>, &web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let weak: Weak<Shared> = Rc::downgrade(shared);
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Some(shared) = weak.upgrade() {
            handler(&shared, &event);
        }
    });
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    shared.dom_listeners.borrow_mut().push(Listener { target: target.clone(), kind, callback });
    Ok(())
}

fn attach_listeners(shared: &Rc<Shared>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let canvas: EventTarget = shared.canvas.clone().into();
    let window: EventTarget = window.into();

    listen(shared, &canvas, "mousedown", true, |shared, event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else { return };
        let pt = local_point(&shared.canvas, event);
        let actions =
            shared.engine.borrow_mut().core.on_pointer_down(pt, Button::from_dom(event.button()), modifiers(event));
        dispatch(shared, actions);
    })?;

    // Move and release are tracked on the window so drags can leave the canvas.
    listen(shared, &window, "mousemove", true, |shared, event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else { return };
        if !shared.engine.borrow().core.input.is_active() {
            return;
        }
        let pt = local_point(&shared.canvas, event);
        let actions = shared.engine.borrow_mut().core.on_pointer_move(pt, modifiers(event));
        dispatch(shared, actions);
    })?;

    listen(shared, &window, "mouseup", true, |shared, event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else { return };
        let pt = local_point(&shared.canvas, event);
        let actions =
            shared.engine.borrow_mut().core.on_pointer_up(pt, Button::from_dom(event.button()), modifiers(event));
        dispatch(shared, actions);
    })?;

    listen(shared, &canvas, "wheel", false, |shared, event| {
        let Some(event) = event.dyn_ref::<WheelEvent>() else { return };
        let pt = local_point(&shared.canvas, event);
        let delta = WheelDelta { dx: event.delta_x(), dy: event.delta_y() };
        let actions = shared.engine.borrow_mut().core.on_wheel(pt, delta, modifiers(event));
        if !actions.is_empty() {
            event.prevent_default();
        }
        dispatch(shared, actions);
    })?;

    listen(shared, &canvas, "contextmenu", false, |_, event| event.prevent_default())?;

    // Escape applies regardless of which element has focus.
    listen(shared, &window, "keydown", true, |shared, event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else { return };
        let mods = Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        };
        let actions = shared.engine.borrow_mut().core.on_key_down(&Key(event.key()), mods);
        dispatch(shared, actions);
    })?;

    listen(shared, &window, "resize", true, |shared, _| resize(shared))?;
    Ok(())
}
