//! Browser bindings for the resize controller.
//!
//! ARCHITECTURE
//! ============
//! The editor integration creates one [`ResizePlugin`] per editor view,
//! passing an object implementing `ResizeEditorView` (a thin JS wrapper
//! around the editor view), and forwards the view's `update`/`destroy`
//! hooks and click events. Nodes and transactions cross the boundary as
//! JSON.
//!
//! DOM listeners are closures created once per plugin and kept alive by the
//! [`DomSurface`]. Registering them yields a [`DomListener`] guard that
//! unregisters on drop; the controller decides when guards live.
//!
//! Every closure reaches the controller through a [`ControllerSlot`] for the
//! duration of one call and dispatches transactions after that call returns,
//! because the host re-enters [`ResizePlugin::update`] synchronously from
//! dispatch.

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, HtmlElement, HtmlImageElement, MouseEvent};

use crate::config::ResizeConfig;
use crate::consts::{HANDLE_FILL, HANDLE_Z_INDEX};
use crate::doc::{Node, SelectedNode, Transaction};
use crate::geom::{Point, Rect, Size};
use crate::host::{EditorView, Layout, Surface};
use crate::input::Modifiers;
use crate::plugin::{ControllerSlot, ResizeController};

#[wasm_bindgen(typescript_custom_section)]
const TS_EDITOR_VIEW: &'static str = r#"
export interface ResizeEditorView {
  readonly dom: HTMLElement;
  resolveSelection(): { position: number; node: unknown } | null;
  nodeAt(position: number): unknown | null;
  nodeDOM(position: number): Node | null;
  posAtCoords(left: number, top: number): number | null;
  dispatchTransaction(tr: unknown): void;
}
"#;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(typescript_type = "ResizeEditorView")]
    pub type JsEditorView;

    #[wasm_bindgen(method, getter)]
    fn dom(this: &JsEditorView) -> HtmlElement;

    #[wasm_bindgen(method, js_name = resolveSelection)]
    fn resolve_selection(this: &JsEditorView) -> JsValue;

    #[wasm_bindgen(method, js_name = nodeAt)]
    fn node_at(this: &JsEditorView, position: u32) -> JsValue;

    #[wasm_bindgen(method, js_name = nodeDOM)]
    fn node_dom(this: &JsEditorView, position: u32) -> Option<web_sys::Node>;

    #[wasm_bindgen(method, js_name = posAtCoords)]
    fn pos_at_coords(this: &JsEditorView, left: f64, top: f64) -> Option<u32>;

    #[wasm_bindgen(method, js_name = dispatchTransaction)]
    fn dispatch_transaction(this: &JsEditorView, tr: JsValue);
}

type Slot = ControllerSlot<DomSurface>;

// =============================================================
// JSON bridging
// =============================================================

fn from_js<T: DeserializeOwned>(value: &JsValue) -> Option<T> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let json = match js_sys::JSON::stringify(value) {
        Ok(json) => String::from(json),
        Err(err) => {
            warn!(?err, "host value is not JSON-serializable");
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(error = %e, "unexpected host value shape");
            None
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Option<JsValue> {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "failed to encode transaction");
            return None;
        }
    };
    match js_sys::JSON::parse(&json) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(?err, "failed to decode transaction JSON");
            None
        }
    }
}

fn js_position(position: usize) -> Option<u32> {
    match u32::try_from(position) {
        Ok(position) => Some(position),
        Err(e) => {
            debug!(position, error = %e, "position not representable on the JS side");
            None
        }
    }
}

// =============================================================
// Editor view
// =============================================================

pub struct WebView {
    js: JsEditorView,
}

impl EditorView for WebView {
    type Element = Element;

    fn resolve_selection(&self) -> Option<SelectedNode> {
        from_js(&self.js.resolve_selection())
    }

    fn node_at(&self, position: usize) -> Option<Node> {
        from_js(&self.js.node_at(js_position(position)?))
    }

    fn element_for_position(&self, position: usize) -> Option<Element> {
        let dom = self.js.node_dom(js_position(position)?)?;
        let Ok(element) = dom.dyn_into::<Element>() else {
            return None;
        };
        if element.is_instance_of::<HtmlImageElement>() {
            return Some(element);
        }
        // Node views may wrap the image.
        match element.query_selector("img") {
            Ok(found) => found,
            Err(err) => {
                warn!(position, ?err, "image lookup inside node view failed");
                None
            }
        }
    }

    fn position_at_coords(&self, point: Point) -> Option<usize> {
        self.js.pos_at_coords(point.x, point.y).map(|p| p as usize)
    }

    fn dispatch(&self, tr: Transaction) {
        if let Some(value) = to_js(&tr) {
            self.js.dispatch_transaction(value);
        }
    }
}

// =============================================================
// Listener guard
// =============================================================

/// Registered DOM listeners; unregistered when dropped.
pub struct DomListener {
    bound: Vec<(EventTarget, &'static str, js_sys::Function)>,
}

impl DomListener {
    fn bind(events: &[(&EventTarget, &'static str, &js_sys::Function)]) -> Self {
        let mut bound = Vec::with_capacity(events.len());
        for &(target, event, callback) in events {
            match target.add_event_listener_with_callback(event, callback) {
                Ok(()) => bound.push((target.clone(), event, callback.clone())),
                Err(err) => warn!(event, ?err, "failed to add listener"),
            }
        }
        Self { bound }
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        for (target, event, callback) in &self.bound {
            if let Err(err) = target.remove_event_listener_with_callback(event, callback) {
                warn!(event = *event, ?err, "failed to remove listener");
            }
        }
    }
}

// =============================================================
// Callbacks
// =============================================================

struct Callbacks {
    press: Closure<dyn FnMut(MouseEvent)>,
    scroll: Closure<dyn FnMut(Event)>,
    pointer_move: Closure<dyn FnMut(MouseEvent)>,
    pointer_up: Closure<dyn FnMut(MouseEvent)>,
    cancel: Closure<dyn FnMut(Event)>,
}

fn function_of<T: ?Sized>(closure: &Closure<T>) -> &js_sys::Function {
    closure.as_ref().unchecked_ref()
}

fn pointer_of(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn modifiers_of(event: &MouseEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
    }
}

impl Callbacks {
    fn new(slot: &Rc<Slot>, view: &Rc<WebView>) -> Self {
        let press = {
            let slot = Rc::downgrade(slot);
            Closure::wrap(Box::new(move |event: MouseEvent| {
                let started = slot.upgrade()
                    .and_then(|s| s.with(|c| c.on_handle_press(pointer_of(&event))))
                    .unwrap_or(false);
                if started {
                    event.prevent_default();
                    event.stop_propagation();
                }
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        let scroll = {
            let slot = Rc::downgrade(slot);
            Closure::wrap(Box::new(move |_event: Event| {
                if let Some(s) = slot.upgrade() {
                    s.with(ResizeController::on_scroll);
                }
            }) as Box<dyn FnMut(Event)>)
        };

        let pointer_move = {
            let slot = Rc::downgrade(slot);
            Closure::wrap(Box::new(move |event: MouseEvent| {
                if let Some(s) = slot.upgrade() {
                    s.with(|c| c.on_pointer_move(pointer_of(&event), modifiers_of(&event)));
                }
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        let pointer_up = {
            let slot = Rc::downgrade(slot);
            let view = Rc::clone(view);
            Closure::wrap(Box::new(move |_event: MouseEvent| {
                let tr = slot.upgrade().and_then(|s| s.with(|c| c.on_pointer_up(&*view)).flatten());
                if let Some(tr) = tr {
                    view.dispatch(tr);
                }
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        let cancel = {
            let slot = Rc::downgrade(slot);
            Closure::wrap(Box::new(move |_event: Event| {
                if let Some(s) = slot.upgrade() {
                    s.with(ResizeController::on_drag_cancel);
                }
            }) as Box<dyn FnMut(Event)>)
        };

        Self { press, scroll, pointer_move, pointer_up, cancel }
    }
}

// =============================================================
// DOM surface
// =============================================================

pub struct DomSurface {
    root: HtmlElement,
    container_selector: String,
    callbacks: Callbacks,
}

fn set_style(element: &Element, property: &str, value: &str) {
    let Some(html) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    if let Err(err) = html.style().set_property(property, value) {
        warn!(property, ?err, "failed to set style");
    }
}

fn style_px(element: &Element, property: &str) -> Option<f64> {
    let html = element.dyn_ref::<HtmlElement>()?;
    let raw = match html.style().get_property_value(property) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(property, ?err, "failed to read style");
            return None;
        }
    };
    match raw.trim().trim_end_matches("px").parse::<f64>() {
        Ok(value) if value > 0.0 => Some(value),
        _ => None,
    }
}

impl Layout for DomSurface {
    type Element = Element;

    fn bounding_box_of(&self, element: &Element) -> Rect {
        let r = element.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }

    fn scroll_offset_of(&self, container: &Element) -> Point {
        Point::new(f64::from(container.scroll_left()), f64::from(container.scroll_top()))
    }
}

impl Surface for DomSurface {
    type Listener = DomListener;

    fn locate_container(&self) -> Option<Element> {
        let marked = match self.root.closest(&self.container_selector) {
            Ok(found) => found,
            Err(err) => {
                warn!(selector = %self.container_selector, ?err, "invalid container selector");
                None
            }
        };
        marked
            .and_then(|m| m.parent_element())
            .or_else(|| self.root.parent_element())
    }

    fn ensure_positioned(&self, container: &Element) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let style = match window.get_computed_style(container) {
            Ok(Some(style)) => style,
            Ok(None) => return,
            Err(err) => {
                warn!(?err, "failed to read container style");
                return;
            }
        };
        match style.get_property_value("position") {
            Ok(position) if position == "static" => set_style(container, "position", "relative"),
            Ok(_) => {}
            Err(err) => warn!(?err, "failed to read container position"),
        }
    }

    fn create_handle(&self, container: &Element, size: f64) -> Option<Element> {
        let document = container.owner_document()?;
        let handle = match document.create_element("button") {
            Ok(handle) => handle,
            Err(err) => {
                warn!(?err, "failed to create resize handle");
                return None;
            }
        };
        for (name, value) in [("type", "button"), ("class", "resize-handle"), ("aria-label", "Resize image")] {
            if let Err(err) = handle.set_attribute(name, value) {
                warn!(name, ?err, "failed to set handle attribute");
            }
        }
        let px = format!("{size}px");
        for (property, value) in [
            ("position", "absolute"),
            ("width", px.as_str()),
            ("height", px.as_str()),
            ("padding", "0"),
            ("background-color", HANDLE_FILL),
            ("border", "2px solid white"),
            ("border-radius", "50%"),
            ("box-shadow", "0 2px 4px rgba(0, 0, 0, 0.2)"),
            ("cursor", "se-resize"),
            ("display", "none"),
            ("z-index", HANDLE_Z_INDEX),
            ("pointer-events", "auto"),
            ("touch-action", "none"),
        ] {
            set_style(&handle, property, value);
        }
        if let Err(err) = container.append_child(&handle) {
            warn!(?err, "failed to insert resize handle");
            return None;
        }
        Some(handle)
    }

    fn remove_handle(&self, handle: &Element) {
        handle.remove();
    }

    fn set_handle_visible(&self, handle: &Element, visible: bool) {
        set_style(handle, "display", if visible { "block" } else { "none" });
    }

    fn place_handle(&self, handle: &Element, at: Point) {
        set_style(handle, "left", &format!("{}px", at.x));
        set_style(handle, "top", &format!("{}px", at.y));
    }

    fn styled_size_of(&self, element: &Element) -> Option<Size> {
        Some(Size::new(style_px(element, "width")?, style_px(element, "height")?))
    }

    fn natural_size_of(&self, element: &Element) -> Option<Size> {
        let img = element.dyn_ref::<HtmlImageElement>()?;
        let size = Size::new(f64::from(img.natural_width()), f64::from(img.natural_height()));
        size.is_usable().then_some(size)
    }

    fn set_size(&self, element: &Element, size: Size) {
        set_style(element, "width", &format!("{}px", size.width));
        set_style(element, "height", &format!("{}px", size.height));
        set_style(element, "max-width", "100%");
        set_style(element, "object-fit", "contain");
    }

    fn bind_handle_press(&self, handle: &Element) -> DomListener {
        let target: &EventTarget = handle.as_ref();
        DomListener::bind(&[(target, "pointerdown", function_of(&self.callbacks.press))])
    }

    fn bind_container_scroll(&self, container: &Element) -> DomListener {
        let target: &EventTarget = container.as_ref();
        DomListener::bind(&[(target, "scroll", function_of(&self.callbacks.scroll))])
    }

    fn bind_drag_tracking(&self) -> DomListener {
        let Some(window) = web_sys::window() else {
            warn!("no window; drag tracking unavailable");
            return DomListener { bound: Vec::new() };
        };
        let target: &EventTarget = window.as_ref();
        let cancel = function_of(&self.callbacks.cancel);
        DomListener::bind(&[
            (target, "pointermove", function_of(&self.callbacks.pointer_move)),
            (target, "pointerup", function_of(&self.callbacks.pointer_up)),
            (target, "pointercancel", cancel),
            (target, "blur", cancel),
        ])
    }
}

// =============================================================
// Plugin export
// =============================================================

fn hits_media(event: &MouseEvent) -> bool {
    let Some(target) = event.target() else {
        return false;
    };
    let Some(element) = target.dyn_ref::<Element>() else {
        return false;
    };
    matches!(element.closest("img"), Ok(Some(_)))
}

/// Route panics and log records to the browser console. `level` is one of
/// `error`, `warn`, `info`, `debug`, `trace` (default `info`). Safe to call
/// more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    console_error_panic_hook::set_once();
    let level = match level.as_deref().map(str::parse::<log::Level>) {
        None => log::Level::Info,
        Some(Ok(level)) => level,
        Some(Err(e)) => {
            warn!(error = %e, "unknown log level; using info");
            log::Level::Info
        }
    };
    if let Err(e) = console_log::init_with_level(level) {
        debug!(error = %e, "console logger already installed");
    }
}

/// Image resize support for one editor view.
#[wasm_bindgen]
pub struct ResizePlugin {
    slot: Rc<Slot>,
    view: Rc<WebView>,
}

#[wasm_bindgen]
impl ResizePlugin {
    /// Attach to `view`. `config` is an optional JSON-encoded `ResizeConfig`;
    /// an invalid one is logged and replaced by the defaults. When the view
    /// has no container the plugin stays inert.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(view: JsEditorView, config: Option<String>) -> ResizePlugin {
        let config = match config.as_deref().map(ResizeConfig::from_json) {
            None => ResizeConfig::default(),
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                warn!(error = %e, "invalid resize config; using defaults");
                ResizeConfig::default()
            }
        };

        let view = Rc::new(WebView { js: view });
        let slot: Rc<Slot> = Rc::new(ControllerSlot::new());
        let surface = DomSurface {
            root: view.js.dom(),
            container_selector: config.container_selector.clone(),
            callbacks: Callbacks::new(&slot, &view),
        };
        let controller = ResizeController::attach(surface, config);
        slot.install(controller);
        Self { slot, view }
    }

    /// Forward the editor view's update notification.
    pub fn update(&self) {
        self.slot.with(|c| c.update(&*self.view));
    }

    /// Forward a click inside the editor. Returns `true` when it selected an
    /// image, in which case the editor should treat the click as handled.
    #[wasm_bindgen(js_name = handleClick)]
    pub fn handle_click(&self, event: MouseEvent) -> bool {
        let hit = hits_media(&event);
        let point = pointer_of(&event);
        let tr = self.slot.with(|c| c.on_click(&*self.view, point, hit)).flatten();
        match tr {
            Some(tr) => {
                self.view.dispatch(tr);
                true
            }
            None => false,
        }
    }

    /// Detach: remove the handle and every listener, including those of a
    /// drag still in progress. Called from inside one of this plugin's own
    /// events, the detach runs as soon as that event returns.
    pub fn destroy(&self) {
        self.slot.detach();
    }
}
