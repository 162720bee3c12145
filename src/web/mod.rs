//! Browser host: binds [`EngineCore`] to the page builder markup.
//!
//! The host holds no editor logic. DOM events become core calls, and the
//! returned [`Action`]s are applied to the page. The core is borrowed only for
//! the duration of a call, never while actions are applied, because applying
//! an action can feed new input back into the core (measured sizes, image
//! loads).
//!
//! Expected markup: palette items `.element[data-type]`, the canvas `#canvas`,
//! the property panel `#form-content`, `#preview-btn`, and the overlay
//! `#preview-modal` holding `.close-btn` and `#preview-content`.

mod dom;
mod logging;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, DragEvent, Element, Event, EventTarget, HtmlElement, HtmlImageElement, HtmlInputElement,
    HtmlTextAreaElement, MouseEvent, Node, TouchEvent, TouchList, Window,
};

use crate::config::EditorConfig;
use crate::consts::DRAG_MIME;
use crate::doc::{ElementId, ElementKind};
use crate::engine::{Action, EngineCore};
use crate::form::{APPLY_ACTION_ID, DELETE_ACTION_ID, FormValues};
use crate::geom::{Point, Size};
use crate::input::{InputSource, OverlayTarget, PointerTarget, TouchPoint, tracked_touch};
use crate::preview::PreviewDocument;
use crate::render::{ClickBehavior, RenderNode};
use crate::validate::{LoadOutcome, ValidationRequest, ValidationTicket};

use dom::{Listener, ListenerSet};

const CANVAS_ID: &str = "canvas";
const FORM_ID: &str = "form-content";
const PREVIEW_BUTTON_ID: &str = "preview-btn";
const PREVIEW_MODAL_ID: &str = "preview-modal";
const PREVIEW_CONTENT_ID: &str = "preview-content";
const PALETTE_SELECTOR: &str = ".element[data-type]";
const CLOSE_SELECTOR: &str = ".close-btn";
const ELEMENT_SELECTOR: &str = ".canvas-element";
const SELECTED_CLASS: &str = "selected";

/// The page builder, mounted on the current document.
#[wasm_bindgen]
pub struct PageBuilder {
    host: Rc<Host>,
}

#[wasm_bindgen]
impl PageBuilder {
    /// Mount the editor. `config_json` is an optional partial [`EditorConfig`].
    ///
    /// # Errors
    ///
    /// Invalid config JSON, or required markup missing from the page.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PageBuilder, JsValue> {
        logging::init();
        let config = EditorConfig::from_optional_json(config_json.as_deref())
            .map_err(|e| JsValue::from_str(&format!("{}: {e}", e.error_code())))?;
        let host = Host::mount(config)?;
        tracing::info!("page builder mounted");
        Ok(Self { host })
    }

    #[wasm_bindgen(js_name = elementCount)]
    pub fn element_count(&self) -> usize {
        self.host.core.borrow().doc.len()
    }

    #[wasm_bindgen(js_name = selectedElement)]
    pub fn selected_element(&self) -> Option<String> {
        self.host.core.borrow().selection().map(|id| id.to_string())
    }

    /// The placed elements as JSON, in canvas order.
    ///
    /// # Errors
    ///
    /// Serialization failure.
    #[wasm_bindgen(js_name = documentJson)]
    pub fn document_json(&self) -> Result<String, JsValue> {
        let core = self.host.core.borrow();
        let elements: Vec<_> = core.doc.iter().collect();
        serde_json::to_string(&elements).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// An in-flight image load for a validation ticket.
struct ImageLoad {
    image: HtmlImageElement,
    listeners: Vec<Listener>,
}

struct Host {
    core: RefCell<EngineCore>,
    window: Window,
    document: Document,
    canvas: HtmlElement,
    form: Element,
    modal: HtmlElement,
    preview: Element,
    /// Listeners bound for the lifetime of the editor.
    bound: RefCell<Vec<Listener>>,
    /// Document-level move/up listeners while a gesture is captured.
    gesture: RefCell<ListenerSet>,
    /// Identifier of the contact driving the current touch gesture.
    touch_id: Cell<Option<i32>>,
    /// Link handlers of the current preview.
    preview_links: RefCell<ListenerSet>,
    image_loads: RefCell<HashMap<ValidationTicket, ImageLoad>>,
    /// Finished image loads whose closures may still be on the stack.
    retired_loads: RefCell<Vec<ImageLoad>>,
}

impl Host {
    fn mount(config: EditorConfig) -> Result<Rc<Self>, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let host = Rc::new(Self {
            core: RefCell::new(EngineCore::new(config)),
            canvas: html_by_id(&document, CANVAS_ID)?,
            form: by_id(&document, FORM_ID)?,
            modal: html_by_id(&document, PREVIEW_MODAL_ID)?,
            preview: by_id(&document, PREVIEW_CONTENT_ID)?,
            window,
            document,
            bound: RefCell::new(Vec::new()),
            gesture: RefCell::new(ListenerSet::default()),
            touch_id: Cell::new(None),
            preview_links: RefCell::new(ListenerSet::default()),
            image_loads: RefCell::new(HashMap::new()),
            retired_loads: RefCell::new(Vec::new()),
        });
        host.bind()?;
        let form = host.core.borrow().form.clone();
        host.apply(vec![Action::FormChanged(form)]);
        host.sync_canvas_size();
        Ok(host)
    }

    // =============================================================
    // Event binding
    // =============================================================

    fn bind(self: &Rc<Self>) -> Result<(), JsValue> {
        let mut bound = Vec::new();

        let palette = self.document.query_selector_all(PALETTE_SELECTOR)?;
        for i in 0..palette.length() {
            let Some(node) = palette.get(i) else {
                continue;
            };
            let Some(item) = node.dyn_ref::<Element>() else {
                continue;
            };
            let raw = item.get_attribute("data-type").unwrap_or_default();
            let kind = match raw.parse::<ElementKind>() {
                Ok(kind) => kind,
                Err(e) => {
                    tracing::warn!(error = %e, "palette item skipped");
                    continue;
                }
            };
            item.set_attribute("draggable", "true")?;
            bound.push(self.listen(item, "dragstart", move |host, e| host.on_palette_drag_start(kind, e))?);
            bound.push(self.listen(item, "dragend", |host, _| host.dispatch(EngineCore::cancel_placement))?);
            bound.push(self.listen(item, "touchstart", move |host, e| host.on_palette_touch_start(kind, e))?);
        }

        let canvas: &EventTarget = &self.canvas;
        bound.push(self.listen(canvas, "dragenter", Self::on_canvas_drag_over)?);
        bound.push(self.listen(canvas, "dragover", Self::on_canvas_drag_over)?);
        bound.push(self.listen(canvas, "dragleave", Self::on_canvas_drag_leave)?);
        bound.push(self.listen(canvas, "drop", Self::on_canvas_drop)?);
        bound.push(self.listen(canvas, "mousedown", Self::on_canvas_mouse_down)?);
        bound.push(self.listen(canvas, "touchstart", Self::on_canvas_touch_start)?);
        bound.push(self.listen(canvas, "click", Self::on_canvas_click)?);
        bound.push(self.listen(canvas, "input", Self::on_canvas_input)?);
        bound.push(self.listen_capturing(canvas, "load", Self::on_canvas_load)?);

        bound.push(self.listen(&self.form, "click", Self::on_form_click)?);

        let preview_button = by_id(&self.document, PREVIEW_BUTTON_ID)?;
        bound.push(self.listen(&preview_button, "click", |host, _| {
            host.dispatch(EngineCore::show_preview);
        })?);
        if let Some(close) = self.modal.query_selector(CLOSE_SELECTOR)? {
            bound.push(self.listen(&close, "click", |host, _| host.dispatch(EngineCore::close_preview))?);
        }
        bound.push(self.listen(&self.modal, "click", Self::on_modal_click)?);

        bound.push(self.listen(&self.window, "resize", |host, _| host.sync_canvas_size())?);

        tracing::debug!(listeners = bound.len(), "editor events bound");
        self.bound.borrow_mut().extend(bound);
        Ok(())
    }

    /// Register a listener that calls back into the host while it is alive.
    fn listen<F>(self: &Rc<Self>, target: &EventTarget, event: &'static str, handler: F) -> Result<Listener, JsValue>
    where
        F: Fn(&Rc<Self>, &Event) + 'static,
    {
        Listener::new(target, event, self.callback(handler))
    }

    /// Like [`Host::listen`], in the capture phase.
    fn listen_capturing<F>(
        self: &Rc<Self>,
        target: &EventTarget,
        event: &'static str,
        handler: F,
    ) -> Result<Listener, JsValue>
    where
        F: Fn(&Rc<Self>, &Event) + 'static,
    {
        Listener::capturing(target, event, self.callback(handler))
    }

    fn callback<F>(self: &Rc<Self>, handler: F) -> impl FnMut(Event) + 'static
    where
        F: Fn(&Rc<Self>, &Event) + 'static,
    {
        let weak = Rc::downgrade(self);
        move |e: Event| {
            if let Some(host) = weak.upgrade() {
                handler(&host, &e);
            }
        }
    }

    fn capture_gesture(self: &Rc<Self>) -> Result<(), JsValue> {
        if self.gesture.borrow().is_active() {
            return Ok(());
        }
        let document: &EventTarget = &self.document;
        let listeners = vec![
            self.listen(document, "mousemove", Self::on_document_mouse_move)?,
            self.listen(document, "mouseup", Self::on_document_mouse_up)?,
            self.listen(document, "touchmove", Self::on_document_touch_move)?,
            self.listen(document, "touchend", Self::on_document_touch_end)?,
            self.listen(document, "touchcancel", |host, _| host.dispatch(EngineCore::pointer_cancel))?,
        ];
        self.gesture.borrow_mut().set(listeners);
        Ok(())
    }

    // =============================================================
    // Palette
    // =============================================================

    fn on_palette_drag_start(self: &Rc<Self>, kind: ElementKind, event: &Event) {
        if let Some(transfer) = event.dyn_ref::<DragEvent>().and_then(DragEvent::data_transfer) {
            if let Err(e) = transfer.set_data(DRAG_MIME, kind.as_str()) {
                tracing::warn!(error = ?e, "failed to set drag payload");
            }
        }
        self.dispatch(|core| core.begin_placement(kind, InputSource::Pointer));
    }

    fn on_palette_touch_start(self: &Rc<Self>, kind: ElementKind, event: &Event) {
        event.prevent_default();
        if self.touch_id.get().is_some() {
            return;
        }
        let Some(contact) = event.dyn_ref::<TouchEvent>().and_then(|t| self.touch_contact(&t.changed_touches())) else {
            return;
        };
        self.dispatch(|core| core.begin_placement(kind, InputSource::Touch));
        self.touch_id.set(Some(contact.identifier));
    }

    // =============================================================
    // Canvas
    // =============================================================

    fn on_canvas_drag_over(self: &Rc<Self>, event: &Event) {
        // Required for the canvas to accept the drop.
        event.prevent_default();
        self.dispatch(EngineCore::placement_over);
    }

    fn on_canvas_drag_leave(self: &Rc<Self>, event: &Event) {
        let related = event.dyn_ref::<MouseEvent>().and_then(MouseEvent::related_target);
        let canvas: &Node = &self.canvas;
        let into_child = related
            .as_ref()
            .and_then(|t| t.dyn_ref::<Node>())
            .is_some_and(|n| canvas.contains(Some(n)));
        if !into_child {
            self.dispatch(EngineCore::placement_leave);
        }
    }

    fn on_canvas_drop(self: &Rc<Self>, event: &Event) {
        event.prevent_default();
        let Some(drag) = event.dyn_ref::<DragEvent>() else {
            return;
        };
        let payload = match drag.data_transfer().map(|t| t.get_data(DRAG_MIME)) {
            Some(Ok(payload)) => payload,
            Some(Err(e)) => {
                tracing::warn!(error = ?e, "failed to read drag payload");
                String::new()
            }
            None => String::new(),
        };
        let point = self.local_point(drag.client_x(), drag.client_y());
        self.dispatch(|core| core.drop_payload(DRAG_MIME, &payload, point));
    }

    fn on_canvas_mouse_down(self: &Rc<Self>, event: &Event) {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        if mouse.button() != 0 {
            return;
        }
        let point = self.local_point(mouse.client_x(), mouse.client_y());
        let target = self.pointer_target(event);
        if let PointerTarget::Element { id, .. } = target {
            self.remeasure(id);
        }
        self.dispatch(|core| core.pointer_down(target, point));
    }

    fn on_canvas_touch_start(self: &Rc<Self>, event: &Event) {
        let Some(touch) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        // A second finger never takes over the tracked gesture.
        if self.touch_id.get().is_some() {
            return;
        }
        let Some(contact) = self.touch_contact(&touch.changed_touches()) else {
            return;
        };
        let target = self.pointer_target(event);
        let PointerTarget::Element { id, .. } = target else {
            return;
        };
        self.dispatch(|core| core.select(id));
        self.remeasure(id);
        self.dispatch(|core| core.pointer_down(target, contact.point));
        if self.core.borrow().gesture.is_moving() {
            self.touch_id.set(Some(contact.identifier));
            event.prevent_default();
        }
    }

    fn on_canvas_click(self: &Rc<Self>, event: &Event) {
        if let PointerTarget::Element { id, .. } = self.pointer_target(event) {
            self.dispatch(|core| core.select(id));
        }
    }

    fn on_canvas_input(self: &Rc<Self>, event: &Event) {
        let PointerTarget::Element { id, .. } = self.pointer_target(event) else {
            return;
        };
        match self.canvas_element(id) {
            Ok(Some(el)) => {
                let text = el.text_content().unwrap_or_default();
                self.dispatch(|core| core.commit_inline_text(id, &text));
                self.measure(id, &el);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(%id, error = ?e, "inline edit lookup failed"),
        }
    }

    /// An image inside an element finished loading; its box may have changed.
    fn on_canvas_load(self: &Rc<Self>, event: &Event) {
        if let PointerTarget::Element { id, .. } = self.pointer_target(event) {
            self.remeasure(id);
        }
    }

    // =============================================================
    // Captured gesture (document-wide)
    // =============================================================

    fn on_document_mouse_move(self: &Rc<Self>, event: &Event) {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            let point = self.local_point(mouse.client_x(), mouse.client_y());
            self.dispatch(|core| core.pointer_move(point));
        }
    }

    fn on_document_mouse_up(self: &Rc<Self>, event: &Event) {
        let point = event
            .dyn_ref::<MouseEvent>()
            .map(|mouse| self.local_point(mouse.client_x(), mouse.client_y()));
        self.dispatch(|core| core.pointer_up(point));
    }

    fn on_document_touch_move(self: &Rc<Self>, event: &Event) {
        let Some(touch) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        event.prevent_default();
        if let Some(contact) = self.tracked_contact(&touch.touches()) {
            self.dispatch(|core| core.pointer_move(contact.point));
        }
    }

    fn on_document_touch_end(self: &Rc<Self>, event: &Event) {
        let Some(touch) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        let contact = self.tracked_contact(&touch.changed_touches());
        if contact.is_none() && self.touch_id.get().is_some() {
            // Some other finger lifted.
            return;
        }
        self.dispatch(|core| core.pointer_up(contact.map(|c| c.point)));
    }

    // =============================================================
    // Property panel & preview
    // =============================================================

    fn on_form_click(self: &Rc<Self>, event: &Event) {
        let Some(el) = dom::event_element(event) else {
            return;
        };
        match el.id().as_str() {
            APPLY_ACTION_ID => {
                let values = self.read_form();
                self.dispatch(|core| core.apply_properties(&values));
            }
            DELETE_ACTION_ID => self.dispatch(EngineCore::delete_element),
            _ => {}
        }
    }

    /// Current values of the bound form's fields, read by DOM id.
    fn read_form(&self) -> FormValues {
        let ids: Vec<&'static str> = self
            .core
            .borrow()
            .form
            .bound()
            .map(|form| form.fields.iter().map(|f| f.id).collect())
            .unwrap_or_default();
        let mut values = FormValues::new();
        for id in ids {
            let Some(field) = self.document.get_element_by_id(id) else {
                continue;
            };
            if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
                values.set(id, input.value());
            } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
                values.set(id, area.value());
            }
        }
        values
    }

    fn on_modal_click(self: &Rc<Self>, event: &Event) {
        let modal: &Node = &self.modal;
        let target = event.target();
        let on_backdrop = target
            .as_ref()
            .and_then(|t| t.dyn_ref::<Node>())
            .is_some_and(|n| n.is_same_node(Some(modal)));
        let hit = if on_backdrop { OverlayTarget::Backdrop } else { OverlayTarget::Content };
        self.dispatch(|core| core.overlay_click(hit));
    }

    fn open_link(&self, url: &str, target: &str) {
        match self.window.open_with_url_and_target(url, target) {
            Ok(_) => tracing::info!(%url, %target, "preview link opened"),
            Err(e) => tracing::warn!(%url, error = ?e, "failed to open preview link"),
        }
    }

    fn sync_canvas_size(self: &Rc<Self>) {
        let size = Size::new(f64::from(self.canvas.client_width()), f64::from(self.canvas.client_height()));
        if size.width > 0.0 && size.height > 0.0 {
            self.dispatch(|core| core.resize_canvas(size));
        }
    }

    // =============================================================
    // Core round-trip
    // =============================================================

    fn dispatch<F>(self: &Rc<Self>, f: F)
    where
        F: FnOnce(&mut EngineCore) -> Vec<Action>,
    {
        let actions = {
            let Ok(mut core) = self.core.try_borrow_mut() else {
                tracing::warn!("editor busy; input dropped");
                return;
            };
            f(&mut core)
        };
        self.apply(actions);
    }

    fn apply(self: &Rc<Self>, actions: Vec<Action>) {
        for action in actions {
            if let Err(e) = self.apply_one(action) {
                tracing::warn!(error = ?e, "failed to apply editor action");
            }
        }
    }

    fn apply_one(self: &Rc<Self>, action: Action) -> Result<(), JsValue> {
        match action {
            Action::ElementCreated { id, node } => {
                let el = dom::build(&self.document, &node)?;
                self.canvas.append_child(&el)?;
                self.measure(id, &el);
            }
            Action::ElementUpdated { id, node } => {
                let el = dom::build(&self.document, &node)?;
                match self.canvas_element(id)? {
                    Some(old) => old.replace_with_with_node_1(&el)?,
                    None => {
                        self.canvas.append_child(&el)?;
                    }
                }
                self.measure(id, &el);
            }
            Action::ElementMoved { id, position } => {
                if let Some(el) = self.canvas_element(id)? {
                    dom::set_position(&el, position)?;
                }
            }
            Action::ElementDeleted { id } => {
                if let Some(el) = self.canvas_element(id)? {
                    el.remove();
                }
            }
            Action::SelectionChanged { previous, current } => {
                if let Some(el) = previous.map(|id| self.canvas_element(id)).transpose()?.flatten() {
                    el.class_list().remove_1(SELECTED_CLASS)?;
                }
                if let Some(el) = current.map(|id| self.canvas_element(id)).transpose()?.flatten() {
                    el.class_list().add_1(SELECTED_CLASS)?;
                }
            }
            Action::SetDropHighlight { border_color, .. } => {
                self.canvas.style().set_property("border-color", &border_color)?;
            }
            Action::FormChanged(view) => {
                let html: String = view.render().iter().map(RenderNode::to_html).collect();
                self.form.set_inner_html(&html);
            }
            Action::FormFieldChanged { field, value } => {
                let Some(el) = self.document.get_element_by_id(field) else {
                    return Ok(());
                };
                if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
                    area.set_value(&value);
                } else if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
                    input.set_value(&value);
                }
            }
            Action::CaptureGesture => self.capture_gesture()?,
            Action::ReleaseGesture => {
                self.gesture.borrow_mut().release();
                self.touch_id.set(None);
            }
            Action::ValidateImage(request) => self.load_image(request)?,
            Action::CancelImageValidation(ticket) => self.cancel_load(ticket),
            Action::Notify(message) => self.window.alert_with_message(&message)?,
            Action::ShowPreview(document) => self.show_preview(&document)?,
            Action::HidePreview => {
                self.modal.style().set_property("display", "none")?;
                self.preview_links.borrow_mut().release();
            }
        }
        Ok(())
    }

    /// Measure the element's current box, which may have changed since it was built.
    fn remeasure(self: &Rc<Self>, id: ElementId) {
        match self.canvas_element(id) {
            Ok(Some(el)) => self.measure(id, &el),
            Ok(None) => {}
            Err(e) => tracing::debug!(%id, error = ?e, "element lookup failed"),
        }
    }

    /// Report an element's rendered size back to the core.
    fn measure(self: &Rc<Self>, id: ElementId, el: &Element) {
        let Some(html) = el.dyn_ref::<HtmlElement>() else {
            return;
        };
        let size = Size::new(f64::from(html.offset_width()), f64::from(html.offset_height()));
        if size.width > 0.0 && size.height > 0.0 {
            self.dispatch(|core| core.set_element_size(id, size));
        }
    }

    fn show_preview(self: &Rc<Self>, document: &PreviewDocument) -> Result<(), JsValue> {
        self.preview.set_inner_html("");
        let mut links = Vec::new();
        for node in &document.nodes {
            let el = dom::build(&self.document, node)?;
            if let Some(ClickBehavior::OpenLink { url, target }) = node.on_click.clone() {
                links.push(self.listen(&el, "click", move |host, _| host.open_link(&url, &target))?);
            }
            self.preview.append_child(&el)?;
        }
        self.preview_links.borrow_mut().set(links);
        self.modal.style().set_property("display", "block")
    }

    // =============================================================
    // Image loads
    // =============================================================

    fn load_image(self: &Rc<Self>, request: ValidationRequest) -> Result<(), JsValue> {
        self.retired_loads.borrow_mut().clear();
        let ticket = request.ticket;
        let image = HtmlImageElement::new()?;
        let target: &EventTarget = &image;
        let listeners = vec![
            self.listen(target, "load", move |host, _| host.finish_load(ticket, LoadOutcome::Loaded))?,
            self.listen(target, "error", move |host, _| host.finish_load(ticket, LoadOutcome::Failed))?,
        ];
        image.set_src(&request.url);
        self.image_loads.borrow_mut().insert(ticket, ImageLoad { image, listeners });
        Ok(())
    }

    fn finish_load(self: &Rc<Self>, ticket: ValidationTicket, outcome: LoadOutcome) {
        let load = self.image_loads.borrow_mut().remove(&ticket);
        if let Some(load) = load {
            self.retired_loads.borrow_mut().push(load);
        }
        self.dispatch(|core| core.complete_image_validation(ticket, outcome));
    }

    fn cancel_load(&self, ticket: ValidationTicket) {
        let load = self.image_loads.borrow_mut().remove(&ticket);
        if let Some(load) = load {
            for listener in &load.listeners {
                listener.detach();
            }
            load.image.set_src("");
            self.retired_loads.borrow_mut().push(load);
        }
    }

    // =============================================================
    // Geometry & lookup
    // =============================================================

    /// Convert client coordinates to canvas-local coordinates.
    fn local_point(&self, client_x: i32, client_y: i32) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        Point::new(
            f64::from(client_x) - rect.left() - f64::from(self.canvas.client_left()),
            f64::from(client_y) - rect.top() - f64::from(self.canvas.client_top()),
        )
    }

    fn touches(&self, list: &TouchList) -> Vec<TouchPoint> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|t| TouchPoint { identifier: t.identifier(), point: self.local_point(t.client_x(), t.client_y()) })
            .collect()
    }

    /// The contact that would start a new touch gesture.
    fn touch_contact(&self, list: &TouchList) -> Option<TouchPoint> {
        tracked_touch(&self.touches(list), None)
    }

    /// The contact driving the current touch gesture.
    fn tracked_contact(&self, list: &TouchList) -> Option<TouchPoint> {
        tracked_touch(&self.touches(list), self.touch_id.get())
    }

    /// Which canvas element an event hit, and whether it hit the element itself.
    fn pointer_target(&self, event: &Event) -> PointerTarget {
        let Some(hit) = dom::event_element(event) else {
            return PointerTarget::Canvas;
        };
        let element = match hit.closest(ELEMENT_SELECTOR) {
            Ok(Some(element)) => element,
            Ok(None) => return PointerTarget::Canvas,
            Err(e) => {
                tracing::debug!(error = ?e, "closest() failed");
                return PointerTarget::Canvas;
            }
        };
        let Some(id) = dom::element_id(&element) else {
            return PointerTarget::Canvas;
        };
        let hit_node: &Node = &hit;
        PointerTarget::Element { id, direct: element.is_same_node(Some(hit_node)) }
    }

    fn canvas_element(&self, id: ElementId) -> Result<Option<Element>, JsValue> {
        self.canvas.query_selector(&format!("[data-id=\"{id}\"]"))
    }
}

fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

fn html_by_id(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    by_id(document, id)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not an HTML element")))
}
