//! DOM helpers: materializing [`RenderNode`]s and owning event listeners.

use uuid::Uuid;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement};

use crate::doc::ElementId;
use crate::form::format_px;
use crate::geom::Point;
use crate::render::RenderNode;

/// Create a detached DOM element for `node` and its children.
///
/// # Errors
///
/// Any DOM exception raised while creating the element or setting attributes.
pub fn build(document: &Document, node: &RenderNode) -> Result<Element, JsValue> {
    let el = document.create_element(&node.tag)?;
    if !node.classes.is_empty() {
        el.set_class_name(&node.classes.join(" "));
    }
    if !node.styles.is_empty() {
        el.set_attribute("style", &node.style_attr())?;
    }
    for (name, value) in &node.attrs {
        el.set_attribute(name, value)?;
    }
    if let Some(text) = &node.text {
        el.set_text_content(Some(text));
    }
    for child in &node.children {
        el.append_child(&build(document, child)?)?;
    }
    Ok(el)
}

/// Write an element's canvas position to its inline style.
///
/// # Errors
///
/// A DOM exception from the style declaration.
pub fn set_position(el: &Element, position: Point) -> Result<(), JsValue> {
    let Some(html) = el.dyn_ref::<HtmlElement>() else {
        return Ok(());
    };
    let style = html.style();
    style.set_property("left", &format!("{}px", format_px(position.x)))?;
    style.set_property("top", &format!("{}px", format_px(position.y)))
}

/// The editor id stored in an element's `data-id`.
pub fn element_id(el: &Element) -> Option<ElementId> {
    let raw = el.get_attribute("data-id")?;
    match Uuid::parse_str(&raw) {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::debug!(%raw, error = %e, "ignoring element with malformed data-id");
            None
        }
    }
}

/// The element an event was dispatched to, if it is one.
pub fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_ref::<Element>().cloned()
}

/// A registered event listener. Dropping it removes the listener.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// Register `handler` for `event` on `target`. Listeners are non-passive
    /// so touch handlers may cancel scrolling.
    ///
    /// # Errors
    ///
    /// A DOM exception from `addEventListener`.
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        Self::register(target, event, false, handler)
    }

    /// Like [`Listener::new`], but in the capture phase, which also sees
    /// events that don't bubble (`load` on a nested `<img>`).
    ///
    /// # Errors
    ///
    /// A DOM exception from `addEventListener`.
    pub fn capturing<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        Self::register(target, event, true, handler)
    }

    fn register<F>(target: &EventTarget, event: &'static str, capture: bool, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        options.set_capture(capture);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self { target: target.clone(), event, capture, closure })
    }

    /// Stop receiving events. The closure stays alive until the listener is dropped.
    pub fn detach(&self) {
        if let Err(e) = self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.closure.as_ref().unchecked_ref(),
            self.capture,
        ) {
            tracing::debug!(event = self.event, error = ?e, "listener removal failed");
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.detach();
    }
}

/// A group of listeners that is swapped as a unit.
///
/// Released listeners are detached at once but kept until the next swap, since
/// a listener commonly releases its own group while its closure is running.
#[derive(Default)]
pub struct ListenerSet {
    active: Vec<Listener>,
    retired: Vec<Listener>,
}

impl ListenerSet {
    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Release the current group and make `listeners` active.
    pub fn set(&mut self, listeners: Vec<Listener>) {
        self.release();
        self.active = listeners;
    }

    /// Detach the active group.
    pub fn release(&mut self) {
        for listener in &self.active {
            listener.detach();
        }
        self.retired = std::mem::take(&mut self.active);
    }
}
