//! The canvas editor controller.
//!
//! `EngineCore` owns every piece of editor state and implements the four
//! flows: placement, move, selection/property binding, and preview. Input
//! calls return a list of [`Action`]s for the host to apply to the DOM; the
//! core never touches the browser, so every flow is testable natively.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::config::EditorConfig;
use crate::consts::{APPLY_FAILED_MESSAGE, INVALID_IMAGE_MESSAGE};
use crate::doc::{ApplyOutcome, CanvasElement, DocStore, ElementBody, ElementId, ElementKind};
use crate::error::EditorError;
use crate::form::{FormValues, FormView, PropertyForm, TEXT_CONTENT};
use crate::geom::{Point, Size, clamp_into};
use crate::input::{Gesture, InputSource, OverlayTarget, PointerTarget, parse_drag_payload};
use crate::preview::{self, PreviewDocument};
use crate::render::RenderNode;
use crate::validate::{ImageValidator, LoadOutcome, ValidationRequest, ValidationTicket};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Append a new element node to the canvas.
    ElementCreated { id: ElementId, node: RenderNode },
    /// Replace an element node after a content change.
    ElementUpdated { id: ElementId, node: RenderNode },
    /// Set an element's `left`/`top`.
    ElementMoved { id: ElementId, position: Point },
    /// Remove an element node.
    ElementDeleted { id: ElementId },
    /// Move the `selected` marker.
    SelectionChanged { previous: Option<ElementId>, current: Option<ElementId> },
    /// Toggle the canvas drop-target border.
    SetDropHighlight { on: bool, border_color: String },
    /// Re-render the property panel.
    FormChanged(FormView),
    /// Set one field's value in the rendered panel, leaving the others as typed.
    FormFieldChanged { field: &'static str, value: String },
    /// Attach document-level move/up listeners for an element move.
    CaptureGesture,
    /// Detach the listeners attached by `CaptureGesture`.
    ReleaseGesture,
    /// Try to load a URL as an image and report back.
    ValidateImage(ValidationRequest),
    /// Abort an in-flight image load; its completion will be ignored anyway.
    CancelImageValidation(ValidationTicket),
    /// Show a message to the user.
    Notify(String),
    /// Open the preview overlay with this content.
    ShowPreview(PreviewDocument),
    /// Close the preview overlay.
    HidePreview,
}

/// Selection and drag state shared by all flows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    /// The selected element, if any. At most one element is ever selected.
    pub selected: Option<ElementId>,
    /// Pointer minus element top-left, recorded when a move begins.
    pub drag_offset: Option<Point>,
    /// True once a placement or move gesture has actually moved.
    pub is_dragging: bool,
}

/// Core engine state: all editor logic, independent of the browser.
pub struct EngineCore {
    pub doc: DocStore,
    pub state: EditorState,
    pub gesture: Gesture,
    pub form: FormView,
    pub canvas_size: Size,
    pub config: EditorConfig,
    validator: ImageValidator,
    highlight: bool,
    preview_open: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            doc: DocStore::new(),
            state: EditorState::default(),
            gesture: Gesture::Idle,
            form: FormView::Empty,
            canvas_size: config.canvas_size,
            config,
            validator: ImageValidator::new(),
            highlight: false,
            preview_open: false,
        }
    }

    // =============================================================
    // Placement
    // =============================================================

    /// A palette item started dragging.
    pub fn begin_placement(&mut self, kind: ElementKind, source: InputSource) -> Vec<Action> {
        let mut actions = self.end_active_gesture();
        tracing::debug!(kind = %kind, ?source, "placement started");
        self.gesture = Gesture::Placing { kind, source, last_point: None };
        self.state.is_dragging = false;
        actions.extend(self.set_highlight(false));
        // Touch events keep targeting the palette item, so follow them document-wide.
        if source == InputSource::Touch {
            actions.push(Action::CaptureGesture);
        }
        actions
    }

    /// A drag is hovering over the canvas.
    pub fn placement_over(&mut self) -> Vec<Action> {
        self.set_highlight(true).into_iter().collect()
    }

    /// A drag left the canvas. Touch drags in progress keep the highlight.
    pub fn placement_leave(&mut self) -> Vec<Action> {
        let touch_dragging = self.state.is_dragging
            && matches!(self.gesture, Gesture::Placing { source: InputSource::Touch, .. });
        if touch_dragging {
            return Vec::new();
        }
        self.set_highlight(false).into_iter().collect()
    }

    /// The placement ended without a drop.
    pub fn cancel_placement(&mut self) -> Vec<Action> {
        if self.gesture.is_placing() {
            tracing::debug!("placement cancelled");
        }
        let mut actions = self.end_placement();
        actions.extend(self.set_highlight(false));
        actions
    }

    /// Drop a palette payload at a canvas-local point.
    pub fn drop_payload(&mut self, mime: &str, payload: &str, point: Point) -> Vec<Action> {
        match parse_drag_payload(mime, payload) {
            Ok(kind) => self.complete_placement(kind, point),
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "drop ignored");
                self.cancel_placement()
            }
        }
    }

    /// Create an element of `kind` at `point`, clamped into the canvas, and select it.
    pub fn complete_placement(&mut self, kind: ElementKind, point: Point) -> Vec<Action> {
        let mut actions = self.end_placement();
        actions.extend(self.set_highlight(false));

        let mut element = CanvasElement::new(kind, point, &self.config);
        element.position = clamp_into(point, element.size, self.canvas_size);
        let id = element.id;
        tracing::info!(%id, kind = %kind, x = element.position.x, y = element.position.y, "element placed");

        actions.push(Action::ElementCreated { id, node: element.render_canvas(false) });
        self.doc.insert(element);
        actions.extend(self.select(id));
        actions
    }

    /// Leave the placing state, releasing document listeners held by a touch placement.
    fn end_placement(&mut self) -> Vec<Action> {
        let was_touch = matches!(self.gesture, Gesture::Placing { source: InputSource::Touch, .. });
        if self.gesture.is_placing() {
            self.gesture = Gesture::Idle;
        }
        self.state.is_dragging = false;
        if was_touch { vec![Action::ReleaseGesture] } else { Vec::new() }
    }

    // =============================================================
    // Pointer gestures (mouse and touch)
    // =============================================================

    /// Pointer pressed inside the canvas.
    pub fn pointer_down(&mut self, target: PointerTarget, point: Point) -> Vec<Action> {
        if self.gesture.is_placing() {
            return Vec::new();
        }
        match target {
            PointerTarget::Element { id, direct: true } => self.begin_move(id, point),
            PointerTarget::Element { direct: false, .. } | PointerTarget::Canvas => Vec::new(),
        }
    }

    /// Pointer moved (document-wide while a gesture is captured).
    pub fn pointer_move(&mut self, point: Point) -> Vec<Action> {
        match self.gesture {
            Gesture::Moving { id } => self.continue_move(id, point),
            Gesture::Placing { kind, source, .. } => {
                self.gesture = Gesture::Placing { kind, source, last_point: Some(point) };
                self.state.is_dragging = true;
                let over = self.canvas_size.contains(point);
                self.set_highlight(over).into_iter().collect()
            }
            Gesture::Idle => Vec::new(),
        }
    }

    /// Pointer released. `point` is the release location when the input reports one.
    pub fn pointer_up(&mut self, point: Option<Point>) -> Vec<Action> {
        match self.gesture {
            Gesture::Moving { .. } => self.end_move(),
            Gesture::Placing { kind, source: InputSource::Touch, last_point } => {
                let drop_at = point.or(last_point).filter(|p| self.canvas_size.contains(*p));
                match drop_at {
                    Some(p) if self.state.is_dragging => self.complete_placement(kind, p),
                    _ => self.cancel_placement(),
                }
            }
            Gesture::Placing { source: InputSource::Pointer, .. } => self.cancel_placement(),
            Gesture::Idle => Vec::new(),
        }
    }

    /// The pointer was lost (touch cancel, lost capture, window blur).
    pub fn pointer_cancel(&mut self) -> Vec<Action> {
        self.end_active_gesture()
    }

    fn begin_move(&mut self, id: ElementId, point: Point) -> Vec<Action> {
        let Some(element) = self.doc.get(&id) else {
            tracing::debug!(%id, "move ignored: unknown element");
            return Vec::new();
        };
        let offset = point - element.position;
        let mut actions = self.end_active_gesture();
        self.gesture = Gesture::Moving { id };
        self.state.drag_offset = Some(offset);
        self.state.is_dragging = false;
        actions.push(Action::CaptureGesture);
        actions
    }

    fn continue_move(&mut self, id: ElementId, point: Point) -> Vec<Action> {
        let Some(offset) = self.state.drag_offset else {
            return Vec::new();
        };
        let bounds = self.canvas_size;
        let Some(element) = self.doc.get_mut(&id) else {
            return self.end_move();
        };
        element.position = clamp_into(point - offset, element.size, bounds);
        self.state.is_dragging = true;
        vec![Action::ElementMoved { id, position: element.position }]
    }

    fn end_move(&mut self) -> Vec<Action> {
        if let Gesture::Moving { id } = self.gesture {
            tracing::debug!(%id, "move ended");
        }
        self.gesture = Gesture::Idle;
        self.state.drag_offset = None;
        self.state.is_dragging = false;
        vec![Action::ReleaseGesture]
    }

    fn end_active_gesture(&mut self) -> Vec<Action> {
        match self.gesture {
            Gesture::Moving { .. } => self.end_move(),
            Gesture::Placing { .. } => self.cancel_placement(),
            Gesture::Idle => Vec::new(),
        }
    }

    // =============================================================
    // Bounds
    // =============================================================

    /// The canvas was resized; keep the selected element inside it.
    pub fn resize_canvas(&mut self, size: Size) -> Vec<Action> {
        self.canvas_size = size;
        let selected = self.state.selected;
        selected.and_then(|id| self.reclamp(id)).into_iter().collect()
    }

    /// The host measured an element's rendered size.
    pub fn set_element_size(&mut self, id: ElementId, size: Size) -> Vec<Action> {
        let Some(element) = self.doc.get_mut(&id) else {
            return Vec::new();
        };
        element.size = size;
        element.measured = true;
        self.reclamp(id).into_iter().collect()
    }

    fn reclamp(&mut self, id: ElementId) -> Option<Action> {
        let bounds = self.canvas_size;
        let element = self.doc.get_mut(&id)?;
        let clamped = clamp_into(element.position, element.size, bounds);
        if clamped == element.position {
            return None;
        }
        element.position = clamped;
        Some(Action::ElementMoved { id, position: clamped })
    }

    // =============================================================
    // Selection & property form
    // =============================================================

    /// Select `id` and bind the property form to it. No-op mid-gesture.
    pub fn select(&mut self, id: ElementId) -> Vec<Action> {
        if !self.gesture.is_idle() {
            tracing::debug!(%id, "select ignored during gesture");
            return Vec::new();
        }
        let Some(form) = self.form_for(&id) else {
            return Vec::new();
        };
        let previous = self.state.selected.replace(id);
        self.form = FormView::Bound(form);
        let mut actions = Vec::new();
        if previous != Some(id) {
            actions.push(Action::SelectionChanged { previous, current: Some(id) });
        }
        actions.push(Action::FormChanged(self.form.clone()));
        actions
    }

    /// Apply submitted form values to the selected element.
    ///
    /// Malformed input is reported to the user and leaves the element unchanged.
    pub fn apply_properties(&mut self, values: &FormValues) -> Vec<Action> {
        match self.try_apply_properties(values) {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "apply rejected");
                vec![Action::Notify(APPLY_FAILED_MESSAGE.to_owned())]
            }
        }
    }

    /// Like [`EngineCore::apply_properties`], but returns validation errors.
    ///
    /// # Errors
    ///
    /// Any field error from the selected element's kind.
    pub fn try_apply_properties(&mut self, values: &FormValues) -> Result<Vec<Action>, EditorError> {
        let Some(id) = self.state.selected else {
            tracing::debug!("apply ignored: nothing selected");
            return Ok(Vec::new());
        };
        let Some(element) = self.doc.get_mut(&id) else {
            return Ok(Vec::new());
        };
        match element.body.behavior_mut().apply(values)? {
            ApplyOutcome::Committed => {
                reestimate(element, &self.config);
                tracing::info!(%id, kind = %element.kind(), "properties applied");
                Ok(self.content_changed(id))
            }
            ApplyOutcome::NeedsValidation(edit) => {
                let (request, superseded) = self.validator.issue(id, edit);
                tracing::debug!(%id, seq = request.ticket.seq, url = %request.url, "image validation requested");
                let mut actions: Vec<Action> = superseded.map(Action::CancelImageValidation).into_iter().collect();
                actions.push(Action::ValidateImage(request));
                Ok(actions)
            }
        }
    }

    /// The host finished loading (or failing to load) a validation request.
    pub fn complete_image_validation(&mut self, ticket: ValidationTicket, outcome: LoadOutcome) -> Vec<Action> {
        let Some(edit) = self.validator.resolve(ticket) else {
            tracing::debug!(element = %ticket.element, seq = ticket.seq, "stale image validation ignored");
            return Vec::new();
        };
        let Some(element) = self.doc.get_mut(&ticket.element) else {
            return Vec::new();
        };
        let ElementBody::Image(image) = &mut element.body else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        match outcome {
            LoadOutcome::Loaded => image.commit(edit),
            LoadOutcome::Failed => {
                tracing::warn!(element = %ticket.element, url = %edit.src, "image failed to load; using placeholder");
                image.fall_back(&self.config.placeholder_image_url);
                actions.push(Action::Notify(INVALID_IMAGE_MESSAGE.to_owned()));
            }
        }
        reestimate(element, &self.config);
        let mut changed = self.content_changed(ticket.element);
        changed.append(&mut actions);
        changed
    }

    /// Store text edited inline on a content-editable text element.
    pub fn commit_inline_text(&mut self, id: ElementId, text: &str) -> Vec<Action> {
        let Some(element) = self.doc.get_mut(&id) else {
            return Vec::new();
        };
        let ElementBody::Text(body) = &mut element.body else {
            return Vec::new();
        };
        text.clone_into(&mut body.text);
        if self.state.selected != Some(id) {
            return Vec::new();
        }
        let FormView::Bound(form) = &mut self.form else {
            return Vec::new();
        };
        if form.element != id {
            return Vec::new();
        }
        let Some(field) = form.fields.iter_mut().find(|f| f.id == TEXT_CONTENT) else {
            return Vec::new();
        };
        text.clone_into(&mut field.value);
        vec![Action::FormFieldChanged { field: TEXT_CONTENT, value: text.to_owned() }]
    }

    /// Remove the selected element and clear the form.
    pub fn delete_element(&mut self) -> Vec<Action> {
        let Some(id) = self.state.selected.take() else {
            tracing::debug!("delete ignored: nothing selected");
            return Vec::new();
        };
        let mut actions = Vec::new();
        if self.gesture == (Gesture::Moving { id }) {
            actions.extend(self.end_move());
        }
        if let Some(ticket) = self.validator.cancel(&id) {
            actions.push(Action::CancelImageValidation(ticket));
        }
        if self.doc.remove(&id).is_some() {
            tracing::info!(%id, "element deleted");
            actions.push(Action::ElementDeleted { id });
        }
        self.form = FormView::Empty;
        actions.push(Action::FormChanged(FormView::Empty));
        actions
    }

    fn form_for(&self, id: &ElementId) -> Option<PropertyForm> {
        let element = self.doc.get(id)?;
        Some(PropertyForm { element: *id, fields: element.body.behavior().form_fields() })
    }

    fn refresh_form_for(&mut self, id: ElementId) -> Option<Action> {
        if self.state.selected != Some(id) {
            return None;
        }
        self.form = FormView::Bound(self.form_for(&id)?);
        Some(Action::FormChanged(self.form.clone()))
    }

    /// Re-render and re-clamp after an element's content changed.
    fn content_changed(&mut self, id: ElementId) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(element) = self.doc.get(&id) {
            let node = element.render_canvas(self.state.selected == Some(id));
            actions.push(Action::ElementUpdated { id, node });
        }
        actions.extend(self.reclamp(id));
        actions.extend(self.refresh_form_for(id));
        actions
    }

    // =============================================================
    // Preview
    // =============================================================

    /// Open the preview overlay for the current canvas.
    pub fn show_preview(&mut self) -> Vec<Action> {
        let document = preview::build(&self.doc, &self.config);
        tracing::info!(elements = document.nodes.len(), "preview opened");
        self.preview_open = true;
        vec![Action::ShowPreview(document)]
    }

    /// Close the preview overlay.
    pub fn close_preview(&mut self) -> Vec<Action> {
        if !self.preview_open {
            return Vec::new();
        }
        self.preview_open = false;
        vec![Action::HidePreview]
    }

    /// A click landed on the preview overlay; only the backdrop dismisses it.
    pub fn overlay_click(&mut self, target: OverlayTarget) -> Vec<Action> {
        match target {
            OverlayTarget::Backdrop => self.close_preview(),
            OverlayTarget::Content => Vec::new(),
        }
    }

    // =============================================================
    // Internals
    // =============================================================

    fn set_highlight(&mut self, on: bool) -> Option<Action> {
        if self.highlight == on {
            return None;
        }
        self.highlight = on;
        Some(Action::SetDropHighlight { on, border_color: self.config.border_color(on).to_owned() })
    }

    // =============================================================
    // Queries
    // =============================================================

    /// The currently selected element, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.state.selected
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&CanvasElement> {
        self.doc.get(id)
    }

    /// Whether the canvas border is currently highlighted.
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.highlight
    }

    #[must_use]
    pub fn is_preview_open(&self) -> bool {
        self.preview_open
    }

    /// The live image validation ticket for `id`, if one is in flight.
    #[must_use]
    pub fn pending_validation(&self, id: &ElementId) -> Option<ValidationTicket> {
        self.validator.pending_for(id)
    }

    /// The canvas node for `id` as currently rendered.
    #[must_use]
    pub fn render_element(&self, id: &ElementId) -> Option<RenderNode> {
        self.doc
            .get(id)
            .map(|e| e.render_canvas(self.state.selected == Some(*id)))
    }
}

/// Replace an element's size with its estimate until the host has measured it.
fn reestimate(element: &mut CanvasElement, cfg: &EditorConfig) {
    if !element.measured {
        element.size = element.body.behavior().estimated_size(cfg);
    }
}
