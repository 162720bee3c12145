#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::form;
use crate::geom::Size;
use crate::render::ClickBehavior;

// =============================================================
// Helpers
// =============================================================

fn core_400x300() -> EngineCore {
    let config = EditorConfig { canvas_size: Size::new(400.0, 300.0), ..EditorConfig::default() };
    EngineCore::new(config)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn place(core: &mut EngineCore, kind: ElementKind, x: f64, y: f64) -> ElementId {
    let actions = core.complete_placement(kind, pt(x, y));
    created_id(&actions)
}

fn created_id(actions: &[Action]) -> ElementId {
    actions
        .iter()
        .find_map(|a| match a {
            Action::ElementCreated { id, .. } => Some(*id),
            _ => None,
        })
        .expect("expected ElementCreated")
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn position(core: &EngineCore, id: ElementId) -> Point {
    core.element(&id).unwrap().position
}

fn validation_request(actions: &[Action]) -> ValidationRequest {
    actions
        .iter()
        .find_map(|a| match a {
            Action::ValidateImage(req) => Some(req.clone()),
            _ => None,
        })
        .expect("expected ValidateImage")
}

fn image_values(src: &str, width: &str, alt: &str) -> FormValues {
    FormValues::new()
        .with(form::IMAGE_SRC, src)
        .with(form::IMAGE_WIDTH, width)
        .with(form::IMAGE_ALT, alt)
}

fn button_values(link: &str) -> FormValues {
    FormValues::new()
        .with(form::BUTTON_TEXT, "Visit")
        .with(form::BUTTON_COLOR, "#222222")
        .with(form::BUTTON_TEXT_COLOR, "#ffffff")
        .with(form::BUTTON_LINK, link)
}

fn image_body(core: &EngineCore, id: ElementId) -> crate::doc::ImageElement {
    match &core.element(&id).unwrap().body {
        ElementBody::Image(i) => i.clone(),
        other => panic!("expected image, got {other:?}"),
    }
}

fn move_by_pointer(core: &mut EngineCore, id: ElementId, grab: Point, path: &[Point]) -> Vec<Point> {
    core.pointer_down(PointerTarget::Element { id, direct: true }, grab);
    let mut out = Vec::new();
    for p in path {
        core.pointer_move(*p);
        out.push(position(core, id));
    }
    core.pointer_up(path.last().copied());
    out
}

// =============================================================
// Construction
// =============================================================

#[test]
fn core_new_is_empty_and_unselected() {
    let core = EngineCore::default();
    assert!(core.doc.is_empty());
    assert!(core.selection().is_none());
    assert!(core.form.is_empty());
    assert!(core.gesture.is_idle());
    assert!(!core.is_highlighted());
    assert!(!core.is_preview_open());
    assert_eq!(core.canvas_size, Size::new(800.0, 600.0));
}

// =============================================================
// Placement
// =============================================================

#[test]
fn drop_near_corner_is_clamped_inside_canvas() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 390.0, 290.0);
    assert_eq!(position(&core, id), pt(280.0, 270.0));
}

#[test]
fn drop_anywhere_keeps_bounding_box_inside() {
    let mut core = core_400x300();
    let drops = [(-50.0, -50.0), (0.0, 0.0), (400.0, 300.0), (1000.0, -3.0), (200.0, 150.0), (399.9, 0.1)];
    for kind in ElementKind::ALL {
        for (x, y) in drops {
            let id = place(&mut core, kind, x, y);
            let e = core.element(&id).unwrap();
            assert!(e.position.x >= 0.0 && e.position.x + e.size.width <= 400.0, "{kind} at {x},{y}");
            assert!(e.position.y >= 0.0 && e.position.y + e.size.height <= 300.0, "{kind} at {x},{y}");
        }
    }
}

#[test]
fn placement_selects_new_element_and_binds_form() {
    let mut core = core_400x300();
    let actions = core.complete_placement(ElementKind::Button, pt(10.0, 10.0));
    let id = created_id(&actions);
    assert_eq!(core.selection(), Some(id));
    assert!(has_action(&actions, |a| matches!(a, Action::SelectionChanged { current: Some(c), .. } if *c == id)));
    assert!(has_action(&actions, |a| matches!(a, Action::FormChanged(FormView::Bound(f)) if f.element == id)));
    assert_eq!(core.form.bound().unwrap().field(form::BUTTON_TEXT).unwrap().value, "Click Me");
}

#[test]
fn created_node_is_unselected_then_marked_by_selection_change() {
    let mut core = core_400x300();
    let actions = core.complete_placement(ElementKind::Text, pt(10.0, 10.0));
    let Some(Action::ElementCreated { node, .. }) = actions.first() else {
        panic!("first action should create the element: {actions:?}");
    };
    assert!(node.has_class("canvas-element"));
    assert!(!node.has_class("selected"));
}

#[test]
fn hover_highlights_and_drop_clears() {
    let mut core = core_400x300();
    core.begin_placement(ElementKind::Text, InputSource::Pointer);
    let over = core.placement_over();
    assert!(matches!(over.as_slice(), [Action::SetDropHighlight { on: true, border_color }] if border_color == "#3498db"));
    assert!(core.placement_over().is_empty());
    let drop = core.complete_placement(ElementKind::Text, pt(5.0, 5.0));
    assert!(has_action(&drop, |a| matches!(a, Action::SetDropHighlight { on: false, .. })));
    assert!(!core.is_highlighted());
    assert!(core.gesture.is_idle());
}

#[test]
fn leave_clears_pointer_highlight() {
    let mut core = core_400x300();
    core.begin_placement(ElementKind::Image, InputSource::Pointer);
    core.placement_over();
    let leave = core.placement_leave();
    assert!(matches!(leave.as_slice(), [Action::SetDropHighlight { on: false, border_color }] if border_color == "#bdc3c7"));
}

#[test]
fn cancelled_drag_does_not_leave_highlight() {
    let mut core = core_400x300();
    core.begin_placement(ElementKind::Image, InputSource::Pointer);
    core.placement_over();
    core.cancel_placement();
    assert!(!core.is_highlighted());
    assert!(core.gesture.is_idle());
    assert!(core.doc.is_empty());
}

#[test]
fn drop_payload_parses_kind() {
    let mut core = core_400x300();
    let actions = core.drop_payload("text/plain", "image", pt(0.0, 0.0));
    let id = created_id(&actions);
    assert_eq!(core.element(&id).unwrap().kind(), ElementKind::Image);
}

#[test]
fn drop_payload_unknown_kind_creates_nothing() {
    let mut core = core_400x300();
    core.begin_placement(ElementKind::Text, InputSource::Pointer);
    core.placement_over();
    core.drop_payload("text/plain", "video", pt(0.0, 0.0));
    assert!(core.doc.is_empty());
    assert!(!core.is_highlighted());
}

// =============================================================
// Touch placement
// =============================================================

#[test]
fn touch_placement_drops_at_last_touch_point() {
    let mut core = core_400x300();
    let begin = core.begin_placement(ElementKind::Button, InputSource::Touch);
    assert!(has_action(&begin, |a| matches!(a, Action::CaptureGesture)));
    core.pointer_move(pt(-20.0, 40.0));
    let over = core.pointer_move(pt(50.0, 60.0));
    assert!(has_action(&over, |a| matches!(a, Action::SetDropHighlight { on: true, .. })));
    assert!(core.state.is_dragging);

    let up = core.pointer_up(None);
    let id = created_id(&up);
    assert_eq!(position(&core, id), pt(50.0, 60.0));
    assert!(has_action(&up, |a| matches!(a, Action::ReleaseGesture)));
    assert!(!core.is_highlighted());
    assert!(!core.state.is_dragging);
    assert_eq!(core.selection(), Some(id));
}

#[test]
fn touch_placement_prefers_release_point() {
    let mut core = core_400x300();
    core.begin_placement(ElementKind::Text, InputSource::Touch);
    core.pointer_move(pt(50.0, 60.0));
    let id = created_id(&core.pointer_up(Some(pt(70.0, 80.0))));
    assert_eq!(position(&core, id), pt(70.0, 80.0));
}

#[test]
fn touch_tap_without_move_does_not_place() {
    let mut core = core_400x300();
    core.begin_placement(ElementKind::Text, InputSource::Touch);
    let up = core.pointer_up(Some(pt(10.0, 10.0)));
    assert!(core.doc.is_empty());
    assert!(has_action(&up, |a| matches!(a, Action::ReleaseGesture)));
    assert!(core.gesture.is_idle());
}

#[test]
fn touch_release_outside_canvas_cancels() {
    let mut core = core_400x300();
    core.begin_placement(ElementKind::Text, InputSource::Touch);
    core.pointer_move(pt(100.0, 100.0));
    core.pointer_up(Some(pt(500.0, 100.0)));
    assert!(core.doc.is_empty());
    assert!(!core.is_highlighted());
}

#[test]
fn touch_leave_keeps_highlight_while_dragging() {
    let mut core = core_400x300();
    core.begin_placement(ElementKind::Text, InputSource::Touch);
    core.pointer_move(pt(100.0, 100.0));
    assert!(core.placement_leave().is_empty());
    assert!(core.is_highlighted());
}

#[test]
fn touch_cancel_releases_and_clears() {
    let mut core = core_400x300();
    core.begin_placement(ElementKind::Text, InputSource::Touch);
    core.pointer_move(pt(100.0, 100.0));
    let cancel = core.pointer_cancel();
    assert!(has_action(&cancel, |a| matches!(a, Action::ReleaseGesture)));
    assert!(!core.is_highlighted());
    assert!(core.doc.is_empty());
}

// =============================================================
// Move
// =============================================================

#[test]
fn move_tracks_pointer_minus_grab_offset() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 100.0, 100.0);
    let down = core.pointer_down(PointerTarget::Element { id, direct: true }, pt(110.0, 105.0));
    assert_eq!(down, vec![Action::CaptureGesture]);
    assert_eq!(core.state.drag_offset, Some(pt(10.0, 5.0)));

    let moved = core.pointer_move(pt(160.0, 205.0));
    assert_eq!(moved, vec![Action::ElementMoved { id, position: pt(150.0, 200.0) }]);
}

#[test]
fn move_is_clamped_with_current_size() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 0.0, 0.0);
    core.set_element_size(id, Size::new(200.0, 50.0));
    let path = move_by_pointer(&mut core, id, pt(0.0, 0.0), &[pt(390.0, 290.0), pt(-40.0, -40.0)]);
    assert_eq!(path, vec![pt(200.0, 250.0), pt(0.0, 0.0)]);
}

#[test]
fn rapid_moves_do_not_drift() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Button, 50.0, 50.0);
    let grab = pt(60.0, 55.0);
    let offset = pt(10.0, 5.0);
    let size = core.element(&id).unwrap().size;
    let mut path = Vec::new();
    for i in 0..500_i32 {
        let f = f64::from(i);
        path.push(pt((f * 7.3) % 450.0 - 20.0, (f * 3.1) % 330.0 - 10.0));
    }
    path.push(grab);
    let positions = move_by_pointer(&mut core, id, grab, &path);
    for (pointer, got) in path.iter().zip(positions) {
        let expected = clamp_into(*pointer - offset, size, Size::new(400.0, 300.0));
        assert_eq!(got, expected);
    }
    // Back at the grab point, the element is exactly where it started.
    assert_eq!(position(&core, id), pt(50.0, 50.0));
}

#[test]
fn nested_target_does_not_start_move() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Image, 0.0, 0.0);
    let down = core.pointer_down(PointerTarget::Element { id, direct: false }, pt(5.0, 5.0));
    assert!(down.is_empty());
    assert!(core.gesture.is_idle());
    assert!(core.pointer_move(pt(100.0, 100.0)).is_empty());
    assert_eq!(position(&core, id), pt(0.0, 0.0));
}

#[test]
fn canvas_background_press_is_ignored() {
    let mut core = core_400x300();
    assert!(core.pointer_down(PointerTarget::Canvas, pt(5.0, 5.0)).is_empty());
    assert!(core.gesture.is_idle());
}

#[test]
fn unknown_element_press_is_ignored() {
    let mut core = core_400x300();
    let down = core.pointer_down(PointerTarget::Element { id: Uuid::new_v4(), direct: true }, pt(0.0, 0.0));
    assert!(down.is_empty());
}

#[test]
fn every_gesture_end_path_releases() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 0.0, 0.0);

    core.pointer_down(PointerTarget::Element { id, direct: true }, pt(1.0, 1.0));
    assert_eq!(core.pointer_up(None), vec![Action::ReleaseGesture]);

    core.pointer_down(PointerTarget::Element { id, direct: true }, pt(1.0, 1.0));
    assert_eq!(core.pointer_cancel(), vec![Action::ReleaseGesture]);

    core.pointer_down(PointerTarget::Element { id, direct: true }, pt(1.0, 1.0));
    let deleted = core.delete_element();
    assert!(has_action(&deleted, |a| matches!(a, Action::ReleaseGesture)));

    assert!(core.gesture.is_idle());
    assert!(core.state.drag_offset.is_none());
    assert!(core.pointer_up(None).is_empty());
}

#[test]
fn pressing_again_mid_move_releases_previous_gesture() {
    let mut core = core_400x300();
    let a = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let b = place(&mut core, ElementKind::Text, 200.0, 200.0);
    core.pointer_down(PointerTarget::Element { id: a, direct: true }, pt(1.0, 1.0));
    let down = core.pointer_down(PointerTarget::Element { id: b, direct: true }, pt(201.0, 201.0));
    assert_eq!(down, vec![Action::ReleaseGesture, Action::CaptureGesture]);
    assert_eq!(core.gesture, Gesture::Moving { id: b });
}

#[test]
fn moves_do_not_change_selection() {
    let mut core = core_400x300();
    let a = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let b = place(&mut core, ElementKind::Text, 200.0, 200.0);
    assert_eq!(core.selection(), Some(b));
    move_by_pointer(&mut core, a, pt(1.0, 1.0), &[pt(50.0, 50.0)]);
    assert_eq!(core.selection(), Some(b));
}

// =============================================================
// Resize / measured size
// =============================================================

#[test]
fn canvas_resize_reclamps_selected_element() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 390.0, 290.0);
    let actions = core.resize_canvas(Size::new(300.0, 200.0));
    assert_eq!(actions, vec![Action::ElementMoved { id, position: pt(180.0, 170.0) }]);
}

#[test]
fn canvas_resize_leaves_fitting_element_alone() {
    let mut core = core_400x300();
    place(&mut core, ElementKind::Text, 10.0, 10.0);
    assert!(core.resize_canvas(Size::new(300.0, 200.0)).is_empty());
    assert_eq!(core.canvas_size, Size::new(300.0, 200.0));
}

#[test]
fn canvas_resize_without_selection_only_stores_size() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 390.0, 290.0);
    core.delete_element();
    assert!(core.element(&id).is_none());
    assert!(core.resize_canvas(Size::new(100.0, 100.0)).is_empty());
}

#[test]
fn measured_size_reclamps() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 390.0, 290.0);
    let actions = core.set_element_size(id, Size::new(160.0, 40.0));
    assert_eq!(actions, vec![Action::ElementMoved { id, position: pt(240.0, 260.0) }]);
    assert_eq!(core.element(&id).unwrap().size, Size::new(160.0, 40.0));
}

#[test]
fn remeasured_size_replaces_earlier_measurement() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 0.0, 0.0);
    core.set_element_size(id, Size::new(120.0, 30.0));
    core.set_element_size(id, Size::new(250.0, 90.0));
    let path = move_by_pointer(&mut core, id, pt(0.0, 0.0), &[pt(390.0, 290.0)]);
    assert_eq!(path, vec![pt(150.0, 210.0)]);
}

#[test]
fn unchanged_apply_keeps_measured_size() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Button, 0.0, 100.0);
    core.set_element_size(id, Size::new(60.0, 30.0));
    move_by_pointer(&mut core, id, pt(0.0, 100.0), &[pt(340.0, 100.0)]);
    assert_eq!(position(&core, id), pt(340.0, 100.0));

    let values = core.form.bound().unwrap().initial_values();
    let actions = core.apply_properties(&values);
    assert!(!has_action(&actions, |a| matches!(a, Action::ElementMoved { .. })));
    assert_eq!(position(&core, id), pt(340.0, 100.0));
    assert_eq!(core.element(&id).unwrap().size, Size::new(60.0, 30.0));
}

#[test]
fn unmeasured_apply_uses_new_estimate() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 0.0, 290.0);
    assert_eq!(position(&core, id), pt(0.0, 270.0));
    let values = FormValues::new()
        .with(form::TEXT_CONTENT, "Hello")
        .with(form::TEXT_COLOR, "#000000")
        .with(form::TEXT_SIZE, "32");
    core.apply_properties(&values);
    assert_eq!(core.element(&id).unwrap().size, Size::new(120.0, 60.0));
    assert_eq!(position(&core, id), pt(0.0, 240.0));
}

#[test]
fn measured_size_for_unknown_element_is_ignored() {
    let mut core = core_400x300();
    assert!(core.set_element_size(Uuid::new_v4(), Size::new(1.0, 1.0)).is_empty());
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selecting_b_deselects_a_exactly_once() {
    let mut core = core_400x300();
    let a = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let b = place(&mut core, ElementKind::Button, 100.0, 100.0);
    core.select(a);
    let actions = core.select(b);
    let deselects = actions
        .iter()
        .filter(|act| matches!(act, Action::SelectionChanged { previous: Some(p), .. } if *p == a))
        .count();
    assert_eq!(deselects, 1);
    assert_eq!(core.selection(), Some(b));
    assert!(core.render_element(&b).unwrap().has_class("selected"));
    assert!(!core.render_element(&a).unwrap().has_class("selected"));
}

#[test]
fn at_most_one_element_renders_selected() {
    let mut core = core_400x300();
    let ids: Vec<_> = (0..5_i32).map(|i| place(&mut core, ElementKind::Text, f64::from(i) * 10.0, 0.0)).collect();
    for id in ids.iter().rev() {
        core.select(*id);
        let selected = ids
            .iter()
            .filter(|other| core.render_element(other).unwrap().has_class("selected"))
            .count();
        assert_eq!(selected, 1);
    }
}

#[test]
fn reselecting_same_element_only_refreshes_form() {
    let mut core = core_400x300();
    let a = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let actions = core.select(a);
    assert!(matches!(actions.as_slice(), [Action::FormChanged(FormView::Bound(_))]));
}

#[test]
fn select_is_noop_during_gesture() {
    let mut core = core_400x300();
    let a = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let b = place(&mut core, ElementKind::Text, 200.0, 200.0);
    core.pointer_down(PointerTarget::Element { id: a, direct: true }, pt(1.0, 1.0));
    assert!(core.select(a).is_empty());
    assert_eq!(core.selection(), Some(b));
    core.pointer_up(None);

    core.begin_placement(ElementKind::Image, InputSource::Touch);
    core.pointer_move(pt(10.0, 10.0));
    assert!(core.select(a).is_empty());
    assert_eq!(core.selection(), Some(b));
}

#[test]
fn select_unknown_element_is_noop() {
    let mut core = core_400x300();
    assert!(core.select(Uuid::new_v4()).is_empty());
    assert!(core.selection().is_none());
}

#[test]
fn form_fields_are_kind_specific() {
    let mut core = core_400x300();
    place(&mut core, ElementKind::Image, 0.0, 0.0);
    let ids: Vec<_> = core.form.bound().unwrap().fields.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec!["image-src", "image-width", "image-alt"]);
}

// =============================================================
// Apply: text & button
// =============================================================

#[test]
fn apply_text_updates_element_and_rerenders() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let values = FormValues::new()
        .with(form::TEXT_CONTENT, "Welcome")
        .with(form::TEXT_COLOR, "#336699")
        .with(form::TEXT_SIZE, "32");
    let actions = core.apply_properties(&values);
    let Some(Action::ElementUpdated { node, .. }) = actions.first() else {
        panic!("expected ElementUpdated: {actions:?}");
    };
    assert_eq!(node.text.as_deref(), Some("Welcome"));
    assert_eq!(node.style_value("font-size"), Some("32px"));
    assert!(node.has_class("selected"));
    assert_eq!(core.element(&id).unwrap().size, Size::new(120.0, 60.0));
}

#[test]
fn apply_malformed_number_notifies_and_leaves_element() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let before = core.element(&id).unwrap().clone();
    let values = FormValues::new()
        .with(form::TEXT_CONTENT, "Changed")
        .with(form::TEXT_COLOR, "#336699")
        .with(form::TEXT_SIZE, "sixteen");
    let actions = core.apply_properties(&values);
    assert_eq!(actions, vec![Action::Notify("Error applying properties. Please check your inputs.".to_owned())]);
    assert_eq!(core.element(&id).unwrap(), &before);
}

#[test]
fn try_apply_reports_error_code() {
    let mut core = core_400x300();
    place(&mut core, ElementKind::Button, 0.0, 0.0);
    let err = core.try_apply_properties(&FormValues::new()).unwrap_err();
    assert_eq!(err.error_code(), "E_MISSING_FIELD");
}

#[test]
fn apply_without_selection_is_silent_noop() {
    let mut core = core_400x300();
    assert!(core.apply_properties(&FormValues::new()).is_empty());
}

#[test]
fn apply_button_link_then_preview_opens_link() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Button, 20.0, 20.0);
    core.apply_properties(&button_values("https://example.com"));
    let canvas_before = core.render_element(&id).unwrap();

    let actions = core.show_preview();
    let [Action::ShowPreview(doc)] = actions.as_slice() else {
        panic!("expected ShowPreview: {actions:?}");
    };
    assert_eq!(
        doc.nodes[0].on_click,
        Some(ClickBehavior::OpenLink { url: "https://example.com".to_owned(), target: "_blank".to_owned() })
    );
    let canvas_after = core.render_element(&id).unwrap();
    assert_eq!(canvas_before, canvas_after);
    assert!(canvas_after.on_click.is_none());
    assert_eq!(canvas_after.style_value("position"), Some("absolute"));
}

// =============================================================
// Apply: image validation
// =============================================================

#[test]
fn image_apply_commits_after_successful_load() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Image, 0.0, 0.0);
    let actions = core.apply_properties(&image_values("https://example.com/cat.png", "120", "Cat"));
    let req = validation_request(&actions);
    assert_eq!(req.url, "https://example.com/cat.png");
    assert_eq!(image_body(&core, id).src, "https://via.placeholder.com/150");

    let done = core.complete_image_validation(req.ticket, LoadOutcome::Loaded);
    let img = image_body(&core, id);
    assert_eq!(img.src, "https://example.com/cat.png");
    assert_eq!(img.width_px, Some(120.0));
    assert_eq!(img.alt, "Cat");
    assert!(has_action(&done, |a| matches!(a, Action::ElementUpdated { id: u, .. } if *u == id)));
    assert!(!has_action(&done, |a| matches!(a, Action::Notify(_))));
    assert!(core.pending_validation(&id).is_none());
}

#[test]
fn image_completion_keeps_measured_size() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Image, 0.0, 0.0);
    core.set_element_size(id, Size::new(150.0, 90.0));
    let actions = core.apply_properties(&image_values("https://example.com/cat.png", "150", "Cat"));
    core.complete_image_validation(validation_request(&actions).ticket, LoadOutcome::Loaded);
    assert_eq!(core.element(&id).unwrap().size, Size::new(150.0, 90.0));
}

#[test]
fn image_apply_failure_uses_placeholder_and_keeps_width_alt() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Image, 0.0, 0.0);
    let ok = core.apply_properties(&image_values("https://example.com/a.png", "90", "Logo"));
    core.complete_image_validation(validation_request(&ok).ticket, LoadOutcome::Loaded);

    let bad = core.apply_properties(&image_values("https://nope.invalid/x.png", "300", "Changed"));
    let done = core.complete_image_validation(validation_request(&bad).ticket, LoadOutcome::Failed);
    let img = image_body(&core, id);
    assert_eq!(img.src, "https://via.placeholder.com/150");
    assert_eq!(img.width_px, Some(90.0));
    assert_eq!(img.alt, "Logo");
    assert!(has_action(&done, |a| matches!(a, Action::Notify(m) if m == "Invalid image URL. Using placeholder instead.")));
}

#[test]
fn image_apply_with_bad_width_issues_no_request() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Image, 0.0, 0.0);
    let actions = core.apply_properties(&image_values("https://example.com/a.png", "wide", "A"));
    assert!(!has_action(&actions, |a| matches!(a, Action::ValidateImage(_))));
    assert!(has_action(&actions, |a| matches!(a, Action::Notify(_))));
    assert!(core.pending_validation(&id).is_none());
}

#[test]
fn stale_validation_cannot_overwrite_newer_edit() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Image, 0.0, 0.0);
    let first = validation_request(&core.apply_properties(&image_values("https://a.example/1.png", "100", "one")));
    let second_actions = core.apply_properties(&image_values("https://a.example/2.png", "200", "two"));
    assert!(has_action(&second_actions, |a| matches!(a, Action::CancelImageValidation(t) if *t == first.ticket)));
    let second = validation_request(&second_actions);

    // The newer request resolves first, then the stale one completes.
    core.complete_image_validation(second.ticket, LoadOutcome::Loaded);
    assert!(core.complete_image_validation(first.ticket, LoadOutcome::Loaded).is_empty());
    assert!(core.complete_image_validation(first.ticket, LoadOutcome::Failed).is_empty());

    let img = image_body(&core, id);
    assert_eq!(img.src, "https://a.example/2.png");
    assert_eq!(img.width_px, Some(200.0));
    assert_eq!(img.alt, "two");
}

#[test]
fn validation_completion_after_delete_is_ignored() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Image, 0.0, 0.0);
    let req = validation_request(&core.apply_properties(&image_values("https://a.example/1.png", "100", "x")));
    let deleted = core.delete_element();
    assert!(has_action(&deleted, |a| matches!(a, Action::CancelImageValidation(t) if *t == req.ticket)));
    assert!(core.complete_image_validation(req.ticket, LoadOutcome::Loaded).is_empty());
    assert!(core.element(&id).is_none());
}

#[test]
fn validation_for_unselected_element_still_commits() {
    let mut core = core_400x300();
    let img = place(&mut core, ElementKind::Image, 0.0, 0.0);
    let req = validation_request(&core.apply_properties(&image_values("https://a.example/1.png", "100", "x")));
    place(&mut core, ElementKind::Text, 200.0, 200.0);
    let done = core.complete_image_validation(req.ticket, LoadOutcome::Loaded);
    assert_eq!(image_body(&core, img).src, "https://a.example/1.png");
    assert!(!has_action(&done, |a| matches!(a, Action::FormChanged(_))));
}

// =============================================================
// Inline text
// =============================================================

#[test]
fn inline_text_updates_content_and_form() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let actions = core.commit_inline_text(id, "Typed inline");
    assert_eq!(
        actions,
        vec![Action::FormFieldChanged { field: form::TEXT_CONTENT, value: "Typed inline".to_owned() }]
    );
    assert_eq!(core.form.bound().unwrap().field(form::TEXT_CONTENT).unwrap().value, "Typed inline");
    match &core.element(&id).unwrap().body {
        ElementBody::Text(t) => assert_eq!(t.text, "Typed inline"),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn inline_text_never_rebuilds_the_panel() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 0.0, 0.0);
    for text in ["T", "Ty", "Typ"] {
        let actions = core.commit_inline_text(id, text);
        assert!(!has_action(&actions, |a| matches!(a, Action::FormChanged(_))));
    }
}

#[test]
fn inline_text_on_unselected_element_leaves_form_alone() {
    let mut core = core_400x300();
    let a = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let b = place(&mut core, ElementKind::Text, 0.0, 100.0);
    let before = core.form.clone();
    assert!(core.commit_inline_text(a, "Edited").is_empty());
    assert_eq!(core.form, before);
    assert_eq!(core.form.bound().unwrap().element, b);
    match &core.element(&a).unwrap().body {
        ElementBody::Text(t) => assert_eq!(t.text, "Edited"),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn inline_text_ignores_non_text_elements() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Button, 0.0, 0.0);
    assert!(core.commit_inline_text(id, "x").is_empty());
}

// =============================================================
// Delete
// =============================================================

#[test]
fn delete_clears_selection_and_form() {
    let mut core = core_400x300();
    let id = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let actions = core.delete_element();
    assert_eq!(actions, vec![Action::ElementDeleted { id }, Action::FormChanged(FormView::Empty)]);
    assert!(core.selection().is_none());
    assert!(core.form.is_empty());
    assert!(core.doc.is_empty());
    assert_eq!(core.form.render()[0].text.as_deref(), Some("Select an element to edit"));
}

#[test]
fn delete_without_selection_is_silent_noop() {
    let mut core = core_400x300();
    assert!(core.delete_element().is_empty());
}

#[test]
fn delete_removes_only_selected() {
    let mut core = core_400x300();
    let a = place(&mut core, ElementKind::Text, 0.0, 0.0);
    let b = place(&mut core, ElementKind::Text, 100.0, 0.0);
    core.delete_element();
    assert!(core.element(&a).is_some());
    assert!(core.element(&b).is_none());
}

// =============================================================
// Preview
// =============================================================

#[test]
fn preview_is_idempotent_and_non_destructive() {
    let mut core = core_400x300();
    let ids = [
        place(&mut core, ElementKind::Text, 10.0, 10.0),
        place(&mut core, ElementKind::Image, 100.0, 50.0),
        place(&mut core, ElementKind::Button, 200.0, 200.0),
    ];
    let before: Vec<_> = ids.iter().map(|id| core.element(id).unwrap().clone()).collect();

    let first = core.show_preview();
    let second = core.show_preview();
    assert_eq!(first, second);

    let after: Vec<_> = ids.iter().map(|id| core.element(id).unwrap().clone()).collect();
    assert_eq!(before, after);
    assert_eq!(core.doc.len(), 3);
    assert_eq!(core.selection(), Some(ids[2]));
}

#[test]
fn overlay_closes_on_backdrop_or_close_only() {
    let mut core = core_400x300();
    core.show_preview();
    assert!(core.overlay_click(OverlayTarget::Content).is_empty());
    assert!(core.is_preview_open());
    assert_eq!(core.overlay_click(OverlayTarget::Backdrop), vec![Action::HidePreview]);
    assert!(!core.is_preview_open());

    core.show_preview();
    assert_eq!(core.close_preview(), vec![Action::HidePreview]);
    assert!(core.close_preview().is_empty());
}
