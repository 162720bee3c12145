#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn text_form() -> PropertyForm {
    PropertyForm {
        element: Uuid::new_v4(),
        fields: vec![
            FormField::new(TEXT_CONTENT, "Text", FieldInput::Textarea, "Hello"),
            FormField::new(TEXT_COLOR, "Color", FieldInput::Color, "#000000"),
            FormField::new(TEXT_SIZE, "Font Size (px)", FieldInput::Number, "16"),
        ],
    }
}

// =============================================================
// FormValues parsing
// =============================================================

#[test]
fn text_missing_field_is_an_error() {
    let values = FormValues::new();
    let err = values.text(TEXT_CONTENT).unwrap_err();
    assert!(matches!(err, EditorError::MissingField("text-content")));
}

#[test]
fn text_is_verbatim() {
    let values = FormValues::new().with(TEXT_CONTENT, "  spaced  ");
    assert_eq!(values.text(TEXT_CONTENT).unwrap(), "  spaced  ");
}

#[test]
fn positive_number_accepts_trimmed_values() {
    let values = FormValues::new().with(TEXT_SIZE, " 20.5 ");
    assert_eq!(values.positive_number(TEXT_SIZE).unwrap(), 20.5);
}

#[test]
fn positive_number_rejects_non_positive_and_garbage() {
    for raw in ["0", "-3", "abc", "", "NaN", "inf"] {
        let values = FormValues::new().with(IMAGE_WIDTH, raw);
        let err = values.positive_number(IMAGE_WIDTH).unwrap_err();
        assert_eq!(err.error_code(), "E_INVALID_NUMBER", "{raw:?}");
    }
}

#[test]
fn color_is_canonicalized() {
    let values = FormValues::new().with(BUTTON_COLOR, "#ABC");
    assert_eq!(values.color(BUTTON_COLOR).unwrap(), "#aabbcc");
}

#[test]
fn color_rejects_names() {
    let values = FormValues::new().with(BUTTON_COLOR, "red");
    assert!(matches!(values.color(BUTTON_COLOR), Err(EditorError::InvalidColor { field: "button-color", .. })));
}

#[test]
fn optional_blank_is_none() {
    let values = FormValues::new().with(BUTTON_LINK, "   ");
    assert_eq!(values.optional(BUTTON_LINK), None);
    assert_eq!(values.optional("not-submitted"), None);
    let values = values.with(BUTTON_LINK, " https://example.com ");
    assert_eq!(values.optional(BUTTON_LINK).as_deref(), Some("https://example.com"));
}

// =============================================================
// PropertyForm
// =============================================================

#[test]
fn initial_values_mirror_fields() {
    let form = text_form();
    let values = form.initial_values();
    assert_eq!(values.get(TEXT_CONTENT), Some("Hello"));
    assert_eq!(values.get(TEXT_SIZE), Some("16"));
    assert_eq!(form.field(TEXT_COLOR).unwrap().input, FieldInput::Color);
    assert!(form.field(IMAGE_SRC).is_none());
}

// =============================================================
// FormView rendering
// =============================================================

#[test]
fn empty_view_renders_prompt() {
    let nodes = FormView::Empty.render();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].tag, "p");
    assert_eq!(nodes[0].text.as_deref(), Some("Select an element to edit"));
    assert!(FormView::Empty.bound().is_none());
}

#[test]
fn bound_view_renders_groups_and_actions() {
    let view = FormView::Bound(text_form());
    let nodes = view.render();
    assert_eq!(nodes.len(), 4);
    assert!(nodes[..3].iter().all(|n| n.has_class("form-group")));

    let textarea = &nodes[0].children[1];
    assert_eq!(textarea.tag, "textarea");
    assert_eq!(textarea.attr_value("id"), Some("text-content"));
    assert_eq!(textarea.text.as_deref(), Some("Hello"));

    let number = &nodes[2].children[1];
    assert_eq!(number.attr_value("type"), Some("number"));
    assert_eq!(number.attr_value("value"), Some("16"));
    assert_eq!(nodes[2].children[0].attr_value("for"), Some("text-size"));

    let actions = &nodes[3];
    assert!(actions.has_class("form-actions"));
    let ids: Vec<_> = actions.children.iter().filter_map(|b| b.attr_value("id")).collect();
    assert_eq!(ids, vec!["apply-properties", "delete-element"]);
}

#[test]
fn bound_view_escapes_values_in_html() {
    let mut form = text_form();
    form.fields[0].value = "<b>hi</b>".to_owned();
    let html: String = FormView::Bound(form).render().iter().map(RenderNode::to_html).collect();
    assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
    assert!(!html.contains("<b>"));
}

// =============================================================
// format_px
// =============================================================

#[test]
fn format_px_drops_integral_fraction() {
    assert_eq!(format_px(16.0), "16");
    assert_eq!(format_px(20.5), "20.5");
    assert_eq!(format_px(0.0), "0");
}
