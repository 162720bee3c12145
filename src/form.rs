//! Property form model: the kind-specific editing panel for the selected element.
//!
//! The controller builds a [`PropertyForm`] from the selected element's
//! content; the host renders it and, when Apply is pressed, reads the field
//! values back into a [`FormValues`] map. Field ids double as DOM ids.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::canonical_hex;
use crate::consts::EMPTY_FORM_MESSAGE;
use crate::doc::ElementId;
use crate::error::EditorError;
use crate::render::RenderNode;

pub const TEXT_CONTENT: &str = "text-content";
pub const TEXT_COLOR: &str = "text-color";
pub const TEXT_SIZE: &str = "text-size";
pub const IMAGE_SRC: &str = "image-src";
pub const IMAGE_WIDTH: &str = "image-width";
pub const IMAGE_ALT: &str = "image-alt";
pub const BUTTON_TEXT: &str = "button-text";
pub const BUTTON_COLOR: &str = "button-color";
pub const BUTTON_TEXT_COLOR: &str = "button-text-color";
pub const BUTTON_LINK: &str = "button-link";

/// DOM id of the Apply action.
pub const APPLY_ACTION_ID: &str = "apply-properties";
/// DOM id of the Delete action.
pub const DELETE_ACTION_ID: &str = "delete-element";

/// Input widget used for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldInput {
    Textarea,
    Text,
    Color,
    Number,
    Url,
}

/// One labelled form field and its initial value.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub id: &'static str,
    pub label: &'static str,
    pub input: FieldInput,
    pub value: String,
}

impl FormField {
    #[must_use]
    pub fn new(id: &'static str, label: &'static str, input: FieldInput, value: impl Into<String>) -> Self {
        Self { id, label, input, value: value.into() }
    }
}

/// A bound property form. Always offers Apply and Delete.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyForm {
    pub element: ElementId,
    pub fields: Vec<FormField>,
}

#[cfg(test)]
impl PropertyForm {
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// The form's initial values, as the host would submit them untouched.
    #[must_use]
    pub fn initial_values(&self) -> FormValues {
        let mut values = FormValues::new();
        for f in &self.fields {
            values.set(f.id, f.value.clone());
        }
        values
    }
}

/// What the property panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum FormView {
    /// No selection: a prompt message.
    Empty,
    Bound(PropertyForm),
}

impl FormView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn bound(&self) -> Option<&PropertyForm> {
        match self {
            Self::Bound(form) => Some(form),
            Self::Empty => None,
        }
    }

    /// Panel markup for the host.
    #[must_use]
    pub fn render(&self) -> Vec<RenderNode> {
        match self {
            Self::Empty => vec![RenderNode::new("p").text(EMPTY_FORM_MESSAGE)],
            Self::Bound(form) => {
                let mut nodes: Vec<RenderNode> = form.fields.iter().map(render_field).collect();
                nodes.push(
                    RenderNode::new("div")
                        .class("form-actions")
                        .child(action_button(APPLY_ACTION_ID, "Apply"))
                        .child(action_button(DELETE_ACTION_ID, "Delete")),
                );
                nodes
            }
        }
    }
}

fn render_field(field: &FormField) -> RenderNode {
    let label = RenderNode::new("label").attr("for", field.id).text(field.label);
    let input = match field.input {
        FieldInput::Textarea => RenderNode::new("textarea").attr("id", field.id).text(field.value.clone()),
        other => {
            let kind = match other {
                FieldInput::Color => "color",
                FieldInput::Number => "number",
                FieldInput::Url => "url",
                FieldInput::Text | FieldInput::Textarea => "text",
            };
            RenderNode::new("input")
                .attr("type", kind)
                .attr("id", field.id)
                .attr("value", field.value.clone())
        }
    };
    RenderNode::new("div").class("form-group").child(label).child(input)
}

fn action_button(id: &str, label: &str) -> RenderNode {
    RenderNode::new("button").attr("type", "button").attr("id", id).text(label)
}

/// Field values submitted with an Apply action, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: &str, value: impl Into<String>) {
        self.0.insert(id.to_owned(), value.into());
    }

    #[must_use]
    pub fn with(mut self, id: &str, value: impl Into<String>) -> Self {
        self.set(id, value);
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// A required field, verbatim.
    ///
    /// # Errors
    ///
    /// `MissingField` when the field was not submitted.
    pub fn text(&self, id: &'static str) -> Result<&str, EditorError> {
        self.get(id).ok_or(EditorError::MissingField(id))
    }

    /// A required positive, finite number. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// `MissingField` or `InvalidNumber`.
    pub fn positive_number(&self, id: &'static str) -> Result<f64, EditorError> {
        let raw = self.text(id)?;
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
            _ => Err(EditorError::InvalidNumber { field: id, value: raw.to_owned() }),
        }
    }

    /// A required hex color, canonicalized to lowercase `#rrggbb`.
    ///
    /// # Errors
    ///
    /// `MissingField` or `InvalidColor`.
    pub fn color(&self, id: &'static str) -> Result<String, EditorError> {
        let raw = self.text(id)?;
        canonical_hex(raw).ok_or_else(|| EditorError::InvalidColor { field: id, value: raw.to_owned() })
    }

    /// An optional field: absent or blank yields `None`, otherwise the trimmed value.
    #[must_use]
    pub fn optional(&self, id: &str) -> Option<String> {
        self.get(id)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    }
}

/// Format a pixel number for a form field: integral values drop the fraction.
#[must_use]
pub fn format_px(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
