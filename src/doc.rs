//! Document model: canvas elements, their kind-specific content, and the store.
//!
//! Each element kind is its own type (`TextElement`, `ImageElement`,
//! `ButtonElement`) implementing [`ElementBehavior`]: how it renders, which
//! property form it exposes, and how submitted form values are applied.
//! [`ElementBody`] is the closed set of kinds a [`CanvasElement`] can hold.
//!
//! The store keeps elements in insertion order, which is also DOM append
//! order and therefore the preview stacking order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::consts;
use crate::error::EditorError;
use crate::form::{self, FieldInput, FormField, FormValues, format_px};
use crate::geom::{Point, Size};
use crate::render::RenderNode;

/// Unique identifier for a canvas element.
pub type ElementId = Uuid;

/// The palette kinds. Also the drag-and-drop payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Button,
}

impl ElementKind {
    /// All palette kinds in palette order.
    pub const ALL: [ElementKind; 3] = [Self::Text, Self::Image, Self::Button];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Button => "button",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "button" => Ok(Self::Button),
            other => Err(EditorError::UnknownKind(other.to_owned())),
        }
    }
}

/// Result of applying submitted form values to an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// Values were validated and written onto the element.
    Committed,
    /// Values were validated but the image URL must resolve before committing.
    NeedsValidation(ImageEdit),
}

/// Kind-specific capabilities shared by every element type.
pub trait ElementBehavior {
    fn kind(&self) -> ElementKind;

    /// Add content, styles, and children to the element's wrapper node.
    fn render_into(&self, node: &mut RenderNode);

    /// Fields of the property form, seeded with current values.
    fn form_fields(&self) -> Vec<FormField>;

    /// Validate `values` and write them onto the element.
    ///
    /// All fields are parsed before anything is written, so an error leaves
    /// the element unchanged.
    ///
    /// # Errors
    ///
    /// `MissingField`, `InvalidNumber`, or `InvalidColor` for malformed input.
    fn apply(&mut self, values: &FormValues) -> Result<ApplyOutcome, EditorError>;

    /// Size estimate used until the host reports a measured size.
    fn estimated_size(&self, cfg: &EditorConfig) -> Size;
}

// =============================================================
// Text
// =============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub text: String,
    pub color: String,
    pub font_size_px: f64,
}

impl TextElement {
    #[must_use]
    pub fn with_defaults(cfg: &EditorConfig) -> Self {
        Self {
            text: consts::DEFAULT_TEXT.to_owned(),
            color: cfg.text_color.clone(),
            font_size_px: cfg.font_size_px,
        }
    }
}

impl ElementBehavior for TextElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }

    fn render_into(&self, node: &mut RenderNode) {
        node.text = Some(self.text.clone());
        node.set_attr("contenteditable", "true");
        node.set_style("color", self.color.clone());
        node.set_style("font-size", format!("{}px", format_px(self.font_size_px)));
    }

    fn form_fields(&self) -> Vec<FormField> {
        vec![
            FormField::new(form::TEXT_CONTENT, "Text", FieldInput::Textarea, self.text.clone()),
            FormField::new(form::TEXT_COLOR, "Color", FieldInput::Color, self.color.clone()),
            FormField::new(form::TEXT_SIZE, "Font Size (px)", FieldInput::Number, format_px(self.font_size_px)),
        ]
    }

    fn apply(&mut self, values: &FormValues) -> Result<ApplyOutcome, EditorError> {
        let text = values.text(form::TEXT_CONTENT)?.to_owned();
        let color = values.color(form::TEXT_COLOR)?;
        let font_size_px = values.positive_number(form::TEXT_SIZE)?;
        self.text = text;
        self.color = color;
        self.font_size_px = font_size_px;
        Ok(ApplyOutcome::Committed)
    }

    fn estimated_size(&self, cfg: &EditorConfig) -> Size {
        let base = cfg.text_size;
        let scale = if cfg.font_size_px > 0.0 { self.font_size_px / cfg.font_size_px } else { 1.0 };
        Size::new(base.width, base.height * scale)
    }
}

// =============================================================
// Image
// =============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    pub src: String,
    /// Rendered width in pixels; `None` lets the image size itself.
    pub width_px: Option<f64>,
    pub alt: String,
}

/// A validated image edit awaiting URL resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEdit {
    pub src: String,
    pub width_px: f64,
    pub alt: String,
}

impl ImageElement {
    #[must_use]
    pub fn with_defaults(cfg: &EditorConfig) -> Self {
        Self {
            src: cfg.placeholder_image_url.clone(),
            width_px: None,
            alt: consts::DEFAULT_IMAGE_ALT.to_owned(),
        }
    }

    /// Commit an edit whose URL resolved.
    pub fn commit(&mut self, edit: ImageEdit) {
        self.src = edit.src;
        self.width_px = Some(edit.width_px);
        self.alt = edit.alt;
    }

    /// Swap in the placeholder after a URL failed to resolve. Width and alt are kept.
    pub fn fall_back(&mut self, placeholder: &str) {
        placeholder.clone_into(&mut self.src);
    }
}

impl ElementBehavior for ImageElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Image
    }

    fn render_into(&self, node: &mut RenderNode) {
        let mut img = RenderNode::new("img")
            .attr("src", self.src.clone())
            .attr("alt", self.alt.clone())
            .style("max-width", "100%");
        if let Some(w) = self.width_px {
            img.set_attr("width", format_px(w));
        }
        node.children.push(img);
    }

    fn form_fields(&self) -> Vec<FormField> {
        let width = self.width_px.unwrap_or(consts::DEFAULT_IMAGE_FORM_WIDTH_PX);
        vec![
            FormField::new(form::IMAGE_SRC, "Image URL", FieldInput::Url, self.src.clone()),
            FormField::new(form::IMAGE_WIDTH, "Width (px)", FieldInput::Number, format_px(width)),
            FormField::new(form::IMAGE_ALT, "Alt Text", FieldInput::Text, self.alt.clone()),
        ]
    }

    fn apply(&mut self, values: &FormValues) -> Result<ApplyOutcome, EditorError> {
        let src = values.text(form::IMAGE_SRC)?.trim().to_owned();
        let width_px = values.positive_number(form::IMAGE_WIDTH)?;
        let alt = values.text(form::IMAGE_ALT)?.to_owned();
        Ok(ApplyOutcome::NeedsValidation(ImageEdit { src, width_px, alt }))
    }

    fn estimated_size(&self, cfg: &EditorConfig) -> Size {
        let base = cfg.image_size;
        match self.width_px {
            Some(w) if base.width > 0.0 => Size::new(w, base.height * w / base.width),
            _ => base,
        }
    }
}

// =============================================================
// Button
// =============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonElement {
    pub label: String,
    pub background: String,
    pub text_color: String,
    pub link: Option<String>,
}

impl ButtonElement {
    #[must_use]
    pub fn with_defaults(cfg: &EditorConfig) -> Self {
        Self {
            label: consts::DEFAULT_BUTTON_LABEL.to_owned(),
            background: cfg.button_background.clone(),
            text_color: cfg.button_text_color.clone(),
            link: None,
        }
    }
}

impl ElementBehavior for ButtonElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Button
    }

    fn render_into(&self, node: &mut RenderNode) {
        node.text = Some(self.label.clone());
        node.set_style("background-color", self.background.clone());
        node.set_style("color", self.text_color.clone());
        node.set_style("padding", "0.5rem 1rem");
        node.set_style("border-radius", "4px");
        node.set_style("text-align", "center");
        if let Some(link) = &self.link {
            node.set_attr("data-link", link.clone());
        }
    }

    fn form_fields(&self) -> Vec<FormField> {
        vec![
            FormField::new(form::BUTTON_TEXT, "Text", FieldInput::Text, self.label.clone()),
            FormField::new(form::BUTTON_COLOR, "Background Color", FieldInput::Color, self.background.clone()),
            FormField::new(form::BUTTON_TEXT_COLOR, "Text Color", FieldInput::Color, self.text_color.clone()),
            FormField::new(
                form::BUTTON_LINK,
                "Link URL (optional)",
                FieldInput::Url,
                self.link.clone().unwrap_or_default(),
            ),
        ]
    }

    fn apply(&mut self, values: &FormValues) -> Result<ApplyOutcome, EditorError> {
        let label = values.text(form::BUTTON_TEXT)?.to_owned();
        let background = values.color(form::BUTTON_COLOR)?;
        let text_color = values.color(form::BUTTON_TEXT_COLOR)?;
        let link = values.optional(form::BUTTON_LINK);
        self.label = label;
        self.background = background;
        self.text_color = text_color;
        self.link = link;
        Ok(ApplyOutcome::Committed)
    }

    fn estimated_size(&self, cfg: &EditorConfig) -> Size {
        cfg.button_size
    }
}

// =============================================================
// CanvasElement
// =============================================================

/// Kind-specific element content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementBody {
    Text(TextElement),
    Image(ImageElement),
    Button(ButtonElement),
}

impl ElementBody {
    /// Default content for a freshly placed element of `kind`.
    #[must_use]
    pub fn with_defaults(kind: ElementKind, cfg: &EditorConfig) -> Self {
        match kind {
            ElementKind::Text => Self::Text(TextElement::with_defaults(cfg)),
            ElementKind::Image => Self::Image(ImageElement::with_defaults(cfg)),
            ElementKind::Button => Self::Button(ButtonElement::with_defaults(cfg)),
        }
    }

    #[must_use]
    pub fn behavior(&self) -> &dyn ElementBehavior {
        match self {
            Self::Text(t) => t,
            Self::Image(i) => i,
            Self::Button(b) => b,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn ElementBehavior {
        match self {
            Self::Text(t) => t,
            Self::Image(i) => i,
            Self::Button(b) => b,
        }
    }
}

/// A placed, positioned, editable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    pub id: ElementId,
    /// Top-left corner relative to the canvas origin.
    pub position: Point,
    /// Rendered size: estimated at creation, then whatever the host measures.
    pub size: Size,
    /// Set once the host has reported a rendered size; estimates stop replacing `size`.
    #[serde(skip)]
    pub measured: bool,
    pub body: ElementBody,
}

impl CanvasElement {
    #[must_use]
    pub fn new(kind: ElementKind, position: Point, cfg: &EditorConfig) -> Self {
        let body = ElementBody::with_defaults(kind, cfg);
        let size = body.behavior().estimated_size(cfg);
        Self { id: Uuid::new_v4(), position, size, measured: false, body }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.body.behavior().kind()
    }

    /// The element as it appears on the editing canvas.
    #[must_use]
    pub fn render_canvas(&self, selected: bool) -> RenderNode {
        let mut node = RenderNode::new("div")
            .class("canvas-element")
            .class(&format!("{}-element", self.kind()))
            .attr("data-type", self.kind().as_str())
            .attr("data-id", self.id.to_string())
            .style("position", "absolute")
            .style("left", format!("{}px", format_px(self.position.x)))
            .style("top", format!("{}px", format_px(self.position.y)))
            .style("cursor", "move");
        if selected {
            node.add_class("selected");
        }
        self.body.behavior().render_into(&mut node);
        node
    }
}

/// In-memory store of canvas elements, in insertion order.
#[derive(Debug, Default)]
pub struct DocStore {
    elements: Vec<CanvasElement>,
}

impl DocStore {
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Append an element. Replaces in place if the id already exists.
    pub fn insert(&mut self, element: CanvasElement) {
        match self.elements.iter_mut().find(|e| e.id == element.id) {
            Some(slot) => *slot = element,
            None => self.elements.push(element),
        }
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<CanvasElement> {
        let idx = self.elements.iter().position(|e| e.id == *id)?;
        Some(self.elements.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == *id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CanvasElement> {
        self.elements.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
