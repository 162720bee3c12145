//! Declarative DOM descriptions.
//!
//! Elements describe themselves as a [`RenderNode`] tree; the browser host
//! turns nodes into real DOM and tests inspect them directly. Nothing here
//! touches the browser.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::{Deserialize, Serialize};

/// What a click on a rendered node does, beyond the editor's own handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClickBehavior {
    /// Open `url` in the browsing context named `target`.
    OpenLink { url: String, target: String },
}

/// One DOM element with ordered classes, inline styles, and attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub tag: String,
    pub classes: Vec<String>,
    pub styles: Vec<(String, String)>,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<RenderNode>,
    pub on_click: Option<ClickBehavior>,
}

impl RenderNode {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_owned(), ..Self::default() }
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn style(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_style(name, value);
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: RenderNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Set an inline style, replacing any earlier value for `name`.
    pub fn set_style(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.styles.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.styles.push((name.to_owned(), value)),
        }
    }

    pub fn remove_style(&mut self, name: &str) {
        self.styles.retain(|(n, _)| n != name);
    }

    #[cfg(test)]
    #[must_use]
    pub fn style_value(&self, name: &str) -> Option<&str> {
        self.styles.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name.to_owned(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(n, _)| n != name);
    }

    #[cfg(test)]
    #[must_use]
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// The `style` attribute value, e.g. `left: 4px; top: 8px`.
    #[must_use]
    pub fn style_attr(&self) -> String {
        self.styles
            .iter()
            .map(|(n, v)| format!("{n}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Serialize to HTML with text and attribute values escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if !self.classes.is_empty() {
            write_attr(out, "class", &self.classes.join(" "));
        }
        if !self.styles.is_empty() {
            write_attr(out, "style", &self.style_attr());
        }
        for (name, value) in &self.attrs {
            write_attr(out, name, value);
        }
        out.push('>');
        if is_void(&self.tag) {
            return;
        }
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "input" | "br" | "hr")
}

/// Escape the five HTML-significant characters.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
