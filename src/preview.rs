//! Preview rendering: a read-only, flow-laid-out copy of the canvas.
//!
//! The preview is built from a shared borrow of the store, so the live
//! canvas cannot be touched. Each element is rendered as it appears on the
//! canvas and then stripped of editing affordances.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::consts::LINK_TARGET_BLANK;
use crate::doc::{CanvasElement, DocStore, ElementBody, ElementKind};
use crate::render::{ClickBehavior, RenderNode};

/// The overlay content: one node per canvas element, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewDocument {
    pub nodes: Vec<RenderNode>,
}

#[cfg(test)]
impl PreviewDocument {
    #[must_use]
    pub fn to_html(&self) -> String {
        self.nodes.iter().map(RenderNode::to_html).collect()
    }
}

/// Build the preview for every element in `doc`, in canvas order.
#[must_use]
pub fn build(doc: &DocStore, cfg: &EditorConfig) -> PreviewDocument {
    PreviewDocument { nodes: doc.iter().map(|e| preview_node(e, cfg)).collect() }
}

fn preview_node(element: &CanvasElement, cfg: &EditorConfig) -> RenderNode {
    let mut node = element.render_canvas(false);

    node.remove_class("canvas-element");
    node.remove_class("selected");
    node.remove_attr("contenteditable");
    node.remove_style("left");
    node.remove_style("top");
    node.set_style("position", "relative");
    node.set_style("display", "block");
    node.set_style("margin", format!("0 auto {}", cfg.preview_spacing));
    node.set_style("cursor", "default");

    if element.kind() == ElementKind::Image {
        node.set_style("text-align", "center");
    }
    if let ElementBody::Button(button) = &element.body {
        if let Some(url) = &button.link {
            node.on_click = Some(ClickBehavior::OpenLink {
                url: url.clone(),
                target: LINK_TARGET_BLANK.to_owned(),
            });
        }
    }
    node
}
