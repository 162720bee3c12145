//! Input model: input sources, pointer targets, and the gesture state machine.
//!
//! Mouse drag-and-drop and touch both feed the same `pointer_down` /
//! `pointer_move` / `pointer_up` calls on the engine. The adapters here reduce
//! raw touch lists to a single pointer sample so the placement and move logic
//! is written once. A gesture follows the contact that started it, by touch
//! identifier; other simultaneous touches are ignored.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::DRAG_MIME;
use crate::doc::{ElementId, ElementKind};
use crate::error::EditorError;
use crate::geom::Point;

/// Which device produced a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSource {
    /// Mouse / pen, including HTML5 drag-and-drop from the palette.
    #[default]
    Pointer,
    /// Touch screen.
    Touch,
}

/// What a pointer-down landed on inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas background.
    Canvas,
    /// A canvas element. `direct` is false when the press hit a nested child
    /// (e.g. the `<img>` inside an image element).
    Element { id: ElementId, direct: bool },
}

/// Where a click on the preview overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTarget {
    /// The dimmed backdrop outside the preview content.
    Backdrop,
    /// The preview content itself.
    Content,
}

/// One touch contact in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub identifier: i32,
    pub point: Point,
}

/// The contact a gesture follows.
///
/// With no identifier yet, the first contact of the list starts tracking.
/// Once tracking, only the contact with that identifier counts, so a second
/// finger can neither steer nor end the gesture.
#[must_use]
pub fn tracked_touch(touches: &[TouchPoint], identifier: Option<i32>) -> Option<TouchPoint> {
    match identifier {
        Some(id) => touches.iter().find(|t| t.identifier == id).copied(),
        None => touches.first().copied(),
    }
}

/// Parse the palette payload carried by a drag-and-drop data transfer.
///
/// # Errors
///
/// `UnknownKind` when the payload doesn't name a palette kind.
pub fn parse_drag_payload(mime: &str, payload: &str) -> Result<ElementKind, EditorError> {
    if mime != DRAG_MIME {
        return Err(EditorError::UnknownKind(format!("{mime}: {payload}")));
    }
    payload.parse()
}

/// Internal state of the gesture state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A palette item is being dragged toward the canvas.
    Placing {
        kind: ElementKind,
        source: InputSource,
        /// Latest canvas-local pointer location, if the drag has moved.
        last_point: Option<Point>,
    },
    /// An element is being moved; the grab offset lives in `EditorState::drag_offset`.
    Moving { id: ElementId },
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Moving { .. })
    }

    #[must_use]
    pub fn is_placing(&self) -> bool {
        matches!(self, Self::Placing { .. })
    }
}
