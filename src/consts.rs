//! Shared constants for the page builder.

// ── Palette data transfer ───────────────────────────────────────

/// MIME type used to carry the palette kind through HTML5 drag-and-drop.
pub const DRAG_MIME: &str = "text/plain";

// ── Default content ─────────────────────────────────────────────

/// Placeholder shown by freshly placed text elements.
pub const DEFAULT_TEXT: &str = "Double click to edit";

/// Default text color (`#rrggbb`).
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Default text font size in CSS pixels.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Image resource substituted for new and unresolvable images.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// Alt text for freshly placed images.
pub const DEFAULT_IMAGE_ALT: &str = "Image";

/// Width shown in the image form when the image is auto-sized.
pub const DEFAULT_IMAGE_FORM_WIDTH_PX: f64 = 150.0;

/// Default button label.
pub const DEFAULT_BUTTON_LABEL: &str = "Click Me";

/// Default button background color.
pub const DEFAULT_BUTTON_BACKGROUND: &str = "#3498db";

/// Default button label color.
pub const DEFAULT_BUTTON_TEXT_COLOR: &str = "#ffffff";

// ── Default sizes (before the host measures the element) ────────

pub const TEXT_DEFAULT_SIZE: (f64, f64) = (120.0, 30.0);
pub const IMAGE_DEFAULT_SIZE: (f64, f64) = (150.0, 150.0);
pub const BUTTON_DEFAULT_SIZE: (f64, f64) = (100.0, 38.0);

// ── Canvas chrome ───────────────────────────────────────────────

/// Canvas border color while a drop is hovering.
pub const BORDER_HIGHLIGHT: &str = "#3498db";

/// Canvas border color at rest.
pub const BORDER_IDLE: &str = "#bdc3c7";

/// Initial canvas size when the host has not measured it yet.
pub const DEFAULT_CANVAS_SIZE: (f64, f64) = (800.0, 600.0);

// ── Preview ─────────────────────────────────────────────────────

/// Vertical spacing between stacked preview elements.
pub const PREVIEW_SPACING: &str = "1rem";

/// Browsing context used by preview button links.
pub const LINK_TARGET_BLANK: &str = "_blank";

// ── User-facing messages ────────────────────────────────────────

pub const EMPTY_FORM_MESSAGE: &str = "Select an element to edit";
pub const INVALID_IMAGE_MESSAGE: &str = "Invalid image URL. Using placeholder instead.";
pub const APPLY_FAILED_MESSAGE: &str = "Error applying properties. Please check your inputs.";
