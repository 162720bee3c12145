//! Editor configuration.
//!
//! Every field has a default, so hosts may pass a partial JSON object (or
//! nothing at all) and only override what they care about.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::EditorError;
use crate::geom::Size;

/// Tunables for the editor core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas size assumed until the host reports a measured one.
    pub canvas_size: Size,
    /// Image used for new images and for URLs that fail to resolve.
    pub placeholder_image_url: String,
    /// Estimated size of a new text element.
    pub text_size: Size,
    /// Estimated size of a new image element.
    pub image_size: Size,
    /// Estimated size of a new button element.
    pub button_size: Size,
    pub text_color: String,
    pub font_size_px: f64,
    pub button_background: String,
    pub button_text_color: String,
    /// Canvas border color during drop hover.
    pub highlight_border: String,
    /// Canvas border color at rest.
    pub idle_border: String,
    /// Bottom margin between stacked preview elements.
    pub preview_spacing: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: consts::DEFAULT_CANVAS_SIZE.into(),
            placeholder_image_url: consts::PLACEHOLDER_IMAGE_URL.to_owned(),
            text_size: consts::TEXT_DEFAULT_SIZE.into(),
            image_size: consts::IMAGE_DEFAULT_SIZE.into(),
            button_size: consts::BUTTON_DEFAULT_SIZE.into(),
            text_color: consts::DEFAULT_TEXT_COLOR.to_owned(),
            font_size_px: consts::DEFAULT_FONT_SIZE_PX,
            button_background: consts::DEFAULT_BUTTON_BACKGROUND.to_owned(),
            button_text_color: consts::DEFAULT_BUTTON_TEXT_COLOR.to_owned(),
            highlight_border: consts::BORDER_HIGHLIGHT.to_owned(),
            idle_border: consts::BORDER_IDLE.to_owned(),
            preview_spacing: consts::PREVIEW_SPACING.to_owned(),
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Config` if `raw` is not valid JSON or a field has
    /// the wrong type.
    pub fn from_json(raw: &str) -> Result<Self, EditorError> {
        let cfg = serde_json::from_str(raw)?;
        Ok(cfg)
    }

    /// Parse an optional JSON config, falling back to defaults when absent or blank.
    ///
    /// # Errors
    ///
    /// Same as [`EditorConfig::from_json`].
    pub fn from_optional_json(raw: Option<&str>) -> Result<Self, EditorError> {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() => Self::from_json(s),
            _ => Ok(Self::default()),
        }
    }

    /// Border color for the given drop-highlight state.
    #[must_use]
    pub fn border_color(&self, highlighted: bool) -> &str {
        if highlighted {
            &self.highlight_border
        } else {
            &self.idle_border
        }
    }
}
