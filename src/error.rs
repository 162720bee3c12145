//! Error types for the editor core.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failures surfaced to the host by editor operations.
///
/// None of these are fatal to the session: the controller reports them,
/// leaves the affected element unchanged, and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("unknown element kind: {0:?}")]
    UnknownKind(String),
    #[error("missing form field: {0}")]
    MissingField(&'static str),
    #[error("field {field} is not a positive number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("field {field} is not a hex color: {value:?}")]
    InvalidColor { field: &'static str, value: String },
    #[error("invalid editor config: {0}")]
    Config(#[from] serde_json::Error),
}

impl EditorError {
    /// Stable machine-readable code for logs and host-side handling.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "E_UNKNOWN_KIND",
            Self::MissingField(_) => "E_MISSING_FIELD",
            Self::InvalidNumber { .. } => "E_INVALID_NUMBER",
            Self::InvalidColor { .. } => "E_INVALID_COLOR",
            Self::Config(_) => "E_CONFIG",
        }
    }
}
