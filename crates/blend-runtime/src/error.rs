//! Runtime errors
//!
//! Data-shape problems in JSON definitions are not errors here; they go
//! to the diagnostic sink. `BlendError` covers the conditions that abort
//! the operation that hit them.

use blend_dom::SelectorError;
use std::path::PathBuf;

/// Blend runtime error
#[derive(Debug, thiserror::Error)]
pub enum BlendError {
    /// Lone `{` or `}` in a format string
    #[error("Blend.Resources.MalformedFormatStringInput: Malformed, did you mean to escape your '{0}'?")]
    MalformedFormatString(char),

    #[error("JSON syntax error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown type \"{0}\"")]
    UnknownType(String),

    #[error("type \"{0}\" cannot be constructed")]
    NotConstructible(String),

    #[error("type \"{0}\" is not a behavior")]
    NotABehavior(String),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for Blend operations
pub type Result<T> = std::result::Result<T, BlendError>;
