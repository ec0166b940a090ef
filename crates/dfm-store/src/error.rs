//! Error types for slot storage
//!
//! Storage failures are never fatal to a page: callers log them, surface a
//! warning and keep the in-memory state as the source of truth.

use dfm_form::ErrorKind;
use std::path::PathBuf;

/// Errors raised while reading or writing slots
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Key contains characters that cannot name a slot
    #[error("invalid slot key: '{0}'")]
    InvalidKey(String),

    /// Writing would exceed the configured quota
    #[error("quota exceeded writing '{key}': {needed} bytes needed, limit {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// IO error on a file-backed slot
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded as JSON
    #[error("cannot serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Storage errors are always persistence failures
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Persistence
    }

    /// Message suitable for a non-fatal warning
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::QuotaExceeded { .. } => {
                "Warning: Unable to save. Storage is full; try again or reduce image sizes."
                    .to_string()
            }
            _ => "Warning: Unable to save your changes. They are kept in this session.".to_string(),
        }
    }
}
