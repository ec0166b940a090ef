//! Error types for page controllers
//!
//! Wraps the primitive and storage errors and adds the failures that only
//! exist at page level: unsupported inputs, unknown pages, bad config.

use crate::page::Page;
use dfm_form::{ErrorKind, FormError};
use dfm_store::StoreError;
use std::path::PathBuf;

/// Main wizard error type
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// Form primitive rejected the operation
    #[error(transparent)]
    Form(#[from] FormError),

    /// Slot storage failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Page is not ready to submit
    #[error("not ready: {reason}")]
    NotReady { reason: String },

    /// Row display number does not exist
    #[error("row {number} out of range ({count} rows)")]
    RowOutOfRange { number: usize, count: usize },

    /// Input has no meaning on this page
    #[error("input '{input}' not supported on page '{page}'")]
    UnsupportedInput { page: Page, input: &'static str },

    /// Page has no form controller
    #[error("page '{0}' has no form")]
    NotAForm(Page),

    /// Page slug not recognised
    #[error("unknown page: '{0}'")]
    UnknownPage(String),

    /// Image file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl WizardError {
    /// Create not-ready error
    #[inline]
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self::NotReady {
            reason: reason.into(),
        }
    }

    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Form(e) => e.kind(),
            Self::Store(e) => e.kind(),
            Self::Io { .. } => ErrorKind::Persistence,
            _ => ErrorKind::Structural,
        }
    }

    /// Check if the error must be shown as a blocking message
    ///
    /// Persistence failures are warnings and leave the in-memory state
    /// authoritative.
    #[inline]
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.kind() == ErrorKind::Structural
    }

    /// Message suitable for showing to the person filling in the form
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Form(e) => e.user_message(),
            Self::Store(e) => e.user_message(),
            Self::NotReady { reason } => reason.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_follows_wrapped_error() {
        let blocking: WizardError = FormError::LastCompleteRow {
            entity: "participant".into(),
        }
        .into();
        assert!(blocking.is_blocking());

        let warning: WizardError = StoreError::InvalidKey("x/y".into()).into();
        assert!(!warning.is_blocking());
        assert_eq!(warning.kind(), ErrorKind::Persistence);

        assert!(WizardError::not_ready("Please complete all steps").is_blocking());
    }

    #[test]
    fn not_ready_message_is_reason() {
        let err = WizardError::not_ready("Please complete all required status selections");
        assert_eq!(
            err.user_message(),
            "Please complete all required status selections"
        );
    }

    #[test]
    fn unsupported_input_names_page() {
        let err = WizardError::UnsupportedInput {
            page: Page::AreaSelection,
            input: "add_row",
        };
        assert_eq!(
            err.to_string(),
            "input 'add_row' not supported on page 'area-selection'"
        );
    }
}
