//! Error types for form-state operations
//!
//! Every error here is raised before any state is touched, so a rejected
//! operation always leaves the form exactly as it was.

use crate::rows::RowId;

/// Broad class of a failure, used by hosts to decide how to surface it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A field value is missing or too short. Shown per field, never fatal.
    Validation,
    /// An operation would break a collection or gate invariant. Shown as a
    /// blocking message; the operation is aborted.
    Structural,
    /// Storage could not be read or written. Shown as a non-fatal warning.
    Persistence,
}

/// Errors raised by the form primitives
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Selection arrived for a step that is not the next one
    #[error("step {requested} selected out of order (next step is {expected})")]
    StepOutOfOrder { requested: usize, expected: usize },

    /// Step index outside `1..=total`
    #[error("step {index} out of range (gate has {total} steps)")]
    StepOutOfRange { index: usize, total: usize },

    /// Blank selection value
    #[error("empty selection for step {index}")]
    EmptySelection { index: usize },

    /// No row with this id
    #[error("row not found: {0}")]
    RowNotFound(RowId),

    /// Field name not part of the row schema
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Deleting the row would leave the collection without a complete entry
    #[error("cannot delete the last complete {entity}")]
    LastCompleteRow { entity: String },

    /// Submission attempted while no row is complete
    #[error("no complete {entity} to submit")]
    NothingComplete { entity: String },

    /// Submission attempted while partially filled rows exist
    #[error("{count} incomplete {entity} row(s)")]
    IncompleteRows { entity: String, count: usize },

    /// Image targeted an entity that does not exist
    #[error("entity {index} out of range ({count} entities)")]
    EntityOutOfRange { index: usize, count: usize },

    /// No image at this position
    #[error("no image {position} for entity {index}")]
    ImageNotFound { index: usize, position: usize },

    /// Attachment is not an image
    #[error("unsupported media type '{0}'")]
    NotAnImage(String),

    /// Entities without images at submission time
    #[error("{} entit(ies) without images", .missing.len())]
    MissingImages { missing: Vec<usize> },

    /// Required field left blank or invalid
    #[error("field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },
}

impl FormError {
    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptySelection { .. } | Self::InvalidField { .. } => ErrorKind::Validation,
            _ => ErrorKind::Structural,
        }
    }

    /// Check if the error must block the user until resolved
    #[inline]
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.kind() == ErrorKind::Structural
    }

    /// Message suitable for showing to the person filling in the form
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::LastCompleteRow { entity } => format!(
                "At least one {entity} must remain. Cannot delete the last complete {entity}."
            ),
            Self::NothingComplete { entity } => {
                format!("Please add at least one complete {entity} with all fields filled.")
            }
            Self::IncompleteRows { entity, count } => format!(
                "Please complete all fields for {count} {entity}(s) or remove incomplete entries."
            ),
            Self::MissingImages { .. } => {
                "Please upload at least one image for each sub-assembly before proceeding."
                    .to_string()
            }
            Self::NotAnImage(mime) => format!("'{mime}' is not an image and was skipped."),
            other => other.to_string(),
        }
    }
}
