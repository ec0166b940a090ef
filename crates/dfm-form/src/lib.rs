//! DFM Form State
//!
//! UI-independent form primitives shared by the intake pages.
//!
//! # Core Concepts
//!
//! - [`StepGate`]: dropdowns unlocked strictly in sequence
//! - [`RowCollection`]: repeatable entity rows with completeness tracking
//! - [`ImageBoard`]: images attached per entity
//! - [`FormEvent`]: what changed, for the host to render
//!
//! # Example
//!
//! ```rust
//! use dfm_form::{RowCollection, RowSchema};
//!
//! let schema = RowSchema::new("sub-assembly", ["name", "category"]);
//! let mut rows = RowCollection::with_rows(schema, 2);
//! let first = rows.id_at(1).unwrap();
//!
//! rows.update_field(first, "name", "Housing").unwrap();
//! rows.update_field(first, "category", "Mechanical").unwrap();
//!
//! assert_eq!(rows.complete_count(), 1);
//! assert_eq!(rows.submission().unwrap().len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod events;
pub mod images;
pub mod rows;
pub mod step_gate;
pub mod validation;

// Re-exports
pub use error::{ErrorKind, FormError};
pub use events::{Discard, EventSink, FnSink, FormEvent, ImageCard, NoticeLevel, ValidityLatch};
pub use images::{is_image_mime, ImageAttachment, ImageBoard, ImageMap, ImageSource};
pub use rows::{EntityRow, RenderedRow, RowCollection, RowId, RowSchema, RowValues};
pub use step_gate::{Progress, StepGate, WizardStep};
pub use validation::{validate_field, validate_row, FieldValidity, RowValidity, MIN_FIELD_LEN};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for form operations
    pub use crate::{
        EventSink, FieldValidity, FormError, FormEvent, ImageAttachment, ImageBoard, RowCollection,
        RowId, RowSchema, StepGate,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
