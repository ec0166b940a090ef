//! DFM Intake Wizard
//!
//! Page controllers for the Design-for-Manufacturing intake wizard. Each
//! form page turns host inputs into state changes, draft writes and
//! [`FormEvent`](dfm_form::FormEvent)s for the host to render.
//!
//! # Core Concepts
//!
//! - [`Page`]: the named pages and their order
//! - [`PageController`]: one page's state plus its input handling
//! - [`HostInput`]: everything a host can send to a page
//! - [`WizardContext`]: store, clock and configuration shared by pages
//! - [`Session`]: a loaded page that also reads image files asynchronously
//! - [`Autosave`]: periodic draft saves on a tokio interval
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use dfm_store::MemoryStore;
//! use dfm_wizard::{HostInput, Page, PageController, WizardConfig, WizardContext, open_page};
//!
//! let ctx = WizardContext::new(Arc::new(MemoryStore::new()), WizardConfig::default());
//! let mut page = open_page(Page::DfmConfig, ctx).unwrap();
//! let mut events = Vec::new();
//! page.load(&mut events);
//!
//! page.handle(
//!     HostInput::Select { field: "dfmType".into(), value: "product".into() },
//!     &mut events,
//! )
//! .unwrap();
//! assert!(!events.is_empty());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod autosave;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod input;
pub mod page;
pub mod pages;
pub mod reader;
pub mod records;
pub mod session;

// Re-exports
pub use autosave::Autosave;
pub use config::{WizardConfig, DEFAULT_QUESTIONS};
pub use context::{Clock, FixedClock, SystemClock, WizardContext};
pub use controller::{open_page, report_error, Navigation, PageController};
pub use error::WizardError;
pub use input::HostInput;
pub use page::Page;
pub use reader::{attach_completions, attach_result, guess_mime, read_image, read_images};
pub use records::{participant_schema, sub_assembly_schema, Participant, SubAssembly};
pub use session::Session;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving wizard pages
    pub use crate::{
        open_page, HostInput, Navigation, Page, PageController, Session, WizardConfig,
        WizardContext, WizardError,
    };
    pub use dfm_form::{EventSink, FormEvent, NoticeLevel};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
