//! DFM Slot Storage
//!
//! String-valued key/value slots holding JSON snapshots of page state.
//!
//! # Core Concepts
//!
//! - [`SlotStore`]: get/set/remove/keys over string slots
//! - [`MemoryStore`] and [`FileStore`]: the two backends
//! - [`slots`]: the stable key of every page's draft and final slot
//! - [`save_draft`] / [`load_draft`]: whole-state snapshots with timestamps

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod draft;
pub mod error;
pub mod slots;
pub mod store;

// Re-exports
pub use draft::{
    clear_draft, format_timestamp, load_draft, load_json, save_draft, save_json, DraftSnapshot,
};
pub use error::StoreError;
pub use slots::{is_valid_key, DraftSlot};
pub use store::{FileStore, MemoryStore, SlotStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for storage operations
    pub use crate::{
        load_draft, load_json, save_draft, save_json, DraftSlot, MemoryStore, SlotStore,
        StoreError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
