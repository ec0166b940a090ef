//! DFM Intake CLI
//!
//! Hosts wizard pages outside a browser: replays input scripts, drives a
//! page from stdin with autosave running, and inspects the slot store.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod host;
pub mod script;

pub use host::{drive, event_line, render_slot, slot_sizes, stdout_sink, SharedPage};
pub use script::{parse_line, parse_script, replay, ReplayReport, ScriptError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
