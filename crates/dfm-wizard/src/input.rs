//! Host inputs
//!
//! Everything a host can do to a page, as one serde-tagged enum. Rows are
//! addressed by their 1-based display number and image entities by their
//! 0-based index, matching what the host renders.

use dfm_form::{ImageAttachment, ImageSource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One input event from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum HostInput {
    /// Dropdown or radio choice
    Select { field: String, value: String },
    /// Reset a gated choice and everything after it
    ClearFrom { field: String },
    /// Free-text field edit
    SetField { field: String, value: String },
    /// Field lost focus
    Blur { field: String },
    /// Append an empty row
    AddRow,
    /// Remove a row by display number
    DeleteRow { row: usize },
    /// Edit a row field by display number
    UpdateRow {
        row: usize,
        field: String,
        value: String,
    },
    /// Attach an already-read image
    AttachImage {
        entity: usize,
        image: ImageAttachment,
    },
    /// Read image files and attach each as it completes
    AttachFiles {
        entity: usize,
        paths: Vec<PathBuf>,
        #[serde(default = "default_source")]
        source: ImageSource,
    },
    /// Remove one image
    DetachImage { entity: usize, position: usize },
    /// Upload source picked in the upload dialog
    PickSource { entity: usize, source: ImageSource },
    /// Explicit "save draft"
    SaveDraft,
    /// Autosave timer fired
    Tick,
    /// Submit the page
    Submit,
}

fn default_source() -> ImageSource {
    ImageSource::Gallery
}

impl HostInput {
    /// Stable name of the input kind
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::ClearFrom { .. } => "clear_from",
            Self::SetField { .. } => "set_field",
            Self::Blur { .. } => "blur",
            Self::AddRow => "add_row",
            Self::DeleteRow { .. } => "delete_row",
            Self::UpdateRow { .. } => "update_row",
            Self::AttachImage { .. } => "attach_image",
            Self::AttachFiles { .. } => "attach_files",
            Self::DetachImage { .. } => "detach_image",
            Self::PickSource { .. } => "pick_source",
            Self::SaveDraft => "save_draft",
            Self::Tick => "tick",
            Self::Submit => "submit",
        }
    }
}
