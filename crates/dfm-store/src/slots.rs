//! Stable slot keys
//!
//! One slot per page draft, one per finalized submission, plus the
//! sub-assembly handoff read by the product-image page.

/// Configuration selections, draft
pub const CONFIG_DRAFT: &str = "dfm_config_draft";
/// Configuration selections, final
pub const CONFIG: &str = "dfm_config";
/// Project details, draft
pub const PROJECT_DETAILS_DRAFT: &str = "dfm_project_details_draft";
/// Project details, final
pub const PROJECT_DETAILS: &str = "dfm_project_details";
/// Participant rows, draft (raw values of every row)
pub const PARTICIPANTS_DRAFT: &str = "dfm_participants_draft";
/// Complete participants, final
pub const PARTICIPANTS: &str = "dfm_participants";
/// Sub-assembly rows, draft
pub const SUBASSEMBLIES_DRAFT: &str = "dfm_subassemblies_draft";
/// Complete sub-assemblies; also the handoff to the image page
pub const SUBASSEMBLIES: &str = "dfm_subassemblies";
/// Image mapping (draft and final share one slot)
pub const PRODUCT_IMAGES: &str = "dfm_product_images";
/// Area selection with embedded timestamp
pub const AREA_SELECTION: &str = "dfm_area_selection";
/// Questionnaire answers, draft
pub const QUESTIONNAIRE_DRAFT: &str = "dfm_questionnaire_full_draft";
/// Time of the last questionnaire draft save
pub const QUESTIONNAIRE_TIMESTAMP: &str = "dfm_questionnaire_full_timestamp";
/// Questionnaire answers, final
pub const QUESTIONNAIRE: &str = "dfm_questionnaire_full";

/// Where one page keeps its draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftSlot {
    /// Slot holding the serialized state
    pub key: &'static str,
    /// Companion slot holding the ISO-8601 save time, if the page keeps one
    pub timestamp_key: Option<&'static str>,
}

impl DraftSlot {
    /// Draft without a timestamp companion
    #[inline]
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            timestamp_key: None,
        }
    }

    /// Draft with a timestamp companion
    #[inline]
    #[must_use]
    pub const fn with_timestamp(key: &'static str, timestamp_key: &'static str) -> Self {
        Self {
            key,
            timestamp_key: Some(timestamp_key),
        }
    }
}

/// Check that a key is usable as a slot name (and as a file stem)
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_are_valid() {
        for key in [
            CONFIG_DRAFT,
            CONFIG,
            PROJECT_DETAILS_DRAFT,
            PROJECT_DETAILS,
            PARTICIPANTS_DRAFT,
            PARTICIPANTS,
            SUBASSEMBLIES_DRAFT,
            SUBASSEMBLIES,
            PRODUCT_IMAGES,
            AREA_SELECTION,
            QUESTIONNAIRE_DRAFT,
            QUESTIONNAIRE_TIMESTAMP,
            QUESTIONNAIRE,
        ] {
            assert!(is_valid_key(key), "{key}");
        }
    }

    #[test]
    fn path_like_keys_rejected() {
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("../etc"));
        assert!(!is_valid_key("a/b"));
        assert!(!is_valid_key("a.json"));
    }
}
