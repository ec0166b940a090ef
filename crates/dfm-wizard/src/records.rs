//! Stored record shapes
//!
//! Final submissions of the row pages are plain JSON objects keyed by the
//! field names below. These typed views are used where another page reads
//! them back.

use dfm_form::RowSchema;
use serde::{Deserialize, Serialize};

/// Participant fields, in column order
pub const PARTICIPANT_FIELDS: [&str; 5] = ["firstName", "lastName", "location", "organization", "role"];

/// Sub-assembly fields, in column order
pub const SUBASSEMBLY_FIELDS: [&str; 5] = ["name", "category", "process1", "process2", "process3"];

/// Row schema of the participant table
#[must_use]
pub fn participant_schema() -> RowSchema {
    RowSchema::new("participant", PARTICIPANT_FIELDS)
}

/// Row schema of the sub-assembly table
#[must_use]
pub fn sub_assembly_schema() -> RowSchema {
    RowSchema::new("sub-assembly", SUBASSEMBLY_FIELDS)
}

/// A submitted participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub first_name: String,
    pub last_name: String,
    pub location: String,
    pub organization: String,
    pub role: String,
}

/// A submitted sub-assembly; also the entity list of the image page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAssembly {
    pub name: String,
    pub category: String,
    pub process1: String,
    pub process2: String,
    pub process3: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_keys_match_schema() {
        let p = Participant {
            first_name: "Jo".into(),
            last_name: "Doe".into(),
            location: "Aachen, DE".into(),
            organization: "Acme".into(),
            role: "QA".into(),
        };
        let value = serde_json::to_value(&p).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = PARTICIPANT_FIELDS.to_vec();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }

    #[test]
    fn sub_assembly_reads_row_submission() {
        let row = serde_json::json!({
            "name": "Housing",
            "category": "Mechanical",
            "process1": "Casting",
            "process2": "Milling",
            "process3": "Painting"
        });
        let sub: SubAssembly = serde_json::from_value(row).unwrap();
        assert_eq!(sub.category, "Mechanical");
    }
}
