//! Field and row validity
//!
//! Validity is a pure function of the current values. Nothing here is
//! cached; callers recompute after every mutation and derive rendering from
//! the result.

use serde::{Deserialize, Serialize};

/// Minimum trimmed length of a valid text field
pub const MIN_FIELD_LEN: usize = 2;

/// Validity of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValidity {
    /// Nothing entered yet; neither valid nor invalid
    Empty,
    /// Non-empty but shorter than [`MIN_FIELD_LEN`]
    TooShort,
    /// Long enough
    Valid,
}

impl FieldValidity {
    /// Check if the field counts towards completeness
    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// Check if the field should be flagged to the user
    #[inline]
    #[must_use]
    pub fn is_invalid(self) -> bool {
        self == Self::TooShort
    }
}

/// Validate one raw field value
#[must_use]
pub fn validate_field(value: &str) -> FieldValidity {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        FieldValidity::Empty
    } else if trimmed.chars().count() < MIN_FIELD_LEN {
        FieldValidity::TooShort
    } else {
        FieldValidity::Valid
    }
}

/// Derived validity of a whole row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowValidity {
    /// At least one field holds something
    pub is_filled: bool,
    /// Every field is valid
    pub is_complete: bool,
    /// Number of fields flagged as too short
    pub invalid_fields: usize,
}

impl RowValidity {
    /// Filled but not complete; such rows block submission
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.is_filled && !self.is_complete
    }
}

/// Compute row validity from its field values
///
/// A row with no fields is never complete.
pub fn validate_row<'a>(values: impl IntoIterator<Item = &'a str>) -> RowValidity {
    let mut seen = 0usize;
    let mut valid = 0usize;
    let mut filled = false;
    let mut invalid_fields = 0usize;

    for value in values {
        seen += 1;
        match validate_field(value) {
            FieldValidity::Empty => {}
            FieldValidity::TooShort => {
                filled = true;
                invalid_fields += 1;
            }
            FieldValidity::Valid => {
                filled = true;
                valid += 1;
            }
        }
    }

    RowValidity {
        is_filled: filled,
        is_complete: seen > 0 && valid == seen,
        invalid_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_validity_thresholds() {
        assert_eq!(validate_field(""), FieldValidity::Empty);
        assert_eq!(validate_field("   "), FieldValidity::Empty);
        assert_eq!(validate_field("a"), FieldValidity::TooShort);
        assert_eq!(validate_field(" a "), FieldValidity::TooShort);
        assert_eq!(validate_field("Jo"), FieldValidity::Valid);
    }

    #[test]
    fn multibyte_characters_count_once() {
        assert_eq!(validate_field("ü"), FieldValidity::TooShort);
        assert_eq!(validate_field("üß"), FieldValidity::Valid);
    }

    #[test]
    fn row_validity_partial() {
        let v = validate_row(["Jo", "", "x"]);
        assert!(v.is_filled);
        assert!(!v.is_complete);
        assert!(v.is_partial());
        assert_eq!(v.invalid_fields, 1);
    }

    #[test]
    fn row_validity_complete() {
        let v = validate_row(["Jo", "Doe"]);
        assert!(v.is_complete);
        assert!(!v.is_partial());
    }

    #[test]
    fn empty_row_is_neither() {
        let v = validate_row(["", ""]);
        assert!(!v.is_filled);
        assert!(!v.is_complete);

        let none = validate_row(std::iter::empty());
        assert!(!none.is_complete);
    }
}
