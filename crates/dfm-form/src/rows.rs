//! Variable-length collections of entity rows
//!
//! Provides:
//! - [`RowSchema`]: the ordered field set of one entity kind
//! - [`EntityRow`]: one record with derived validity
//! - [`RowCollection`]: add/delete/update with the "keep one complete row"
//!   invariant and submission gating
//!
//! Rows are addressed by a stable [`RowId`]. Display numbers are positional
//! (`1..=len`) and are recomputed on every render.

use crate::error::FormError;
use crate::validation::{validate_field, validate_row, FieldValidity, RowValidity};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Raw field values of one row, keyed by field name in schema order
pub type RowValues = IndexMap<String, String>;

/// Stable row identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(pub Ulid);

impl RowId {
    /// Generate new row ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Field layout of one entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSchema {
    /// Singular entity label used in messages (e.g. `participant`)
    pub entity: String,
    /// Required fields, in display order
    pub fields: Vec<String>,
}

impl RowSchema {
    /// Create schema
    #[must_use]
    pub fn new<I, S>(entity: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entity: entity.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a field belongs to the schema
    #[inline]
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// One record of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRow {
    id: RowId,
    values: RowValues,
    validity: RowValidity,
}

impl EntityRow {
    fn empty(schema: &RowSchema) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|f| (f.clone(), String::new()))
            .collect();
        Self {
            id: RowId::new(),
            values,
            validity: RowValidity::default(),
        }
    }

    fn refresh(&mut self) {
        self.validity = validate_row(self.values.values().map(String::as_str));
    }

    /// Row identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Raw value of a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Raw values in schema order
    #[inline]
    #[must_use]
    pub fn values(&self) -> &RowValues {
        &self.values
    }

    /// Trimmed values, as submitted
    #[must_use]
    pub fn trimmed(&self) -> RowValues {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect()
    }

    /// Derived validity
    #[inline]
    #[must_use]
    pub fn validity(&self) -> RowValidity {
        self.validity
    }

    /// Any field non-empty
    #[inline]
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.validity.is_filled
    }

    /// Every field valid
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validity.is_complete
    }
}

/// Render-ready view of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRow {
    /// 1-based display number
    pub number: usize,
    /// Row identifier
    pub id: RowId,
    /// Raw values
    pub values: RowValues,
    /// Per-field validity flags
    pub fields: IndexMap<String, FieldValidity>,
    /// Any field non-empty
    pub is_filled: bool,
    /// Every field valid
    pub is_complete: bool,
}

/// Ordered collection of rows sharing one schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCollection {
    schema: RowSchema,
    rows: Vec<EntityRow>,
    complete_count: usize,
}

impl RowCollection {
    /// Create empty collection
    #[inline]
    #[must_use]
    pub fn new(schema: RowSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            complete_count: 0,
        }
    }

    /// Create collection with `count` empty rows
    #[must_use]
    pub fn with_rows(schema: RowSchema, count: usize) -> Self {
        let mut collection = Self::new(schema);
        for _ in 0..count {
            collection.add_row();
        }
        collection
    }

    /// Schema of the rows
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &RowSchema {
        &self.schema
    }

    /// Rows in display order
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[EntityRow] {
        &self.rows
    }

    /// Number of rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a row
    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&EntityRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// 1-based display number of a row
    #[must_use]
    pub fn display_number(&self, id: RowId) -> Option<usize> {
        self.position(id).map(|i| i + 1)
    }

    /// Row id at a 1-based display number
    #[must_use]
    pub fn id_at(&self, number: usize) -> Option<RowId> {
        number
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .map(EntityRow::id)
    }

    fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    /// Rows where every field is valid
    #[inline]
    #[must_use]
    pub fn complete_count(&self) -> usize {
        self.complete_count
    }

    /// Rows with at least one non-empty field
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_filled()).count()
    }

    /// Rows that are filled but not complete
    #[must_use]
    pub fn partial_count(&self) -> usize {
        self.rows.iter().filter(|r| r.validity.is_partial()).count()
    }

    /// Submit enablement: at least one complete row
    #[inline]
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.complete_count > 0
    }

    fn recount(&mut self) {
        self.complete_count = self.rows.iter().filter(|r| r.is_complete()).count();
    }

    /// Append an empty row
    pub fn add_row(&mut self) -> RowId {
        let row = EntityRow::empty(&self.schema);
        let id = row.id;
        self.rows.push(row);
        self.recount();
        tracing::debug!(entity = %self.schema.entity, rows = self.rows.len(), "row added");
        id
    }

    /// Remove a row
    ///
    /// # Errors
    /// - [`FormError::RowNotFound`] for an unknown id
    /// - [`FormError::LastCompleteRow`] if the row is the only complete row
    pub fn delete_row(&mut self, id: RowId) -> Result<(), FormError> {
        let pos = self.position(id).ok_or(FormError::RowNotFound(id))?;
        if self.rows[pos].is_complete() && self.complete_count == 1 {
            return Err(FormError::LastCompleteRow {
                entity: self.schema.entity.clone(),
            });
        }

        self.rows.remove(pos);
        self.recount();
        tracing::debug!(entity = %self.schema.entity, rows = self.rows.len(), "row deleted");
        Ok(())
    }

    /// Set a raw field value and recompute validity
    ///
    /// # Errors
    /// - [`FormError::RowNotFound`] for an unknown id
    /// - [`FormError::UnknownField`] for a field outside the schema
    pub fn update_field(
        &mut self,
        id: RowId,
        field: &str,
        value: impl Into<String>,
    ) -> Result<FieldValidity, FormError> {
        if !self.schema.has_field(field) {
            return Err(FormError::UnknownField(field.to_string()));
        }
        let pos = self.position(id).ok_or(FormError::RowNotFound(id))?;

        let value = value.into();
        let validity = validate_field(&value);
        let row = &mut self.rows[pos];
        if let Some(slot) = row.values.get_mut(field) {
            *slot = value;
        }
        row.refresh();
        self.recount();
        Ok(validity)
    }

    /// Complete rows in display order
    #[must_use]
    pub fn collect_complete(&self) -> Vec<&EntityRow> {
        self.rows.iter().filter(|r| r.is_complete()).collect()
    }

    /// Trimmed values of the complete rows, or the reason submission is blocked
    ///
    /// Partially filled rows are never dropped silently.
    ///
    /// # Errors
    /// - [`FormError::NothingComplete`] when no row is complete
    /// - [`FormError::IncompleteRows`] when filled rows are missing fields
    pub fn submission(&self) -> Result<Vec<RowValues>, FormError> {
        if self.complete_count == 0 {
            return Err(FormError::NothingComplete {
                entity: self.schema.entity.clone(),
            });
        }
        let partial = self.partial_count();
        if partial > 0 {
            return Err(FormError::IncompleteRows {
                entity: self.schema.entity.clone(),
                count: partial,
            });
        }
        Ok(self
            .collect_complete()
            .into_iter()
            .map(EntityRow::trimmed)
            .collect())
    }

    /// Render-ready rows, numbered `1..=len`
    #[must_use]
    pub fn render(&self) -> Vec<RenderedRow> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| RenderedRow {
                number: i + 1,
                id: row.id,
                values: row.values.clone(),
                fields: row
                    .values
                    .iter()
                    .map(|(k, v)| (k.clone(), validate_field(v)))
                    .collect(),
                is_filled: row.is_filled(),
                is_complete: row.is_complete(),
            })
            .collect()
    }

    /// Raw values of every row, for drafts
    #[must_use]
    pub fn draft(&self) -> Vec<RowValues> {
        self.rows.iter().map(|r| r.values.clone()).collect()
    }

    /// Replace the rows with drafted values, matched by position
    ///
    /// Fields missing from a draft row stay empty; fields outside the
    /// schema are ignored. An empty draft leaves the collection untouched.
    /// Returns the number of rows restored.
    pub fn restore(&mut self, drafts: &[RowValues]) -> usize {
        if drafts.is_empty() {
            return 0;
        }

        let mut rows = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let mut row = EntityRow::empty(&self.schema);
            for (field, value) in draft {
                match row.values.get_mut(field) {
                    Some(slot) => slot.clone_from(value),
                    None => tracing::debug!(field = %field, "ignoring unknown drafted field"),
                }
            }
            row.refresh();
            rows.push(row);
        }

        self.rows = rows;
        self.recount();
        self.rows.len()
    }
}
