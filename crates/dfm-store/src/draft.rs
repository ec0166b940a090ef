//! Draft snapshots
//!
//! Provides:
//! - [`save_draft`] / [`load_draft`] / [`clear_draft`]: whole-state snapshots
//!   with an optional timestamp companion slot
//! - [`save_json`] / [`load_json`]: typed access to any slot
//!
//! Loading never fails: missing or malformed data means "no draft" and is
//! only reported through `tracing`.

use crate::error::StoreError;
use crate::slots::DraftSlot;
use crate::store::SlotStore;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Restored page state plus the time it was saved, when recorded
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot<T> {
    pub state: T,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Format a timestamp the way slots store it (`2024-05-01T09:30:00.000Z`)
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize `value` as JSON into `key`, overwriting any prior value
///
/// # Errors
/// [`StoreError::Serialize`] or any backend error.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn SlotStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &encoded)?;
    tracing::debug!(key, bytes = encoded.len(), "slot written");
    Ok(())
}

/// Read and decode `key`; `None` when absent, unreadable or malformed
pub fn load_json<T: DeserializeOwned>(store: &dyn SlotStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "slot unreadable");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "slot holds malformed data, ignoring");
            None
        }
    }
}

/// Write a page draft, and its timestamp when the slot keeps one
///
/// # Errors
/// Returns the first storage failure; the state slot is written before the
/// timestamp slot.
pub fn save_draft<T: Serialize + ?Sized>(
    store: &dyn SlotStore,
    slot: DraftSlot,
    state: &T,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    save_json(store, slot.key, state)?;
    if let Some(ts_key) = slot.timestamp_key {
        store.set(ts_key, &format_timestamp(now))?;
    }
    Ok(())
}

/// Read a page draft
pub fn load_draft<T: DeserializeOwned>(
    store: &dyn SlotStore,
    slot: DraftSlot,
) -> Option<DraftSnapshot<T>> {
    let state = load_json(store, slot.key)?;
    let timestamp = slot.timestamp_key.and_then(|ts_key| {
        let raw = store.get(ts_key).ok().flatten()?;
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(key = ts_key, error = %e, "draft timestamp unparseable");
                None
            }
        }
    });
    Some(DraftSnapshot { state, timestamp })
}

/// Remove a draft and its timestamp
///
/// # Errors
/// Any backend error.
pub fn clear_draft(store: &dyn SlotStore, slot: DraftSlot) -> Result<(), StoreError> {
    store.remove(slot.key)?;
    if let Some(ts_key) = slot.timestamp_key {
        store.remove(ts_key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    const SLOT: DraftSlot =
        DraftSlot::with_timestamp(slots::QUESTIONNAIRE_DRAFT, slots::QUESTIONNAIRE_TIMESTAMP);

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn save_then_load_with_timestamp() {
        let store = MemoryStore::new();
        let state = BTreeMap::from([("q1_status".to_string(), "ok".to_string())]);
        save_draft(&store, SLOT, &state, at()).unwrap();

        assert_eq!(
            store.get(slots::QUESTIONNAIRE_TIMESTAMP).unwrap().as_deref(),
            Some("2024-05-01T09:30:00.000Z")
        );
        let loaded: DraftSnapshot<BTreeMap<String, String>> = load_draft(&store, SLOT).unwrap();
        assert_eq!(loaded.state, state);
        assert_eq!(loaded.timestamp, Some(at()));
    }

    #[test]
    fn malformed_draft_is_no_draft() {
        let store = MemoryStore::new();
        store.set(slots::QUESTIONNAIRE_DRAFT, "{not json").unwrap();
        let loaded: Option<DraftSnapshot<BTreeMap<String, String>>> = load_draft(&store, SLOT);
        assert!(loaded.is_none());
    }

    #[test]
    fn bad_timestamp_keeps_state() {
        let store = MemoryStore::new();
        store.set(slots::QUESTIONNAIRE_DRAFT, "{}").unwrap();
        store.set(slots::QUESTIONNAIRE_TIMESTAMP, "yesterday").unwrap();
        let loaded: DraftSnapshot<BTreeMap<String, String>> = load_draft(&store, SLOT).unwrap();
        assert!(loaded.state.is_empty());
        assert!(loaded.timestamp.is_none());
    }

    #[test]
    fn clear_removes_both_slots() {
        let store = MemoryStore::new();
        save_draft(&store, SLOT, &Vec::<u8>::new(), at()).unwrap();
        clear_draft(&store, SLOT).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn draft_without_timestamp_slot() {
        let store = MemoryStore::new();
        let slot = DraftSlot::new(slots::CONFIG_DRAFT);
        save_draft(&store, slot, &["a"], at()).unwrap();
        assert_eq!(store.keys().unwrap(), [slots::CONFIG_DRAFT]);
        let loaded: DraftSnapshot<Vec<String>> = load_draft(&store, slot).unwrap();
        assert_eq!(loaded.timestamp, None);
    }
}
