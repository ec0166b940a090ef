//! String-valued slot stores
//!
//! [`SlotStore`] mirrors browser-local key/value storage: string keys,
//! string values, whole-value overwrite, optional size quota. Two backends:
//! - [`MemoryStore`]: process-local map, used by tests and embedding hosts
//! - [`FileStore`]: one `<key>.json` file per slot under a directory

use crate::error::StoreError;
use crate::slots::is_valid_key;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

/// Key/value slot storage
pub trait SlotStore: Send + Sync {
    /// Read a slot; `Ok(None)` when absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite a slot
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a slot; deleting an absent slot is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All stored keys, sorted
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

fn check_key(key: &str) -> Result<(), StoreError> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Create unbounded store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store that refuses writes beyond `quota_bytes` in total
    /// (keys plus values)
    #[inline]
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: Mutex::new(BTreeMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes used by all slots
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.slots
            .lock()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl SlotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        Ok(self.slots.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let mut guard = self.slots.lock();
        if let Some(limit) = self.quota_bytes {
            let others: usize = guard
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        self.slots.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.slots.lock().keys().cloned().collect())
    }
}

const SLOT_EXT: &str = "json";

/// Directory-backed store, one file per slot
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    quota_bytes: Option<usize>,
    // Serializes read-modify-write of the quota check against other writers
    // in this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`
    ///
    /// # Errors
    /// [`StoreError::Io`] when the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io_error(&root, e))?;
        Ok(Self {
            root,
            quota_bytes: None,
            write_lock: Mutex::new(()),
        })
    }

    /// With a total size quota
    #[inline]
    #[must_use]
    pub fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{SLOT_EXT}"))
    }

    fn used_bytes_except(&self, key: &str) -> Result<usize, StoreError> {
        let mut total = 0usize;
        for other in self.keys()? {
            if other == key {
                continue;
            }
            let path = self.path_for(&other);
            let meta = fs::metadata(&path).map_err(|e| StoreError::io_error(&path, e))?;
            total += other.len() + usize::try_from(meta.len()).unwrap_or(usize::MAX);
        }
        Ok(total)
    }
}

impl SlotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let _guard = self.write_lock.lock();

        if let Some(limit) = self.quota_bytes {
            let needed = self.used_bytes_except(key)? + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        let path = self.path_for(key);
        let tmp = self.root.join(format!(".{key}.tmp"));
        fs::write(&tmp, value).map_err(|e| StoreError::io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io_error(&path, e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io_error(&self.root, e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io_error(&self.root, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_key(stem) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
