//! Shared page context: store, clock and configuration
//!
//! Every page controller owns a clone of [`WizardContext`]; there is no
//! global state.

use crate::config::WizardConfig;
use chrono::{DateTime, NaiveDate, Utc};
use dfm_form::{EventSink, FormEvent, NoticeLevel};
use dfm_store::{FileStore, SlotStore, StoreError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    at: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Clock frozen at `at`
    #[must_use]
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at: Mutex::new(at) }
    }

    /// Move the clock
    pub fn set(&self, at: DateTime<Utc>) {
        *self.at.lock() = at;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.at.lock()
    }
}

/// Everything a page needs besides its own state
#[derive(Clone)]
pub struct WizardContext {
    store: Arc<dyn SlotStore>,
    clock: Arc<dyn Clock>,
    config: Arc<WizardConfig>,
}

impl std::fmt::Debug for WizardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WizardContext {
    /// Create context using the wall clock
    #[must_use]
    pub fn new(store: Arc<dyn SlotStore>, config: WizardConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config: Arc::new(config),
        }
    }

    /// Open the file-backed store named by `config`
    ///
    /// # Errors
    /// [`StoreError::Io`] when the store directory cannot be created.
    pub fn open(config: WizardConfig) -> Result<Self, StoreError> {
        let store = FileStore::open(&config.store_dir)?.with_quota(config.quota_bytes);
        Ok(Self::new(Arc::new(store), config))
    }

    /// With a different clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Slot store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &dyn SlotStore {
        self.store.as_ref()
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// Current instant
    #[inline]
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current calendar date
    #[inline]
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

/// Turn a storage failure into a warning notice
///
/// Returns whether the write succeeded. The caller's in-memory state stays
/// as it is either way.
pub(crate) fn report_persist(
    result: Result<(), StoreError>,
    what: &str,
    sink: &mut dyn EventSink,
) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(what, error = %e, "persist failed");
            sink.emit(FormEvent::notice(NoticeLevel::Warning, e.user_message()));
            false
        }
    }
}
