//! Wizard configuration
//!
//! Loaded from TOML; every key is optional and a missing file yields the
//! defaults.

use crate::error::WizardError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Question keys of the full questionnaire, in display order
pub const DEFAULT_QUESTIONS: [&str; 8] = [
    "material_selection",
    "part_count",
    "tolerances",
    "assembly_sequence",
    "fastening",
    "surface_treatment",
    "testability",
    "serviceability",
];

/// Wizard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Seconds between autosaves
    pub autosave_interval_secs: u64,
    /// Empty rows shown on a fresh row page
    pub initial_rows: usize,
    /// Directory of the file-backed store
    pub store_dir: PathBuf,
    /// Total bytes the store may hold
    pub quota_bytes: Option<usize>,
    /// Question keys of the full questionnaire
    pub questions: Vec<String>,
}

impl WizardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With autosave interval
    #[inline]
    #[must_use]
    pub fn with_autosave_interval(mut self, secs: u64) -> Self {
        self.autosave_interval_secs = secs;
        self
    }

    /// With initial row count
    #[inline]
    #[must_use]
    pub fn with_initial_rows(mut self, rows: usize) -> Self {
        self.initial_rows = rows;
        self
    }

    /// With store directory
    #[inline]
    #[must_use]
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// With storage quota
    #[inline]
    #[must_use]
    pub fn with_quota(mut self, bytes: Option<usize>) -> Self {
        self.quota_bytes = bytes;
        self
    }

    /// With questionnaire keys
    #[must_use]
    pub fn with_questions<I, S>(mut self, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.questions = questions.into_iter().map(Into::into).collect();
        self
    }

    /// Autosave interval as a duration
    #[inline]
    #[must_use]
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// [`WizardError::Config`] on malformed TOML or invalid values.
    pub fn from_toml(text: &str) -> Result<Self, WizardError> {
        let config: Self = toml::from_str(text).map_err(|e| WizardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file; a missing file yields the defaults
    ///
    /// # Errors
    /// [`WizardError::Config`] when the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, WizardError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml(&text)?;
                tracing::debug!(path = %path.display(), "configuration loaded");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(WizardError::Config(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }

    /// Check value ranges
    ///
    /// # Errors
    /// [`WizardError::Config`] naming the offending key.
    pub fn validate(&self) -> Result<(), WizardError> {
        if self.autosave_interval_secs == 0 {
            return Err(WizardError::Config(
                "autosave_interval_secs must be positive".into(),
            ));
        }
        if self.questions.is_empty() {
            return Err(WizardError::Config("questions must not be empty".into()));
        }
        if let Some(dup) = self
            .questions
            .iter()
            .enumerate()
            .find(|(i, q)| self.questions[..*i].contains(q))
            .map(|(_, q)| q)
        {
            return Err(WizardError::Config(format!("duplicate question '{dup}'")));
        }
        Ok(())
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: 30,
            initial_rows: 5,
            store_dir: PathBuf::from(".dfm-store"),
            quota_bytes: None,
            questions: DEFAULT_QUESTIONS.iter().map(|q| (*q).to_string()).collect(),
        }
    }
}
