//! Sequential step gating
//!
//! Steps are unlocked strictly in order: step `n + 1` becomes enabled only
//! once step `n` holds a non-empty value. Step indices are 1-based and
//! `current_step` counts completed steps, so the next selectable step is
//! always `current_step + 1`.

use crate::error::FormError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One stage of a gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardStep {
    /// Stable field key (e.g. `division`)
    pub key: String,
    /// Whether the control may be used
    pub enabled: bool,
    /// Whether a value has been accepted for this step
    pub completed: bool,
    /// Accepted value, empty until completed
    pub value: String,
}

impl WizardStep {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            enabled: false,
            completed: false,
            value: String::new(),
        }
    }

    fn reset(&mut self) {
        self.enabled = false;
        self.completed = false;
        self.value.clear();
    }
}

/// Progress of a gate, as rendered by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Completed steps
    pub current: usize,
    /// Total steps
    pub total: usize,
    /// `current / total * 100`
    pub percentage: f64,
    /// Human-readable progress line
    pub text: String,
}

/// Gate enforcing in-order selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepGate {
    steps: Vec<WizardStep>,
    current_step: usize,
}

impl StepGate {
    /// Create a gate over the given keys, with the first step enabled
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut steps: Vec<WizardStep> = keys.into_iter().map(WizardStep::new).collect();
        if let Some(first) = steps.first_mut() {
            first.enabled = true;
        }
        Self {
            steps,
            current_step: 0,
        }
    }

    /// Number of completed steps
    #[inline]
    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Step by 1-based index
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&WizardStep> {
        index.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// All steps in order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    /// 1-based index of a key
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.key == key).map(|i| i + 1)
    }

    /// Every step is complete; the final confirmation may be enabled
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty() && self.current_step == self.steps.len()
    }

    /// Check whether `index` may be selected next, without mutating
    pub fn validate_selection(&self, index: usize) -> Result<(), FormError> {
        let total = self.steps.len();
        if index == 0 || index > total {
            return Err(FormError::StepOutOfRange { index, total });
        }
        let expected = self.current_step + 1;
        if index != expected {
            return Err(FormError::StepOutOfOrder {
                requested: index,
                expected,
            });
        }
        Ok(())
    }

    /// Accept a value for step `index`
    ///
    /// Takes effect only when `index == current_step + 1` and the value is
    /// not blank. On success the step is completed, the next step (if any)
    /// is enabled and the new progress is returned. On failure nothing
    /// changes.
    pub fn select_step(&mut self, index: usize, value: &str) -> Result<Progress, FormError> {
        self.validate_selection(index)?;
        let value = value.trim();
        if value.is_empty() {
            return Err(FormError::EmptySelection { index });
        }

        let slot = index - 1;
        let step = &mut self.steps[slot];
        step.value = value.to_string();
        step.completed = true;
        step.enabled = true;
        self.current_step = index;

        if let Some(next) = self.steps.get_mut(index) {
            next.enabled = true;
        }

        tracing::debug!(step = index, key = %self.steps[slot].key, "step selected");
        Ok(self.progress())
    }

    /// Reset step `index` and everything after it
    ///
    /// Step `index` stays enabled (when its predecessors are complete) so it
    /// can be chosen again; later steps are disabled. Used when an earlier
    /// choice is revised.
    pub fn clear_from(&mut self, index: usize) -> Result<Progress, FormError> {
        let total = self.steps.len();
        if index == 0 || index > total {
            return Err(FormError::StepOutOfRange { index, total });
        }

        for step in &mut self.steps[index - 1..] {
            step.reset();
        }
        self.current_step = self.current_step.min(index - 1);
        // Only re-enable when everything before it is still complete.
        self.steps[index - 1].enabled = self.current_step == index - 1;

        tracing::debug!(step = index, "steps cleared");
        Ok(self.progress())
    }

    /// Current progress
    #[must_use]
    pub fn progress(&self) -> Progress {
        let total = self.steps.len();
        #[allow(clippy::cast_precision_loss)]
        let percentage = if total == 0 {
            0.0
        } else {
            self.current_step as f64 / total as f64 * 100.0
        };
        Progress {
            current: self.current_step,
            total,
            percentage,
            text: format!("Step {} of {} completed", self.current_step, total),
        }
    }

    /// Accepted values keyed by step key, in step order (blank when unset)
    #[must_use]
    pub fn selections(&self) -> IndexMap<String, String> {
        self.steps
            .iter()
            .map(|s| (s.key.clone(), s.value.clone()))
            .collect()
    }
}
