//! Caller-facing events
//!
//! Form operations never render anything themselves. They report what
//! changed through an [`EventSink`] and the host decides how to show it.

use crate::rows::RenderedRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Informational, e.g. a scheduling hint
    Info,
    /// Confirmation, e.g. "draft saved"
    Success,
    /// Non-fatal problem, e.g. storage quota exceeded
    Warning,
    /// Failed user action
    Error,
}

/// Render-ready summary of one entity's images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCard {
    /// 0-based entity index
    pub index: usize,
    /// Entity title
    pub title: String,
    /// Entity subtitle (category)
    pub subtitle: String,
    /// File names of attached images, in order
    pub images: Vec<String>,
}

impl ImageCard {
    /// Whether the card has at least one image
    #[inline]
    #[must_use]
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Event emitted by a form operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    /// Submit enablement changed
    ValidityChanged {
        /// New enablement
        valid: bool,
    },
    /// Progress indicator changed
    ProgressChanged {
        /// 0 to 100
        percentage: f64,
        /// Progress line
        text: String,
    },
    /// Row table must be re-rendered
    RowsChanged {
        /// Rows in display order
        rows: Vec<RenderedRow>,
        /// Complete rows
        complete: usize,
        /// Rows with any data
        filled: usize,
    },
    /// Image cards must be re-rendered
    ImagesChanged {
        /// One card per entity
        cards: Vec<ImageCard>,
    },
    /// Per-field errors of a single-record form changed
    FieldsChanged {
        /// Field name → message, for touched fields that are invalid
        errors: BTreeMap<String, String>,
    },
    /// An action was refused
    SubmitBlocked {
        /// Message for the user
        reason: String,
    },
    /// A stored draft was applied
    DraftRestored {
        /// The draft as stored
        snapshot: serde_json::Value,
    },
    /// Transient message
    Notice {
        /// Severity
        level: NoticeLevel,
        /// Message for the user
        message: String,
    },
    /// Final data stored; the host should navigate
    Submitted {
        /// Slot holding the submission
        slot: String,
        /// Page to navigate to
        next: String,
    },
}

impl FormEvent {
    /// Shorthand for a notice
    #[must_use]
    pub fn notice(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self::Notice {
            level,
            message: message.into(),
        }
    }
}

/// Receiver of form events
pub trait EventSink {
    /// Deliver one event
    fn emit(&mut self, event: FormEvent);
}

impl EventSink for Vec<FormEvent> {
    fn emit(&mut self, event: FormEvent) {
        self.push(event);
    }
}

/// Sink forwarding to a closure
pub struct FnSink<F>(pub F);

impl<F: FnMut(FormEvent)> EventSink for FnSink<F> {
    fn emit(&mut self, event: FormEvent) {
        (self.0)(event);
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: FormEvent) {}
}

/// Remembers the last reported validity so only changes are emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityLatch {
    last: Option<bool>,
}

impl ValidityLatch {
    /// Report `valid`, emitting [`FormEvent::ValidityChanged`] if it differs
    /// from the last report (or nothing was reported yet)
    pub fn update(&mut self, valid: bool, sink: &mut dyn EventSink) {
        if self.last != Some(valid) {
            self.last = Some(valid);
            sink.emit(FormEvent::ValidityChanged { valid });
        }
    }

    /// Last reported value
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<bool> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_emits_only_on_change() {
        let mut events = Vec::new();
        let mut latch = ValidityLatch::default();
        latch.update(false, &mut events);
        latch.update(false, &mut events);
        latch.update(true, &mut events);
        assert_eq!(
            events,
            [
                FormEvent::ValidityChanged { valid: false },
                FormEvent::ValidityChanged { valid: true }
            ]
        );
    }

    #[test]
    fn fn_sink_forwards() {
        let mut count = 0;
        {
            let mut sink = FnSink(|_: FormEvent| count += 1);
            sink.emit(FormEvent::notice(NoticeLevel::Info, "hi"));
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn events_serialize_tagged() {
        let json = serde_json::to_value(FormEvent::SubmitBlocked {
            reason: "nope".into(),
        })
        .unwrap();
        assert_eq!(json["event"], "submit_blocked");
        assert_eq!(json["reason"], "nope");
    }
}
