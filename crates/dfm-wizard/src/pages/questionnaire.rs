//! Full questionnaire page
//!
//! Each question has a required `<key>_status` answer; `ok` means no
//! finding. Any other field is free text kept alongside. Every change
//! autosaves the draft and its timestamp; submission clears both.

use crate::context::{report_persist, WizardContext};
use crate::controller::{unsupported, Navigation, PageController};
use crate::error::WizardError;
use crate::input::HostInput;
use crate::page::Page;
use dfm_form::{EventSink, FormError, FormEvent, NoticeLevel, ValidityLatch};
use dfm_store::{clear_draft, format_timestamp, is_valid_key, load_draft, save_draft, save_json, slots, DraftSlot};
use indexmap::IndexMap;
use serde_json::{Map, Value};

const DRAFT: DraftSlot =
    DraftSlot::with_timestamp(slots::QUESTIONNAIRE_DRAFT, slots::QUESTIONNAIRE_TIMESTAMP);

const STATUS_SUFFIX: &str = "_status";
const STATUS_OK: &str = "ok";

/// Controller of the `questionnaire-full` page
#[derive(Debug)]
pub struct QuestionnairePage {
    ctx: WizardContext,
    questions: Vec<String>,
    answers: IndexMap<String, String>,
    latch: ValidityLatch,
}

impl QuestionnairePage {
    /// Create page over the configured questions
    #[must_use]
    pub fn new(ctx: WizardContext) -> Self {
        let questions = ctx.config().questions.clone();
        Self {
            ctx,
            questions,
            answers: IndexMap::new(),
            latch: ValidityLatch::default(),
        }
    }

    /// All answers, status and free text
    #[inline]
    #[must_use]
    pub fn answers(&self) -> &IndexMap<String, String> {
        &self.answers
    }

    /// Question key of a status field
    fn question_of<'a>(&self, field: &'a str) -> Option<&'a str> {
        field
            .strip_suffix(STATUS_SUFFIX)
            .filter(|q| self.questions.iter().any(|k| k == q))
    }

    fn status(&self, question: &str) -> Option<&str> {
        self.answers
            .get(&format!("{question}{STATUS_SUFFIX}"))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Questions with a status
    #[must_use]
    pub fn completed(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.status(q).is_some())
            .count()
    }

    /// Number of questions
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Rounded completion percentage
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.completed() as f64 / self.total() as f64;
        (ratio * 100.0).round()
    }

    fn emit_progress(&mut self, sink: &mut dyn EventSink) {
        sink.emit(FormEvent::ProgressChanged {
            percentage: self.percentage(),
            text: format!(
                "{} of {} questions completed",
                self.completed(),
                self.total()
            ),
        });
        self.latch.update(self.completed() == self.total(), sink);
    }

    fn save(&self, sink: &mut dyn EventSink) -> bool {
        let result = save_draft(self.ctx.store(), DRAFT, &self.answers, self.ctx.now());
        report_persist(result, "questionnaire draft", sink)
    }

    fn set(&mut self, field: &str, value: String, sink: &mut dyn EventSink) -> Result<(), WizardError> {
        if !is_valid_key(field) {
            return Err(FormError::UnknownField(field.to_string()).into());
        }
        if field.ends_with(STATUS_SUFFIX) && self.question_of(field).is_none() {
            return Err(FormError::UnknownField(field.to_string()).into());
        }
        let is_status = self.question_of(field).is_some();
        let flagged = is_status && !value.is_empty() && value != STATUS_OK;

        if is_status && value.is_empty() {
            self.answers.shift_remove(field);
        } else {
            self.answers.insert(field.to_string(), value);
        }

        self.emit_progress(sink);
        if flagged {
            sink.emit(FormEvent::notice(
                NoticeLevel::Warning,
                "This item needs attention. Please describe the issue in the comments.",
            ));
        }
        self.save(sink);
        Ok(())
    }

    fn save_explicit(&self, sink: &mut dyn EventSink) {
        if self.save(sink) {
            sink.emit(FormEvent::notice(NoticeLevel::Success, "Draft saved successfully!"));
        } else {
            sink.emit(FormEvent::notice(NoticeLevel::Error, "Error saving draft"));
        }
    }

    fn submit(&mut self, sink: &mut dyn EventSink) -> Result<Navigation, WizardError> {
        let missing = self.total() - self.completed();
        if missing > 0 {
            return Err(WizardError::not_ready(
                "Please complete all required status selections",
            ));
        }

        let mut record: Map<String, Value> = self
            .answers
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        record.insert(
            "submittedAt".into(),
            Value::String(format_timestamp(self.ctx.now())),
        );
        record.insert("totalQuestions".into(), self.total().into());
        record.insert("completedQuestions".into(), self.completed().into());
        save_json(self.ctx.store(), slots::QUESTIONNAIRE, &record)?;
        report_persist(clear_draft(self.ctx.store(), DRAFT), "questionnaire draft", sink);

        tracing::info!(questions = self.total(), "questionnaire submitted");
        sink.emit(FormEvent::notice(
            NoticeLevel::Success,
            "Assessment submitted successfully! Proceeding...",
        ));
        let next = Page::Home;
        sink.emit(FormEvent::Submitted {
            slot: slots::QUESTIONNAIRE.to_string(),
            next: next.slug().to_string(),
        });
        Ok(Some(next))
    }
}

impl PageController for QuestionnairePage {
    fn page(&self) -> Page {
        Page::QuestionnaireFull
    }

    fn load(&mut self, sink: &mut dyn EventSink) {
        if let Some(draft) = load_draft::<IndexMap<String, String>>(self.ctx.store(), DRAFT) {
            for (field, value) in &draft.state {
                let unknown_status =
                    field.ends_with(STATUS_SUFFIX) && self.question_of(field).is_none();
                if unknown_status || !is_valid_key(field) {
                    tracing::debug!(field = %field, "ignoring unknown drafted answer");
                    continue;
                }
                self.answers.insert(field.clone(), value.clone());
            }
            tracing::info!(saved_at = ?draft.timestamp, "questionnaire draft restored");
            sink.emit(FormEvent::DraftRestored {
                snapshot: serde_json::to_value(&draft.state).unwrap_or_default(),
            });
            sink.emit(FormEvent::notice(
                NoticeLevel::Info,
                "Draft restored from previous session",
            ));
        }
        self.emit_progress(sink);
    }

    fn dispatch(
        &mut self,
        input: HostInput,
        sink: &mut dyn EventSink,
    ) -> Result<Navigation, WizardError> {
        match input {
            HostInput::Select { field, value } | HostInput::SetField { field, value } => {
                self.set(&field, value, sink)?;
            }
            HostInput::SaveDraft => self.save_explicit(sink),
            HostInput::Submit => return self.submit(sink),
            other => return Err(unsupported(self.page(), &other)),
        }
        Ok(None)
    }

    fn on_timer(&mut self, sink: &mut dyn EventSink) {
        self.save(sink);
    }
}
