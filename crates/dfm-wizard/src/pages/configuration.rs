//! Configuration page: seven dropdowns unlocked in sequence

use crate::context::{report_persist, WizardContext};
use crate::controller::{unsupported, Navigation, PageController};
use crate::error::WizardError;
use crate::input::HostInput;
use crate::page::Page;
use dfm_form::{EventSink, FormError, FormEvent, NoticeLevel, StepGate, ValidityLatch};
use dfm_store::{load_draft, save_draft, save_json, slots, DraftSlot};
use indexmap::IndexMap;

/// Step keys, in the order they unlock
pub const CONFIG_STEPS: [&str; 7] = [
    "dfmType",
    "division",
    "businessDivision",
    "regions",
    "country",
    "location",
    "projectType",
];

const DRAFT: DraftSlot = DraftSlot::new(slots::CONFIG_DRAFT);

/// Controller of the `dfm-config` page
#[derive(Debug)]
pub struct ConfigurationPage {
    ctx: WizardContext,
    gate: StepGate,
    latch: ValidityLatch,
}

impl ConfigurationPage {
    /// Create page with no selections
    #[must_use]
    pub fn new(ctx: WizardContext) -> Self {
        Self {
            ctx,
            gate: StepGate::new(CONFIG_STEPS),
            latch: ValidityLatch::default(),
        }
    }

    /// Underlying gate
    #[inline]
    #[must_use]
    pub fn gate(&self) -> &StepGate {
        &self.gate
    }

    fn emit_state(&mut self, sink: &mut dyn EventSink) {
        let progress = self.gate.progress();
        sink.emit(FormEvent::ProgressChanged {
            percentage: progress.percentage,
            text: progress.text,
        });
        self.latch.update(self.gate.is_complete(), sink);
    }

    fn save(&self, sink: &mut dyn EventSink) -> bool {
        let result = save_draft(self.ctx.store(), DRAFT, &self.gate.selections(), self.ctx.now());
        report_persist(result, "configuration draft", sink)
    }

    fn step_index(&self, field: &str) -> Result<usize, FormError> {
        self.gate
            .index_of(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))
    }

    fn select(&mut self, field: &str, value: &str, sink: &mut dyn EventSink) -> Result<(), WizardError> {
        let index = self.step_index(field)?;
        if value.trim().is_empty() {
            tracing::debug!(field, "blank selection ignored");
            return Ok(());
        }
        self.gate.select_step(index, value)?;
        self.emit_state(sink);
        Ok(())
    }

    fn clear_from(&mut self, field: &str, sink: &mut dyn EventSink) -> Result<(), WizardError> {
        let index = self.step_index(field)?;
        self.gate.clear_from(index)?;
        self.emit_state(sink);
        Ok(())
    }

    fn submit(&mut self, sink: &mut dyn EventSink) -> Result<Navigation, WizardError> {
        if !self.gate.is_complete() {
            return Err(WizardError::not_ready(format!(
                "Please complete all {} configuration steps before proceeding.",
                self.gate.total_steps()
            )));
        }
        self.save(sink);
        save_json(self.ctx.store(), slots::CONFIG, &self.gate.selections())?;

        tracing::info!(selections = ?self.gate.selections(), "configuration submitted");
        let next = Page::ProjectDetails;
        sink.emit(FormEvent::Submitted {
            slot: slots::CONFIG.to_string(),
            next: next.slug().to_string(),
        });
        Ok(Some(next))
    }
}

impl PageController for ConfigurationPage {
    fn page(&self) -> Page {
        Page::DfmConfig
    }

    fn load(&mut self, sink: &mut dyn EventSink) {
        if let Some(draft) = load_draft::<IndexMap<String, String>>(self.ctx.store(), DRAFT) {
            // Replay in step order so gating applies; stop at the first gap.
            for (i, key) in CONFIG_STEPS.iter().enumerate() {
                let Some(value) = draft.state.get(*key) else {
                    break;
                };
                if self.gate.select_step(i + 1, value).is_err() {
                    break;
                }
            }
            tracing::info!(restored = self.gate.current_step(), "configuration draft restored");
            sink.emit(FormEvent::DraftRestored {
                snapshot: serde_json::to_value(&draft.state).unwrap_or_default(),
            });
        }
        self.emit_state(sink);
    }

    fn dispatch(
        &mut self,
        input: HostInput,
        sink: &mut dyn EventSink,
    ) -> Result<Navigation, WizardError> {
        match input {
            HostInput::Select { field, value } => self.select(&field, &value, sink).map(|()| None),
            HostInput::ClearFrom { field } => self.clear_from(&field, sink).map(|()| None),
            HostInput::SaveDraft => {
                if self.save(sink) {
                    sink.emit(FormEvent::notice(
                        NoticeLevel::Success,
                        "Draft saved successfully!",
                    ));
                }
                Ok(None)
            }
            HostInput::Submit => self.submit(sink),
            other => Err(unsupported(self.page(), &other)),
        }
    }

    fn on_timer(&mut self, sink: &mut dyn EventSink) {
        self.save(sink);
    }
}
