//! Project-details page: seven required fields, four of them dates
//!
//! Errors are only reported for touched fields (blurred, or all of them
//! once submit was attempted); submit enablement always considers every
//! field.

use crate::context::{report_persist, WizardContext};
use crate::controller::{unsupported, Navigation, PageController};
use crate::error::WizardError;
use crate::input::HostInput;
use crate::page::Page;
use chrono::NaiveDate;
use dfm_form::{EventSink, FormError, FormEvent, NoticeLevel, ValidityLatch};
use dfm_store::{load_draft, save_draft, save_json, slots, DraftSlot};
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};

/// Field keys, in form order
pub const PROJECT_FIELDS: [&str; 7] = [
    "projectType",
    "nplmNumber",
    "customerName",
    "startDateG40",
    "completionDateG40",
    "startDateG50",
    "completionDateG50",
];

const DRAFT: DraftSlot = DraftSlot::new(slots::PROJECT_DETAILS_DRAFT);
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A gate's start and completion fields
#[derive(Debug, Clone, Copy)]
struct Milestone {
    label: &'static str,
    start: &'static str,
    completion: &'static str,
}

const G40: Milestone = Milestone {
    label: "G40",
    start: "startDateG40",
    completion: "completionDateG40",
};

const G50: Milestone = Milestone {
    label: "G50",
    start: "startDateG50",
    completion: "completionDateG50",
};

fn is_date_field(field: &str) -> bool {
    field.contains("Date")
}

/// Controller of the `project-details` page
#[derive(Debug)]
pub struct ProjectDetailsPage {
    ctx: WizardContext,
    values: IndexMap<String, String>,
    touched: BTreeSet<String>,
    latch: ValidityLatch,
}

impl ProjectDetailsPage {
    /// Create page with every field empty
    #[must_use]
    pub fn new(ctx: WizardContext) -> Self {
        Self {
            ctx,
            values: PROJECT_FIELDS
                .iter()
                .map(|f| ((*f).to_string(), String::new()))
                .collect(),
            touched: BTreeSet::new(),
            latch: ValidityLatch::default(),
        }
    }

    /// Current raw values
    #[inline]
    #[must_use]
    pub fn values(&self) -> &IndexMap<String, String> {
        &self.values
    }

    fn value(&self, field: &str) -> &str {
        self.values.get(field).map_or("", |v| v.trim())
    }

    fn date(&self, field: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.value(field), DATE_FORMAT).ok()
    }

    /// Problem with one field, ignoring touched state
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<String> {
        let value = self.value(field);
        if value.is_empty() {
            return Some("This field is required".into());
        }
        if !is_date_field(field) {
            return None;
        }
        let Some(date) = self.date(field) else {
            return Some("Enter a date as YYYY-MM-DD".into());
        };
        if date < self.ctx.today() {
            return Some("Date cannot be in the past".into());
        }
        for milestone in [G40, G50] {
            if field == milestone.completion {
                if let Some(start) = self.date(milestone.start) {
                    if start >= date {
                        return Some("Completion date must be after start date".into());
                    }
                }
            }
        }
        None
    }

    /// Errors of touched fields
    #[must_use]
    pub fn errors(&self) -> BTreeMap<String, String> {
        self.touched
            .iter()
            .filter_map(|f| self.field_error(f).map(|e| (f.clone(), e)))
            .collect()
    }

    /// Every field valid
    #[must_use]
    pub fn is_valid(&self) -> bool {
        PROJECT_FIELDS.iter().all(|f| self.field_error(f).is_none())
    }

    fn emit_state(&mut self, sink: &mut dyn EventSink) {
        sink.emit(FormEvent::FieldsChanged {
            errors: self.errors(),
        });
        self.latch.update(self.is_valid(), sink);
    }

    /// Scheduling notices for the current dates
    fn check_schedule(&self, sink: &mut dyn EventSink) {
        for milestone in [G40, G50] {
            if let (Some(start), Some(end)) =
                (self.date(milestone.start), self.date(milestone.completion))
            {
                if start >= end {
                    sink.emit(FormEvent::notice(
                        NoticeLevel::Warning,
                        format!(
                            "{} completion date must be after start date",
                            milestone.label
                        ),
                    ));
                }
            }
        }
        if let (Some(g40_end), Some(g50_start)) =
            (self.date(G40.completion), self.date(G50.start))
        {
            if g50_start < g40_end {
                sink.emit(FormEvent::notice(
                    NoticeLevel::Info,
                    "Note: G50 typically starts after G40 completion",
                ));
            }
        }
    }

    fn known(&self, field: &str) -> Result<(), FormError> {
        if self.values.contains_key(field) {
            Ok(())
        } else {
            Err(FormError::UnknownField(field.to_string()))
        }
    }

    fn set_field(&mut self, field: &str, value: String, sink: &mut dyn EventSink) -> Result<(), WizardError> {
        self.known(field)?;
        if let Some(slot) = self.values.get_mut(field) {
            *slot = value;
        }
        if is_date_field(field) {
            self.check_schedule(sink);
        }
        self.emit_state(sink);
        Ok(())
    }

    fn blur(&mut self, field: &str, sink: &mut dyn EventSink) -> Result<(), WizardError> {
        self.known(field)?;
        self.touched.insert(field.to_string());
        self.emit_state(sink);
        Ok(())
    }

    fn save(&self, sink: &mut dyn EventSink) -> bool {
        let result = save_draft(self.ctx.store(), DRAFT, &self.values, self.ctx.now());
        report_persist(result, "project details draft", sink)
    }

    fn submit(&mut self, sink: &mut dyn EventSink) -> Result<Navigation, WizardError> {
        self.touched
            .extend(PROJECT_FIELDS.iter().map(|f| (*f).to_string()));
        self.emit_state(sink);
        self.check_schedule(sink);
        if !self.is_valid() {
            return Err(WizardError::not_ready(
                "Please fill in all required fields correctly",
            ));
        }

        self.save(sink);
        let record: IndexMap<&str, &str> = PROJECT_FIELDS
            .iter()
            .map(|f| (*f, self.value(f)))
            .collect();
        save_json(self.ctx.store(), slots::PROJECT_DETAILS, &record)?;

        tracing::info!(
            project_type = self.value("projectType"),
            nplm = self.value("nplmNumber"),
            "project details submitted"
        );
        sink.emit(FormEvent::notice(
            NoticeLevel::Success,
            "Project details saved successfully!",
        ));
        let next = Page::ParticipantDetails;
        sink.emit(FormEvent::Submitted {
            slot: slots::PROJECT_DETAILS.to_string(),
            next: next.slug().to_string(),
        });
        Ok(Some(next))
    }
}

impl PageController for ProjectDetailsPage {
    fn page(&self) -> Page {
        Page::ProjectDetails
    }

    fn load(&mut self, sink: &mut dyn EventSink) {
        if let Some(draft) = load_draft::<IndexMap<String, String>>(self.ctx.store(), DRAFT) {
            for (field, value) in &draft.state {
                match self.values.get_mut(field) {
                    Some(slot) => {
                        slot.clone_from(value);
                        if !value.trim().is_empty() {
                            self.touched.insert(field.clone());
                        }
                    }
                    None => tracing::debug!(field = %field, "ignoring unknown drafted field"),
                }
            }
            tracing::info!("project details draft restored");
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
            HostInput::SetField { field, value } | HostInput::Select { field, value } => {
                self.set_field(&field, value, sink)?;
            }
            HostInput::Blur { field } => self.blur(&field, sink)?,
            HostInput::SaveDraft => {
                if self.save(sink) {
                    sink.emit(FormEvent::notice(NoticeLevel::Success, "Draft saved successfully!"));
                }
            }
            HostInput::Submit => return self.submit(sink),
            other => return Err(unsupported(self.page(), &other)),
        }
        Ok(None)
    }

    fn on_timer(&mut self, sink: &mut dyn EventSink) {
        self.save(sink);
    }
}
