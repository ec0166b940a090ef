//! Area-selection page: area, then questionnaire type, then sub-area
//!
//! A three-field gate with downstream reset. The stored record embeds its
//! own save time and is rewritten on every accepted change.

use crate::context::{report_persist, WizardContext};
use crate::controller::{unsupported, Navigation, PageController};
use crate::error::WizardError;
use crate::input::HostInput;
use crate::page::Page;
use dfm_form::{EventSink, FormError, FormEvent, ValidityLatch};
use dfm_store::{format_timestamp, load_json, save_json, slots};
use serde::{Deserialize, Serialize};

/// Which questionnaire follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionnaireType {
    Full,
    SubArea,
}

impl QuestionnaireType {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "full" => Some(Self::Full),
            "sub_area" => Some(Self::SubArea),
            _ => None,
        }
    }

    /// Stored value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::SubArea => "sub_area",
        }
    }

    /// Questionnaire page for this type
    #[must_use]
    pub const fn page(self) -> Page {
        match self {
            Self::Full => Page::QuestionnaireFull,
            Self::SubArea => Page::QuestionnaireSubarea,
        }
    }
}

/// Stored shape of `dfm_area_selection`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaSelection {
    pub area: String,
    pub questionnaire_type: String,
    pub sub_area: String,
    pub timestamp: String,
}

/// Controller of the `area-selection` page
#[derive(Debug)]
pub struct AreaSelectionPage {
    ctx: WizardContext,
    area: String,
    kind: Option<QuestionnaireType>,
    sub_area: String,
    latch: ValidityLatch,
}

impl AreaSelectionPage {
    /// Create page with nothing selected
    #[must_use]
    pub fn new(ctx: WizardContext) -> Self {
        Self {
            ctx,
            area: String::new(),
            kind: None,
            sub_area: String::new(),
            latch: ValidityLatch::default(),
        }
    }

    /// Selected questionnaire type
    #[inline]
    #[must_use]
    pub fn questionnaire_type(&self) -> Option<QuestionnaireType> {
        self.kind
    }

    /// Selected area, empty when unset
    #[inline]
    #[must_use]
    pub fn area(&self) -> &str {
        &self.area
    }

    /// Selected sub-area, empty when unset
    #[inline]
    #[must_use]
    pub fn sub_area(&self) -> &str {
        &self.sub_area
    }

    /// Whether the type control is usable
    #[inline]
    #[must_use]
    pub fn type_enabled(&self) -> bool {
        !self.area.is_empty()
    }

    /// Whether the sub-area control is usable
    #[inline]
    #[must_use]
    pub fn sub_area_enabled(&self) -> bool {
        self.kind == Some(QuestionnaireType::SubArea)
    }

    /// Submit enablement
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.area.is_empty() {
            return false;
        }
        match self.kind {
            Some(QuestionnaireType::Full) => true,
            Some(QuestionnaireType::SubArea) => !self.sub_area.is_empty(),
            None => false,
        }
    }

    /// Snapshot as stored
    #[must_use]
    pub fn record(&self) -> AreaSelection {
        AreaSelection {
            area: self.area.clone(),
            questionnaire_type: self.kind.map(QuestionnaireType::as_str).unwrap_or_default().to_string(),
            sub_area: self.sub_area.clone(),
            timestamp: format_timestamp(self.ctx.now()),
        }
    }

    fn save(&self, sink: &mut dyn EventSink) -> bool {
        let result = save_json(self.ctx.store(), slots::AREA_SELECTION, &self.record());
        report_persist(result, slots::AREA_SELECTION, sink)
    }

    /// Apply one choice without saving; returns whether a value was accepted
    fn apply(&mut self, field: &str, value: &str) -> Result<bool, FormError> {
        let value = value.trim();
        match field {
            "area" => {
                if value.is_empty() {
                    self.area.clear();
                    self.kind = None;
                    self.sub_area.clear();
                    return Ok(false);
                }
                self.area = value.to_string();
                Ok(true)
            }
            "questionnaireType" => {
                if !self.type_enabled() {
                    return Err(FormError::StepOutOfOrder {
                        requested: 2,
                        expected: 1,
                    });
                }
                if value.is_empty() {
                    self.kind = None;
                    self.sub_area.clear();
                    return Ok(false);
                }
                let kind = QuestionnaireType::parse(value).ok_or_else(|| FormError::InvalidField {
                    field: field.to_string(),
                    reason: format!("'{value}' is not a questionnaire type"),
                })?;
                if kind == QuestionnaireType::Full {
                    self.sub_area.clear();
                }
                self.kind = Some(kind);
                Ok(true)
            }
            "subArea" => {
                if !self.sub_area_enabled() {
                    return Err(FormError::StepOutOfOrder {
                        requested: 3,
                        expected: if self.type_enabled() { 2 } else { 1 },
                    });
                }
                self.sub_area = value.to_string();
                Ok(!value.is_empty())
            }
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }

    fn select(&mut self, field: &str, value: &str, sink: &mut dyn EventSink) -> Result<(), WizardError> {
        if self.apply(field, value)? {
            self.save(sink);
        }
        tracing::debug!(field, value, valid = self.is_valid(), "area selection changed");
        self.latch.update(self.is_valid(), sink);
        Ok(())
    }

    fn submit(&mut self, sink: &mut dyn EventSink) -> Result<Navigation, WizardError> {
        let Some(kind) = self.kind.filter(|_| self.is_valid()) else {
            return Err(WizardError::not_ready(
                "Please select an area and questionnaire type before continuing.",
            ));
        };
        save_json(self.ctx.store(), slots::AREA_SELECTION, &self.record())?;

        tracing::info!(area = %self.area, kind = kind.as_str(), "area selection submitted");
        let next = kind.page();
        sink.emit(FormEvent::Submitted {
            slot: slots::AREA_SELECTION.to_string(),
            next: next.slug().to_string(),
        });
        Ok(Some(next))
    }
}

impl PageController for AreaSelectionPage {
    fn page(&self) -> Page {
        Page::AreaSelection
    }

    fn load(&mut self, sink: &mut dyn EventSink) {
        if let Some(stored) = load_json::<AreaSelection>(self.ctx.store(), slots::AREA_SELECTION) {
            // Replay through the gate so inconsistent records are trimmed.
            let replay = [
                ("area", &stored.area),
                ("questionnaireType", &stored.questionnaire_type),
                ("subArea", &stored.sub_area),
            ];
            for (field, value) in replay {
                if value.is_empty() || !matches!(self.apply(field, value), Ok(true)) {
                    break;
                }
            }
            tracing::info!(area = %self.area, "area selection restored");
            sink.emit(FormEvent::DraftRestored {
                snapshot: serde_json::to_value(&stored).unwrap_or_default(),
            });
        }
        self.latch.update(self.is_valid(), sink);
    }

    fn dispatch(
        &mut self,
        input: HostInput,
        sink: &mut dyn EventSink,
    ) -> Result<Navigation, WizardError> {
        match input {
            HostInput::Select { field, value } => self.select(&field, &value, sink)?,
            HostInput::ClearFrom { field } => self.select(&field, "", sink)?,
            HostInput::SaveDraft => {
                self.save(sink);
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
