//! Row-table pages: participants and sub-assemblies
//!
//! Both pages share one controller parameterised by a [`RowTable`]:
//! schema, draft and final slots, and the page that follows.

use crate::context::{report_persist, WizardContext};
use crate::controller::{unsupported, Navigation, PageController};
use crate::error::WizardError;
use crate::input::HostInput;
use crate::page::Page;
use crate::records::{participant_schema, sub_assembly_schema};
use dfm_form::{
    EventSink, FormEvent, NoticeLevel, RowCollection, RowId, RowSchema, RowValues, ValidityLatch,
};
use dfm_store::{load_draft, save_draft, save_json, slots, DraftSlot};

/// What distinguishes one row page from another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTable {
    pub page: Page,
    pub schema: RowSchema,
    pub draft: DraftSlot,
    pub submission_slot: &'static str,
    pub next: Page,
}

impl RowTable {
    /// The participant table
    #[must_use]
    pub fn participants() -> Self {
        Self {
            page: Page::ParticipantDetails,
            schema: participant_schema(),
            draft: DraftSlot::new(slots::PARTICIPANTS_DRAFT),
            submission_slot: slots::PARTICIPANTS,
            next: Page::SubassemblyDetails,
        }
    }

    /// The sub-assembly table
    #[must_use]
    pub fn sub_assemblies() -> Self {
        Self {
            page: Page::SubassemblyDetails,
            schema: sub_assembly_schema(),
            draft: DraftSlot::new(slots::SUBASSEMBLIES_DRAFT),
            submission_slot: slots::SUBASSEMBLIES,
            next: Page::ProductImages,
        }
    }
}

/// Controller of a row-table page
#[derive(Debug)]
pub struct RowPage {
    ctx: WizardContext,
    table: RowTable,
    rows: RowCollection,
    latch: ValidityLatch,
}

impl RowPage {
    /// Create page with the configured number of empty rows
    #[must_use]
    pub fn new(ctx: WizardContext, table: RowTable) -> Self {
        let rows = RowCollection::with_rows(table.schema.clone(), ctx.config().initial_rows);
        Self {
            ctx,
            table,
            rows,
            latch: ValidityLatch::default(),
        }
    }

    /// Participant page
    #[must_use]
    pub fn participants(ctx: WizardContext) -> Self {
        Self::new(ctx, RowTable::participants())
    }

    /// Sub-assembly page
    #[must_use]
    pub fn sub_assemblies(ctx: WizardContext) -> Self {
        Self::new(ctx, RowTable::sub_assemblies())
    }

    /// Current rows
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &RowCollection {
        &self.rows
    }

    fn row_id(&self, number: usize) -> Result<RowId, WizardError> {
        self.rows.id_at(number).ok_or(WizardError::RowOutOfRange {
            number,
            count: self.rows.len(),
        })
    }

    fn emit_rows(&mut self, sink: &mut dyn EventSink) {
        sink.emit(FormEvent::RowsChanged {
            rows: self.rows.render(),
            complete: self.rows.complete_count(),
            filled: self.rows.filled_count(),
        });
        self.latch.update(self.rows.can_submit(), sink);
    }

    fn save(&self, sink: &mut dyn EventSink) -> bool {
        let result = save_draft(
            self.ctx.store(),
            self.table.draft,
            &self.rows.draft(),
            self.ctx.now(),
        );
        report_persist(result, self.table.draft.key, sink)
    }

    fn submit(&mut self, sink: &mut dyn EventSink) -> Result<Navigation, WizardError> {
        let records = self.rows.submission()?;
        self.save(sink);
        save_json(self.ctx.store(), self.table.submission_slot, &records)?;

        tracing::info!(
            entity = %self.table.schema.entity,
            count = records.len(),
            "rows submitted"
        );
        sink.emit(FormEvent::Submitted {
            slot: self.table.submission_slot.to_string(),
            next: self.table.next.slug().to_string(),
        });
        Ok(Some(self.table.next))
    }
}

impl PageController for RowPage {
    fn page(&self) -> Page {
        self.table.page
    }

    fn load(&mut self, sink: &mut dyn EventSink) {
        if let Some(draft) = load_draft::<Vec<RowValues>>(self.ctx.store(), self.table.draft) {
            let restored = self.rows.restore(&draft.state);
            if restored > 0 {
                tracing::info!(entity = %self.table.schema.entity, restored, "row draft restored");
                sink.emit(FormEvent::DraftRestored {
                    snapshot: serde_json::to_value(&draft.state).unwrap_or_default(),
                });
            }
        }
        self.emit_rows(sink);
    }

    fn dispatch(
        &mut self,
        input: HostInput,
        sink: &mut dyn EventSink,
    ) -> Result<Navigation, WizardError> {
        match input {
            HostInput::AddRow => {
                self.rows.add_row();
            }
            HostInput::DeleteRow { row } => {
                let id = self.row_id(row)?;
                self.rows.delete_row(id)?;
            }
            HostInput::UpdateRow { row, field, value } => {
                let id = self.row_id(row)?;
                self.rows.update_field(id, &field, value)?;
            }
            HostInput::SaveDraft => {
                if self.save(sink) {
                    sink.emit(FormEvent::notice(NoticeLevel::Success, "Draft saved successfully!"));
                }
                return Ok(None);
            }
            HostInput::Submit => return self.submit(sink),
            other => return Err(unsupported(self.page(), &other)),
        }
        self.emit_rows(sink);
        Ok(None)
    }

    fn on_timer(&mut self, sink: &mut dyn EventSink) {
        self.save(sink);
    }
}
