//! Page controller seam
//!
//! A controller owns one page's state. The host calls [`PageController::load`]
//! once, then feeds inputs through [`PageController::handle`]; everything the
//! host must show arrives as [`FormEvent`]s on the sink.

use crate::context::WizardContext;
use crate::error::WizardError;
use crate::input::HostInput;
use crate::page::Page;
use crate::pages::{
    AreaSelectionPage, ConfigurationPage, ProductImagesPage, ProjectDetailsPage,
    QuestionnairePage, RowPage,
};
use dfm_form::{EventSink, FormEvent, NoticeLevel};

/// Outcome of a handled input: `Some(page)` when the host should navigate
pub type Navigation = Option<Page>;

/// State and behavior of one wizard page
pub trait PageController: Send {
    /// Page this controller drives
    fn page(&self) -> Page;

    /// Restore any stored draft and emit the initial render events
    fn load(&mut self, sink: &mut dyn EventSink);

    /// Apply one input
    ///
    /// On error nothing has changed. Prefer [`PageController::handle`],
    /// which also reports the error to the sink.
    fn dispatch(
        &mut self,
        input: HostInput,
        sink: &mut dyn EventSink,
    ) -> Result<Navigation, WizardError>;

    /// Periodic autosave hook
    fn on_timer(&mut self, sink: &mut dyn EventSink);

    /// Apply one input and surface any error as an event
    ///
    /// Blocking errors become [`FormEvent::SubmitBlocked`], the rest a
    /// warning notice.
    fn handle(
        &mut self,
        input: HostInput,
        sink: &mut dyn EventSink,
    ) -> Result<Navigation, WizardError> {
        let name = input.name();
        let result = match input {
            HostInput::Tick => {
                self.on_timer(sink);
                Ok(None)
            }
            other => self.dispatch(other, sink),
        };
        if let Err(e) = &result {
            tracing::debug!(page = %self.page(), input = name, error = %e, "input rejected");
            report_error(e, sink);
        }
        result
    }
}

impl<C: PageController + ?Sized> PageController for Box<C> {
    fn page(&self) -> Page {
        (**self).page()
    }

    fn load(&mut self, sink: &mut dyn EventSink) {
        (**self).load(sink);
    }

    fn dispatch(
        &mut self,
        input: HostInput,
        sink: &mut dyn EventSink,
    ) -> Result<Navigation, WizardError> {
        (**self).dispatch(input, sink)
    }

    fn on_timer(&mut self, sink: &mut dyn EventSink) {
        (**self).on_timer(sink);
    }

    fn handle(
        &mut self,
        input: HostInput,
        sink: &mut dyn EventSink,
    ) -> Result<Navigation, WizardError> {
        (**self).handle(input, sink)
    }
}

/// Emit the event matching an error's class
pub fn report_error(error: &WizardError, sink: &mut dyn EventSink) {
    if error.is_blocking() {
        sink.emit(FormEvent::SubmitBlocked {
            reason: error.user_message(),
        });
    } else {
        sink.emit(FormEvent::notice(NoticeLevel::Warning, error.user_message()));
    }
}

/// Build the controller for a page
///
/// The controller is not loaded yet; call [`PageController::load`].
///
/// # Errors
/// [`WizardError::NotAForm`] for pages without a form.
pub fn open_page(page: Page, ctx: WizardContext) -> Result<Box<dyn PageController>, WizardError> {
    let controller: Box<dyn PageController> = match page {
        Page::DfmConfig => Box::new(ConfigurationPage::new(ctx)),
        Page::ProjectDetails => Box::new(ProjectDetailsPage::new(ctx)),
        Page::ParticipantDetails => Box::new(RowPage::participants(ctx)),
        Page::SubassemblyDetails => Box::new(RowPage::sub_assemblies(ctx)),
        Page::ProductImages => Box::new(ProductImagesPage::new(ctx)),
        Page::AreaSelection => Box::new(AreaSelectionPage::new(ctx)),
        Page::QuestionnaireFull => Box::new(QuestionnairePage::new(ctx)),
        other => return Err(WizardError::NotAForm(other)),
    };
    Ok(controller)
}

/// Error for an input the page does not understand
pub(crate) fn unsupported(page: Page, input: &HostInput) -> WizardError {
    WizardError::UnsupportedInput {
        page,
        input: input.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WizardConfig;
    use dfm_store::MemoryStore;
    use std::sync::Arc;

    fn ctx() -> WizardContext {
        WizardContext::new(Arc::new(MemoryStore::new()), WizardConfig::default())
    }

    #[test]
    fn every_form_page_opens() {
        for page in Page::ALL {
            match open_page(page, ctx()) {
                Ok(controller) => {
                    assert!(page.has_form());
                    assert_eq!(controller.page(), page);
                }
                Err(WizardError::NotAForm(p)) => {
                    assert!(!p.has_form());
                }
                Err(other) => panic!("unexpected error {other}"),
            }
        }
    }

    #[test]
    fn unsupported_input_is_reported_as_blocked() {
        let mut page = open_page(Page::AreaSelection, ctx()).unwrap();
        let mut events = Vec::new();
        let err = page.handle(HostInput::AddRow, &mut events).unwrap_err();
        assert!(matches!(err, WizardError::UnsupportedInput { .. }));
        assert!(matches!(events.as_slice(), [FormEvent::SubmitBlocked { .. }]));
    }
}
