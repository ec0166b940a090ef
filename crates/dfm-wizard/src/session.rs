//! One page session: a loaded controller plus async input handling

use crate::context::WizardContext;
use crate::controller::{open_page, Navigation, PageController};
use crate::error::WizardError;
use crate::input::HostInput;
use crate::page::Page;
use crate::reader::{attach_completions, read_images};
use dfm_form::EventSink;

/// A loaded page controller
pub struct Session {
    controller: Box<dyn PageController>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("page", &self.controller.page())
            .finish()
    }
}

impl Session {
    /// Open and load `page`
    ///
    /// # Errors
    /// [`WizardError::NotAForm`] for pages without a form.
    pub fn open(page: Page, ctx: WizardContext, sink: &mut dyn EventSink) -> Result<Self, WizardError> {
        let mut controller = open_page(page, ctx)?;
        controller.load(sink);
        tracing::debug!(%page, "page loaded");
        Ok(Self { controller })
    }

    /// Page of this session
    #[inline]
    #[must_use]
    pub fn page(&self) -> Page {
        self.controller.page()
    }

    /// Underlying controller
    #[inline]
    pub fn controller_mut(&mut self) -> &mut dyn PageController {
        self.controller.as_mut()
    }

    /// Apply one input, reading image files when asked to
    ///
    /// # Errors
    /// Whatever the controller rejects; the error has already been
    /// reported on `sink`.
    pub async fn apply(
        &mut self,
        input: HostInput,
        sink: &mut dyn EventSink,
    ) -> Result<Navigation, WizardError> {
        match input {
            HostInput::AttachFiles {
                entity,
                paths,
                source,
            } => {
                let requested = paths.len();
                let attached =
                    attach_completions(self.controller.as_mut(), entity, read_images(paths, source), sink)
                        .await;
                tracing::debug!(entity, requested, attached, "files attached");
                Ok(None)
            }
            other => self.controller.handle(other, sink),
        }
    }

    /// Autosave hook
    pub fn tick(&mut self, sink: &mut dyn EventSink) {
        self.controller.on_timer(sink);
    }
}
