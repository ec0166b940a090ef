//! Product-image page: at least one image per sub-assembly
//!
//! Entities come from the sub-assembly submission. Images and drafts share
//! one slot, rewritten after every attach or detach.

use crate::context::{report_persist, WizardContext};
use crate::controller::{unsupported, Navigation, PageController};
use crate::error::WizardError;
use crate::input::HostInput;
use crate::page::Page;
use crate::records::SubAssembly;
use dfm_form::{
    EventSink, FormError, FormEvent, ImageAttachment, ImageBoard, ImageCard, ImageMap, ImageSource,
    NoticeLevel, ValidityLatch,
};
use dfm_store::{load_json, save_json, slots};

/// Controller of the `product-images` page
#[derive(Debug)]
pub struct ProductImagesPage {
    ctx: WizardContext,
    entities: Vec<SubAssembly>,
    board: ImageBoard,
    latch: ValidityLatch,
}

impl ProductImagesPage {
    /// Create page; entities and images are read on load
    #[must_use]
    pub fn new(ctx: WizardContext) -> Self {
        Self {
            ctx,
            entities: Vec::new(),
            board: ImageBoard::new(0),
            latch: ValidityLatch::default(),
        }
    }

    /// Sub-assemblies images are collected for
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[SubAssembly] {
        &self.entities
    }

    /// Current attachments
    #[inline]
    #[must_use]
    pub fn board(&self) -> &ImageBoard {
        &self.board
    }

    /// One card per entity
    #[must_use]
    pub fn cards(&self) -> Vec<ImageCard> {
        self.entities
            .iter()
            .enumerate()
            .map(|(index, entity)| ImageCard {
                index,
                title: entity.name.clone(),
                subtitle: entity.category.clone(),
                images: self
                    .board
                    .images(index)
                    .iter()
                    .map(|img| img.name.clone())
                    .collect(),
            })
            .collect()
    }

    fn emit_images(&mut self, sink: &mut dyn EventSink) {
        sink.emit(FormEvent::ImagesChanged {
            cards: self.cards(),
        });
        self.latch.update(self.board.all_entities_have_images(), sink);
    }

    fn save(&self, sink: &mut dyn EventSink) -> bool {
        let result = save_json(self.ctx.store(), slots::PRODUCT_IMAGES, self.board.as_map());
        report_persist(result, slots::PRODUCT_IMAGES, sink)
    }

    fn attach(
        &mut self,
        entity: usize,
        image: ImageAttachment,
        sink: &mut dyn EventSink,
    ) -> Result<(), WizardError> {
        let name = image.name.clone();
        let count = self.board.attach(entity, image)?;
        tracing::debug!(entity, image = %name, count, "image attached");
        self.save(sink);
        self.emit_images(sink);
        Ok(())
    }

    fn detach(
        &mut self,
        entity: usize,
        position: usize,
        sink: &mut dyn EventSink,
    ) -> Result<(), WizardError> {
        let removed = self.board.detach(entity, position)?;
        tracing::debug!(entity, image = %removed.name, "image removed");
        self.save(sink);
        self.emit_images(sink);
        Ok(())
    }

    fn pick_source(
        &self,
        entity: usize,
        source: ImageSource,
        sink: &mut dyn EventSink,
    ) -> Result<(), WizardError> {
        if entity >= self.board.entity_count() {
            return Err(FormError::EntityOutOfRange {
                index: entity,
                count: self.board.entity_count(),
            }
            .into());
        }
        let label = match source {
            ImageSource::SharePoint => "SharePoint",
            ImageSource::Catalogue => "Catalogue",
            ImageSource::Gallery | ImageSource::Camera => return Ok(()),
        };
        sink.emit(FormEvent::notice(
            NoticeLevel::Info,
            format!("{label} integration is not available yet. Use the Gallery option to upload images."),
        ));
        Ok(())
    }

    fn submit(&mut self, sink: &mut dyn EventSink) -> Result<Navigation, WizardError> {
        if self.entities.is_empty() {
            return Err(WizardError::not_ready(
                "No sub-assemblies found. Please complete the Sub-Assembly Details page first.",
            ));
        }
        self.board.ensure_complete()?;
        // A failed final write is reported and does not stop navigation;
        // the images are still held by this page.
        self.save(sink);

        tracing::info!(entities = self.entities.len(), "product images submitted");
        sink.emit(FormEvent::notice(
            NoticeLevel::Success,
            "Product images saved! Proceeding...",
        ));
        let next = Page::AreaSelection;
        sink.emit(FormEvent::Submitted {
            slot: slots::PRODUCT_IMAGES.to_string(),
            next: next.slug().to_string(),
        });
        Ok(Some(next))
    }
}

impl PageController for ProductImagesPage {
    fn page(&self) -> Page {
        Page::ProductImages
    }

    fn load(&mut self, sink: &mut dyn EventSink) {
        self.entities = load_json(self.ctx.store(), slots::SUBASSEMBLIES).unwrap_or_default();
        if self.entities.is_empty() {
            sink.emit(FormEvent::notice(
                NoticeLevel::Info,
                "No sub-assemblies found. Please complete the Sub-Assembly Details page first.",
            ));
        }

        let stored: ImageMap = load_json(self.ctx.store(), slots::PRODUCT_IMAGES).unwrap_or_default();
        let had_images = !stored.is_empty();
        let (board, dropped) = ImageBoard::from_map(self.entities.len(), stored);
        if !dropped.is_empty() {
            tracing::warn!(?dropped, "discarded images of unknown sub-assemblies");
        }
        self.board = board;
        if had_images {
            tracing::info!(entities = self.board.as_map().len(), "stored images restored");
            sink.emit(FormEvent::DraftRestored {
                snapshot: serde_json::to_value(self.board.as_map()).unwrap_or_default(),
            });
        }
        self.emit_images(sink);
    }

    fn dispatch(
        &mut self,
        input: HostInput,
        sink: &mut dyn EventSink,
    ) -> Result<Navigation, WizardError> {
        match input {
            HostInput::AttachImage { entity, image } => self.attach(entity, image, sink)?,
            HostInput::DetachImage { entity, position } => self.detach(entity, position, sink)?,
            HostInput::PickSource { entity, source } => self.pick_source(entity, source, sink)?,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WizardConfig;
    use dfm_store::{MemoryStore, SlotStore};
    use dfm_test_utils::fixtures;
    use std::sync::Arc;

    fn loaded(store: Arc<MemoryStore>) -> (ProductImagesPage, Vec<FormEvent>) {
        let mut page =
            ProductImagesPage::new(WizardContext::new(store, WizardConfig::default()));
        let mut events = Vec::new();
        page.load(&mut events);
        (page, events)
    }

    fn attach(entity: usize, name: &str) -> HostInput {
        HostInput::AttachImage {
            entity,
            image: fixtures::png_attachment(name),
        }
    }

    #[test]
    fn no_handoff_means_no_entities() {
        let (page, events) = loaded(Arc::new(MemoryStore::new()));
        assert!(page.entities().is_empty());
        assert!(matches!(
            &events[0],
            FormEvent::Notice { level: NoticeLevel::Info, .. }
        ));
        assert!(events.contains(&FormEvent::ValidityChanged { valid: false }));
    }

    #[test]
    fn every_entity_needs_an_image() {
        let store = Arc::new(MemoryStore::new());
        fixtures::seed_sub_assemblies(&*store, &["Housing", "Shaft"]);
        let (mut page, _) = loaded(store.clone());

        let mut events = Vec::new();
        page.handle(attach(0, "front.png"), &mut events).unwrap();
        assert!(!events.contains(&FormEvent::ValidityChanged { valid: true }));
        assert!(matches!(
            page.handle(HostInput::Submit, &mut Vec::new()),
            Err(WizardError::Form(FormError::MissingImages { .. }))
        ));

        page.handle(attach(1, "side.png"), &mut events).unwrap();
        assert!(events.contains(&FormEvent::ValidityChanged { valid: true }));
        let next = page.handle(HostInput::Submit, &mut Vec::new()).unwrap();
        assert_eq!(next, Some(Page::AreaSelection));

        let stored: ImageMap =
            serde_json::from_str(&store.get(slots::PRODUCT_IMAGES).unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn detach_last_image_removes_key_from_slot() {
        let store = Arc::new(MemoryStore::new());
        fixtures::seed_sub_assemblies(&*store, &["Housing"]);
        let (mut page, _) = loaded(store.clone());

        page.handle(attach(0, "a.png"), &mut Vec::new()).unwrap();
        page.handle(
            HostInput::DetachImage {
                entity: 0,
                position: 0,
            },
            &mut Vec::new(),
        )
        .unwrap();
        assert_eq!(store.get(slots::PRODUCT_IMAGES).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn stored_images_restored_and_out_of_range_dropped() {
        let store = Arc::new(MemoryStore::new());
        fixtures::seed_sub_assemblies(&*store, &["Housing"]);
        let image = serde_json::to_value(fixtures::png_attachment("a.png")).unwrap();
        let stored = serde_json::json!({ "0": [image.clone()], "1": [], "4": [image] });
        store
            .set(slots::PRODUCT_IMAGES, &stored.to_string())
            .unwrap();

        let (page, events) = loaded(store);
        assert_eq!(page.board().image_count(0), 1);
        assert_eq!(page.board().as_map().len(), 1);
        assert!(matches!(events[0], FormEvent::DraftRestored { .. }));
        assert!(events.contains(&FormEvent::ValidityChanged { valid: true }));
    }

    #[test]
    fn unintegrated_source_gives_notice_only() {
        let store = Arc::new(MemoryStore::new());
        fixtures::seed_sub_assemblies(&*store, &["Housing"]);
        let (mut page, _) = loaded(store);

        let mut events = Vec::new();
        page.handle(
            HostInput::PickSource {
                entity: 0,
                source: ImageSource::SharePoint,
            },
            &mut events,
        )
        .unwrap();
        assert!(matches!(
            events.as_slice(),
            [FormEvent::Notice { level: NoticeLevel::Info, message }] if message.starts_with("SharePoint")
        ));
        assert_eq!(page.board().image_count(0), 0);
    }

    #[test]
    fn attach_to_unknown_entity_blocked() {
        let store = Arc::new(MemoryStore::new());
        fixtures::seed_sub_assemblies(&*store, &["Housing"]);
        let (mut page, _) = loaded(store);
        let mut events = Vec::new();
        let err = page.handle(attach(3, "x.png"), &mut events).unwrap_err();
        assert!(matches!(
            err,
            WizardError::Form(FormError::EntityOutOfRange { index: 3, count: 1 })
        ));
        assert!(matches!(events.as_slice(), [FormEvent::SubmitBlocked { .. }]));
    }

    #[test]
    fn quota_exceeded_keeps_image_in_memory() {
        let store = Arc::new(MemoryStore::with_quota(200));
        fixtures::seed_sub_assemblies(&*store, &["Housing"]);
        let (mut page, _) = loaded(store);

        let mut events = Vec::new();
        page.handle(attach(0, "big.png"), &mut events).unwrap();
        assert_eq!(page.board().image_count(0), 1);
        assert!(events.iter().any(|e| matches!(
            e,
            FormEvent::Notice { level: NoticeLevel::Warning, message } if message.contains("reduce image sizes")
        )));
    }
}
