//! Walk the form pages in order over one store

use chrono::{TimeZone, Utc};
use dfm_form::{FormEvent, RowValues};
use dfm_store::{load_draft, slots, DraftSlot, MemoryStore, SlotStore};
use dfm_test_utils::fixtures;
use dfm_wizard::prelude::*;
use dfm_wizard::records::SubAssembly;
use dfm_wizard::FixedClock;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn context(store: Arc<MemoryStore>, rows: usize) -> WizardContext {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
    WizardContext::new(store, WizardConfig::default().with_initial_rows(rows))
        .with_clock(Arc::new(clock))
}

fn open(page: Page, ctx: &WizardContext) -> Box<dyn PageController> {
    let mut controller = open_page(page, ctx.clone()).unwrap();
    controller.load(&mut Vec::new());
    controller
}

fn send(page: &mut dyn PageController, input: HostInput) -> Navigation {
    page.handle(input, &mut Vec::new()).unwrap()
}

fn select(field: &str, value: &str) -> HostInput {
    HostInput::Select {
        field: field.into(),
        value: value.into(),
    }
}

fn update(row: usize, field: &str, value: impl Into<String>) -> HostInput {
    HostInput::UpdateRow {
        row,
        field: field.into(),
        value: value.into(),
    }
}

#[test]
fn three_rows_one_complete_submits_one_and_drafts_three() {
    let store = fixtures::memory_store();
    let ctx = context(store.clone(), 3);
    let mut page = open(Page::ParticipantDetails, &ctx);

    for (field, value) in fixtures::complete_participant() {
        send(page.as_mut(), update(1, field, value));
    }
    assert_eq!(send(page.as_mut(), HostInput::Submit), Some(Page::SubassemblyDetails));

    let submitted: Vec<RowValues> =
        serde_json::from_str(&store.get(slots::PARTICIPANTS).unwrap().unwrap()).unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0]["firstName"], "Jo");
    assert_eq!(submitted[0]["location"], "Aachen, DE");

    let draft = load_draft::<Vec<RowValues>>(
        &*store,
        DraftSlot::new(slots::PARTICIPANTS_DRAFT),
    )
    .unwrap();
    assert_eq!(draft.state.len(), 3);
    assert_eq!(draft.state[0]["role"], "QA");
    assert!(draft.state[1].values().all(String::is_empty));
    assert!(draft.state[2].values().all(String::is_empty));
}

#[test]
fn full_intake_reaches_questionnaire_and_home() {
    let store = fixtures::memory_store();
    let ctx = context(store.clone(), 1);

    // Configuration
    let mut page = open(Page::DfmConfig, &ctx);
    for (i, key) in dfm_wizard::pages::CONFIG_STEPS.iter().enumerate() {
        send(page.as_mut(), select(key, &format!("choice-{i}")));
    }
    assert_eq!(send(page.as_mut(), HostInput::Submit), Some(Page::ProjectDetails));

    // Project details
    let mut page = open(Page::ProjectDetails, &ctx);
    let values = [
        ("projectType", "New product"),
        ("nplmNumber", "NPLM-42"),
        ("customerName", "Acme"),
        ("startDateG40", "2024-07-01"),
        ("completionDateG40", "2024-09-01"),
        ("startDateG50", "2024-09-15"),
        ("completionDateG50", "2024-12-01"),
    ];
    for (field, value) in values {
        send(
            page.as_mut(),
            HostInput::SetField {
                field: field.into(),
                value: value.into(),
            },
        );
    }
    assert_eq!(send(page.as_mut(), HostInput::Submit), Some(Page::ParticipantDetails));

    // Participants
    let mut page = open(Page::ParticipantDetails, &ctx);
    for (field, value) in fixtures::complete_participant() {
        send(page.as_mut(), update(1, field, value));
    }
    assert_eq!(send(page.as_mut(), HostInput::Submit), Some(Page::SubassemblyDetails));

    // Sub-assemblies, handed off to the image page
    let mut page = open(Page::SubassemblyDetails, &ctx);
    send(page.as_mut(), HostInput::AddRow);
    for (row, name) in [(1, "Housing"), (2, "Shaft")] {
        for (field, value) in fixtures::complete_sub_assembly(name) {
            send(page.as_mut(), update(row, field, value));
        }
    }
    assert_eq!(send(page.as_mut(), HostInput::Submit), Some(Page::ProductImages));

    // Product images
    let mut images = dfm_wizard::pages::ProductImagesPage::new(ctx.clone());
    images.load(&mut Vec::new());
    assert_eq!(
        images.entities().iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        ["Housing", "Shaft"]
    );
    for entity in 0..2 {
        send(
            &mut images,
            HostInput::AttachImage {
                entity,
                image: fixtures::png_attachment(&format!("view-{entity}.png")),
            },
        );
    }
    assert_eq!(send(&mut images, HostInput::Submit), Some(Page::AreaSelection));

    // Area selection
    let mut page = open(Page::AreaSelection, &ctx);
    send(page.as_mut(), select("area", "Assembly"));
    send(page.as_mut(), select("questionnaireType", "full"));
    assert_eq!(send(page.as_mut(), HostInput::Submit), Some(Page::QuestionnaireFull));

    // Questionnaire
    let mut page = open(Page::QuestionnaireFull, &ctx);
    for key in dfm_wizard::DEFAULT_QUESTIONS {
        send(page.as_mut(), select(&format!("{key}_status"), "ok"));
    }
    assert_eq!(send(page.as_mut(), HostInput::Submit), Some(Page::Home));

    let keys = store.keys().unwrap();
    for slot in [
        slots::CONFIG,
        slots::PROJECT_DETAILS,
        slots::PARTICIPANTS,
        slots::SUBASSEMBLIES,
        slots::PRODUCT_IMAGES,
        slots::AREA_SELECTION,
        slots::QUESTIONNAIRE,
    ] {
        assert!(keys.iter().any(|k| k == slot), "missing {slot}");
    }
    assert!(!keys.iter().any(|k| k == slots::QUESTIONNAIRE_DRAFT));

    let subs: Vec<SubAssembly> =
        serde_json::from_str(&store.get(slots::SUBASSEMBLIES).unwrap().unwrap()).unwrap();
    assert_eq!(subs[1].name, "Shaft");
}

#[test]
fn reopened_pages_restore_their_drafts() {
    let store = fixtures::memory_store();
    let ctx = context(store.clone(), 2);

    let mut page = open(Page::DfmConfig, &ctx);
    send(page.as_mut(), select("dfmType", "product"));
    send(page.as_mut(), select("division", "Power"));
    send(page.as_mut(), HostInput::Tick);

    let mut rows = open(Page::SubassemblyDetails, &ctx);
    send(rows.as_mut(), update(2, "name", "Gearbox"));
    send(rows.as_mut(), HostInput::SaveDraft);

    let mut events = Vec::new();
    let mut config = open_page(Page::DfmConfig, ctx.clone()).unwrap();
    config.load(&mut events);
    assert!(matches!(events[0], FormEvent::DraftRestored { .. }));
    assert!(events.contains(&FormEvent::ProgressChanged {
        percentage: 2.0 / 7.0 * 100.0,
        text: "Step 2 of 7 completed".into(),
    }));

    let mut events = Vec::new();
    let mut rows = open_page(Page::SubassemblyDetails, ctx).unwrap();
    rows.load(&mut events);
    assert!(events.iter().any(|e| matches!(
        e,
        FormEvent::RowsChanged { rows, complete: 0, filled: 1 } if rows.len() == 2
    )));
}
