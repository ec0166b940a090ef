//! Script replay and stdin driving against in-memory stores

use dfm_cli::{drive, parse_script, replay, SharedPage};
use dfm_form::{FormEvent, NoticeLevel};
use dfm_store::{slots, MemoryStore, SlotStore};
use dfm_test_utils::fixtures;
use dfm_wizard::{open_page, Page, PageController, Session, WizardConfig, WizardContext};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const CONFIG_SCRIPT: &str = r#"
# choose every step in order
{"input":"select","field":"dfmType","value":"product"}
{"input":"select","field":"division","value":"Power"}
{"input":"select","field":"businessDivision","value":"Drives"}
{"input":"select","field":"regions","value":"EU"}
{"input":"select","field":"country","value":"DE"}
{"input":"select","field":"location","value":"Aachen"}
{"input":"select","field":"projectType","value":"New"}
{"input":"submit"}
{"input":"save_draft"}
"#;

fn ctx(store: Arc<MemoryStore>) -> WizardContext {
    WizardContext::new(store, WizardConfig::default())
}

#[tokio::test]
async fn replay_stops_at_navigation() {
    let store = fixtures::memory_store();
    let mut events = Vec::new();
    let mut session = Session::open(Page::DfmConfig, ctx(store.clone()), &mut events).unwrap();

    let inputs = parse_script(CONFIG_SCRIPT).unwrap();
    assert_eq!(inputs.len(), 9);
    let report = replay(&mut session, inputs, &mut events).await;

    assert_eq!(report.applied, 8);
    assert_eq!(report.rejected, 0);
    assert_eq!(report.navigated, Some(Page::ProjectDetails));
    assert!(events.contains(&FormEvent::ValidityChanged { valid: true }));

    let stored: serde_json::Value =
        serde_json::from_str(&store.get(slots::CONFIG).unwrap().unwrap()).unwrap();
    assert_eq!(stored["projectType"], "New");
}

#[tokio::test]
async fn replay_counts_rejections_and_continues() {
    let store = fixtures::memory_store();
    let mut events = Vec::new();
    let mut session = Session::open(Page::DfmConfig, ctx(store), &mut events).unwrap();

    let inputs = parse_script(
        r#"[{"input":"select","field":"division","value":"Power"},
            {"input":"select","field":"dfmType","value":"product"},
            {"input":"submit"}]"#,
    )
    .unwrap();
    let report = replay(&mut session, inputs, &mut events).await;

    assert_eq!(report.applied, 1);
    assert_eq!(report.rejected, 2);
    assert_eq!(report.navigated, None);
    let blocked = events
        .iter()
        .filter(|e| matches!(e, FormEvent::SubmitBlocked { .. }))
        .count();
    assert_eq!(blocked, 2);
}

#[tokio::test]
async fn drive_reads_lines_until_eof() {
    let store = fixtures::memory_store();
    let mut controller = open_page(Page::ParticipantDetails, ctx(store)).unwrap();
    controller.load(&mut Vec::new());
    let page: SharedPage = Arc::new(Mutex::new(controller));

    let input: &[u8] = b"{\"input\":\"add_row\"}\nnot json\n\n{\"input\":\"delete_row\",\"row\":99}\n";
    let mut events = Vec::new();
    let report = drive(&page, input, &mut events).await.unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(report.rejected, 2);
    assert!(events.iter().any(|e| matches!(
        e,
        FormEvent::Notice { level: NoticeLevel::Error, message } if message.starts_with("Unreadable input")
    )));
}

#[tokio::test]
async fn drive_attaches_files_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let front = dir.path().join("front.png");
    let notes = dir.path().join("notes.txt");
    std::fs::write(&front, fixtures::PNG_BYTES).unwrap();
    std::fs::write(&notes, "not an image").unwrap();

    let store = fixtures::memory_store();
    fixtures::seed_sub_assemblies(&*store, &["Housing"]);
    let mut controller = open_page(Page::ProductImages, ctx(store.clone())).unwrap();
    controller.load(&mut Vec::new());
    let page: SharedPage = Arc::new(Mutex::new(controller));

    let line = serde_json::json!({
        "input": "attach_files",
        "entity": 0,
        "paths": [front, notes],
    })
    .to_string();
    let script = format!("{line}\n{{\"input\":\"submit\"}}\n");
    let mut events = Vec::new();
    let report = drive(&page, script.as_bytes(), &mut events).await.unwrap();

    assert_eq!(report.navigated, Some(Page::AreaSelection));
    let stored: serde_json::Value =
        serde_json::from_str(&store.get(slots::PRODUCT_IMAGES).unwrap().unwrap()).unwrap();
    assert_eq!(stored["0"].as_array().map(Vec::len), Some(1));
    assert_eq!(stored["0"][0]["name"], "front.png");
}
