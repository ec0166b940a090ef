//! Line-oriented host
//!
//! Inputs arrive one JSON object per line and every event leaves as one
//! JSON line. An autosave task runs beside the input loop and shares the
//! page through a mutex.

use crate::script::{parse_line, ReplayReport};
use dfm_form::{EventSink, FormEvent, NoticeLevel};
use dfm_store::{SlotStore, StoreError};
use dfm_wizard::{attach_result, read_images, HostInput, PageController};
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Shared page driven by the input loop and the autosave task
pub type SharedPage = Arc<Mutex<Box<dyn PageController>>>;

/// One event as a JSON line
#[must_use]
pub fn event_line(event: &FormEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "event not serializable");
        format!("{{\"event\":\"unserializable\",\"debug\":{:?}}}", format!("{event:?}"))
    })
}

/// Sink printing each event to stdout
pub fn stdout_sink() -> impl EventSink {
    dfm_form::FnSink(|event: FormEvent| println!("{}", event_line(&event)))
}

/// Every slot key with the byte length of its value
///
/// # Errors
/// Whatever the store reports.
pub fn slot_sizes(store: &dyn SlotStore) -> Result<Vec<(String, usize)>, StoreError> {
    let mut sizes = Vec::new();
    for key in store.keys()? {
        if let Some(value) = store.get(&key)? {
            sizes.push((key, value.len()));
        }
    }
    Ok(sizes)
}

/// A slot value, pretty-printed when it is JSON
///
/// # Errors
/// Whatever the store reports.
pub fn render_slot(store: &dyn SlotStore, key: &str) -> Result<Option<String>, StoreError> {
    Ok(store.get(key)?.map(|raw| {
        serde_json::from_str::<serde_json::Value>(&raw)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or(raw)
    }))
}

/// Read inputs from `reader` until end of input or navigation
///
/// Unparseable lines produce an error notice and are counted as rejected.
///
/// # Errors
/// Only when reading from `reader` fails.
pub async fn drive<R>(
    page: &SharedPage,
    reader: R,
    sink: &mut dyn EventSink,
) -> std::io::Result<ReplayReport>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut report = ReplayReport::default();

    while let Some(line) = lines.next_line().await? {
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                sink.emit(FormEvent::notice(
                    NoticeLevel::Error,
                    format!("Unreadable input: {e}"),
                ));
                report.rejected += 1;
                continue;
            }
        };

        let result = match input {
            HostInput::AttachFiles {
                entity,
                paths,
                source,
            } => {
                let mut reads = read_images(paths, source);
                while let Some(read) = reads.next().await {
                    let mut guard = page.lock();
                    attach_result(&mut **guard, entity, read, sink);
                }
                Ok(None)
            }
            other => page.lock().handle(other, sink),
        };

        match result {
            Ok(next) => {
                report.applied += 1;
                if next.is_some() {
                    report.navigated = next;
                    break;
                }
            }
            Err(_) => report.rejected += 1,
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfm_store::MemoryStore;

    #[test]
    fn event_lines_are_tagged() {
        let line = event_line(&FormEvent::ValidityChanged { valid: true });
        assert_eq!(line, r#"{"event":"validity_changed","valid":true}"#);
    }

    #[test]
    fn slot_listing_and_pretty_print() {
        let store = MemoryStore::new();
        store.set("dfm_config", r#"{"dfmType":"product"}"#).unwrap();
        store.set("dfm_questionnaire_full_timestamp", "2024-05-01T09:30:00.000Z").unwrap();

        let sizes = slot_sizes(&store).unwrap();
        assert_eq!(sizes[0], ("dfm_config".to_string(), 21));
        assert_eq!(sizes.len(), 2);

        let pretty = render_slot(&store, "dfm_config").unwrap().unwrap();
        assert!(pretty.contains("\n  \"dfmType\": \"product\""));
        assert_eq!(
            render_slot(&store, "dfm_questionnaire_full_timestamp").unwrap().as_deref(),
            Some("2024-05-01T09:30:00.000Z")
        );
        assert_eq!(render_slot(&store, "dfm_area_selection").unwrap(), None);
    }
}
