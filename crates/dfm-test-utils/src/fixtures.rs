//! Canned rows, images and stored slots

use dfm_form::{ImageAttachment, ImageSource, RowValues};
use dfm_store::{slots, MemoryStore, SlotStore};
use serde_json::json;
use std::sync::Arc;

/// Smallest byte string that passes for a PNG
pub const PNG_BYTES: [u8; 12] = [
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D,
];

/// Field/value pairs of a fully filled participant row
#[must_use]
pub fn complete_participant() -> [(&'static str, &'static str); 5] {
    [
        ("firstName", "Jo"),
        ("lastName", "Doe"),
        ("location", "Aachen, DE"),
        ("organization", "Acme"),
        ("role", "QA"),
    ]
}

/// Field/value pairs of a fully filled sub-assembly row
#[must_use]
pub fn complete_sub_assembly(name: &str) -> [(&'static str, String); 5] {
    [
        ("name", name.to_string()),
        ("category", "Mech".to_string()),
        ("process1", "Cast".to_string()),
        ("process2", "Mill".to_string()),
        ("process3", "Paint".to_string()),
    ]
}

/// Row values of a complete sub-assembly
#[must_use]
pub fn sub_assembly_row(name: &str) -> RowValues {
    complete_sub_assembly(name)
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// A gallery PNG attachment
///
/// # Panics
/// Never; the MIME type is fixed.
#[must_use]
pub fn png_attachment(name: &str) -> ImageAttachment {
    ImageAttachment::from_bytes(name, "image/png", &PNG_BYTES, ImageSource::Gallery)
        .expect("image/png is an image type")
}

/// Store the submitted sub-assembly list the image page reads on load
///
/// # Panics
/// When the store rejects the write.
pub fn seed_sub_assemblies<S: SlotStore + ?Sized>(store: &S, names: &[&str]) {
    let rows: Vec<RowValues> = names.iter().map(|n| sub_assembly_row(n)).collect();
    store
        .set(slots::SUBASSEMBLIES, &json!(rows).to_string())
        .expect("seeding sub-assemblies");
}

/// Empty in-memory store behind an `Arc`
#[must_use]
pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}
