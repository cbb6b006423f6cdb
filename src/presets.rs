//! Program presets kept in a small settings spreadsheet.
//!
//! Cells B1..B5 of its first sheet hold, in order: the id of the tracked
//! spreadsheet currently in use, the plea signature (the names of the
//! hosting coordinators), and the three draft bodies with merge tags.
//! Loading the presets at startup guarantees every coordinator points at the
//! same tracked spreadsheet.

use crate::sheets::{RecordStore, SheetsError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presets {
    pub tracked_spreadsheet_id: String,
    pub plea_signature: String,
    pub receipt_body: String,
    pub pairing_body: String,
    pub plea_body: String,
}

impl Presets {
    pub async fn load(store: &impl RecordStore) -> Result<Self, SheetsError> {
        let rows = store.read_range("B1:B5").await?;
        let cell = |i: usize| -> String {
            rows.get(i)
                .and_then(|row| row.first())
                .cloned()
                .unwrap_or_default()
        };
        Ok(Presets {
            tracked_spreadsheet_id: cell(0),
            plea_signature: cell(1),
            receipt_body: cell(2),
            pairing_body: cell(3),
            plea_body: cell(4),
        })
    }
}
