// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use cupflow_model::OrderDraft;
use cupflow_store::OrderStore;

use crate::{sheet, IngestError};

/// Rows committed per transaction while importing.
pub const CHUNK_SIZE: usize = 20;

/// Progress reported while an import runs, serialized one object per line
/// to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportEvent {
    Parsing,
    Processing {
        total: usize,
        processed: usize,
        percent: u8,
    },
    CheckingShipped,
    Done {
        created: usize,
        updated: usize,
        shipped: usize,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub shipped: usize,
}

/// Decodes the uploaded workbook and runs the full import, reporting
/// progress through `on_event`. Emits every event except `error`; a failure
/// is returned to the caller to report.
pub fn run_import(
    store: &mut OrderStore,
    bytes: &[u8],
    on_event: impl FnMut(&ImportEvent),
) -> Result<ImportSummary, IngestError> {
    let mut on_event = on_event;
    on_event(&ImportEvent::Parsing);
    let drafts = sheet::read_order_drafts(bytes)?;
    run_import_drafts(store, &drafts, on_event)
}

/// Import driver over already-decoded rows. Chunks commit independently, so
/// a failure partway through leaves earlier chunks in place. The auto-ship
/// sweep only runs once every row has landed; an empty sheet is rejected
/// rather than swept, since sweeping against nothing would ship every order
/// still in production.
pub fn run_import_drafts(
    store: &mut OrderStore,
    drafts: &[OrderDraft],
    mut on_event: impl FnMut(&ImportEvent),
) -> Result<ImportSummary, IngestError> {
    if drafts.is_empty() {
        return Err(IngestError("no orders found in sheet".to_string()));
    }
    let total = drafts.len();
    let mut summary = ImportSummary::default();
    let mut processed = 0usize;
    for chunk in drafts.chunks(CHUNK_SIZE) {
        let (created, updated) = store.upsert_chunk(chunk)?;
        summary.created += created;
        summary.updated += updated;
        processed += chunk.len();
        on_event(&ImportEvent::Processing {
            total,
            processed,
            percent: percent_of(processed, total),
        });
    }

    on_event(&ImportEvent::CheckingShipped);
    let imported_ids: Vec<String> = drafts
        .iter()
        .map(|d| d.marketplace_order_id.clone())
        .collect();
    summary.shipped = store.mark_shipped_missing(&imported_ids)?;

    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        shipped = summary.shipped,
        "import finished"
    );
    on_event(&ImportEvent::Done {
        created: summary.created,
        updated: summary.updated,
        shipped: summary.shipped,
    });
    Ok(summary)
}

fn percent_of(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((processed * 100) / total) as u8
}
