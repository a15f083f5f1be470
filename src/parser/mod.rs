pub mod extract;
pub mod page;

use tracing::warn;

use crate::db::{RecordRow, ScrapedPage};

pub struct PageOutcome {
    pub page_data_id: i64,
    pub records: Vec<RecordRow>,
    /// Timeline entries on this page whose assembly failed.
    pub errors: usize,
}

/// Two-pass pipeline: page body → raw timeline entries → structured records.
///
/// An entry that fails assembly is logged and counted, never silently
/// dropped; the rest of the page still goes through.
pub fn process_page(page: &ScrapedPage) -> PageOutcome {
    let raws = page::timeline_records(&page.url, &page.html);
    let mut records = Vec::with_capacity(raws.len());
    let mut errors = 0;

    for raw in &raws {
        match extract::assemble(raw) {
            Ok(record) => records.push(RecordRow::from_record(page.page_data_id, &record)),
            Err(e) => {
                warn!("{}: unusable timeline entry: {}", page.url, e);
                errors += 1;
            }
        }
    }

    PageOutcome {
        page_data_id: page.page_data_id,
        records,
        errors,
    }
}

// ── Tests ──
