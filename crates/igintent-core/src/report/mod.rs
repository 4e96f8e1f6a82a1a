//! Reporting over recorded sessions: summaries, listings, CSV export.

mod csv;
mod summary;

pub use csv::{to_csv, EXPORT_FILENAME};
pub use summary::{summarize, summary_line, Summary};

use crate::store::SessionRecord;

/// View of the history with the most recent session first.
pub fn latest_first(records: &[SessionRecord]) -> Vec<&SessionRecord> {
    records.iter().rev().collect()
}
