//! CSV export of the session history.
//!
//! The export mirrors the wire field names of [`SessionRecord`]: one
//! header row, then one row per session in insertion order. Intentions
//! are free text, so that field is always quoted with internal quotes
//! doubled. A missing mood serializes as an empty final field.

use crate::store::SessionRecord;

/// Suggested filename for exports.
pub const EXPORT_FILENAME: &str = "ig-intentional.csv";

const CSV_HEADER: &str = "startedAt,intention,plannedMin,actualMin,completed,mood";

/// Render the full history as CSV, header row included.
pub fn to_csv(records: &[SessionRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    for record in records {
        out.push('\n');
        out.push_str(&csv_row(record));
    }
    out
}

fn csv_row(record: &SessionRecord) -> String {
    let mood = record.mood.map(|m| m.to_string()).unwrap_or_default();
    format!(
        "{},{},{},{},{},{}",
        record.started_at.to_rfc3339(),
        quote(&record.intention),
        record.planned_min,
        record.actual_min,
        record.completed,
        mood
    )
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
