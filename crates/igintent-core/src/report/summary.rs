//! Aggregate statistics over the session history.

use serde::{Deserialize, Serialize};

use crate::store::SessionRecord;

/// Aggregates computed over a slice of session records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of sessions recorded.
    pub count: usize,
    /// Sum of actual minutes across every session.
    pub total_minutes: u64,
    /// Percentage of sessions where the intention was kept, rounded.
    /// 0 when there are no sessions.
    pub adherence_percent: u8,
    /// Mean of the moods that were recorded. Sessions without a mood
    /// do not count toward the average; `None` when no session has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_mood: Option<f64>,
}

/// Compute summary statistics for a set of records.
pub fn summarize(records: &[SessionRecord]) -> Summary {
    if records.is_empty() {
        return Summary::default();
    }

    let count = records.len();
    let total_minutes = records.iter().map(|r| u64::from(r.actual_min)).sum();
    let kept = records.iter().filter(|r| r.completed).count();
    let adherence_percent = ((kept as f64 / count as f64) * 100.0).round() as u8;

    let moods: Vec<f64> = records
        .iter()
        .filter_map(|r| r.mood.map(f64::from))
        .collect();
    let average_mood = if moods.is_empty() {
        None
    } else {
        Some(moods.iter().sum::<f64>() / moods.len() as f64)
    };

    Summary {
        count,
        total_minutes,
        adherence_percent,
        average_mood,
    }
}

/// One-line rendering of a summary for terminal output.
pub fn summary_line(summary: &Summary) -> String {
    let mut line = format!(
        "{} sessions · {} min total · Intention kept {}%",
        summary.count, summary.total_minutes, summary.adherence_percent
    );
    if let Some(mood) = summary.average_mood {
        line.push_str(&format!(" · Avg mood {mood:.1}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(actual_min: u32, completed: bool, mood: Option<u8>) -> SessionRecord {
        SessionRecord {
            started_at: Utc::now(),
            intention: "Check messages".to_string(),
            planned_min: 10,
            actual_min,
            completed,
            mood,
        }
    }

    #[test]
    fn empty_history_summarizes_to_zeroes() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_minutes, 0);
        assert_eq!(summary.adherence_percent, 0);
        assert_eq!(summary.average_mood, None);
    }

    #[test]
    fn totals_and_adherence_add_up() {
        let records = vec![
            record(10, true, Some(4)),
            record(5, false, Some(2)),
            record(12, true, None),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_minutes, 27);
        assert_eq!(summary.adherence_percent, 67);
    }

    #[test]
    fn mood_average_skips_missing_entries() {
        let records = vec![
            record(10, true, Some(5)),
            record(10, true, None),
            record(10, true, Some(3)),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.average_mood, Some(4.0));
    }

    #[test]
    fn mood_average_is_none_without_any_mood() {
        let records = vec![record(10, true, None), record(8, false, None)];
        assert_eq!(summarize(&records).average_mood, None);
    }

    #[test]
    fn adherence_rounds_to_nearest_percent() {
        // 1 of 3 kept = 33.33% -> 33
        let records = vec![
            record(10, true, None),
            record(10, false, None),
            record(10, false, None),
        ];
        assert_eq!(summarize(&records).adherence_percent, 33);

        // 2 of 3 kept = 66.67% -> 67
        let records = vec![
            record(10, true, None),
            record(10, true, None),
            record(10, false, None),
        ];
        assert_eq!(summarize(&records).adherence_percent, 67);
    }

    #[test]
    fn summary_line_includes_mood_only_when_present() {
        let with_mood = summarize(&[record(10, true, Some(4))]);
        assert_eq!(
            summary_line(&with_mood),
            "1 sessions · 10 min total · Intention kept 100% · Avg mood 4.0"
        );

        let without_mood = summarize(&[record(10, true, None)]);
        assert_eq!(
            summary_line(&without_mood),
            "1 sessions · 10 min total · Intention kept 100%"
        );
    }

    #[test]
    fn mood_omitted_from_json_when_absent() {
        let summary = summarize(&[record(10, true, None)]);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("average_mood"));
    }
}
