use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finished session's self-report. Immutable once created; the store
/// only ever appends or bulk-clears.
///
/// Wire names are fixed by the persistence and export formats: `startedAt`,
/// `intention`, `plannedMin`, `actualMin`, `completed`, `mood`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub started_at: DateTime<Utc>,
    pub intention: String,
    pub planned_min: u32,
    pub actual_min: u32,
    pub completed: bool,
    /// 1-5 rating; sessions reviewed without one stay mood-less.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let record = SessionRecord {
            started_at: "2026-08-22T10:00:00Z".parse().unwrap(),
            intention: "Check messages".into(),
            planned_min: 10,
            actual_min: 10,
            completed: true,
            mood: Some(4),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["startedAt"], "2026-08-22T10:00:00Z");
        assert_eq!(json["plannedMin"], 10);
        assert_eq!(json["actualMin"], 10);
        assert_eq!(json["completed"], true);
        assert_eq!(json["mood"], 4);
    }

    #[test]
    fn mood_is_omitted_when_absent() {
        let record = SessionRecord {
            started_at: Utc::now(),
            intention: "Reply to a friend".into(),
            planned_min: 5,
            actual_min: 3,
            completed: false,
            mood: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("mood").is_none());
    }

    #[test]
    fn parses_entries_without_mood() {
        let json = r#"{
            "startedAt": "2026-08-22T10:00:00Z",
            "intention": "Post one thing",
            "plannedMin": 15,
            "actualMin": 12,
            "completed": true
        }"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.mood, None);
        assert_eq!(record.planned_min, 15);
    }
}
