use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Phase;

/// Every observable state change produces an event.
/// The CLI prints them; the notifier turns some of them into alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    SessionStarted {
        intention: String,
        planned_min: u32,
        duration_secs: u64,
        nudge_interval_secs: u64,
        at: DateTime<Utc>,
    },
    /// Periodic reminder while the countdown runs.
    Nudge {
        intention: String,
        elapsed_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero; the session moved to review.
    SessionCompleted {
        intention: String,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// User finished before the countdown ran out.
    SessionEndedEarly {
        intention: String,
        elapsed_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Snoozed {
        extension_secs: u64,
        total_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Self-report captured and the record handed to the store.
    ReviewSaved {
        completed: bool,
        mood: Option<u8>,
        actual_min: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        intention: Option<String>,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
