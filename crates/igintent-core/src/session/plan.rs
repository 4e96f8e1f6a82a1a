//! Session plan inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Inputs captured when a session starts.
///
/// Lives for one session only: dropped once the resulting record is
/// persisted or the session is abandoned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDraft {
    pub intention: String,
    pub minutes: u32,
    pub started_at: DateTime<Utc>,
}

impl PlanDraft {
    /// Validate the inputs and capture them with `started_at = now`.
    pub fn new(intention: &str, minutes: u32) -> Result<Self, ValidationError> {
        let intention = intention.trim();
        if intention.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "intention".into(),
                message: "must not be empty".into(),
            });
        }
        if minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "planned_minutes".into(),
                message: "must be a positive number of minutes".into(),
            });
        }
        Ok(Self {
            intention: intention.to_string(),
            minutes,
            started_at: Utc::now(),
        })
    }

    pub fn duration_secs(&self) -> u64 {
        u64::from(self.minutes) * 60
    }
}
