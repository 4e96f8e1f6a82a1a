//! Session lifecycle state machine.
//!
//! The controller is caller-ticked: it holds no thread and no clock. One
//! `tick()` call accounts for exactly one elapsed second while `Active`;
//! the countdown driver owns the cadence (see [`super::countdown`]).
//!
//! ## State Transitions
//!
//! ```text
//! Setup -> Active -> Review -> Stats -> Setup
//! ```
//!
//! `Setup` and `Stats` are free navigation targets; `Active` and `Review`
//! are reachable only through the session flow.
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new();
//! controller.start_session("Check messages", 10, 0)?;
//! // Once per second:
//! controller.tick(); // Returns Some(Event) on nudge or completion
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::SessionEvent;
use crate::store::SessionRecord;

use super::plan::PlanDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Active,
    Review,
    Stats,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Active => "active",
            Phase::Review => "review",
            Phase::Stats => "stats",
        }
    }
}

/// Session lifecycle controller.
///
/// One instance per session. Owns the countdown bookkeeping and produces
/// the record handed to the store at review time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionController {
    phase: Phase,
    /// Present while a session is underway (`Active`/`Review`).
    plan: Option<PlanDraft>,
    /// Planned seconds plus snooze extensions.
    total_secs: u64,
    remaining_secs: u64,
    /// 0 disables nudges.
    nudge_interval_secs: u64,
    /// Elapsed seconds at the moment the last nudge fired.
    last_nudge_elapsed_secs: u64,
}

impl SessionController {
    /// Create a controller in the `Setup` phase.
    pub fn new() -> Self {
        Self {
            phase: Phase::Setup,
            plan: None,
            total_secs: 0,
            remaining_secs: 0,
            nudge_interval_secs: 0,
            last_nudge_elapsed_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn plan(&self) -> Option<&PlanDraft> {
        self.plan.as_ref()
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Seconds accrued since the session started. Snooze extends total and
    /// remaining equally, so this survives extensions unchanged.
    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs.saturating_sub(self.remaining_secs)
    }

    /// 0.0 .. 100.0 progress through the planned (plus snoozed) time.
    pub fn progress_pct(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        (self.elapsed_secs() as f64 / self.total_secs as f64 * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> SessionEvent {
        SessionEvent::StateSnapshot {
            phase: self.phase,
            intention: self.plan.as_ref().map(|p| p.intention.clone()),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress_pct: self.progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session. Valid from `Setup` or `Stats`.
    pub fn start_session(
        &mut self,
        intention: &str,
        planned_minutes: u32,
        nudge_interval_secs: u64,
    ) -> Result<SessionEvent, ValidationError> {
        match self.phase {
            Phase::Setup | Phase::Stats => {}
            other => {
                return Err(ValidationError::InvalidPhase {
                    operation: "start_session".into(),
                    phase: other.as_str().into(),
                })
            }
        }
        let plan = PlanDraft::new(intention, planned_minutes)?;
        let duration = plan.duration_secs();
        self.total_secs = duration;
        self.remaining_secs = duration;
        self.nudge_interval_secs = nudge_interval_secs;
        self.last_nudge_elapsed_secs = 0;
        self.phase = Phase::Active;
        let event = SessionEvent::SessionStarted {
            intention: plan.intention.clone(),
            planned_min: plan.minutes,
            duration_secs: duration,
            nudge_interval_secs,
            at: plan.started_at,
        };
        self.plan = Some(plan);
        Ok(event)
    }

    /// Account for one elapsed second. Yields at most one event; completion
    /// always wins over a nudge that would land on the same second, and no
    /// nudge can fire after it. Ticks outside `Active` are ignored.
    pub fn tick(&mut self) -> Option<SessionEvent> {
        if self.phase != Phase::Active {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.phase = Phase::Review;
            return Some(SessionEvent::SessionCompleted {
                intention: self.intention_label(),
                elapsed_secs: self.elapsed_secs(),
                at: Utc::now(),
            });
        }
        if self.nudge_interval_secs > 0
            && self.elapsed_secs() - self.last_nudge_elapsed_secs >= self.nudge_interval_secs
        {
            self.last_nudge_elapsed_secs = self.elapsed_secs();
            return Some(SessionEvent::Nudge {
                intention: self.intention_label(),
                elapsed_secs: self.elapsed_secs(),
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            });
        }
        None
    }

    /// Extend the running session without resetting elapsed accounting.
    pub fn snooze(&mut self, extension_secs: u64) -> Result<SessionEvent, ValidationError> {
        if self.phase != Phase::Active {
            return Err(ValidationError::InvalidPhase {
                operation: "snooze".into(),
                phase: self.phase.as_str().into(),
            });
        }
        self.total_secs += extension_secs;
        self.remaining_secs += extension_secs;
        Ok(SessionEvent::Snoozed {
            extension_secs,
            total_secs: self.total_secs,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Finish now with whatever elapsed time has accrued.
    pub fn end_early(&mut self) -> Result<SessionEvent, ValidationError> {
        if self.phase != Phase::Active {
            return Err(ValidationError::InvalidPhase {
                operation: "end_early".into(),
                phase: self.phase.as_str().into(),
            });
        }
        self.phase = Phase::Review;
        Ok(SessionEvent::SessionEndedEarly {
            intention: self.intention_label(),
            elapsed_secs: self.elapsed_secs(),
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Turn the self-report into this session's one record.
    ///
    /// Valid exactly once, in `Review`. The controller moves to `Stats`;
    /// the caller appends the returned record to the store.
    pub fn record_review(
        &mut self,
        kept_intention: bool,
        mood: Option<u8>,
    ) -> Result<(SessionRecord, SessionEvent), ValidationError> {
        if self.phase != Phase::Review {
            return Err(ValidationError::InvalidPhase {
                operation: "record_review".into(),
                phase: self.phase.as_str().into(),
            });
        }
        if let Some(m) = mood {
            if !(1..=5).contains(&m) {
                return Err(ValidationError::InvalidValue {
                    field: "mood".into(),
                    message: "must be between 1 and 5".into(),
                });
            }
        }
        let plan = self
            .plan
            .take()
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "plan".into(),
                message: "no session inputs captured".into(),
            })?;
        let actual_min = round_to_minutes(self.elapsed_secs());
        let record = SessionRecord {
            started_at: plan.started_at,
            intention: plan.intention,
            planned_min: plan.minutes,
            actual_min,
            completed: kept_intention,
            mood,
        };
        self.phase = Phase::Stats;
        let event = SessionEvent::ReviewSaved {
            completed: kept_intention,
            mood,
            actual_min,
            at: Utc::now(),
        };
        Ok((record, event))
    }

    /// Free navigation between the non-session screens. No store side
    /// effects.
    pub fn cancel(&mut self) -> Result<(), ValidationError> {
        match self.phase {
            Phase::Setup | Phase::Stats => {
                self.phase = Phase::Setup;
                Ok(())
            }
            other => Err(ValidationError::InvalidPhase {
                operation: "cancel".into(),
                phase: other.as_str().into(),
            }),
        }
    }

    /// Drop an in-flight session without writing a record.
    pub fn abandon(&mut self) {
        self.phase = Phase::Setup;
        self.plan = None;
        self.total_secs = 0;
        self.remaining_secs = 0;
        self.nudge_interval_secs = 0;
        self.last_nudge_elapsed_secs = 0;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn intention_label(&self) -> String {
        self.plan
            .as_ref()
            .map(|p| p.intention.clone())
            .unwrap_or_default()
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

/// Round seconds to the nearest whole minute, halves up.
fn round_to_minutes(secs: u64) -> u32 {
    ((secs + 30) / 60) as u32
}
