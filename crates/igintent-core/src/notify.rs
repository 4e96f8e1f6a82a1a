//! User-facing notification dispatch.
//!
//! The [`Notifier`] trait is the seam between session events and whatever
//! surface shows them. The countdown driver and the CLI both talk to a
//! `dyn Notifier`, so headless runs and tests swap in a no-op or a
//! recording sink without touching session logic.

use std::sync::Mutex;

use crate::events::SessionEvent;

/// Delivery sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Present a short message to the user.
    fn alert(&self, message: &str);
}

/// Discards every notification.
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn alert(&self, _message: &str) {}
}

/// Writes notifications to stderr, keeping stdout clean for command output.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        eprintln!("[igintent] {message}");
    }
}

/// Captures notifications in memory for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

/// Map an event to its notification text, if the event warrants one.
pub fn message_for(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::SessionStarted {
            intention,
            planned_min,
            ..
        } => Some(format!("Go do it: {intention} ({planned_min} min)")),
        SessionEvent::Nudge { .. } => Some("Nudge: still on intention?".to_string()),
        SessionEvent::SessionCompleted { .. } => {
            Some("Time's up. Wrap up on Instagram.".to_string())
        }
        SessionEvent::ReviewSaved { .. } => {
            Some("Saved. Nice work staying intentional!".to_string())
        }
        _ => None,
    }
}

/// Forward an event's notification (if any) to the given sink.
pub fn dispatch(event: &SessionEvent, notifier: &dyn Notifier) {
    if let Some(message) = message_for(event) {
        notifier.alert(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn start_event_names_the_intention() {
        let event = SessionEvent::SessionStarted {
            intention: "Check messages".to_string(),
            planned_min: 10,
            duration_secs: 600,
            nudge_interval_secs: 0,
            at: Utc::now(),
        };
        assert_eq!(
            message_for(&event).as_deref(),
            Some("Go do it: Check messages (10 min)")
        );
    }

    #[test]
    fn completion_has_a_wrap_up_message() {
        let event = SessionEvent::SessionCompleted {
            intention: "Reply to a friend".to_string(),
            elapsed_secs: 600,
            at: Utc::now(),
        };
        let message = message_for(&event).unwrap();
        assert!(message.contains("Time's up"));
    }

    #[test]
    fn snooze_stays_silent() {
        let event = SessionEvent::Snoozed {
            extension_secs: 60,
            total_secs: 660,
            remaining_secs: 120,
            at: Utc::now(),
        };
        assert!(message_for(&event).is_none());
    }

    #[test]
    fn dispatch_records_in_order() {
        let notifier = RecordingNotifier::new();
        let nudge = SessionEvent::Nudge {
            intention: "Post one thing".to_string(),
            elapsed_secs: 60,
            remaining_secs: 540,
            at: Utc::now(),
        };
        let done = SessionEvent::SessionCompleted {
            intention: "Post one thing".to_string(),
            elapsed_secs: 600,
            at: Utc::now(),
        };
        dispatch(&nudge, &notifier);
        dispatch(&done, &notifier);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("Nudge"));
        assert!(messages[1].contains("Time's up"));
    }

    #[test]
    fn noop_notifier_accepts_anything() {
        let notifier = NoopNotifier;
        notifier.alert("ignored");
    }
}
