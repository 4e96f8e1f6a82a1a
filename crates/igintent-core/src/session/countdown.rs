//! Countdown driving.
//!
//! The controller only counts ticks; cadence lives here. Two drivers cover
//! the two ways a session runs:
//!
//! - [`Countdown::spawn`] starts a 1 Hz task for a foreground session and
//!   returns a cancelable handle. Missed scheduling slots are skipped, so
//!   the controller sees at most one tick per elapsed second.
//! - [`catch_up`] replays the ticks a persisted session accrued between
//!   process invocations, one per whole elapsed second.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::events::SessionEvent;
use crate::notify::{self, Notifier};

use super::controller::{Phase, SessionController};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a running countdown task.
pub struct CountdownHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Stop the countdown. Safe to call any number of times; once set, no
    /// further tick mutates the controller.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Wait for the driver task to wind down.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Spawner for the 1 Hz session countdown.
pub struct Countdown;

impl Countdown {
    /// Drive `controller` once per second until completion or cancellation,
    /// dispatching each yielded event through `notifier`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        controller: Arc<Mutex<SessionController>>,
        notifier: Arc<dyn Notifier>,
    ) -> CountdownHandle {
        Self::spawn_with_period(controller, notifier, TICK_PERIOD)
    }

    fn spawn_with_period(
        controller: Arc<Mutex<SessionController>>,
        notifier: Arc<dyn Notifier>,
        period: Duration,
    ) -> CountdownHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first interval tick resolves immediately; consume it so the
            // first decrement lands one period after spawn.
            interval.tick().await;
            loop {
                interval.tick().await;
                let event = {
                    let Ok(mut controller) = controller.lock() else {
                        debug!("countdown stopping: controller lock poisoned");
                        break;
                    };
                    // Checked under the lock: a cancel observed here means
                    // this tick never mutates state.
                    if flag.load(Ordering::SeqCst) {
                        break;
                    }
                    if controller.phase() != Phase::Active {
                        break;
                    }
                    controller.tick()
                };
                if let Some(event) = &event {
                    notify::dispatch(event, notifier.as_ref());
                }
                if matches!(event, Some(SessionEvent::SessionCompleted { .. })) {
                    break;
                }
            }
        });
        CountdownHandle { cancelled, task }
    }
}

/// Replay the ticks a session accrued between `synced_at` and `now`, one per
/// whole elapsed second. The fractional remainder stays credited to the next
/// sync point, so repeated catch-ups never over-tick.
pub fn catch_up(
    controller: &mut SessionController,
    synced_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> (Vec<SessionEvent>, DateTime<Utc>) {
    let due = (now - synced_at).num_seconds().max(0);
    let mut events = Vec::new();
    for _ in 0..due {
        if controller.phase() != Phase::Active {
            break;
        }
        if let Some(event) = controller.tick() {
            events.push(event);
        }
    }
    (events, synced_at + chrono::Duration::seconds(due))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    fn active_controller(minutes: u32) -> Arc<Mutex<SessionController>> {
        let mut controller = SessionController::new();
        controller
            .start_session("Check messages", minutes, 0)
            .unwrap();
        Arc::new(Mutex::new(controller))
    }

    #[tokio::test]
    async fn driver_ticks_down_and_stops_at_review() {
        let shared = active_controller(1); // 60 seconds
        let notifier = Arc::new(RecordingNotifier::new());
        let handle = Countdown::spawn_with_period(
            Arc::clone(&shared),
            notifier.clone(),
            Duration::from_millis(2),
        );
        handle.join().await;
        let controller = shared.lock().unwrap();
        assert_eq!(controller.phase(), Phase::Review);
        assert_eq!(controller.remaining_secs(), 0);
        assert!(notifier
            .messages()
            .iter()
            .any(|m| m.contains("Time's up")));
    }

    #[tokio::test]
    async fn cancel_is_idempotent_and_stops_ticking() {
        let shared = active_controller(10);
        let notifier: Arc<dyn Notifier> = Arc::new(crate::notify::NoopNotifier);
        let handle = Countdown::spawn_with_period(
            Arc::clone(&shared),
            notifier,
            Duration::from_millis(2),
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
        let frozen = shared.lock().unwrap().remaining_secs();
        handle.join().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        let controller = shared.lock().unwrap();
        assert_eq!(controller.remaining_secs(), frozen);
        assert_eq!(controller.phase(), Phase::Active);
    }

    #[test]
    fn catch_up_delivers_one_tick_per_whole_second() {
        let mut controller = SessionController::new();
        controller.start_session("Check messages", 10, 0).unwrap();
        let synced = Utc::now();
        let now = synced + chrono::Duration::milliseconds(2500);
        let (events, new_sync) = catch_up(&mut controller, synced, now);
        assert!(events.is_empty());
        assert_eq!(controller.remaining_secs(), 598);
        // Only whole seconds are credited.
        assert_eq!(new_sync, synced + chrono::Duration::seconds(2));
    }

    #[test]
    fn catch_up_stops_at_completion() {
        let mut controller = SessionController::new();
        controller.start_session("Check messages", 1, 0).unwrap();
        let synced = Utc::now();
        let now = synced + chrono::Duration::seconds(300);
        let (events, _) = catch_up(&mut controller, synced, now);
        assert_eq!(controller.phase(), Phase::Review);
        assert_eq!(controller.remaining_secs(), 0);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SessionEvent::SessionCompleted { .. }));
    }

    #[test]
    fn catch_up_with_backwards_clock_does_nothing() {
        let mut controller = SessionController::new();
        controller.start_session("Check messages", 10, 0).unwrap();
        let synced = Utc::now();
        let now = synced - chrono::Duration::seconds(30);
        let (events, new_sync) = catch_up(&mut controller, synced, now);
        assert!(events.is_empty());
        assert_eq!(controller.remaining_secs(), 600);
        assert_eq!(new_sync, synced);
    }

    #[test]
    fn catch_up_emits_due_nudges() {
        let mut controller = SessionController::new();
        controller.start_session("Check messages", 10, 60).unwrap();
        let synced = Utc::now();
        let now = synced + chrono::Duration::seconds(125);
        let (events, _) = catch_up(&mut controller, synced, now);
        let nudges = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Nudge { .. }))
            .count();
        assert_eq!(nudges, 2);
    }
}
