//! Integration tests for the session lifecycle.
//!
//! Tests the full workflow from setup through review into the recorded
//! history, including snooze, early ends, notifications, and the
//! serialized-controller roundtrip the CLI relies on.

use igintent_core::{
    notify, summarize, to_csv, Phase, RecordingNotifier, SessionController, SessionEvent,
    SessionStore,
};

#[test]
fn test_full_session_workflow() {
    let mut controller = SessionController::new();
    let started = controller.start_session("Check messages", 10, 0).unwrap();
    assert!(matches!(
        started,
        SessionEvent::SessionStarted {
            duration_secs: 600,
            ..
        }
    ));
    assert_eq!(controller.total_secs(), 600);
    assert_eq!(controller.remaining_secs(), 600);

    // One tick per second for the full planned duration.
    let mut completion = None;
    for _ in 0..600 {
        if let Some(event) = controller.tick() {
            completion = Some(event);
        }
    }
    assert_eq!(controller.phase(), Phase::Review);
    assert!(matches!(
        completion,
        Some(SessionEvent::SessionCompleted { .. })
    ));

    let (record, _) = controller.record_review(true, Some(4)).unwrap();
    assert_eq!(controller.phase(), Phase::Stats);
    assert_eq!(record.planned_min, 10);
    assert_eq!(record.actual_min, 10);
    assert!(record.completed);
    assert_eq!(record.mood, Some(4));

    let store = SessionStore::open_memory().unwrap();
    store.append(&record).unwrap();
    let history = store.load_all();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].intention, "Check messages");

    let summary = summarize(&history);
    assert_eq!(summary.count, 1);
    assert_eq!(summary.total_minutes, 10);
    assert_eq!(summary.adherence_percent, 100);
    assert_eq!(summary.average_mood, Some(4.0));

    let csv = to_csv(&history);
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.starts_with("startedAt,intention,plannedMin,actualMin,completed,mood"));
    assert!(csv.contains("\"Check messages\""));
}

#[test]
fn test_snoozed_session_ended_early() {
    let mut controller = SessionController::new();
    controller.start_session("Reply to a friend", 10, 0).unwrap();

    for _ in 0..300 {
        controller.tick();
    }
    controller.snooze(120).unwrap();
    assert_eq!(controller.total_secs(), 720);
    assert_eq!(controller.remaining_secs(), 420);

    for _ in 0..60 {
        controller.tick();
    }
    let ended = controller.end_early().unwrap();
    assert!(matches!(
        ended,
        SessionEvent::SessionEndedEarly {
            elapsed_secs: 360,
            ..
        }
    ));

    let (record, _) = controller.record_review(false, None).unwrap();
    assert_eq!(record.actual_min, 6);
    assert!(!record.completed);
    assert_eq!(record.mood, None);

    let store = SessionStore::open_memory().unwrap();
    store.append(&record).unwrap();
    let summary = summarize(&store.load_all());
    assert_eq!(summary.adherence_percent, 0);
    assert_eq!(summary.total_minutes, 6);
    assert_eq!(summary.average_mood, None);
}

#[test]
fn test_notifications_follow_the_session() {
    let notifier = RecordingNotifier::new();
    let mut controller = SessionController::new();

    let started = controller.start_session("Post one thing", 1, 20).unwrap();
    notify::dispatch(&started, &notifier);

    for _ in 0..60 {
        if let Some(event) = controller.tick() {
            notify::dispatch(&event, &notifier);
        }
    }
    let (_, saved) = controller.record_review(true, Some(5)).unwrap();
    notify::dispatch(&saved, &notifier);

    let messages = notifier.messages();
    assert_eq!(messages.len(), 5); // start, 2 nudges, completion, review
    assert_eq!(messages[0], "Go do it: Post one thing (1 min)");
    assert_eq!(messages[1], "Nudge: still on intention?");
    assert_eq!(messages[2], "Nudge: still on intention?");
    assert_eq!(messages[3], "Time's up. Wrap up on Instagram.");
    assert_eq!(messages[4], "Saved. Nice work staying intentional!");
}

#[test]
fn test_clear_resets_the_history() {
    let store = SessionStore::open_memory().unwrap();
    for _ in 0..3 {
        let mut controller = SessionController::new();
        controller.start_session("Check messages", 1, 0).unwrap();
        controller.end_early().unwrap();
        let (record, _) = controller.record_review(true, Some(3)).unwrap();
        store.append(&record).unwrap();
    }
    assert_eq!(store.load_all().len(), 3);

    store.clear_all().unwrap();
    let history = store.load_all();
    assert!(history.is_empty());

    let summary = summarize(&history);
    assert_eq!(summary.count, 0);
    assert_eq!(summary.total_minutes, 0);
    assert_eq!(summary.adherence_percent, 0);
    assert_eq!(summary.average_mood, None);
}

#[test]
fn test_controller_survives_a_serde_roundtrip() {
    let mut controller = SessionController::new();
    controller.start_session("Browse for 10 minutes", 10, 60).unwrap();
    for _ in 0..150 {
        controller.tick();
    }
    controller.snooze(30).unwrap();

    let json = serde_json::to_string(&controller).unwrap();
    let mut restored: SessionController = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.phase(), Phase::Active);
    assert_eq!(restored.total_secs(), 630);
    assert_eq!(restored.remaining_secs(), 480);
    assert_eq!(restored.elapsed_secs(), 150);

    // The restored controller keeps counting where it left off.
    for _ in 0..480 {
        restored.tick();
    }
    assert_eq!(restored.phase(), Phase::Review);
    let (record, _) = restored.record_review(true, Some(2)).unwrap();
    assert_eq!(record.intention, "Browse for 10 minutes");
    assert_eq!(record.actual_min, 11); // 630s rounds to 11 minutes
}
