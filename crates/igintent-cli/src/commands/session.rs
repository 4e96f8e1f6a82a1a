use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};

use igintent_core::store::Database;
use igintent_core::{
    catch_up, launcher, notify, Config, Countdown, NoopNotifier, Notifier, Phase,
    SessionController, SessionStore, TerminalNotifier,
};

const ACTIVE_KEY: &str = "active_session";

#[derive(Subcommand)]
pub enum SessionAction {
    /// Plan and start a session in the background
    Start {
        /// What you intend to do
        intention: String,
        /// Planned minutes (config default when omitted)
        #[arg(long)]
        minutes: Option<u32>,
        /// Seconds between nudges, 0 disables (config default when omitted)
        #[arg(long)]
        nudge: Option<u64>,
        /// Skip launching the app
        #[arg(long)]
        no_launch: bool,
    },
    /// Start a session and keep ticking in the foreground
    Run {
        /// What you intend to do
        intention: String,
        /// Planned minutes (config default when omitted)
        #[arg(long)]
        minutes: Option<u32>,
        /// Seconds between nudges, 0 disables (config default when omitted)
        #[arg(long)]
        nudge: Option<u64>,
        /// Skip launching the app
        #[arg(long)]
        no_launch: bool,
    },
    /// Print current session state as JSON
    Status,
    /// Extend the running session
    Snooze {
        /// Seconds to add (config default when omitted)
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Finish the running session now
    End,
    /// Answer the review and record the session
    Review {
        /// The intention was kept
        #[arg(long, conflicts_with = "not_kept")]
        kept: bool,
        /// The intention was not kept
        #[arg(long)]
        not_kept: bool,
        /// Mood rating 1-5
        #[arg(long)]
        mood: Option<u8>,
    },
    /// Drop the current session without recording it
    Abandon,
    /// Open Instagram with the configured launch target
    Open,
}

/// Controller state persisted between invocations, with the wall-clock
/// moment it was last brought up to date.
#[derive(Serialize, Deserialize)]
struct ActiveSession {
    controller: SessionController,
    synced_at: DateTime<Utc>,
}

fn load_active(db: &Database) -> Option<ActiveSession> {
    let json = db.kv_get(ACTIVE_KEY).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

fn save_active(db: &Database, active: &ActiveSession) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(active)?;
    db.kv_set(ACTIVE_KEY, &json)?;
    Ok(())
}

fn clear_active(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_delete(ACTIVE_KEY)?;
    Ok(())
}

fn notifier(config: &Config) -> Arc<dyn Notifier> {
    if config.notifications.enabled {
        Arc::new(TerminalNotifier)
    } else {
        Arc::new(NoopNotifier)
    }
}

/// Bring a persisted session up to the present without saving it back.
/// Returns the phase it would be in now.
fn persisted_phase(db: &Database) -> Option<Phase> {
    let mut active = load_active(db)?;
    catch_up(&mut active.controller, active.synced_at, Utc::now());
    Some(active.controller.phase())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        SessionAction::Start {
            intention,
            minutes,
            nudge,
            no_launch,
        } => {
            let db = Database::open()?;
            start(&db, &config, &intention, minutes, nudge, no_launch)
        }
        SessionAction::Run {
            intention,
            minutes,
            nudge,
            no_launch,
        } => {
            let db = Database::open()?;
            run_foreground(&db, &config, &intention, minutes, nudge, no_launch)
        }
        SessionAction::Status => {
            let db = Database::open()?;
            status(&db, &config)
        }
        SessionAction::Snooze { seconds } => {
            let db = Database::open()?;
            snooze(&db, &config, seconds)
        }
        SessionAction::End => {
            let db = Database::open()?;
            end(&db, &config)
        }
        SessionAction::Review {
            kept,
            not_kept,
            mood,
        } => review(&config, kept, not_kept, mood),
        SessionAction::Abandon => {
            let db = Database::open()?;
            clear_active(&db)?;
            println!("{{\"type\": \"session_abandoned\"}}");
            Ok(())
        }
        SessionAction::Open => {
            launcher::open_app(&config.launch);
            println!("opening {}", launcher::launch_url(&config.launch));
            Ok(())
        }
    }
}

fn guard_no_session_underway(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    match persisted_phase(db) {
        Some(Phase::Active) => Err("a session is already running; end or abandon it first".into()),
        Some(Phase::Review) => {
            Err("a finished session is awaiting review; run `session review` first".into())
        }
        _ => Ok(()),
    }
}

fn start(
    db: &Database,
    config: &Config,
    intention: &str,
    minutes: Option<u32>,
    nudge: Option<u64>,
    no_launch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    guard_no_session_underway(db)?;

    let minutes = minutes.unwrap_or(config.session.default_minutes);
    let nudge = nudge.unwrap_or(config.session.default_nudge_secs);

    let mut controller = SessionController::new();
    let event = controller.start_session(intention, minutes, nudge)?;
    notify::dispatch(&event, notifier(config).as_ref());
    if !no_launch {
        launcher::open_app(&config.launch);
    }

    save_active(
        db,
        &ActiveSession {
            controller,
            synced_at: Utc::now(),
        },
    )?;
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}

fn run_foreground(
    db: &Database,
    config: &Config,
    intention: &str,
    minutes: Option<u32>,
    nudge: Option<u64>,
    no_launch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    guard_no_session_underway(db)?;

    let minutes = minutes.unwrap_or(config.session.default_minutes);
    let nudge = nudge.unwrap_or(config.session.default_nudge_secs);

    let mut controller = SessionController::new();
    let event = controller.start_session(intention, minutes, nudge)?;
    let sink = notifier(config);
    notify::dispatch(&event, sink.as_ref());
    if !no_launch {
        launcher::open_app(&config.launch);
    }
    println!("{}", serde_json::to_string_pretty(&event)?);

    // Persist before ticking so an interrupted run can be caught up later.
    save_active(
        db,
        &ActiveSession {
            controller: controller.clone(),
            synced_at: Utc::now(),
        },
    )?;

    let shared = Arc::new(Mutex::new(controller));
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let handle = Countdown::spawn(Arc::clone(&shared), sink);
        loop {
            tokio::time::sleep(Duration::from_millis(250)).await;
            let Ok(controller) = shared.lock() else { break };
            if controller.phase() != Phase::Active {
                break;
            }
            eprint!(
                "\r{} remaining ({:.0}%) ",
                format_mmss(controller.remaining_secs()),
                controller.progress_pct()
            );
        }
        eprintln!();
        handle.cancel();
        handle.join().await;
    });

    let controller = Arc::try_unwrap(shared)
        .map_err(|_| "countdown task still holds the session")?
        .into_inner()
        .map_err(|_| "session state poisoned")?;
    save_active(
        db,
        &ActiveSession {
            controller,
            synced_at: Utc::now(),
        },
    )?;
    eprintln!("run `igintent-cli session review --kept|--not-kept [--mood 1-5]` to record it");
    Ok(())
}

fn status(db: &Database, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let Some(mut active) = load_active(db) else {
        let idle = SessionController::new();
        println!("{}", serde_json::to_string_pretty(&idle.snapshot())?);
        return Ok(());
    };

    let (events, synced_at) = catch_up(&mut active.controller, active.synced_at, Utc::now());
    active.synced_at = synced_at;
    let sink = notifier(config);
    for event in &events {
        notify::dispatch(event, sink.as_ref());
    }

    println!("{}", serde_json::to_string_pretty(&active.controller.snapshot())?);
    for event in &events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    save_active(db, &active)?;
    Ok(())
}

fn snooze(
    db: &Database,
    config: &Config,
    seconds: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut active = load_active(db).ok_or("no session to snooze")?;
    let (events, synced_at) = catch_up(&mut active.controller, active.synced_at, Utc::now());
    active.synced_at = synced_at;
    let sink = notifier(config);
    for event in &events {
        notify::dispatch(event, sink.as_ref());
    }

    let seconds = seconds.unwrap_or(config.session.default_snooze_secs);
    let event = active.controller.snooze(seconds)?;
    save_active(db, &active)?;
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}

fn end(db: &Database, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut active = load_active(db).ok_or("no session to end")?;
    let (events, synced_at) = catch_up(&mut active.controller, active.synced_at, Utc::now());
    active.synced_at = synced_at;
    let sink = notifier(config);
    for event in &events {
        notify::dispatch(event, sink.as_ref());
    }

    if active.controller.phase() == Phase::Active {
        let event = active.controller.end_early()?;
        println!("{}", serde_json::to_string_pretty(&event)?);
    } else {
        // Completed while unattended; the review is already due.
        println!("{}", serde_json::to_string_pretty(&active.controller.snapshot())?);
    }
    save_active(db, &active)?;
    Ok(())
}

fn review(
    config: &Config,
    kept: bool,
    not_kept: bool,
    mood: Option<u8>,
) -> Result<(), Box<dyn std::error::Error>> {
    if kept == not_kept {
        return Err("pass exactly one of --kept or --not-kept".into());
    }

    let store = SessionStore::open()?;
    let db = store.database();
    let mut active = load_active(db).ok_or("no session to review")?;
    let (events, synced_at) = catch_up(&mut active.controller, active.synced_at, Utc::now());
    active.synced_at = synced_at;
    let sink = notifier(config);
    for event in &events {
        notify::dispatch(event, sink.as_ref());
    }

    if active.controller.phase() != Phase::Review {
        save_active(db, &active)?;
        return Err("no finished session awaiting review".into());
    }

    let (record, event) = active.controller.record_review(kept, mood)?;
    store.append(&record)?;
    clear_active(db)?;
    notify::dispatch(&event, sink.as_ref());
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn format_mmss(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
