use std::path::PathBuf;

use clap::Subcommand;
use igintent_core::{latest_first, summarize, summary_line, to_csv, SessionStore, EXPORT_FILENAME};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Summary statistics as JSON
    Show,
    /// Recorded sessions, latest first
    List,
    /// Write the history as CSV
    Export {
        /// Output path (defaults to ig-intentional.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete the entire history
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SessionStore::open()?;

    match action {
        StatsAction::Show => {
            let summary = summarize(&store.load_all());
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::List => {
            let history = store.load_all();
            if history.is_empty() {
                println!("no sessions recorded yet");
                return Ok(());
            }
            println!("{}", summary_line(&summarize(&history)));
            for record in latest_first(&history) {
                let kept = if record.completed { "kept" } else { "not kept" };
                let mood = record
                    .mood
                    .map(|m| format!(" · mood {m}"))
                    .unwrap_or_default();
                println!(
                    "{} · {} · {}/{} min · {kept}{mood}",
                    record.started_at.format("%Y-%m-%d %H:%M"),
                    record.intention,
                    record.actual_min,
                    record.planned_min,
                );
            }
        }
        StatsAction::Export { out } => {
            let history = store.load_all();
            let path = out.unwrap_or_else(|| PathBuf::from(EXPORT_FILENAME));
            std::fs::write(&path, to_csv(&history))?;
            println!("wrote {} rows to {}", history.len(), path.display());
        }
        StatsAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear the history without --yes".into());
            }
            store.clear_all()?;
            println!("history cleared");
        }
    }
    Ok(())
}
