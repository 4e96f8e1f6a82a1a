mod config;
pub mod database;
mod record;
mod session_store;

pub use config::{AssetsConfig, Config, LaunchConfig, NotificationsConfig, SessionConfig};
pub use database::Database;
pub use record::SessionRecord;
pub use session_store::SessionStore;

use std::path::PathBuf;

/// Returns `~/.config/igintent[-dev]/` based on IGINTENT_ENV.
///
/// Set IGINTENT_ENV=dev to use a development data directory, or
/// IGINTENT_DATA_DIR to point somewhere explicit (tests do).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(dir) = std::env::var("IGINTENT_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("IGINTENT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("igintent-dev")
    } else {
        base_dir.join("igintent")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
