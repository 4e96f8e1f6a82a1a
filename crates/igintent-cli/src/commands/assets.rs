use clap::Subcommand;
use serde_json::json;

use igintent_core::{AssetCache, Config};

#[derive(Subcommand)]
pub enum AssetsAction {
    /// Download the manifest for the configured version
    Install,
    /// Show cache state as JSON
    Status,
    /// Remove every cached version except the current one
    Purge,
}

pub fn run(action: AssetsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let cache = AssetCache::from_config(&config.assets)?;

    match action {
        AssetsAction::Install => {
            let runtime = tokio::runtime::Runtime::new()?;
            let report = runtime.block_on(cache.install())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        AssetsAction::Status => {
            let status = json!({
                "version": cache.version(),
                "installed": cache.is_installed(),
                "manifest": cache.manifest(),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        AssetsAction::Purge => {
            let removed = cache.purge_stale()?;
            println!("{}", serde_json::to_string_pretty(&removed)?);
        }
    }
    Ok(())
}
