//! Hand-off to the external app once a session is running.
//!
//! Launching is fire-and-forget: session state never depends on whether
//! the app actually opened, so failures are logged and swallowed.

use tracing::debug;

use crate::store::LaunchConfig;

/// Pick the URL to open for the configured launch targets.
///
/// The deep link wins only when preferred and non-empty; otherwise the
/// web URL is used.
pub fn launch_url(config: &LaunchConfig) -> &str {
    if config.prefer_deep_link && !config.deep_link.is_empty() {
        &config.deep_link
    } else {
        &config.web_url
    }
}

/// Open the external app with the system handler.
///
/// Does nothing when no URL is configured. Launch failures are reported
/// at debug level and otherwise ignored.
pub fn open_app(config: &LaunchConfig) {
    let url = launch_url(config);
    if url.is_empty() {
        debug!("no launch URL configured, skipping");
        return;
    }
    if let Err(e) = open::that_detached(url) {
        debug!("failed to launch {url}: {e}");
    }
}
