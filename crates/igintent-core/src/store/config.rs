//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Session defaults (duration, nudge cadence, snooze length, presets)
//! - Notification preferences
//! - External app launch targets
//! - Offline asset cache origin and manifest
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;

/// Session default settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
    /// Nudge cadence in seconds; 0 disables nudges.
    #[serde(default = "default_nudge_secs")]
    pub default_nudge_secs: u64,
    #[serde(default = "default_snooze_secs")]
    pub default_snooze_secs: u64,
    /// Quick-pick intention labels offered at setup.
    #[serde(default = "default_intention_presets")]
    pub intention_presets: Vec<String>,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// External app launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Custom URI scheme handoff, used when preferred.
    #[serde(default = "default_deep_link")]
    pub deep_link: String,
    /// Plain web fallback.
    #[serde(default = "default_web_url")]
    pub web_url: String,
    #[serde(default)]
    pub prefer_deep_link: bool,
}

/// Offline asset cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Origin the manifest is fetched from; empty leaves the cache idle.
    #[serde(default)]
    pub origin: String,
    #[serde(default = "default_cache_version")]
    pub version: String,
    #[serde(default = "default_manifest")]
    pub manifest: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

// Default functions
fn default_minutes() -> u32 {
    10
}
fn default_nudge_secs() -> u64 {
    60
}
fn default_snooze_secs() -> u64 {
    60
}
fn default_intention_presets() -> Vec<String> {
    vec![
        "Check messages".into(),
        "Reply to a friend".into(),
        "Post one thing".into(),
        "Browse for 10 minutes".into(),
    ]
}
fn default_true() -> bool {
    true
}
fn default_deep_link() -> String {
    "instagram://app".into()
}
fn default_web_url() -> String {
    "https://www.instagram.com".into()
}
fn default_cache_version() -> String {
    "igintent-v2".into()
}
fn default_manifest() -> Vec<String> {
    vec![
        "index.html".into(),
        "style.css".into(),
        "app.js".into(),
        "manifest.webmanifest".into(),
    ]
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            default_nudge_secs: default_nudge_secs(),
            default_snooze_secs: default_snooze_secs(),
            intention_presets: default_intention_presets(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            deep_link: default_deep_link(),
            web_url: default_web_url(),
            prefer_deep_link: false,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            origin: String::new(),
            version: default_cache_version(),
            manifest: default_manifest(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            notifications: NotificationsConfig::default(),
            launch: LaunchConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| format!("cannot parse '{value}' as number"))?
                        } else {
                            return Err(format!("cannot parse '{value}' as number").into());
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }

        Err(format!("unknown config key: {key}").into())
    }

    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
