//! Versioned offline asset cache.
//!
//! Mirrors a fixed manifest of UI assets from a configured origin into
//! `<data_dir>/cache/<version>/`. Install is all-or-nothing: assets are
//! fetched into a staging directory that is renamed into place only once
//! every file landed. Reads consult the cache before falling back to a
//! live fetch, and a live fetch never writes back. Bumping the version
//! leaves older directories behind until [`AssetCache::purge_stale`]
//! removes them.

use std::path::{Path, PathBuf};

use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::CacheError;
use crate::store::{data_dir, AssetsConfig};

/// Outcome of a completed install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub version: String,
    pub assets: usize,
    pub bytes: u64,
}

/// Offline copy of the UI assets, keyed by cache version.
pub struct AssetCache {
    root: PathBuf,
    origin: Option<Url>,
    version: String,
    manifest: Vec<String>,
    client: Client,
}

impl AssetCache {
    /// Build a cache rooted at `<data_dir>/cache`.
    pub fn from_config(config: &AssetsConfig) -> Result<Self, CacheError> {
        let root = data_dir()
            .map_err(|e| CacheError::Root(e.to_string()))?
            .join("cache");
        Self::at_root(root, config)
    }

    /// Build a cache rooted at an explicit directory.
    pub fn at_root(root: impl Into<PathBuf>, config: &AssetsConfig) -> Result<Self, CacheError> {
        let origin = if config.origin.is_empty() {
            None
        } else {
            // A trailing slash keeps the last path segment when joining
            // manifest names onto the origin.
            let mut base = config.origin.clone();
            if !base.ends_with('/') {
                base.push('/');
            }
            Some(Url::parse(&base)?)
        };

        Ok(Self {
            root: root.into(),
            origin,
            version: config.version.clone(),
            manifest: config.manifest.clone(),
            client: Client::new(),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn manifest(&self) -> &[String] {
        &self.manifest
    }

    /// Directory holding the current version's assets.
    pub fn version_dir(&self) -> PathBuf {
        self.root.join(&self.version)
    }

    /// Whether every manifest entry is present for the current version.
    pub fn is_installed(&self) -> bool {
        let dir = self.version_dir();
        dir.is_dir() && self.manifest.iter().all(|name| dir.join(name).is_file())
    }

    /// Download the full manifest and promote it to the current version.
    ///
    /// Assets land in a staging directory first; the version directory is
    /// only replaced once every fetch succeeded, so a failed install
    /// leaves any previous install untouched.
    ///
    /// # Errors
    ///
    /// Fails when no origin is configured, when any asset fetch fails,
    /// or on filesystem errors while staging.
    pub async fn install(&self) -> Result<InstallReport, CacheError> {
        let staging = self.root.join(format!(".staging-{}", self.version));
        if staging.exists() {
            std::fs::remove_dir_all(&staging)?;
        }
        std::fs::create_dir_all(&staging)?;

        let mut bytes_total: u64 = 0;
        for name in &self.manifest {
            let bytes = match self.fetch(name).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    let _ = std::fs::remove_dir_all(&staging);
                    return Err(e);
                }
            };
            bytes_total += bytes.len() as u64;
            write_asset(&staging, name, &bytes)?;
        }

        let target = self.version_dir();
        if target.exists() {
            std::fs::remove_dir_all(&target)?;
        }
        std::fs::rename(&staging, &target)?;

        debug!(
            "installed {} assets ({bytes_total} bytes) as {}",
            self.manifest.len(),
            self.version
        );
        Ok(InstallReport {
            version: self.version.clone(),
            assets: self.manifest.len(),
            bytes: bytes_total,
        })
    }

    /// Read an asset, preferring the installed copy.
    ///
    /// Falls back to a live fetch on a miss. Live responses are served
    /// as-is and never written into the cache.
    ///
    /// # Errors
    ///
    /// Fails when the asset is not cached and the live fetch fails.
    pub async fn serve(&self, name: &str) -> Result<Vec<u8>, CacheError> {
        if self.manifest.iter().any(|entry| entry == name) {
            let path = self.version_dir().join(name);
            if let Ok(bytes) = std::fs::read(&path) {
                debug!("cache hit: {name}");
                return Ok(bytes);
            }
        }
        debug!("cache miss: {name}");
        self.fetch(name).await
    }

    /// Delete every cached version except the current one.
    ///
    /// Returns the names of the removed directories.
    pub fn purge_stale(&self) -> Result<Vec<String>, CacheError> {
        let mut removed = Vec::new();
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return Ok(removed),
        };

        for entry in entries {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name != self.version {
                std::fs::remove_dir_all(entry.path())?;
                removed.push(name);
            }
        }

        removed.sort();
        Ok(removed)
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>, CacheError> {
        let origin = self.origin.as_ref().ok_or(CacheError::OriginNotConfigured)?;
        let url = origin.join(name)?;

        let resp = self.client.get(url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(CacheError::FetchFailed {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

fn write_asset(dir: &Path, name: &str, bytes: &[u8]) -> Result<(), CacheError> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, bytes)?;
    Ok(())
}
