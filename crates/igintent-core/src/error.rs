//! Core error types for igintent-core.
//!
//! This module defines the error hierarchy using thiserror. Library calls
//! return typed errors; best-effort side effects (notifications, app launch)
//! never surface here at all.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for igintent-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Asset cache errors
    #[error("Asset cache error: {0}")]
    Cache(#[from] CacheError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Operation invoked outside the state that allows it
    #[error("'{operation}' is not valid in the {phase} phase")]
    InvalidPhase { operation: String, phase: String },
}

/// Asset cache errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No asset origin configured
    #[error("Asset origin is not configured")]
    OriginNotConfigured,

    /// Cache root could not be resolved
    #[error("Failed to resolve cache root: {0}")]
    Root(String),

    /// Origin URL did not parse
    #[error("Invalid asset URL: {0}")]
    Url(#[from] url::ParseError),

    /// Origin request failed
    #[error("Asset fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Origin answered with a non-success status
    #[error("Asset fetch for {url} returned status {status}")]
    FetchFailed { url: String, status: u16 },

    /// Filesystem failure under the cache root
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
