//! # igIntent Core Library
//!
//! This library provides the core business logic for igIntent, an
//! intentional-usage timer for Instagram. It implements a CLI-first
//! philosophy where all operations are available via a standalone CLI
//! binary, with any GUI shell being a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Session Controller**: A phase state machine (setup, active, review,
//!   stats) that requires the caller to invoke `tick()` once per second
//! - **Countdown Driver**: An async task that owns the per-second ticking
//!   and hands out a cancelable handle
//! - **Store**: SQLite-backed session history and TOML-based configuration
//! - **Report**: Summary statistics and CSV export over the history
//! - **Assets**: Versioned offline cache of the UI assets
//!
//! ## Key Components
//!
//! - [`SessionController`]: Core session state machine
//! - [`SessionStore`]: Append-only session history
//! - [`Config`]: Application configuration management
//! - [`Notifier`]: Trait for notification delivery

pub mod assets;
pub mod error;
pub mod events;
pub mod launcher;
pub mod notify;
pub mod report;
pub mod session;
pub mod store;

pub use assets::{AssetCache, InstallReport};
pub use error::{CacheError, ConfigError, CoreError, StoreError, ValidationError};
pub use events::SessionEvent;
pub use notify::{NoopNotifier, Notifier, RecordingNotifier, TerminalNotifier};
pub use report::{latest_first, summarize, summary_line, to_csv, Summary, EXPORT_FILENAME};
pub use session::{catch_up, Countdown, CountdownHandle, Phase, PlanDraft, SessionController};
pub use store::{Config, Database, LaunchConfig, SessionRecord, SessionStore};
