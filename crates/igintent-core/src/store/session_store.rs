//! Append-only session history.
//!
//! The whole history lives in one named slot as a JSON array, rewritten on
//! every append. Reads are tolerant: an absent or unreadable slot is an
//! empty history, never an error.

use rusqlite::params;
use tracing::debug;

use crate::error::StoreError;

use super::database::Database;
use super::record::SessionRecord;

/// Slot key for the session history array.
const SESSIONS_SLOT: &str = "igi_sessions";

/// Append-only store over the session history slot.
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    /// Open the store backed by the default database.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            db: Database::open()?,
        })
    }

    /// Open an in-memory store (tests).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            db: Database::open_memory()?,
        })
    }

    /// Wrap an already-open database.
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The full history in insertion order. An absent or malformed slot
    /// degrades to an empty list.
    pub fn load_all(&self) -> Vec<SessionRecord> {
        let json = match self.db.kv_get(SESSIONS_SLOT) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(err) => {
                debug!("session slot read failed, treating as empty: {err}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&json) {
            Ok(records) => records,
            Err(err) => {
                debug!("session slot unreadable, treating as empty: {err}");
                Vec::new()
            }
        }
    }

    /// Append one record, rewriting the whole list.
    ///
    /// The read-modify-write runs inside a transaction, so an overlapping
    /// append never loses a record and no reader sees a partial list.
    pub fn append(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let tx = self.db.conn().unchecked_transaction()?;
        let current: Option<String> = {
            let mut stmt = tx.prepare("SELECT value FROM slots WHERE key = ?1")?;
            match stmt.query_row(params![SESSIONS_SLOT], |row| row.get::<_, String>(0)) {
                Ok(v) => Some(v),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            }
        };
        let mut records: Vec<SessionRecord> = current
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        records.push(record.clone());
        let json = serde_json::to_string(&records)
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        tx.execute(
            "INSERT OR REPLACE INTO slots (key, value) VALUES (?1, ?2)",
            params![SESSIONS_SLOT, json],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Destructively empty the history. Irreversible.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.db.kv_delete(SESSIONS_SLOT)
    }
}
