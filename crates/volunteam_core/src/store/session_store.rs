//! Session store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist session credentials as string key/value pairs.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Multi-key writes and removals are atomic: all keys change or none do.
//! - Reads reject invalid persisted state instead of masking it.

use crate::db::DbError;
use log::{error, info};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StorageError>;

/// Failure talking to the durable session store.
#[derive(Debug)]
pub enum StorageError {
    /// SQLite transport or bootstrap failure.
    Db(DbError),
    /// Store backend unreachable (host-provided stores).
    Unavailable(String),
    /// Persisted value could not be decoded.
    InvalidData(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "session store error: {err}"),
            Self::Unavailable(message) => write!(f, "session store unavailable: {message}"),
            Self::InvalidData(message) => write!(f, "invalid session store data: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl StorageError {
    /// Stable short code used in log lines and FFI messages.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(_) => "store_db_failed",
            Self::Unavailable(_) => "store_unavailable",
            Self::InvalidData(_) => "store_invalid_data",
        }
    }
}

/// Durable key-value persistence for session credentials.
pub trait SessionStore {
    /// Returns every stored entry.
    fn read_all(&self) -> StoreResult<BTreeMap<String, String>>;
    /// Upserts every entry in one atomic step.
    fn write_all(&self, entries: &BTreeMap<String, String>) -> StoreResult<()>;
    /// Removes the given keys in one atomic step. Missing keys are not an error.
    fn remove_keys(&self, keys: &[&str]) -> StoreResult<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn read_all(&self) -> StoreResult<BTreeMap<String, String>> {
        (**self).read_all()
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        (**self).write_all(entries)
    }

    fn remove_keys(&self, keys: &[&str]) -> StoreResult<()> {
        (**self).remove_keys(keys)
    }
}

/// SQLite-backed session store over the `session_entries` table.
pub struct SqliteSessionStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SessionStore for SqliteSessionStore<'_> {
    fn read_all(&self) -> StoreResult<BTreeMap<String, String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM session_entries ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut entries = BTreeMap::new();

        while let Some(row) = rows.next()? {
            let key: String = row.get("key")?;
            if key.is_empty() {
                return Err(StorageError::InvalidData(
                    "empty key in session_entries.key".to_string(),
                ));
            }
            entries.insert(key, row.get("value")?);
        }

        Ok(entries)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let started_at = Instant::now();
        if entries.keys().any(|key| key.is_empty()) {
            return Err(StorageError::InvalidData(
                "refusing to write an empty key".to_string(),
            ));
        }

        let result = (|| -> StoreResult<()> {
            let tx = self.conn.unchecked_transaction()?;
            for (key, value) in entries {
                tx.execute(
                    "INSERT INTO session_entries (key, value)
                     VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = (strftime('%s', 'now') * 1000);",
                    params![key.as_str(), value.as_str()],
                )?;
            }
            tx.commit()?;
            Ok(())
        })();

        log_write("write_all", entries.len(), started_at, &result);
        result
    }

    fn remove_keys(&self, keys: &[&str]) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = (|| -> StoreResult<()> {
            let tx = self.conn.unchecked_transaction()?;
            for key in keys {
                tx.execute("DELETE FROM session_entries WHERE key = ?1;", [*key])?;
            }
            tx.commit()?;
            Ok(())
        })();

        log_write("remove_keys", keys.len(), started_at, &result);
        result
    }
}

fn log_write(op: &str, key_count: usize, started_at: Instant, result: &StoreResult<()>) {
    match result {
        Ok(()) => info!(
            "event=session_store_{op} module=store status=ok keys={key_count} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=session_store_{op} module=store status=error keys={key_count} duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
}
