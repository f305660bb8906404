//! SQLite-backed durable store: one `kv` table, one connection.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::debug;

use beacon_core::errors::StorageError;
use beacon_core::traits::KeyValueStore;

/// Durable key/value store. Writes are visible to every later open of the
/// same file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) a store backed by the file at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(to_storage_err)?;
        debug!(path = %path.display(), "opened sqlite store");
        Self::initialize(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(to_storage_err)?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            PRAGMA busy_timeout = 5000;
            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );
            ",
        )
        .map_err(to_storage_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Backend {
            message: "sqlite connection lock poisoned".to_string(),
        })?;
        f(&conn).map_err(to_storage_err)
    }
}

impl KeyValueStore for SqliteStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
        })
        .map_err(|e| match e {
            StorageError::QuotaExceeded { .. } => StorageError::QuotaExceeded {
                key: key.to_string(),
            },
            other => other,
        })?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.with_conn(|conn| conn.execute("DELETE FROM kv WHERE key = ?1", params![key]))?;
        Ok(())
    }
}

fn to_storage_err(e: rusqlite::Error) -> StorageError {
    match e.sqlite_error_code() {
        Some(ErrorCode::DiskFull) => StorageError::QuotaExceeded { key: String::new() },
        Some(ErrorCode::ReadOnly) | Some(ErrorCode::PermissionDenied) => {
            StorageError::AccessDenied {
                reason: e.to_string(),
            }
        }
        Some(ErrorCode::CannotOpen) => StorageError::Unavailable {
            reason: e.to_string(),
        },
        _ => StorageError::Backend {
            message: e.to_string(),
        },
    }
}
