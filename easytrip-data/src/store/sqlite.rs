//! SQLite-backed key-value store.
#![forbid(unsafe_code)]

use std::sync::{Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use easytrip_core::{BackendError, KeyValueStore};
use rusqlite::{Connection, Error as SqliteError, OptionalExtension, params};
use thiserror::Error;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)";

const UPSERT: &str = "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value";

/// Errors raised when opening a [`SqliteKeyValueStore`].
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the `kv_store` table failed.
    #[error("failed to create kv_store table")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Stores every key as a row of a single `kv_store` table.
#[derive(Debug)]
pub struct SqliteKeyValueStore {
    connection: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// Open or create the database at `path`.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the database cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, SqliteStoreError> {
        let path = path.as_ref();
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| SqliteStoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_connection(connection)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the schema cannot be created.
    pub fn in_memory() -> Result<Self, SqliteStoreError> {
        let connection = Connection::open_in_memory().map_err(|source| SqliteStoreError::Open {
            path: Utf8PathBuf::from(":memory:"),
            source,
        })?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, SqliteStoreError> {
        connection
            .execute(CREATE_TABLE, [])
            .map_err(|source| SqliteStoreError::CreateSchema { source })?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let connection = self.connection.lock().unwrap_or_else(PoisonError::into_inner);
        let value = connection
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let connection = self.connection.lock().unwrap_or_else(PoisonError::into_inner);
        connection.execute(UPSERT, params![key, value])?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        let connection = self.connection.lock().unwrap_or_else(PoisonError::into_inner);
        connection.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn upsert_replaces_value() {
        let store = SqliteKeyValueStore::in_memory().expect("open");
        store.set("easytrip_route", "first").expect("set");
        store.set("easytrip_route", "second").expect("overwrite");
        assert_eq!(
            store.get("easytrip_route").expect("get").as_deref(),
            Some("second")
        );
    }

    #[rstest]
    fn remove_deletes_only_the_key() {
        let store = SqliteKeyValueStore::in_memory().expect("open");
        store.set("a", "1").expect("set a");
        store.set("b", "2").expect("set b");
        store.remove("a").expect("remove");
        assert_eq!(store.get("a").expect("get a"), None);
        assert_eq!(store.get("b").expect("get b").as_deref(), Some("2"));
    }

    #[rstest]
    fn values_survive_reopening() {
        let temp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("state.db")).expect("utf-8 path");
        SqliteKeyValueStore::open(&path)
            .expect("open")
            .set("slot", "persisted")
            .expect("set");
        let reopened = SqliteKeyValueStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("slot").expect("get").as_deref(), Some("persisted"));
    }
}
