//! Durable [`easytrip_core::KeyValueStore`] implementations.
//!
//! - [`FileKeyValueStore`] keeps one JSON file per key in a directory.
//! - [`SqliteKeyValueStore`] keeps every key in a single SQLite table
//!   (requires the `store-sqlite` feature).

mod file;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use file::{FileKeyValueStore, FileStoreError};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteKeyValueStore, SqliteStoreError};
