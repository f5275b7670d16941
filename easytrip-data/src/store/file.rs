//! Directory-backed key-value store.
#![forbid(unsafe_code)]

use std::sync::{Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8;
use easytrip_core::{BackendError, KeyValueStore};
use easytrip_fs::{open_or_create_dir, read_optional, remove_if_exists, replace_file};
use thiserror::Error;

/// Errors raised when opening a [`FileKeyValueStore`].
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// The storage directory could not be created or opened.
    #[error("failed to open storage directory {path:?}")]
    OpenDirectory {
        /// Requested directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Stores each key as `<key>.json` inside one directory.
///
/// Keys are mapped to file names by replacing every character outside
/// `[A-Za-z0-9_-]` with `_`, so distinct keys may share a file when they
/// differ only in such characters. Writes go through a temporary sibling and
/// a rename.
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: Utf8PathBuf,
    dir: Mutex<fs_utf8::Dir>,
}

impl FileKeyValueStore {
    /// Open (creating if necessary) the directory at `path`.
    ///
    /// # Errors
    /// Returns [`FileStoreError::OpenDirectory`] when the directory cannot be
    /// created or opened.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, FileStoreError> {
        let path = path.as_ref();
        let dir = open_or_create_dir(path).map_err(|source| FileStoreError::OpenDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            root: path.to_path_buf(),
            dir: Mutex::new(dir),
        })
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// File name used for `key`.
    #[must_use]
    pub fn file_name(key: &str) -> String {
        let mut stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() {
            stem.push('_');
        }
        stem.push_str(".json");
        stem
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let dir = self.dir.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(read_optional(&dir, &Self::file_name(key))?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let dir = self.dir.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(replace_file(&dir, &Self::file_name(key), value.as_bytes())?)
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        let dir = self.dir.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(remove_if_exists(&dir, &Self::file_name(key))?)
    }
}
