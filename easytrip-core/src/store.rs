//! Persistence of the last computed route in a single keyed slot.
//!
//! [`RouteStateStore`] owns the serialised format and its validation; the
//! actual medium is an injected [`KeyValueStore`]. The stored document has the
//! shape `{"directions": <raw path>, "points": [OrderedPoint, ...]}`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ComputedRoute, OrderedPoint, RawPath};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "easytrip_route";

/// Error type reported by [`KeyValueStore`] backends.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A durable string-to-string store.
///
/// Writes replace the whole value for a key. Implementations must be safe to
/// share between tasks.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns the backend error when the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    /// Returns the backend error when the medium rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Delete the value stored under `key`; absent keys are not an error.
    ///
    /// # Errors
    /// Returns the backend error when the medium rejects the delete.
    fn remove(&self, key: &str) -> Result<(), BackendError>;
}

/// Errors from [`RouteStateStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Serialising or writing the route failed.
    #[error("failed to save route under '{key}': {source}")]
    WriteFailed {
        /// Storage key.
        key: String,
        /// Underlying failure.
        #[source]
        source: BackendError,
    },
    /// The backend could not be read.
    #[error("failed to read route under '{key}': {source}")]
    ReadFailed {
        /// Storage key.
        key: String,
        /// Underlying failure.
        #[source]
        source: BackendError,
    },
    /// Stored content did not describe a valid route.
    #[error("stored route under '{key}' is corrupt: {message}")]
    Corrupt {
        /// Storage key.
        key: String,
        /// Description of the defect.
        message: String,
    },
}

#[derive(Serialize)]
struct PersistedRouteRef<'a> {
    directions: &'a RawPath,
    points: &'a [OrderedPoint],
}

#[derive(Deserialize)]
struct PersistedRoute {
    #[serde(default)]
    directions: RawPath,
    points: Vec<OrderedPoint>,
}

/// Saves and restores the most recent [`ComputedRoute`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use easytrip_core::{MemoryKeyValueStore, RouteStateStore};
///
/// let store = RouteStateStore::new(Arc::new(MemoryKeyValueStore::default()));
/// assert!(store.load()?.is_none());
/// # Ok::<(), easytrip_core::StorageError>(())
/// ```
#[derive(Clone)]
pub struct RouteStateStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for RouteStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteStateStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl RouteStateStore {
    /// Store routes under [`DEFAULT_STORAGE_KEY`].
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    /// Store routes under a custom key.
    pub fn with_key(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace the stored route.
    ///
    /// # Errors
    /// Returns [`StorageError::WriteFailed`] when serialisation or the
    /// backend write fails.
    pub fn save(&self, route: &ComputedRoute) -> Result<(), StorageError> {
        let document = serde_json::to_string(&PersistedRouteRef {
            directions: route.raw_path(),
            points: route.points(),
        })
        .map_err(|err| self.write_failed(err.into()))?;
        self.backend
            .set(&self.key, &document)
            .map_err(|err| self.write_failed(err))?;
        debug!("saved route with {} points under '{}'", route.len(), self.key);
        Ok(())
    }

    /// Restore the stored route, if any.
    ///
    /// The restored route carries a fresh timestamp.
    ///
    /// # Errors
    /// Returns [`StorageError::ReadFailed`] when the backend fails and
    /// [`StorageError::Corrupt`] when the content is not a valid route.
    pub fn load(&self) -> Result<Option<ComputedRoute>, StorageError> {
        let Some(document) = self.read()? else {
            return Ok(None);
        };
        let persisted: PersistedRoute =
            serde_json::from_str(&document).map_err(|err| self.corrupt(&err))?;
        let route = ComputedRoute::new(persisted.points, persisted.directions)
            .map_err(|err| self.corrupt(&err))?;
        Ok(Some(route))
    }

    /// Whether anything is stored under the key.
    ///
    /// # Errors
    /// Returns [`StorageError::ReadFailed`] when the backend fails.
    pub fn contains(&self) -> Result<bool, StorageError> {
        Ok(self.read()?.is_some())
    }

    /// Delete the stored route.
    ///
    /// # Errors
    /// Returns [`StorageError::WriteFailed`] when the backend fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend
            .remove(&self.key)
            .map_err(|err| self.write_failed(err))
    }

    fn read(&self) -> Result<Option<String>, StorageError> {
        self.backend
            .get(&self.key)
            .map_err(|source| StorageError::ReadFailed {
                key: self.key.clone(),
                source,
            })
    }

    fn write_failed(&self, source: BackendError) -> StorageError {
        StorageError::WriteFailed {
            key: self.key.clone(),
            source,
        }
    }

    fn corrupt(&self, err: &dyn std::fmt::Display) -> StorageError {
        StorageError::Corrupt {
            key: self.key.clone(),
            message: err.to_string(),
        }
    }
}

/// Volatile [`KeyValueStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Seed the store with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::default();
        store
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        store
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
