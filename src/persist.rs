//! Persistence gateway: the item list round-trips through one key-value record.
//!
//! DESIGN
//! ======
//! The whole ordered item list is serialized to a single JSON array under a
//! fixed key and written synchronously, last writer wins. There is no merge
//! and no version field. Loading distinguishes "nothing stored" (an empty
//! list) from "stored but unreadable" (an error); the caller decides the
//! fallback, which for the engine is an empty canvas.
//!
//! Backends implement [`KeyValueStore`]. [`MemoryStore`] is used natively and
//! in tests; [`LocalStorage`] wraps the browser's `window.localStorage`.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashMap;

use crate::doc::CanvasItem;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("stored canvas could not be encoded: {0}")]
    Encode(serde_json::Error),
    #[error("stored canvas is malformed: {0}")]
    Malformed(serde_json::Error),
}

/// Synchronous string key-value storage.
pub trait KeyValueStore {
    /// Read the value under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `Read` if the backend refuses the read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `Write` if the backend refuses the write (e.g. quota exceeded).
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// In-process key-value store. Counts writes so batching can be observed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value without counting it as a write.
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Number of `set` calls since creation.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

// =============================================================================
// BROWSER BACKEND
// =============================================================================

/// `window.localStorage`.
#[cfg(feature = "browser")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(feature = "browser")]
impl LocalStorage {
    /// Open the window's local storage.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` outside a window context or when storage is disabled.
    pub fn open() -> Result<Self, PersistError> {
        let window = web_sys::window().ok_or_else(|| PersistError::Unavailable("no window".to_owned()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(PersistError::Unavailable("localStorage is disabled".to_owned())),
            Err(e) => Err(PersistError::Unavailable(format!("{e:?}"))),
        }
    }
}

#[cfg(feature = "browser")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistError::Read(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistError::Write(format!("{e:?}")))
    }
}

// =============================================================================
// GATEWAY
// =============================================================================

/// Reads and writes the canvas under one fixed key.
#[derive(Debug)]
pub struct PersistenceGateway<S> {
    key: String,
    backend: S,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    #[must_use]
    pub fn new(key: impl Into<String>, backend: S) -> Self {
        Self { key: key.into(), backend }
    }

    /// Serialize the full item list and overwrite the stored record.
    ///
    /// # Errors
    ///
    /// Returns `Encode` if serialization fails, or the backend's `Write` error.
    pub fn save(&mut self, items: &[CanvasItem]) -> Result<(), PersistError> {
        let raw = serde_json::to_string(items).map_err(PersistError::Encode)?;
        self.backend.set(&self.key, &raw)
    }

    /// Read the stored item list. A missing record is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` when the record exists but is not a valid item array,
    /// or the backend's `Read` error.
    pub fn load(&self) -> Result<Vec<CanvasItem>, PersistError> {
        match self.backend.get(&self.key)? {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(PersistError::Malformed),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }
}
