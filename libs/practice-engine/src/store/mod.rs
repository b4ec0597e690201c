//! Persistence adapter boundary.
//!
//! The engine persists through an opaque async key-value store supplied by
//! the host application; it never assumes a concrete backend.

mod progress;

pub use progress::{ProgressSnapshot, ProgressStore, INCORRECT_KEY, MARKED_KEY, SRS_KEY};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("backend error: {0}")]
    Backend(String),
}

/// Opaque async key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-memory store for tests and prototyping.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key directly, bypassing the async interface.
    pub fn insert(&self, key: &str, value: &str) {
        let mut guard = self.entries.lock().expect("store lock");
        guard.insert(key.to_string(), value.to_string());
    }

    /// Inspect a stored value directly.
    pub fn value(&self, key: &str) -> Option<String> {
        let guard = self.entries.lock().expect("store lock");
        guard.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }
}
