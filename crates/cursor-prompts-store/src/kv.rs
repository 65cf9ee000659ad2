//! The key-value seam every backend implements.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, StorageError};

/// An async key-value store holding JSON values.
///
/// Shaped after the extension storage area the prompt library was first
/// written against: single-key reads and multi-key writes. A multi-key
/// `set` must be applied atomically, all entries or none.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a single key. Missing keys yield `None`.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write several keys at once.
    async fn set(&self, entries: Vec<(String, Value)>) -> Result<()>;
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, entries: Vec<(String, Value)>) -> Result<()> {
        let mut map = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        map.extend(entries);
        Ok(())
    }
}
