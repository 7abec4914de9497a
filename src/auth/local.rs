//! Secondary, client-only credential location: a non-expiring key/value store.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::persist::{read_state, write_state};
use crate::error::{IdentityError, Result};

/// Storage abstraction for client-local string values.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Process-local key/value store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| IdentityError::Storage("local store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Key/value store persisted as a TOML file.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let file: LocalFile = read_state(&self.path)?;
        Ok(file.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut file: LocalFile = read_state(&self.path)?;
        file.items.insert(key.to_string(), value.to_string());
        write_state(&self.path, &file)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut file: LocalFile = read_state(&self.path)?;
        if file.items.remove(key).is_none() {
            return Ok(());
        }
        write_state(&self.path, &file)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalFile {
    #[serde(default)]
    items: BTreeMap<String, String>,
}
