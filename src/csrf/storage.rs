//! Session-scoped key-value storage backing the CSRF guard

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A key-value scope tied to one session (a browser tab's session storage,
/// or its equivalent in the host application).
pub trait SessionStorage: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, overwriting any existing one
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing an absent key succeeds
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-memory session storage. Lives as long as the session that owns it.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for MemoryStorage {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

fn poisoned() -> Error {
    Error::Storage("session storage lock poisoned".to_string())
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.remove(key);
        Ok(())
    }
}

/// Storage that rejects every access, like a browser with session storage
/// disabled by policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStorage;

impl SessionStorage for DisabledStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Storage("session storage is disabled".to_string()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Storage("session storage is disabled".to_string()))
    }

    fn remove_item(&self, _key: &str) -> Result<()> {
        Err(Error::Storage("session storage is disabled".to_string()))
    }
}
