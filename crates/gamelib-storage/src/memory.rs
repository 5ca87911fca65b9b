//! In-memory backend

use crate::{KeyValueStore, StorageError, validate_key};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Volatile key-value store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("library", "{}").unwrap();
        assert_eq!(store.get("library").unwrap(), Some("{}".to_string()));
        assert!(store.contains("library").unwrap());

        store.remove("library").unwrap();
        assert_eq!(store.get("library").unwrap(), None);
        // Removing twice is fine
        store.remove("library").unwrap();
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("recentSearches", "[\"zelda\"]").unwrap();
        assert_eq!(other.get("recentSearches").unwrap().as_deref(), Some("[\"zelda\"]"));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_rejects_invalid_key() {
        let store = MemoryStore::new();
        assert!(store.set("../x", "value").is_err());
    }
}
