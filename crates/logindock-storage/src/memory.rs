//! In-memory storage implementation for testing.

use crate::{validate_key, KeyValueStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing.
///
/// This stores all data in memory and is not persistent.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an in-memory storage pre-populated with one value.
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut data) = storage.data.write() {
            data.insert(key.to_string(), value.to_string());
        }
        storage
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_set_and_get() {
        let storage = MemoryStorage::new();
        storage.set_item("key", "value").await.unwrap();
        assert_eq!(storage.get_item("key").await.unwrap().as_deref(), Some("value"));
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_with_item() {
        let storage = MemoryStorage::with_item("loginAccounts", "[]");
        assert!(storage.contains("loginAccounts").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_remove() {
        let storage = MemoryStorage::new();
        storage.set_item("key", "value").await.unwrap();
        storage.remove_item("key").await.unwrap();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_memory_rejects_invalid_key() {
        let storage = MemoryStorage::new();
        assert!(storage.set_item("", "value").await.is_err());
    }
}
