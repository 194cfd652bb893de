//! Local key-value storage for logindock.
//!
//! Values are opaque strings stored under flat keys, in the manner of a
//! browser's `localStorage`. Two backends are provided:
//! - File storage, one file per key (default)
//! - In-memory storage (for testing)

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;

/// A string key-value storage backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `None` if the key doesn't exist.
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove the value stored under `key`. Missing keys are not an error.
    async fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Check if a key exists.
    async fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get_item(key).await?.is_some())
    }
}

/// Reject keys that could escape the storage directory.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::invalid_key("Key cannot be empty"));
    }
    if key.contains('/') || key.contains('\\') || key == "." || key == ".." {
        return Err(StorageError::invalid_key(format!("Invalid key: {key}")));
    }
    Ok(())
}
