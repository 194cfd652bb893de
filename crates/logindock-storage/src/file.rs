//! File-based storage implementation.
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go through a temp file and
//! a rename so a crash never leaves a half-written value behind.

use crate::{validate_key, KeyValueStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File-based key-value storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage rooted at the given directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory holding the stored values.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the file path for a key.
    pub fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key)?;
        debug!(path = %path.display(), "Reading from storage");

        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        debug!(path = %path.display(), bytes = value.len(), "Writing to storage");

        fs::create_dir_all(&self.base_path).await?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).await?;

        // Values hold clear-text passwords; keep them owner-only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            fs::set_permissions(&temp_path, perms).await?;
        }

        fs::rename(&temp_path, &path).await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        debug!(path = %path.display(), "Removing from storage");

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn contains(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }
}
