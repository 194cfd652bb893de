//! Test fixtures: sample records and temporary stores.

use logindock_accounts::{AccountStore, CredentialRecord};
use logindock_storage::FileStorage;
use std::path::Path;
use tempfile::TempDir;

/// A complete record for `env` pointing at `url`.
pub fn sample_record(env: &str, url: &str) -> CredentialRecord {
    CredentialRecord::new(env, "acme", "admin", "s3cret", url)
}

/// Export text holding two environments with one record each.
pub fn sample_export() -> String {
    serde_json::json!([
        {
            "env": "staging",
            "children": [{
                "env": "staging",
                "domain": "acme",
                "loginId": "admin",
                "password": "s3cret",
                "url": "https://staging.example.com",
                "browser": "Chrome"
            }]
        },
        {
            "env": "prod",
            "children": [{
                "env": "prod",
                "domain": "acme",
                "loginId": "ops",
                "password": "hunter2",
                "url": "https://example.com"
            }]
        }
    ])
    .to_string()
}

/// A file-backed store in a temporary directory.
///
/// The directory is removed when the `TestStore` is dropped.
pub struct TestStore {
    temp_dir: TempDir,
    pub store: AccountStore<FileStorage>,
}

impl TestStore {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = AccountStore::open(FileStorage::new(temp_dir.path()))
            .await
            .expect("Failed to open store");
        Self { temp_dir, store }
    }

    /// Directory the store writes to.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A second store over the same directory, as a restarted process sees it.
    pub async fn reopen(&self) -> AccountStore<FileStorage> {
        AccountStore::open(FileStorage::new(self.temp_dir.path()))
            .await
            .expect("Failed to reopen store")
    }
}
