//! The credential store.

use crate::error::{AccountError, AccountResult};
use crate::model::{CredentialRecord, EnvironmentGroup, RecordIdentity};
use logindock_storage::KeyValueStore;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Local-storage key holding the serialized collection.
pub const STORAGE_KEY: &str = "loginAccounts";

/// What an import changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Environments that did not exist before.
    pub groups_added: usize,
    /// Records appended, including those of new environments.
    pub records_added: usize,
    /// Records skipped because their triple already existed.
    pub duplicates_skipped: usize,
}

/// In-memory credential collection mirrored to local storage.
///
/// Every mutating method writes the full collection back before returning.
pub struct AccountStore<S> {
    storage: S,
    groups: Vec<EnvironmentGroup>,
}

impl<S: KeyValueStore> AccountStore<S> {
    /// Open the store, loading whatever is persisted.
    pub async fn open(storage: S) -> AccountResult<Self> {
        let mut store = Self {
            storage,
            groups: Vec::new(),
        };
        store.load().await?;
        Ok(store)
    }

    /// Reload the collection from local storage.
    ///
    /// Missing or malformed data yields an empty collection; only storage
    /// I/O failures are errors.
    pub async fn load(&mut self) -> AccountResult<&[EnvironmentGroup]> {
        let groups = match self.storage.get_item(STORAGE_KEY).await? {
            None => Vec::new(),
            Some(text) => match serde_json::from_str::<Vec<EnvironmentGroup>>(&text) {
                Ok(mut groups) => {
                    groups.retain(|g| !g.children.is_empty());
                    groups
                }
                Err(e) => {
                    warn!(error = %e, "Stored accounts are malformed, starting empty");
                    Vec::new()
                }
            },
        };

        debug!(groups = groups.len(), "Loaded accounts");
        self.groups = groups;
        Ok(&self.groups)
    }

    /// The current collection.
    pub fn groups(&self) -> &[EnvironmentGroup] {
        &self.groups
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Total number of records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.children.len()).sum()
    }

    /// Look up a record by its triple.
    pub fn find(&self, identity: &RecordIdentity) -> Option<&CredentialRecord> {
        self.groups
            .iter()
            .filter(|g| g.env == identity.env)
            .flat_map(|g| g.children.iter())
            .find(|c| c.matches(identity))
    }

    pub fn contains(&self, identity: &RecordIdentity) -> bool {
        self.find(identity).is_some()
    }

    /// Append a record to its environment, creating the group if needed.
    ///
    /// Does not deduplicate; callers that care check [`contains`](Self::contains) first.
    pub async fn add(&mut self, record: CredentialRecord) -> AccountResult<()> {
        record.validate()?;
        info!(record = %record.identity(), "Adding account");

        self.insert(record);
        self.persist().await
    }

    /// Replace the record identified by `old` with `record`.
    ///
    /// If the environment changed, the record moves to the group for the new
    /// environment. Returns `false` if no record matched `old`.
    pub async fn update(
        &mut self,
        old: &RecordIdentity,
        record: CredentialRecord,
    ) -> AccountResult<bool> {
        record.validate()?;

        let Some(group_idx) = self.groups.iter().position(|g| g.env == old.env) else {
            return Ok(false);
        };
        let Some(child_idx) = self.groups[group_idx].position(&old.domain, &old.login_id) else {
            return Ok(false);
        };

        info!(from = %old, to = %record.identity(), "Updating account");

        if record.env == old.env {
            self.groups[group_idx].children[child_idx] = record;
        } else {
            self.groups[group_idx].children.remove(child_idx);
            if self.groups[group_idx].children.is_empty() {
                self.groups.remove(group_idx);
            }
            self.insert(record);
        }

        self.persist().await?;
        Ok(true)
    }

    /// Remove a record, dropping its group if it becomes empty.
    ///
    /// Returns `false` if no record matched.
    pub async fn delete(&mut self, identity: &RecordIdentity) -> AccountResult<bool> {
        let Some(group_idx) = self.groups.iter().position(|g| g.env == identity.env) else {
            return Ok(false);
        };
        let Some(child_idx) =
            self.groups[group_idx].position(&identity.domain, &identity.login_id)
        else {
            return Ok(false);
        };

        info!(record = %identity, "Deleting account");

        self.groups[group_idx].children.remove(child_idx);
        if self.groups[group_idx].children.is_empty() {
            self.groups.remove(group_idx);
        }

        self.persist().await?;
        Ok(true)
    }

    /// The full collection as pretty-printed JSON.
    pub fn export(&self) -> AccountResult<String> {
        Ok(serde_json::to_string_pretty(&self.groups)?)
    }

    /// Merge groups from exported JSON text.
    ///
    /// Unknown environments are appended whole. For known environments each
    /// incoming record is appended unless its triple is already present;
    /// duplicates are skipped, never overwritten.
    pub async fn import(&mut self, text: &str) -> AccountResult<ImportSummary> {
        let value: Value = serde_json::from_str(text).map_err(AccountError::ImportParse)?;
        if !value.is_array() {
            return Err(AccountError::ImportFormat(
                "expected a list of environment groups".to_string(),
            ));
        }
        let incoming: Vec<EnvironmentGroup> =
            serde_json::from_value(value).map_err(|e| AccountError::ImportFormat(e.to_string()))?;

        let mut summary = ImportSummary::default();

        for group in incoming {
            match self.groups.iter_mut().find(|g| g.env == group.env) {
                None => {
                    if group.children.is_empty() {
                        continue;
                    }
                    summary.groups_added += 1;
                    summary.records_added += group.children.len();
                    self.groups.push(group);
                }
                Some(existing) => {
                    for child in group.children {
                        let identity = child.identity();
                        if existing.children.iter().any(|c| c.matches(&identity)) {
                            debug!(record = %identity, "Skipping duplicate on import");
                            summary.duplicates_skipped += 1;
                        } else {
                            summary.records_added += 1;
                            existing.children.push(child);
                        }
                    }
                }
            }
        }

        info!(
            groups_added = summary.groups_added,
            records_added = summary.records_added,
            duplicates_skipped = summary.duplicates_skipped,
            "Imported accounts"
        );

        self.persist().await?;
        Ok(summary)
    }

    fn insert(&mut self, record: CredentialRecord) {
        match self.groups.iter_mut().find(|g| g.env == record.env) {
            Some(group) => group.children.push(record),
            None => self.groups.push(EnvironmentGroup::with_record(record)),
        }
    }

    /// Write the whole collection back as compact JSON.
    async fn persist(&self) -> AccountResult<()> {
        let text = serde_json::to_string(&self.groups)?;
        self.storage.set_item(STORAGE_KEY, &text).await?;
        debug!(groups = self.groups.len(), bytes = text.len(), "Persisted accounts");
        Ok(())
    }
}

impl<S> std::fmt::Debug for AccountStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("groups", &self.groups.len())
            .finish()
    }
}
