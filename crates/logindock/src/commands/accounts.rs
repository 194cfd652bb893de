//! Credential store commands.

use crate::config::Config;
use crate::RecordArgs;
use anyhow::{bail, Context};
use logindock_accounts::{AccountStore, Browser, CredentialRecord, RecordIdentity};
use logindock_storage::FileStorage;
use tracing::info;

impl RecordArgs {
    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity::new(&self.env, &self.domain, &self.login_id)
    }
}

/// Field changes requested by `edit`. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct RecordChanges {
    pub env: Option<String>,
    pub domain: Option<String>,
    pub login_id: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub browser: Option<Browser>,
}

impl RecordChanges {
    /// Apply these changes to a copy of `record`.
    pub fn apply(self, record: &CredentialRecord) -> CredentialRecord {
        CredentialRecord {
            env: self.env.unwrap_or_else(|| record.env.clone()),
            domain: self.domain.unwrap_or_else(|| record.domain.clone()),
            login_id: self.login_id.unwrap_or_else(|| record.login_id.clone()),
            password: self.password.unwrap_or_else(|| record.password.clone()),
            url: self.url.unwrap_or_else(|| record.url.clone()),
            browser: self.browser.or(record.browser),
        }
    }
}

/// Open the file-backed store configured for this process.
pub async fn open_store(config: &Config) -> anyhow::Result<AccountStore<FileStorage>> {
    let dir = config.storage_dir()?;
    AccountStore::open(FileStorage::new(&dir))
        .await
        .with_context(|| format!("failed to open credential store in {}", dir.display()))
}

/// Print the store as a tree, or as JSON.
pub async fn list_accounts(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    if json {
        println!("{}", store.export()?);
        return Ok(());
    }

    if store.groups().is_empty() {
        println!("No credentials stored. Add one with `logindock add`.");
        return Ok(());
    }

    for group in store.groups() {
        println!("{}", group.env);
        for record in &group.children {
            println!(
                "  {}  {}  ({})",
                record.identity(),
                record.url,
                record.browser_or_default()
            );
        }
    }
    Ok(())
}

pub async fn add_account(
    config: &Config,
    args: RecordArgs,
    password: String,
    url: String,
    browser: Option<Browser>,
) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;

    let mut record = CredentialRecord::new(args.env, args.domain, args.login_id, password, url);
    record.browser = browser.or_else(|| config.default_browser());
    record.validate()?;

    let identity = record.identity();
    if store.contains(&identity) {
        bail!("credential {identity} already exists; use `logindock edit` to change it");
    }

    store.add(record).await?;
    info!(record = %identity, "Added credential");
    println!("Added {identity}");
    Ok(())
}

pub async fn edit_account(
    config: &Config,
    args: RecordArgs,
    changes: RecordChanges,
) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;
    let old = args.identity();

    let current = store
        .find(&old)
        .with_context(|| format!("no credential {old}"))?;
    let updated = changes.apply(current);
    updated.validate()?;

    let new = updated.identity();
    if new != old && store.contains(&new) {
        bail!("credential {new} already exists");
    }

    if !store.update(&old, updated).await? {
        bail!("no credential {old}");
    }
    info!(from = %old, to = %new, "Updated credential");
    println!("Updated {new}");
    Ok(())
}

pub async fn delete_account(config: &Config, args: RecordArgs) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;
    let identity = args.identity();

    if !store.delete(&identity).await? {
        bail!("no credential {identity}");
    }
    info!(record = %identity, "Deleted credential");
    println!("Deleted {identity}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_keep_unset_fields() {
        let record = CredentialRecord::new("staging", "acme", "admin", "pw", "https://x")
            .with_browser(Browser::Safari);
        let changes = RecordChanges {
            env: Some("prod".to_string()),
            password: Some("new".to_string()),
            ..Default::default()
        };

        let updated = changes.apply(&record);
        assert_eq!(updated.env, "prod");
        assert_eq!(updated.password, "new");
        assert_eq!(updated.domain, "acme");
        assert_eq!(updated.browser, Some(Browser::Safari));
    }
}
