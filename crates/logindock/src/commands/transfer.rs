//! Import and export of the credential collection.

use crate::commands::accounts::open_store;
use crate::config::Config;
use anyhow::Context;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

/// Where exported text goes to, or imported text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferTarget {
    Clipboard,
    File(PathBuf),
    /// Standard input for import, standard output for export.
    Std,
}

impl TransferTarget {
    pub fn from_flags(file: Option<PathBuf>, std: bool) -> Self {
        match (file, std) {
            (Some(path), _) => TransferTarget::File(path),
            (None, true) => TransferTarget::Std,
            (None, false) => TransferTarget::Clipboard,
        }
    }
}

pub async fn export_accounts(config: &Config, target: TransferTarget) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let text = store.export()?;

    match target {
        TransferTarget::Clipboard => {
            let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
            clipboard
                .set_text(text)
                .context("failed to write to the clipboard")?;
            eprintln!(
                "Copied {} credentials to the clipboard",
                store.record_count()
            );
        }
        TransferTarget::File(path) => {
            tokio::fs::write(&path, &text)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Exported {} credentials to {}",
                store.record_count(),
                path.display()
            );
        }
        TransferTarget::Std => println!("{text}"),
    }

    info!(records = store.record_count(), "Exported credentials");
    Ok(())
}

pub async fn import_accounts(config: &Config, source: TransferTarget) -> anyhow::Result<()> {
    let text = match source {
        TransferTarget::Clipboard => arboard::Clipboard::new()
            .context("clipboard unavailable")?
            .get_text()
            .context("failed to read text from the clipboard")?,
        TransferTarget::File(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        TransferTarget::Std => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read standard input")?;
            text
        }
    };

    let mut store = open_store(config).await?;
    let summary = store.import(&text).await?;

    println!(
        "Imported {} credentials ({} new environments, {} duplicates skipped)",
        summary.records_added, summary.groups_added, summary.duplicates_skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_flags() {
        assert_eq!(TransferTarget::from_flags(None, false), TransferTarget::Clipboard);
        assert_eq!(TransferTarget::from_flags(None, true), TransferTarget::Std);
        assert_eq!(
            TransferTarget::from_flags(Some(PathBuf::from("a.json")), false),
            TransferTarget::File(PathBuf::from("a.json"))
        );
    }
}
