//! Command handlers for the logindock CLI.

pub mod accounts;
pub mod login;
pub mod serve;
pub mod transfer;

pub use accounts::*;
pub use login::*;
pub use serve::*;
pub use transfer::*;

use crate::config::Config;
use std::path::PathBuf;

/// Show the effective configuration and where it came from.
pub fn show_config(config: &Config, sources: &[PathBuf]) -> anyhow::Result<()> {
    let effective = config.effective()?;
    println!("{}", serde_json::to_string_pretty(&effective)?);

    if sources.is_empty() {
        eprintln!("(no config files found, using defaults)");
    } else {
        for source in sources {
            eprintln!("loaded: {}", source.display());
        }
    }
    Ok(())
}
