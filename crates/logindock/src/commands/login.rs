//! Handing a stored credential to the background process.

use crate::commands::accounts::open_store;
use crate::config::Config;
use crate::RecordArgs;
use anyhow::Context;
use logindock_accounts::Browser;
use logindock_protocol::LoginOutcome;
use logindock_server::BridgeClient;
use std::sync::Arc;
use tracing::info;

pub async fn login(
    config: &Config,
    args: RecordArgs,
    browser: Option<Browser>,
    wait: bool,
) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let identity = args.identity();
    let mut record = store
        .find(&identity)
        .cloned()
        .with_context(|| format!("no credential {identity}"))?;
    if browser.is_some() {
        record.browser = browser;
    }

    let notifier = config.notifier();
    let client = BridgeClient::new(&config.address(), Arc::new(notifier))?;

    // Subscribe first so the outcome event cannot be missed
    let mut events = if wait {
        Some(client.subscribe().await.with_context(|| {
            format!(
                "is `logindock serve` running at {}?",
                client.base_url()
            )
        })?)
    } else {
        None
    };

    let ticket = client.login(&record).await.with_context(|| {
        format!("is `logindock serve` running at {}?", client.base_url())
    })?;
    info!(id = %ticket.id, record = %identity, "Login handed to bridge");

    let Some(events) = events.as_mut() else {
        println!("Login started for {identity} ({})", ticket.id);
        return Ok(());
    };

    match BridgeClient::wait_for_outcome(events, &ticket.id).await? {
        LoginOutcome::Succeeded {
            elapsed, browser, ..
        } => {
            println!("Logged in to {identity} in {elapsed}s, opened in {browser}");
            Ok(())
        }
        LoginOutcome::Failed { stage, message } => {
            anyhow::bail!("login failed ({stage:?}): {message}")
        }
    }
}
