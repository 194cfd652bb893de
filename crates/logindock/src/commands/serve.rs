//! The background process.

use crate::config::Config;
use anyhow::Context;
use logindock_login::{LoginFlow, OsBrowserLauncher};
use logindock_server::{bind, serve_with_shutdown, BridgeState};
use std::sync::Arc;
use tracing::info;

/// Run the login bridge until interrupted.
pub async fn run_server(config: &Config, address: Option<String>) -> anyhow::Result<()> {
    let address = address.unwrap_or_else(|| config.address());
    let flow_config = config.login_flow();
    let notifier = config.notifier();

    info!(
        address = %address,
        timeout_secs = flow_config.timeout.as_secs(),
        require_https = flow_config.require_https,
        notifications = notifier.is_enabled(),
        "Starting logindock"
    );

    let flow = LoginFlow::new(flow_config, Arc::new(OsBrowserLauncher::new()), Arc::new(notifier))
        .context("failed to create HTTP client")?;
    let listener = bind(&address).await?;

    println!("logindock listening on http://{address}");

    serve_with_shutdown(listener, BridgeState::new(flow), async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutting down");
    })
    .await?;
    Ok(())
}
