//! Client side of the bridge, used by the CLI.

use crate::error::{BridgeError, BridgeResult};
use crate::sse::SseDecoder;
use futures::stream::{BoxStream, StreamExt};
use logindock_accounts::CredentialRecord;
use logindock_login::{Notification, Notifier, TITLE_LOGIN_FAILED};
use logindock_protocol::{LoginEvent, LoginOutcome, LoginTicket, EVENTS_PATH, HEALTH_PATH, LOGIN_PATH};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Stream of login events from the bridge.
pub type EventStream = BoxStream<'static, BridgeResult<LoginEvent>>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a running bridge.
///
/// A login that cannot be handed to the bridge raises a local
/// `"login failed"` notification, since the background process never saw it.
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
    notifier: Arc<dyn Notifier>,
}

impl BridgeClient {
    /// Create a client for the bridge at `address`.
    pub fn new(address: &str, notifier: Arc<dyn Notifier>) -> BridgeResult<Self> {
        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", address)
        };

        // No overall timeout: the event stream stays open.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|source| BridgeError::Unreachable {
                address: base_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            notifier,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the bridge is up.
    pub async fn health(&self) -> BridgeResult<()> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let response = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|source| self.unreachable(source))?;
        check_status(response).await.map(|_| ())
    }

    /// Hand a record to the bridge. Returns as soon as the login is accepted.
    pub async fn login(&self, record: &CredentialRecord) -> BridgeResult<LoginTicket> {
        match self.post_login(record).await {
            Ok(ticket) => {
                debug!(id = %ticket.id, record = %record.identity(), "Login accepted");
                Ok(ticket)
            }
            Err(e) => {
                warn!(error = %e, "Login could not be handed to the bridge");
                self.notifier
                    .notify(Notification::new(TITLE_LOGIN_FAILED, e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    async fn post_login(&self, record: &CredentialRecord) -> BridgeResult<LoginTicket> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(record)
            .send()
            .await
            .map_err(|source| self.unreachable(source))?;

        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| BridgeError::Decode(e.to_string()))
    }

    /// Open the event stream.
    ///
    /// Events published after this returns are delivered, so subscribe before
    /// calling [`BridgeClient::login`] to follow that login.
    pub async fn subscribe(&self) -> BridgeResult<EventStream> {
        let url = format!("{}{}", self.base_url, EVENTS_PATH);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| self.unreachable(source))?;
        let mut bytes = check_status(response).await?.bytes_stream();

        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::new();

            while let Some(chunk) = bytes.next().await {
                match chunk {
                    Ok(chunk) => {
                        for event in decoder.push(&chunk) {
                            yield Ok(event);
                        }
                    }
                    Err(e) => {
                        yield Err(BridgeError::Decode(e.to_string()));
                        break;
                    }
                }
            }
        };

        Ok(stream.boxed())
    }

    /// Wait on `events` for the outcome of the login with ticket `id`.
    pub async fn wait_for_outcome(
        events: &mut EventStream,
        id: &str,
    ) -> BridgeResult<LoginOutcome> {
        while let Some(event) = events.next().await {
            if let LoginEvent::Finished { id: event_id, outcome } = event? {
                if event_id == id {
                    return Ok(outcome);
                }
            }
        }
        Err(BridgeError::StreamClosed)
    }

    fn unreachable(&self, source: reqwest::Error) -> BridgeError {
        BridgeError::Unreachable {
            address: self.base_url.clone(),
            source,
        }
    }
}

async fn check_status(response: reqwest::Response) -> BridgeResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BridgeError::Rejected {
        status: status.as_u16(),
        body,
    })
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
