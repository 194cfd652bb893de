//! The bridge server hosted by the background process.

use crate::error::{BridgeError, BridgeResult};
use crate::sse::create_event_stream;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Json,
    },
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use logindock_login::LoginFlow;
use logindock_protocol::{
    LoginEvent, LoginRequest, LoginTicket, EVENTS_PATH, HEALTH_PATH, LOGIN_PATH,
};
use std::{convert::Infallible, future::Future, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, Span};
use ulid::Ulid;

/// Address the bridge listens on unless configured otherwise.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:4815";

/// State shared by the bridge handlers.
#[derive(Clone)]
pub struct BridgeState {
    flow: Arc<LoginFlow>,
    events: broadcast::Sender<LoginEvent>,
}

impl BridgeState {
    pub fn new(flow: LoginFlow) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            flow: Arc::new(flow),
            events,
        }
    }

    /// Subscribe to login events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LoginEvent> {
        self.events.subscribe()
    }

    /// Send an event to all current subscribers.
    pub fn publish(&self, event: LoginEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Create the bridge router.
///
/// No CORS headers are sent, so browser pages cannot read events or start
/// logins.
pub fn create_router(state: BridgeState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(LOGIN_PATH, post(action_login))
        .route(EVENTS_PATH, get(events))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &Span| {
                    debug!(
                        method = %request.method(),
                        path = %request.uri().path(),
                        "request"
                    );
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &Span| {
                        debug!(
                            status = %response.status(),
                            latency = ?latency,
                            "response"
                        );
                    },
                ),
        )
}

/// Bind a listener for the bridge.
pub async fn bind(address: &str) -> BridgeResult<TcpListener> {
    TcpListener::bind(address)
        .await
        .map_err(|source| BridgeError::Bind {
            address: address.to_string(),
            source,
        })
}

/// Serve the bridge until the process exits.
pub async fn serve(listener: TcpListener, state: BridgeState) -> BridgeResult<()> {
    serve_with_shutdown(listener, state, std::future::pending()).await
}

/// Serve the bridge until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: BridgeState,
    shutdown: F,
) -> BridgeResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(address) = listener.local_addr() {
        info!(%address, "Login bridge listening");
    }
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(BridgeError::Serve)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Start a login in the background and answer with its ticket.
async fn action_login(
    State(state): State<BridgeState>,
    Json(record): Json<LoginRequest>,
) -> impl IntoResponse {
    let id = Ulid::new().to_string();
    let key = record.identity().to_string();
    info!(id = %id, record = %key, "Login requested");

    state.publish(LoginEvent::Started {
        id: id.clone(),
        record: key,
    });

    let task_state = state.clone();
    let task_id = id.clone();
    tokio::spawn(async move {
        let outcome = task_state.flow.login(&record).await;
        debug!(id = %task_id, success = outcome.is_success(), "Login finished");
        task_state.publish(LoginEvent::Finished {
            id: task_id,
            outcome,
        });
    });

    (StatusCode::ACCEPTED, Json(LoginTicket { id }))
}

async fn events(
    State(state): State<BridgeState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    create_event_stream(state.subscribe())
}
