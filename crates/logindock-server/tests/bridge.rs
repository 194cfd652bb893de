//! Bridge tests over a real loopback listener.

use logindock_accounts::Browser;
use logindock_login::{LoginFlow, LoginFlowConfig, TITLE_LOGIN_FAILED, TITLE_LOGIN_SUCCESS};
use logindock_protocol::{FailureStage, LoginEvent, LoginOutcome, LoginTicket};
use logindock_server::{bind, serve, BridgeClient, BridgeError, BridgeState};
use logindock_test_utils::{sample_record, RecordingLauncher, RecordingNotifier};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    address: String,
    launcher: RecordingLauncher,
    flow_notifier: RecordingNotifier,
}

async fn start_bridge() -> Harness {
    let launcher = RecordingLauncher::new();
    let flow_notifier = RecordingNotifier::new();
    let flow = LoginFlow::new(
        LoginFlowConfig::default(),
        Arc::new(launcher.clone()),
        Arc::new(flow_notifier.clone()),
    )
    .unwrap();

    let listener = bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    tokio::spawn(serve(listener, BridgeState::new(flow)));

    Harness {
        address,
        launcher,
        flow_notifier,
    }
}

async fn sign_in_server(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/sign-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_health() {
    let harness = start_bridge().await;
    let client = BridgeClient::new(&harness.address, Arc::new(RecordingNotifier::new())).unwrap();
    client.health().await.unwrap();
}

#[tokio::test]
async fn test_login_is_accepted_with_ticket() {
    let harness = start_bridge().await;
    let upstream = sign_in_server(json!({"uIdToken": "abc"})).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/action/login", harness.address))
        .json(&sample_record("staging", &upstream.uri()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
    let ticket: LoginTicket = response.json().await.unwrap();
    assert_eq!(ticket.id.len(), 26);
}

#[tokio::test]
async fn test_login_events_follow_ticket() {
    let harness = start_bridge().await;
    let upstream = sign_in_server(json!({"uIdToken": "abc"})).await;
    let client = BridgeClient::new(&harness.address, Arc::new(RecordingNotifier::new())).unwrap();

    let mut events = client.subscribe().await.unwrap();
    let record = sample_record("staging", &upstream.uri()).with_browser(Browser::Arc);
    let ticket = client.login(&record).await.unwrap();

    let outcome = BridgeClient::wait_for_outcome(&mut events, &ticket.id)
        .await
        .unwrap();

    match outcome {
        LoginOutcome::Succeeded {
            destination,
            browser,
            ..
        } => {
            assert_eq!(destination, format!("{}?loginToken=abc", upstream.uri()));
            assert_eq!(browser, "Arc");
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(harness.launcher.launches().len(), 1);
    assert_eq!(harness.flow_notifier.titles(), vec![TITLE_LOGIN_SUCCESS]);
}

#[tokio::test]
async fn test_started_event_names_record() {
    let harness = start_bridge().await;
    let upstream = sign_in_server(json!({"message": "denied"})).await;
    let client = BridgeClient::new(&harness.address, Arc::new(RecordingNotifier::new())).unwrap();

    let mut events = client.subscribe().await.unwrap();
    let ticket = client
        .login(&sample_record("staging", &upstream.uri()))
        .await
        .unwrap();

    use futures::StreamExt;
    let first = events.next().await.unwrap().unwrap();
    assert_eq!(
        first,
        LoginEvent::Started {
            id: ticket.id.clone(),
            record: "acme-admin-staging".to_string()
        }
    );

    let outcome = BridgeClient::wait_for_outcome(&mut events, &ticket.id)
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        LoginOutcome::Failed {
            stage: FailureStage::Authentication,
            ..
        }
    ));
    assert!(harness.launcher.launches().is_empty());
}

#[tokio::test]
async fn test_invalid_record_is_rejected() {
    let harness = start_bridge().await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/action/login", harness.address))
        .json(&json!({"env": "staging"}))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(harness.flow_notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_unreachable_bridge_notifies_locally() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let notifier = RecordingNotifier::new();
    let client = BridgeClient::new(&address, Arc::new(notifier.clone())).unwrap();

    let result = client
        .login(&sample_record("staging", "https://x"))
        .await;

    assert!(matches!(result, Err(BridgeError::Unreachable { .. })));
    assert_eq!(notifier.titles(), vec![TITLE_LOGIN_FAILED]);
}

#[tokio::test]
async fn test_foreign_origin_gets_no_cors_headers() {
    let harness = start_bridge().await;
    let http = reqwest::Client::new();

    let preflight = http
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{}/action/login", harness.address),
        )
        .header("Origin", "https://evil.example")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();
    assert!(preflight
        .headers()
        .get("access-control-allow-origin")
        .is_none());
    assert!(!preflight.status().is_success());

    let events = http
        .get(format!("http://{}/events", harness.address))
        .header("Origin", "https://evil.example")
        .send()
        .await
        .unwrap();
    assert!(events.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_events_split_inside_a_character_decode_intact() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let body = "event: login.started\ndata: {\"type\":\"started\",\"id\":\"01\",\"record\":\"域名-admin-测试\"}\n\n";
    let split = body.find('域').unwrap() + 1;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await.unwrap();

        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n",
            )
            .await
            .unwrap();
        socket.write_all(&body.as_bytes()[..split]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        socket.write_all(&body.as_bytes()[split..]).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = BridgeClient::new(&address, Arc::new(RecordingNotifier::new())).unwrap();
    let mut events = client.subscribe().await.unwrap();

    use futures::StreamExt;
    let event = events.next().await.unwrap().unwrap();
    assert_eq!(
        event,
        LoginEvent::Started {
            id: "01".to_string(),
            record: "域名-admin-测试".to_string()
        }
    );
}
