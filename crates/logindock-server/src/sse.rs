//! Server-Sent Events support.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use logindock_protocol::LoginEvent;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::warn;

/// Create an SSE stream from a login event receiver.
pub fn create_event_stream(
    mut rx: broadcast::Receiver<LoginEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Ok(data) = serde_json::to_string(&event) {
                        yield Ok(Event::default().event(event.event_type()).data(data));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("SSE stream lagged by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Splits an SSE byte stream into login events.
///
/// Bytes are buffered until a whole event block has arrived, so multi-byte
/// characters split across chunks decode intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the events it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<LoginEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.buffer.drain(..pos + 2).collect();
            if let Some(event) = parse_sse_event(&String::from_utf8_lossy(&block[..pos])) {
                events.push(event);
            }
        }
        events
    }
}

/// Parse one SSE event block into a login event.
///
/// Comment-only blocks such as keep-alives yield `None`.
pub fn parse_sse_event(block: &str) -> Option<LoginEvent> {
    let mut data = None;

    for line in block.lines() {
        if let Some(rest) = line.strip_prefix("data:") {
            data = Some(rest.trim().to_string());
        }
    }

    serde_json::from_str(&data?).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sse_event() {
        let block = "event: login.started\ndata: {\"type\":\"started\",\"id\":\"01\",\"record\":\"acme-admin-staging\"}";
        let event = parse_sse_event(block).unwrap();
        assert_eq!(event.id(), "01");
        assert_eq!(event.event_type(), "login.started");
    }

    #[test]
    fn test_decoder_joins_split_characters() {
        let block = "event: login.started\ndata: {\"type\":\"started\",\"id\":\"01\",\"record\":\"域名-admin-测试\"}\n\n";
        let bytes = block.as_bytes();
        let split = block.find('域').unwrap() + 1;

        let mut decoder = SseDecoder::new();
        assert!(decoder.push(&bytes[..split]).is_empty());
        let events = decoder.push(&bytes[split..]);

        assert_eq!(
            events,
            vec![LoginEvent::Started {
                id: "01".to_string(),
                record: "域名-admin-测试".to_string()
            }]
        );
    }

    #[test]
    fn test_decoder_skips_keep_alive_and_yields_in_order() {
        let mut decoder = SseDecoder::new();
        let input = ": keep-alive\n\ndata: {\"type\":\"started\",\"id\":\"a\",\"record\":\"r\"}\n\ndata: {\"type\":\"started\",\"id\":\"b\",\"record\":\"r\"}\n\ndata: {";
        let events = decoder.push(input.as_bytes());
        let ids: Vec<&str> = events.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_keep_alive_is_none() {
        assert!(parse_sse_event(": keep-alive").is_none());
        assert!(parse_sse_event("data: not json").is_none());
    }
}
