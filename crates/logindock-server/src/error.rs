//! Bridge error types.

use thiserror::Error;

/// Errors raised by the bridge server or its client.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The listen address could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("bridge server error: {0}")]
    Serve(#[source] std::io::Error),

    /// The background process could not be reached.
    #[error("bridge unreachable at {address}: {source}")]
    Unreachable {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    /// The bridge answered with an error status.
    #[error("bridge rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// A reply or event could not be decoded.
    #[error("invalid bridge message: {0}")]
    Decode(String),

    /// The event stream ended before the login finished.
    #[error("event stream closed")]
    StreamClosed,
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
