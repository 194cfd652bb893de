//! Error types for the login flow.

use thiserror::Error;

/// Errors raised while signing in.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The HTTP request could not be completed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body is not JSON.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The response has no usable token. Carries the raw body.
    #[error("{0}")]
    MissingToken(String),

    /// The record URL does not satisfy the transport policy.
    #[error("refusing to send credentials to {url}: {reason}")]
    InsecureUrl { url: String, reason: String },
}

/// Errors raised while opening a browser.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The launcher process could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The launcher exited unsuccessfully.
    #[error("'{program}' exited with {status}")]
    Exited { program: String, status: String },

    /// No way to open this browser on the current platform.
    #[error("{browser} is not supported on {platform}")]
    Unsupported {
        browser: String,
        platform: &'static str,
    },
}

/// Result type for login operations.
pub type LoginResult<T> = Result<T, LoginError>;
