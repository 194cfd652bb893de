//! Shared protocol types for the logindock bridge.
//!
//! This crate defines the types used for communication between:
//! - the CLI (`logindock login`)
//! - the background process (`logindock serve`)
//!
//! Communication uses HTTP for actions and SSE for login events.

mod event;

pub use event::{FailureStage, LoginEvent, LoginOutcome, LoginTicket};

/// The credential record is sent over the bridge unchanged.
pub use logindock_accounts::CredentialRecord as LoginRequest;

/// Health check endpoint.
pub const HEALTH_PATH: &str = "/health";

/// The `handle-login` action endpoint.
pub const LOGIN_PATH: &str = "/action/login";

/// Server-Sent Events stream of [`LoginEvent`]s.
pub const EVENTS_PATH: &str = "/events";
