//! Login bridge for logindock.
//!
//! The background process hosts a small HTTP server on a loopback address.
//! A UI posts a credential record to `/action/login`, gets a ticket back at
//! once, and may follow the login on the `/events` SSE stream.

pub mod bridge;
pub mod client;
pub mod error;
pub mod sse;

pub use bridge::{bind, create_router, serve, serve_with_shutdown, BridgeState, DEFAULT_ADDRESS};
pub use client::{BridgeClient, EventStream};
pub use error::{BridgeError, BridgeResult};
