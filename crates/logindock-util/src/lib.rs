//! Shared utilities for logindock.
//!
//! This crate provides common utilities used across the logindock workspace:
//! - Logging setup with tracing
//! - Platform paths for config, data and logs
//! - Elapsed-time measurement for login attempts

pub mod log;
pub mod path;
pub mod timing;

pub use log::{LogConfig, LogLevel};
pub use timing::Stopwatch;
