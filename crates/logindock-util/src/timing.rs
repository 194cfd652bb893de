//! Elapsed-time measurement for login attempts.
//!
//! # Example
//!
//! ```rust
//! use logindock_util::timing::Stopwatch;
//!
//! let watch = Stopwatch::start("login", "staging/admin");
//! // ... perform the sign-in request ...
//! let seconds = watch.elapsed_secs_display();
//! assert!(seconds.ends_with(|c: char| c.is_ascii_digit()));
//! ```

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Measures the duration of one operation and logs it when dropped.
pub struct Stopwatch {
    /// Type of operation (e.g., "login", "launch")
    operation_type: &'static str,
    /// Name of the specific operation, usually a record's display key
    operation_name: String,
    start: Instant,
    /// Durations at or above this are logged at warn
    warn_threshold: Duration,
}

impl Stopwatch {
    /// Start measuring.
    pub fn start(operation_type: &'static str, operation_name: impl Into<String>) -> Self {
        let operation_name = operation_name.into();
        debug!(
            operation_type = operation_type,
            operation_name = %operation_name,
            "Starting operation"
        );
        Self {
            operation_type,
            operation_name,
            start: Instant::now(),
            warn_threshold: Duration::from_secs(10),
        }
    }

    /// Set the threshold for warn-level logging.
    pub fn with_warn_threshold(mut self, threshold: Duration) -> Self {
        self.warn_threshold = threshold;
        self
    }

    /// Get the elapsed time so far.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed seconds with two decimals, e.g. `"1.27"`.
    pub fn elapsed_secs_display(&self) -> String {
        format_secs(self.elapsed())
    }
}

/// Format a duration as seconds with two-decimal precision.
pub fn format_secs(duration: Duration) -> String {
    format!("{:.2}", duration.as_secs_f64())
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let duration_ms = duration.as_millis() as u64;

        if duration >= self.warn_threshold {
            warn!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms,
                "Slow operation completed"
            );
        } else {
            info!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms,
                "Operation completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_stopwatch_measures() {
        let watch = Stopwatch::start("test", "basic");
        sleep(Duration::from_millis(10));
        assert!(watch.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_format_secs_two_decimals() {
        assert_eq!(format_secs(Duration::from_millis(1234)), "1.23");
        assert_eq!(format_secs(Duration::from_millis(7)), "0.01");
        assert_eq!(format_secs(Duration::ZERO), "0.00");
    }

    #[test]
    fn test_stopwatch_threshold() {
        let watch = Stopwatch::start("test", "threshold").with_warn_threshold(Duration::ZERO);
        assert!(watch.elapsed_secs_display().contains('.'));
    }
}
