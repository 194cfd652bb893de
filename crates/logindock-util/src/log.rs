//! Logging setup using tracing.
//!
//! The background process logs to stdout; one-shot CLI commands log to a file
//! so that their own output stays readable.

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a log level from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Base level for logindock crates.
    pub level: LogLevel,
    /// Raise every logindock crate to debug and include HTTP tracing.
    pub verbose: bool,
    /// Log to stdout instead of a file.
    pub stdout: bool,
    /// Override for the log directory.
    pub dir: Option<PathBuf>,
}

impl LogConfig {
    /// Build the filter directive string for this configuration.
    pub fn directives(&self) -> String {
        let level = if self.verbose {
            LogLevel::Debug
        } else {
            self.level
        };
        let level = level.as_str();
        let http = if self.verbose || self.stdout {
            level
        } else {
            "warn"
        };
        format!(
            "logindock={level},logindock_accounts={level},logindock_login={level},\
             logindock_server={level},logindock_storage={level},tower_http={http}"
        )
    }
}

/// Initialize logging with the given configuration.
///
/// Returns the log file path when logging to a file. `RUST_LOG` overrides the
/// computed filter. This should be called once at application startup.
pub fn init(config: &LogConfig) -> Option<PathBuf> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()));

    if config.stdout {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(true)
            .init();
        return None;
    }

    let log_dir = config.dir.clone().unwrap_or_else(crate::path::log_dir);

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {e}");
        return None;
    }

    let log_file = log_dir.join("logindock.log");

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file: {e}");
            return None;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(file)
        .init();

    Some(log_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("WARN"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("verbose"), None);
    }

    #[test]
    fn test_directives_default() {
        let config = LogConfig::default();
        let directives = config.directives();
        assert!(directives.contains("logindock=info"));
        assert!(directives.contains("tower_http=warn"));
    }

    #[test]
    fn test_directives_verbose() {
        let config = LogConfig {
            level: LogLevel::Warn,
            verbose: true,
            ..Default::default()
        };
        let directives = config.directives();
        assert!(directives.contains("logindock_login=debug"));
        assert!(directives.contains("tower_http=debug"));
    }

    #[test]
    fn test_directives_stdout_traces_http() {
        let config = LogConfig {
            stdout: true,
            ..Default::default()
        };
        assert!(config.directives().contains("tower_http=info"));
    }
}
