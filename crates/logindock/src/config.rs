//! Configuration for the logindock CLI.
//!
//! Configuration is loaded from multiple sources and merged:
//! 1. Global config: `~/.config/logindock/config.json` or `logindock.jsonc`
//! 2. Environment variable: `LOGINDOCK_CONFIG_CONTENT`
//! 3. Explicit file passed with `--config`
//! 4. Environment overrides: `LOGINDOCK_ADDRESS`, `LOGINDOCK_DATA_DIR`
//!
//! Files may contain `//` and `/* */` comments.

use logindock_accounts::Browser;
use logindock_login::{DesktopNotifier, LoginFlowConfig};
use logindock_server::DEFAULT_ADDRESS;
use logindock_util::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default sign-in request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {message}")]
    InvalidJson { path: String, message: String },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("could not determine a data directory; set LOGINDOCK_DATA_DIR")]
    NoDataDir,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log level for logindock crates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Bridge server settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Local storage settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    /// Login flow settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<LoginConfig>,

    /// Desktop notification settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Loopback address of the bridge, e.g. `127.0.0.1:4815`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory; local storage lives in its `storage` subdirectory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Refuse to send credentials to non-HTTPS URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_https: Option<bool>,
    /// Browser given to new records added without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_browser: Option<Browser>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Returns the merged configuration and the files it was read from.
    pub async fn load(explicit: Option<&Path>) -> Result<(Self, Vec<PathBuf>), ConfigError> {
        let mut config = Config::default();
        let mut sources = Vec::new();

        // 1. Global config
        if let Some(global_dir) = logindock_util::path::config_dir() {
            for name in &["config.json", "logindock.json", "logindock.jsonc"] {
                let path = global_dir.join(name);
                if path.exists() {
                    config = config.merge(Self::load_file(&path).await?);
                    sources.push(path);
                    break;
                }
            }
        }

        // 2. Environment variable
        if let Ok(content) = std::env::var("LOGINDOCK_CONFIG_CONTENT") {
            config = config.merge(Self::parse_jsonc(&content, "<env>")?);
        }

        // 3. Explicit file
        if let Some(path) = explicit {
            config = config.merge(Self::load_file(path).await?);
            sources.push(path.to_path_buf());
        }

        // 4. Environment overrides
        let config = config.with_overrides(
            std::env::var("LOGINDOCK_ADDRESS").ok(),
            std::env::var("LOGINDOCK_DATA_DIR").ok().map(PathBuf::from),
        );

        Ok((config, sources))
    }

    /// Load configuration from a file.
    pub async fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        Self::parse_jsonc(&content, &path.display().to_string())
    }

    /// Apply the address and data directory overrides, when set.
    pub fn with_overrides(mut self, address: Option<String>, data_dir: Option<PathBuf>) -> Self {
        if let Some(address) = address.filter(|a| !a.trim().is_empty()) {
            self.server.get_or_insert_with(Default::default).address = Some(address);
        }
        if let Some(dir) = data_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.storage.get_or_insert_with(Default::default).dir = Some(dir);
        }
        self
    }

    /// Parse JSONC (JSON with comments).
    fn parse_jsonc(content: &str, source: &str) -> Result<Self, ConfigError> {
        let stripped = Self::strip_comments(content);

        serde_json::from_str(&stripped).map_err(|e| ConfigError::InvalidJson {
            path: source.to_string(),
            message: e.to_string(),
        })
    }

    /// Strip JSON comments.
    fn strip_comments(input: &str) -> String {
        let mut result = String::with_capacity(input.len());
        let mut chars = input.chars().peekable();
        let mut in_string = false;
        let mut escape_next = false;

        while let Some(c) = chars.next() {
            if escape_next {
                result.push(c);
                escape_next = false;
                continue;
            }

            if in_string {
                match c {
                    '\\' => escape_next = true,
                    '"' => in_string = false,
                    _ => {}
                }
                result.push(c);
                continue;
            }

            if c == '"' {
                in_string = true;
                result.push(c);
                continue;
            }

            if c == '/' {
                match chars.peek() {
                    Some('/') => {
                        chars.next();
                        for c in chars.by_ref() {
                            if c == '\n' {
                                result.push('\n');
                                break;
                            }
                        }
                        continue;
                    }
                    Some('*') => {
                        chars.next();
                        let mut prev = ' ';
                        for c in chars.by_ref() {
                            if prev == '*' && c == '/' {
                                break;
                            }
                            // Keep line numbers stable for error messages
                            if c == '\n' {
                                result.push('\n');
                            }
                            prev = c;
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            result.push(c);
        }

        result
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(mut self, other: Self) -> Self {
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }

        self.server = match (self.server, other.server) {
            (Some(base), Some(other)) => Some(ServerConfig {
                address: other.address.or(base.address),
            }),
            (base, None) => base,
            (None, other) => other,
        };
        self.storage = match (self.storage, other.storage) {
            (Some(base), Some(other)) => Some(StorageConfig {
                dir: other.dir.or(base.dir),
            }),
            (base, None) => base,
            (None, other) => other,
        };
        self.login = match (self.login, other.login) {
            (Some(base), Some(other)) => Some(LoginConfig {
                timeout_secs: other.timeout_secs.or(base.timeout_secs),
                require_https: other.require_https.or(base.require_https),
                default_browser: other.default_browser.or(base.default_browser),
            }),
            (base, None) => base,
            (None, other) => other,
        };
        self.notifications = match (self.notifications, other.notifications) {
            (Some(base), Some(other)) => Some(NotificationsConfig {
                enabled: other.enabled.or(base.enabled),
            }),
            (base, None) => base,
            (None, other) => other,
        };

        self
    }

    // ------------------------------------------------------------------
    // Resolved values
    // ------------------------------------------------------------------

    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        match &self.log_level {
            None => Ok(LogLevel::default()),
            Some(level) => LogLevel::parse(level).ok_or_else(|| ConfigError::InvalidValue {
                key: "log_level",
                message: format!("unknown level '{level}'"),
            }),
        }
    }

    /// Bridge address.
    pub fn address(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.address.clone())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string())
    }

    /// Data directory.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        self.storage
            .as_ref()
            .and_then(|s| s.dir.clone())
            .or_else(logindock_util::path::data_dir)
            .ok_or(ConfigError::NoDataDir)
    }

    /// Directory holding local storage files.
    pub fn storage_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(logindock_util::path::storage_dir(&self.data_dir()?))
    }

    pub fn login_flow(&self) -> LoginFlowConfig {
        let login = self.login.clone().unwrap_or_default();
        LoginFlowConfig {
            timeout: Duration::from_secs(login.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            require_https: login.require_https.unwrap_or(false),
        }
    }

    pub fn default_browser(&self) -> Option<Browser> {
        self.login.as_ref().and_then(|l| l.default_browser)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications
            .as_ref()
            .and_then(|n| n.enabled)
            .unwrap_or(true)
    }

    /// Desktop notifier honoring `notifications.enabled`.
    pub fn notifier(&self) -> DesktopNotifier {
        if self.notifications_enabled() {
            DesktopNotifier::new()
        } else {
            DesktopNotifier::disabled()
        }
    }

    /// The configuration with every default filled in, for display.
    pub fn effective(&self) -> Result<Self, ConfigError> {
        let flow = self.login_flow();
        Ok(Config {
            log_level: Some(self.log_level()?.as_str().to_string()),
            server: Some(ServerConfig {
                address: Some(self.address()),
            }),
            storage: Some(StorageConfig {
                dir: Some(self.data_dir()?),
            }),
            login: Some(LoginConfig {
                timeout_secs: Some(flow.timeout.as_secs()),
                require_https: Some(flow.require_https),
                default_browser: Some(self.default_browser().unwrap_or_default()),
            }),
            notifications: Some(NotificationsConfig {
                enabled: Some(self.notifications_enabled()),
            }),
        })
    }
}
