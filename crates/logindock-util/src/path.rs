//! Platform paths used by logindock.

use std::path::PathBuf;

/// Directory name shared by every logindock location.
const APP_DIR: &str = "logindock";

/// Get the logindock configuration directory.
///
/// On Unix, prefers `~/.config/logindock` when it exists, then falls back to
/// the platform configuration directory.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    {
        if let Some(home) = dirs::home_dir() {
            let xdg_config = home.join(".config").join(APP_DIR);
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }
    }

    dirs::config_dir().map(|d| d.join(APP_DIR))
}

/// Get the logindock data directory.
///
/// - Linux: `~/.local/share/logindock`
/// - macOS: `~/Library/Application Support/logindock`
/// - Windows: `%LOCALAPPDATA%/logindock`
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(APP_DIR))
}

/// Get the local storage directory inside a data directory.
pub fn storage_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("storage")
}

/// Get the log directory path.
pub fn log_dir() -> PathBuf {
    // macOS: ~/Library/Logs/logindock
    // Linux: ~/.local/state/logindock/logs
    // Windows: %LOCALAPPDATA%/logindock/logs

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            return home.join("Library/Logs").join(APP_DIR);
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(state_dir) = dirs::state_dir() {
            return state_dir.join(APP_DIR).join("logs");
        }
        if let Some(home) = dirs::home_dir() {
            return home.join(".local/state").join(APP_DIR).join("logs");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(local_app) = dirs::data_local_dir() {
            return local_app.join(APP_DIR).join("logs");
        }
    }

    PathBuf::from(".logindock/logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_storage_dir_is_nested() {
        let dir = storage_dir(Path::new("/tmp/logindock"));
        assert_eq!(dir, PathBuf::from("/tmp/logindock/storage"));
    }

    #[test]
    fn test_log_dir_mentions_app() {
        assert!(log_dir().to_string_lossy().contains(APP_DIR));
    }
}
