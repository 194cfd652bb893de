//! Opening URLs in a specific browser.

use crate::error::LaunchError;
use async_trait::async_trait;
use logindock_accounts::Browser;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// How long to wait for the launcher to report a failure before assuming the
/// browser took over.
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Builds the program and arguments that open a URL in a browser.
pub type CommandBuilder = fn(Browser, &str) -> Result<(String, Vec<String>), LaunchError>;

/// Something that can open a URL in a browser.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn open(&self, browser: Browser, url: &str) -> Result<(), LaunchError>;
}

/// Opens browsers through the operating system.
///
/// The program and its arguments are passed as discrete values, never as a
/// shell string.
#[derive(Debug, Clone)]
pub struct OsBrowserLauncher {
    command: CommandBuilder,
    exit_grace: Duration,
}

impl OsBrowserLauncher {
    pub fn new() -> Self {
        Self {
            command: launch_command,
            exit_grace: EXIT_GRACE,
        }
    }

    /// Use another command builder in place of [`launch_command`].
    pub fn with_command(mut self, command: CommandBuilder) -> Self {
        self.command = command;
        self
    }

    /// Set how long a launch may run before it counts as started.
    pub fn with_exit_grace(mut self, exit_grace: Duration) -> Self {
        self.exit_grace = exit_grace;
        self
    }
}

impl Default for OsBrowserLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserLauncher for OsBrowserLauncher {
    async fn open(&self, browser: Browser, url: &str) -> Result<(), LaunchError> {
        let (program, args) = (self.command)(browser, url)?;
        #[cfg(target_os = "windows")]
        let program = resolve_app_path(program).await;
        debug!(program = %program, ?args, "Opening browser");

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;

        match tokio::time::timeout(self.exit_grace, child.wait()).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(LaunchError::Exited {
                program,
                status: status.to_string(),
            }),
            Ok(Err(source)) => Err(LaunchError::Spawn { program, source }),
            Err(_) => {
                // Still running: the browser itself is in the foreground.
                tokio::spawn(async move {
                    if let Err(e) = child.wait().await {
                        warn!(program = %program, error = %e, "Failed to reap browser process");
                    }
                });
                Ok(())
            }
        }
    }
}

/// The program and arguments that open `url` in `browser` on this platform.
#[cfg(target_os = "macos")]
pub fn launch_command(browser: Browser, url: &str) -> Result<(String, Vec<String>), LaunchError> {
    Ok((
        "open".to_string(),
        vec![
            "-a".to_string(),
            browser.app_name().to_string(),
            url.to_string(),
        ],
    ))
}

/// The program and arguments that open `url` in `browser` on this platform.
///
/// The executable is started directly; the URL never passes through `cmd.exe`.
#[cfg(target_os = "windows")]
pub fn launch_command(browser: Browser, url: &str) -> Result<(String, Vec<String>), LaunchError> {
    let exe = match browser {
        Browser::Chrome => "chrome.exe",
        Browser::Firefox => "firefox.exe",
        Browser::Edge => "msedge.exe",
        Browser::Arc | Browser::Safari => {
            return Err(LaunchError::Unsupported {
                browser: browser.app_name().to_string(),
                platform: "windows",
            })
        }
    };
    Ok((exe.to_string(), vec![url.to_string()]))
}

/// The program and arguments that open `url` in `browser` on this platform.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub fn launch_command(browser: Browser, url: &str) -> Result<(String, Vec<String>), LaunchError> {
    let program = match browser {
        Browser::Chrome => "google-chrome",
        Browser::Firefox => "firefox",
        Browser::Edge => "microsoft-edge",
        Browser::Arc | Browser::Safari => {
            return Err(LaunchError::Unsupported {
                browser: browser.app_name().to_string(),
                platform: std::env::consts::OS,
            })
        }
    };
    Ok((program.to_string(), vec![url.to_string()]))
}

/// Look an executable up in the `App Paths` registry keys, where browsers
/// register themselves. Falls back to the bare name, which is searched on PATH.
#[cfg(target_os = "windows")]
async fn resolve_app_path(exe: String) -> String {
    for hive in ["HKCU", "HKLM"] {
        let key = format!(r"{hive}\SOFTWARE\Microsoft\Windows\CurrentVersion\App Paths\{exe}");
        let Ok(output) = Command::new("reg")
            .args(["query", key.as_str(), "/ve"])
            .output()
            .await
        else {
            continue;
        };
        if !output.status.success() {
            continue;
        }
        if let Some(path) = parse_reg_default(&String::from_utf8_lossy(&output.stdout)) {
            return path;
        }
    }
    exe
}

/// Extract the default value from `reg query ... /ve` output.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn parse_reg_default(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (_, value) = line.split_once("REG_SZ")?;
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
