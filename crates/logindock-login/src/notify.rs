//! Desktop notifications.
//!
//! Uses platform-specific notification mechanisms:
//! - macOS: AppleScript `display notification`
//! - Linux: `notify-send`
//! - Windows: PowerShell toast notifications

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Title used when sign-in fails.
pub const TITLE_LOGIN_FAILED: &str = "login failed";

/// Title used when sign-in succeeds.
pub const TITLE_LOGIN_SUCCESS: &str = "login success";

/// Title used when the browser cannot be opened.
pub const TITLE_BROWSER_FAILED: &str = "failed to open browser";

/// A titled message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Something that can show notifications.
///
/// Showing a notification never fails from the caller's point of view.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification);
}

/// Shows notifications on the desktop.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// A notifier that only logs.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, notification: Notification) {
        info!(title = %notification.title, body = %notification.body, "Notification");
        if !self.enabled {
            return;
        }

        let (program, args) = notification_command(&notification);
        match Command::new(program).args(&args).output().await {
            Ok(output) if output.status.success() => {
                debug!(program, "Notification shown");
            }
            Ok(output) => {
                warn!(program, status = %output.status, "Notification command failed");
            }
            Err(e) => {
                warn!(program, error = %e, "Notification command unavailable");
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn notification_command(notification: &Notification) -> (&'static str, Vec<String>) {
    // Escape special characters for AppleScript
    let escape = |s: &str| s.replace('\\', "\\\\").replace('"', "\\\"");
    let script = format!(
        r#"display notification "{}" with title "{}""#,
        escape(&notification.body),
        escape(&notification.title)
    );
    ("osascript", vec!["-e".to_string(), script])
}

#[cfg(target_os = "windows")]
fn notification_command(notification: &Notification) -> (&'static str, Vec<String>) {
    // Escape special characters for PowerShell
    let escape = |s: &str| s.replace('`', "``").replace('"', "`\"");
    let script = format!(
        r#"
        [Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null
        $template = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02)
        $textNodes = $template.GetElementsByTagName("text")
        $textNodes.Item(0).AppendChild($template.CreateTextNode("{}")) | Out-Null
        $textNodes.Item(1).AppendChild($template.CreateTextNode("{}")) | Out-Null
        $toast = [Windows.UI.Notifications.ToastNotification]::new($template)
        [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier("logindock").Show($toast)
        "#,
        escape(&notification.title),
        escape(&notification.body)
    );
    ("powershell", vec!["-Command".to_string(), script])
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn notification_command(notification: &Notification) -> (&'static str, Vec<String>) {
    (
        "notify-send",
        vec![
            "--app-name=logindock".to_string(),
            notification.title.clone(),
            notification.body.clone(),
        ],
    )
}
