//! Fakes for the login flow's side effects.
//!
//! Both fakes are cheap to clone and share their recordings, so a test keeps
//! one handle and gives the other to the code under test.

use async_trait::async_trait;
use logindock_accounts::Browser;
use logindock_login::{BrowserLauncher, LaunchError, Notification, Notifier};
use std::sync::{Arc, Mutex};

/// A notifier that records every notification instead of showing it.
///
/// # Example
///
/// ```rust,ignore
/// let notifier = RecordingNotifier::new();
/// let flow = LoginFlow::new(config, launcher, Arc::new(notifier.clone()))?;
/// flow.login(&record).await;
/// assert_eq!(notifier.titles(), vec!["login success"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications raised so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Titles of the notifications raised so far.
    pub fn titles(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.title)
            .collect()
    }

    /// Number of notifications with the given title.
    pub fn count(&self, title: &str) -> usize {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.title == title)
            .count()
    }

    pub fn clear(&self) {
        self.notifications.lock().unwrap().clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// A recorded browser launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    pub browser: Browser,
    pub url: String,
}

/// A launcher that records launches and optionally fails them.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    launches: Arc<Mutex<Vec<Launch>>>,
    /// When set, every launch fails with this exit status.
    failure: Option<String>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A launcher whose launches are recorded and then fail.
    pub fn failing(status: impl Into<String>) -> Self {
        Self {
            launches: Arc::default(),
            failure: Some(status.into()),
        }
    }

    /// All launches attempted so far, oldest first.
    pub fn launches(&self) -> Vec<Launch> {
        self.launches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserLauncher for RecordingLauncher {
    async fn open(&self, browser: Browser, url: &str) -> Result<(), LaunchError> {
        self.launches.lock().unwrap().push(Launch {
            browser,
            url: url.to_string(),
        });
        match &self.failure {
            Some(status) => Err(LaunchError::Exited {
                program: browser.app_name().to_string(),
                status: status.clone(),
            }),
            None => Ok(()),
        }
    }
}
