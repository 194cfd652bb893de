//! Sign-in flow for logindock.
//!
//! A login exchanges a record's domain, login id and password for a session
//! token, then opens the record's URL with the token attached in the chosen
//! browser. Every outcome is reported as a desktop notification.
//!
//! The network call, the browser and the notifications sit behind
//! [`SignInClient`], [`BrowserLauncher`] and [`Notifier`] so the flow can run
//! against fakes in tests.

mod client;
mod error;
mod flow;
mod launcher;
mod notify;

pub use client::{SignInClient, SignInRequest, SIGN_IN_PATH};
pub use error::{LaunchError, LoginError, LoginResult};
pub use flow::{LoginFlow, LoginFlowConfig};
pub use launcher::{launch_command, BrowserLauncher, CommandBuilder, OsBrowserLauncher};
pub use notify::{
    DesktopNotifier, Notification, Notifier, TITLE_BROWSER_FAILED, TITLE_LOGIN_FAILED,
    TITLE_LOGIN_SUCCESS,
};
