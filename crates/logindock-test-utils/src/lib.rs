//! Testing utilities, fixtures, and fakes for logindock.
//!
//! - **Fixtures**: sample credential records and temporary on-disk stores
//! - **Mocks**: recording notifier and browser launcher for login-flow tests
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use logindock_test_utils::{RecordingLauncher, RecordingNotifier};
//!
//! #[tokio::test]
//! async fn test_login_opens_browser() {
//!     let notifier = RecordingNotifier::new();
//!     let launcher = RecordingLauncher::new();
//!     // build a LoginFlow with Arc::new(notifier.clone()) ...
//!     assert_eq!(launcher.launches().len(), 1);
//! }
//! ```

pub mod fixtures;
pub mod mocks;

// Re-export commonly used items
pub use fixtures::{sample_record, TestStore};
pub use mocks::{RecordingLauncher, RecordingNotifier};
