//! Credential store for logindock.
//!
//! Credentials are grouped by *environment* (a user-chosen label such as
//! `staging` or `prod-demo`). The whole collection is kept in memory by an
//! [`AccountStore`] and written back to local storage, in full, after every
//! mutation.
//!
//! # Example
//!
//! ```no_run
//! use logindock_accounts::{AccountStore, CredentialRecord};
//! use logindock_storage::FileStorage;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = AccountStore::open(FileStorage::new("/tmp/logindock")).await?;
//!
//! store
//!     .add(CredentialRecord::new(
//!         "staging",
//!         "acme",
//!         "admin",
//!         "secret",
//!         "https://staging.example.com",
//!     ))
//!     .await?;
//!
//! println!("{}", store.export()?);
//! # Ok(())
//! # }
//! ```

mod error;
mod model;
mod store;

pub use error::{AccountError, AccountResult};
pub use model::{Browser, CredentialRecord, EnvironmentGroup, RecordIdentity};
pub use store::{AccountStore, ImportSummary, STORAGE_KEY};
