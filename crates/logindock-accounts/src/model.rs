//! Credential data model.

use crate::error::{AccountError, AccountResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Browsers a login can be opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Browser {
    #[default]
    #[serde(alias = "Google Chrome")]
    Chrome,
    Firefox,
    Arc,
    #[serde(alias = "Microsoft Edge")]
    Edge,
    Safari,
}

impl Browser {
    /// Every supported browser, in menu order.
    pub const ALL: [Browser; 5] = [
        Browser::Chrome,
        Browser::Firefox,
        Browser::Arc,
        Browser::Edge,
        Browser::Safari,
    ];

    /// Short label used in stored data and on the command line.
    pub fn label(&self) -> &'static str {
        match self {
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
            Browser::Arc => "Arc",
            Browser::Edge => "Edge",
            Browser::Safari => "Safari",
        }
    }

    /// Application name as the operating system knows it.
    pub fn app_name(&self) -> &'static str {
        match self {
            Browser::Chrome => "Google Chrome",
            Browser::Firefox => "Firefox",
            Browser::Arc => "Arc",
            Browser::Edge => "Microsoft Edge",
            Browser::Safari => "Safari",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Browser::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(wanted) || b.app_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!("unknown browser '{s}' (expected one of: Chrome, Firefox, Arc, Edge, Safari)")
            })
    }
}

/// The (`domain`, `loginId`, `env`) triple identifying a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordIdentity {
    pub env: String,
    pub domain: String,
    pub login_id: String,
}

impl RecordIdentity {
    pub fn new(
        env: impl Into<String>,
        domain: impl Into<String>,
        login_id: impl Into<String>,
    ) -> Self {
        Self {
            env: env.into(),
            domain: domain.into(),
            login_id: login_id.into(),
        }
    }
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.domain, self.login_id, self.env)
    }
}

/// One stored login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// Environment label; equals the parent group's `env`.
    pub env: String,
    /// Account domain, sent to the sign-in endpoint.
    pub domain: String,
    /// Account identifier.
    pub login_id: String,
    /// Stored in clear text.
    pub password: String,
    /// Base URL used both for sign-in and as the post-login destination.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<Browser>,
}

impl CredentialRecord {
    pub fn new(
        env: impl Into<String>,
        domain: impl Into<String>,
        login_id: impl Into<String>,
        password: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            env: env.into(),
            domain: domain.into(),
            login_id: login_id.into(),
            password: password.into(),
            url: url.into(),
            browser: None,
        }
    }

    /// Set the preferred browser.
    pub fn with_browser(mut self, browser: Browser) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity::new(&self.env, &self.domain, &self.login_id)
    }

    /// Whether this record has the given identity.
    pub fn matches(&self, identity: &RecordIdentity) -> bool {
        self.env == identity.env
            && self.domain == identity.domain
            && self.login_id == identity.login_id
    }

    /// The browser to open, falling back to Chrome.
    pub fn browser_or_default(&self) -> Browser {
        self.browser.unwrap_or_default()
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> AccountResult<()> {
        let required = [
            ("env", &self.env),
            ("domain", &self.domain),
            ("loginId", &self.login_id),
            ("password", &self.password),
            ("url", &self.url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AccountError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// Records sharing one environment label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentGroup {
    pub env: String,
    pub children: Vec<CredentialRecord>,
}

impl EnvironmentGroup {
    /// A group holding a single record.
    pub fn with_record(record: CredentialRecord) -> Self {
        Self {
            env: record.env.clone(),
            children: vec![record],
        }
    }

    /// Position of the child with this `domain` and `loginId`.
    pub(crate) fn position(&self, domain: &str, login_id: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|c| c.domain == domain && c.login_id == login_id)
    }
}
