//! Login events sent from the background process to subscribers.

use serde::{Deserialize, Serialize};

/// Reply to an accepted `handle-login` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginTicket {
    /// Identifier carried by every event of this login.
    pub id: String,
}

/// Where a login attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The record URL was rejected before any request was made.
    Policy,
    /// The sign-in request failed or its body was not JSON.
    Network,
    /// The endpoint answered without a token.
    Authentication,
    /// Sign-in succeeded but the browser could not be opened.
    BrowserLaunch,
}

/// Final result of one login attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginOutcome {
    Succeeded {
        /// Sign-in duration in seconds, two decimals.
        elapsed: String,
        /// URL handed to the browser.
        destination: String,
        /// Application the URL was opened with.
        browser: String,
    },
    Failed {
        stage: FailureStage,
        message: String,
    },
}

impl LoginOutcome {
    pub fn failed(stage: FailureStage, message: impl Into<String>) -> Self {
        Self::Failed {
            stage,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Events published on the bridge's event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoginEvent {
    /// A login was accepted and is running.
    Started {
        id: String,
        /// Display key of the record, `domain-loginId-env`.
        record: String,
    },
    /// A login ran to completion or failure.
    Finished { id: String, outcome: LoginOutcome },
}

impl LoginEvent {
    /// Get the event type name for SSE.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "login.started",
            Self::Finished { .. } => "login.finished",
        }
    }

    /// Ticket id this event belongs to.
    pub fn id(&self) -> &str {
        match self {
            Self::Started { id, .. } | Self::Finished { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event = LoginEvent::Finished {
            id: "01J0".to_string(),
            outcome: LoginOutcome::failed(FailureStage::Authentication, "{}"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "finished");
        assert_eq!(json["outcome"]["status"], "failed");
        assert_eq!(json["outcome"]["stage"], "authentication");
        assert_eq!(event.event_type(), "login.finished");
        assert_eq!(event.id(), "01J0");
    }

    #[test]
    fn test_outcome_success_flag() {
        let ok = LoginOutcome::Succeeded {
            elapsed: "0.42".to_string(),
            destination: "https://x?loginToken=abc".to_string(),
            browser: "Google Chrome".to_string(),
        };
        assert!(ok.is_success());
        assert!(!LoginOutcome::failed(FailureStage::Network, "refused").is_success());
    }
}
