//! HTTP client for the sign-in endpoint.

use crate::error::{LoginError, LoginResult};
use base64::Engine;
use logindock_accounts::CredentialRecord;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Path of the sign-in endpoint, relative to a record's URL.
pub const SIGN_IN_PATH: &str = "/api/user/sign-in";

/// JSON body of a sign-in request.
///
/// The password is base64 encoded. This is obfuscation only and offers no
/// confidentiality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub domain: String,
    pub login_id: String,
    pub password: String,
}

impl SignInRequest {
    pub fn from_record(record: &CredentialRecord) -> Self {
        Self {
            domain: record.domain.clone(),
            login_id: record.login_id.clone(),
            password: base64::engine::general_purpose::STANDARD.encode(&record.password),
        }
    }
}

/// Client for `POST {url}/api/user/sign-in`.
#[derive(Debug, Clone)]
pub struct SignInClient {
    http: reqwest::Client,
}

impl SignInClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout: Duration) -> LoginResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("logindock/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Build the endpoint URL for a record.
    pub fn endpoint(record: &CredentialRecord) -> String {
        format!("{}{}", record.url.trim_end_matches('/'), SIGN_IN_PATH)
    }

    /// Exchange the record's credentials for a session token.
    pub async fn sign_in(&self, record: &CredentialRecord) -> LoginResult<String> {
        let endpoint = Self::endpoint(record);
        debug!(endpoint = %endpoint, domain = %record.domain, login_id = %record.login_id, "Signing in");

        let response = self
            .http
            .post(&endpoint)
            .json(&SignInRequest::from_record(record))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(status = %status, bytes = text.len(), "Sign-in response received");

        let body: Value =
            serde_json::from_str(&text).map_err(|e| LoginError::InvalidResponse(e.to_string()))?;

        extract_token(&body).ok_or(LoginError::MissingToken(text))
    }
}

/// Pull a truthy `uIdToken` out of a sign-in response.
fn extract_token(body: &Value) -> Option<String> {
    match body.get("uIdToken")? {
        Value::String(token) if !token.is_empty() => Some(token.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_encodes_password() {
        let record = CredentialRecord::new("e", "acme", "admin", "p", "https://x");
        let request = SignInRequest::from_record(&record);
        assert_eq!(request.password, "cA==");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, json!({"domain": "acme", "loginId": "admin", "password": "cA=="}));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let record = CredentialRecord::new("e", "d", "u", "p", "https://x.example.com/");
        assert_eq!(
            SignInClient::endpoint(&record),
            "https://x.example.com/api/user/sign-in"
        );
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token(&json!({"uIdToken": "abc"})), Some("abc".to_string()));
        assert_eq!(extract_token(&json!({"uIdToken": 42})), Some("42".to_string()));
        assert_eq!(extract_token(&json!({"uIdToken": ""})), None);
        assert_eq!(extract_token(&json!({"uIdToken": 0})), None);
        assert_eq!(extract_token(&json!({"uIdToken": null})), None);
        assert_eq!(extract_token(&json!({})), None);
        assert_eq!(extract_token(&json!("abc")), None);
    }
}
