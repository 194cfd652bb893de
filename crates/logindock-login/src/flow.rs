//! The end-to-end login flow.

use crate::client::SignInClient;
use crate::error::{LoginError, LoginResult};
use crate::launcher::BrowserLauncher;
use crate::notify::{
    Notification, Notifier, TITLE_BROWSER_FAILED, TITLE_LOGIN_FAILED, TITLE_LOGIN_SUCCESS,
};
use logindock_accounts::CredentialRecord;
use logindock_protocol::{FailureStage, LoginOutcome};
use logindock_util::timing::Stopwatch;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Tunables for [`LoginFlow`].
#[derive(Debug, Clone)]
pub struct LoginFlowConfig {
    /// Timeout of the sign-in request.
    pub timeout: Duration,
    /// Refuse to send credentials to non-HTTPS URLs.
    pub require_https: bool,
}

impl Default for LoginFlowConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            require_https: false,
        }
    }
}

/// Signs in, opens the browser and reports the result.
///
/// Every failure is terminal and surfaces as a notification; [`LoginFlow::login`]
/// never returns an error.
pub struct LoginFlow {
    client: SignInClient,
    launcher: Arc<dyn BrowserLauncher>,
    notifier: Arc<dyn Notifier>,
    config: LoginFlowConfig,
}

impl LoginFlow {
    pub fn new(
        config: LoginFlowConfig,
        launcher: Arc<dyn BrowserLauncher>,
        notifier: Arc<dyn Notifier>,
    ) -> LoginResult<Self> {
        Ok(Self {
            client: SignInClient::new(config.timeout)?,
            launcher,
            notifier,
            config,
        })
    }

    pub fn config(&self) -> &LoginFlowConfig {
        &self.config
    }

    /// Run one login attempt for `record`.
    pub async fn login(&self, record: &CredentialRecord) -> LoginOutcome {
        let key = record.identity().to_string();
        let watch =
            Stopwatch::start("login", key.as_str()).with_warn_threshold(self.config.timeout);

        if let Err(e) = self.check_url(record) {
            return self.fail(FailureStage::Policy, e.to_string()).await;
        }

        let token = match self.client.sign_in(record).await {
            Ok(token) => token,
            Err(LoginError::MissingToken(body)) => {
                return self.fail(FailureStage::Authentication, body).await;
            }
            Err(e) => return self.fail(FailureStage::Network, e.to_string()).await,
        };

        let elapsed = watch.elapsed_secs_display();
        info!(record = %key, elapsed = %elapsed, "Login succeeded");
        self.notifier
            .notify(Notification::new(
                TITLE_LOGIN_SUCCESS,
                format!("login succeeded, elapsed: {elapsed}s"),
            ))
            .await;

        let destination = format!("{}?loginToken={}", record.url, token);
        let browser = record.browser_or_default();
        if let Err(e) = self.launcher.open(browser, &destination).await {
            warn!(browser = %browser, error = %e, "Failed to open browser");
            let message = format!("failed to open browser: {e}");
            self.notifier
                .notify(Notification::new(TITLE_BROWSER_FAILED, message.as_str()))
                .await;
            return LoginOutcome::failed(FailureStage::BrowserLaunch, message);
        }

        LoginOutcome::Succeeded {
            elapsed,
            destination,
            browser: browser.app_name().to_string(),
        }
    }

    fn check_url(&self, record: &CredentialRecord) -> LoginResult<()> {
        if !self.config.require_https {
            return Ok(());
        }
        let insecure = |reason: String| LoginError::InsecureUrl {
            url: record.url.clone(),
            reason,
        };
        let url = Url::parse(&record.url).map_err(|e| insecure(e.to_string()))?;
        if url.scheme() != "https" {
            return Err(insecure(format!("scheme '{}' is not https", url.scheme())));
        }
        Ok(())
    }

    async fn fail(&self, stage: FailureStage, message: String) -> LoginOutcome {
        warn!(?stage, message = %message, "Login failed");
        self.notifier
            .notify(Notification::new(TITLE_LOGIN_FAILED, message.as_str()))
            .await;
        LoginOutcome::failed(stage, message)
    }
}

impl std::fmt::Debug for LoginFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginFlow")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
