//! Session lookup over HTTP.

use crate::{IdentityError, IdentityProvider};
use quill_model::UserId;
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the identity provider
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Current-session endpoint URL
    pub session_endpoint: String,
    /// Bearer token forwarded from the browser session, if present
    pub bearer_token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl IdentityConfig {
    /// Create a configuration for the given session endpoint
    #[inline]
    pub fn new(session_endpoint: impl Into<String>) -> Self {
        Self {
            session_endpoint: session_endpoint.into(),
            bearer_token: None,
            timeout_secs: 10,
        }
    }

    /// With a bearer token
    #[inline]
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// With a request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(rename = "userId")]
    user_id: UserId,
}

/// Identity provider backed by the hosted session endpoint
#[derive(Debug)]
pub struct HttpIdentityProvider {
    config: IdentityConfig,
    client: reqwest::Client,
}

impl HttpIdentityProvider {
    /// Build a provider from configuration
    ///
    /// # Errors
    /// `IdentityError::Transport` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: IdentityConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn current_user_id(&self) -> Result<UserId, IdentityError> {
        let mut request = self.client.get(&self.config.session_endpoint);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(IdentityError::Unauthenticated);
        }
        if !status.is_success() {
            return Err(IdentityError::Transport(format!(
                "identity provider returned {status}"
            )));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Transport(format!("malformed session response: {e}")))?;
        if session.user_id.is_empty() {
            return Err(IdentityError::Unauthenticated);
        }

        tracing::debug!(user = %session.user_id, "resolved current user");
        Ok(session.user_id)
    }
}
