//! Google OAuth2 client for the authorization-code flow.
//!
//! This module provides [`GoogleIdentityProvider`], which builds the consent
//! URL, exchanges authorization codes at the token endpoint and fetches the
//! signed-in identity from the userinfo endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::error::{AuthError, Result};
use crate::provider::IdentityProvider;
use crate::token::{OAuthToken, UserInfo};
use crate::{AuthConfig, LOGIN_SCOPES};

/// Raw response from the token endpoint.
#[derive(Debug, Deserialize)]
struct RawTokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Longest token lifetime taken at face value.
const MAX_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Absolute expiry for a token issued at `now` with `expires_in` seconds left.
fn token_expiry(now: DateTime<Utc>, expires_in: u64) -> DateTime<Utc> {
    let secs = i64::try_from(expires_in)
        .unwrap_or(i64::MAX)
        .min(MAX_TOKEN_LIFETIME_SECS);
    chrono::Duration::try_seconds(secs)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(now)
}

/// Error response from the token endpoint.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Identity provider backed by Google's OAuth2 endpoints.
pub struct GoogleIdentityProvider {
    config: AuthConfig,
    client: reqwest::Client,
}

impl GoogleIdentityProvider {
    /// Create a new provider with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if the HTTP client cannot be created.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorize_url(&self, state: &str) -> Result<String> {
        let scope = LOGIN_SCOPES.join(" ");
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("hd", self.config.domain.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Internal(format!("invalid authorization endpoint: {e}")))?;

        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthToken> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Exchange(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<OAuthErrorResponse>().await {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{}: {desc}", err.error),
                    None => err.error,
                },
                Err(_) => format!("HTTP {status}"),
            };
            return Err(AuthError::Exchange(detail));
        }

        let raw: RawTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Exchange(format!("invalid response: {e}")))?;

        let expires_at = raw.expires_in.map(|secs| token_expiry(Utc::now(), secs));

        Ok(OAuthToken {
            access_token: raw.access_token,
            refresh_token: raw.refresh_token,
            token_type: raw.token_type,
            expires_at,
        })
    }

    async fn fetch_user_info(&self, token: &OAuthToken) -> Result<UserInfo> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| AuthError::UserInfo(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::UserInfo(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::UserInfo(format!("invalid response: {e}")))
    }
}
