//! Identity provider abstraction.

use async_trait::async_trait;

use crate::error::Result;
use crate::token::{OAuthToken, UserInfo};

/// An OAuth2 authorization-code identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the URL the browser is sent to for consent.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is not a valid URL.
    fn authorize_url(&self, state: &str) -> Result<String>;

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Exchange` if the token endpoint rejects the code.
    async fn exchange_code(&self, code: &str) -> Result<OAuthToken>;

    /// Fetch the identity behind an access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserInfo` if the identity cannot be fetched.
    async fn fetch_user_info(&self, token: &OAuthToken) -> Result<UserInfo>;
}

/// A mock provider for testing.
///
/// Authorization codes registered with [`MockIdentityProvider::with_user`]
/// exchange to a token that resolves to the given identity; any other code
/// fails the exchange.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct MockIdentityProvider {
    users: parking_lot::Mutex<std::collections::HashMap<String, UserInfo>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockIdentityProvider {
    /// Create a provider with no known users.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an authorization code for `email` in hosted domain `hd`.
    #[must_use]
    pub fn with_user(self, code: &str, email: &str, hd: Option<&str>) -> Self {
        self.users.lock().insert(
            code.to_string(),
            UserInfo {
                email: email.to_string(),
                hd: hd.map(str::to_string),
                name: None,
            },
        );
        self
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn authorize_url(&self, state: &str) -> Result<String> {
        Ok(format!("https://accounts.test/auth?state={state}"))
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthToken> {
        if !self.users.lock().contains_key(code) {
            return Err(crate::AuthError::Exchange(format!("unknown code {code}")));
        }

        Ok(OAuthToken {
            access_token: format!("mock-token:{code}"),
            refresh_token: None,
            token_type: "Bearer".to_string(),
            expires_at: Some(chrono::Utc::now() + chrono::Duration::hours(1)),
        })
    }

    async fn fetch_user_info(&self, token: &OAuthToken) -> Result<UserInfo> {
        let code = token
            .access_token
            .strip_prefix("mock-token:")
            .ok_or_else(|| crate::AuthError::UserInfo("unknown token".to_string()))?;

        self.users
            .lock()
            .get(code)
            .cloned()
            .ok_or_else(|| crate::AuthError::UserInfo("unknown token".to_string()))
    }
}
