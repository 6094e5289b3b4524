//! Domain-restricted login flow.
//!
//! The gate drives the authorization-code flow against an
//! [`IdentityProvider`] and only admits identities whose hosted domain is the
//! configured Workspace domain. It holds no session state of its own: the
//! gateway persists the CSRF `state`, the pending redirect and the resulting
//! [`SessionUser`].

use std::sync::Arc;

use crate::error::{AuthError, Result};
use crate::provider::IdentityProvider;
use crate::token::{LoginOutcome, SessionUser};

/// Where the browser lands after login when no local path was captured.
pub const DEFAULT_REDIRECT: &str = "/";

/// Domain-restricted OAuth2 login.
pub struct IdentityGate<P: IdentityProvider> {
    provider: Arc<P>,
    domain: String,
}

impl<P: IdentityProvider> Clone for IdentityGate<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            domain: self.domain.clone(),
        }
    }
}

impl<P: IdentityProvider> IdentityGate<P> {
    /// Create a gate admitting only `domain`.
    #[must_use]
    pub fn new(provider: Arc<P>, domain: impl Into<String>) -> Self {
        Self {
            provider,
            domain: domain.into(),
        }
    }

    /// The required hosted domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Generate a fresh CSRF `state` value.
    #[must_use]
    pub fn new_state() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Authorization URL for a new login carrying `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot build the URL.
    pub fn begin_login(&self, state: &str) -> Result<String> {
        self.provider.authorize_url(state)
    }

    /// Check the callback `state` against the one issued at login.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StateMismatch` if no state was issued or it differs.
    pub fn verify_state(expected: Option<&str>, received: &str) -> Result<()> {
        match expected {
            Some(expected) if !expected.is_empty() && expected == received => Ok(()),
            _ => Err(AuthError::StateMismatch),
        }
    }

    /// Finish the login: exchange `code`, fetch the identity and check its domain.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnauthorizedDomain` for identities outside the
    /// configured domain, or the provider error if the exchange or userinfo
    /// fetch fails.
    pub async fn complete_login(
        &self,
        code: &str,
        pending_redirect: Option<&str>,
    ) -> Result<LoginOutcome> {
        let token = self.provider.exchange_code(code).await?;
        let info = self.provider.fetch_user_info(&token).await?;

        if !self.domain_matches(info.hd.as_deref()) {
            tracing::warn!(
                email = %info.email,
                hd = info.hd.as_deref().unwrap_or(""),
                "Rejected login from foreign domain"
            );
            return Err(AuthError::UnauthorizedDomain(
                info.hd.unwrap_or_default(),
            ));
        }

        tracing::info!(email = %info.email, "User logged in");

        Ok(LoginOutcome {
            user: SessionUser {
                email: info.email,
                token,
            },
            redirect_to: safe_redirect(pending_redirect).to_string(),
        })
    }

    fn domain_matches(&self, hd: Option<&str>) -> bool {
        hd.is_some_and(|hd| hd.eq_ignore_ascii_case(&self.domain))
    }
}

/// The redirect target if it is a local path, else [`DEFAULT_REDIRECT`].
///
/// Only paths starting with a single `/` are honoured; `//host` and absolute
/// URLs would send the browser off-site.
#[must_use]
pub fn safe_redirect(path: Option<&str>) -> &str {
    match path {
        Some(p) if is_local_path(p) => p,
        _ => DEFAULT_REDIRECT,
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}
