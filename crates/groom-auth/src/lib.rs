//! Domain-restricted Google login for groom.
//!
//! This crate provides the OAuth2 authorization-code flow used to sign users
//! into the room directory, including:
//!
//! - Consent URL construction with the Workspace `hd` hint
//! - Code exchange and userinfo lookup
//! - Hosted-domain verification
//! - The typed [`SessionUser`] stored in the browser session
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │   Gateway        │────▶│   IdentityGate   │
//! │   (/auth/*)      │     │   (domain check) │
//! └──────────────────┘     └────────┬─────────┘
//!                                   │
//!                          ┌────────▼─────────┐
//!                          │ IdentityProvider │
//!                          │ (trait)          │
//!                          └────────┬─────────┘
//!                                   │ HTTPS
//!                          ┌────────▼─────────┐
//!                          │ Google OAuth2 +  │
//!                          │ userinfo         │
//!                          └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use groom_auth::{AuthConfig, GoogleIdentityProvider, IdentityGate};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig {
//!     client_id: "client-id".to_string(),
//!     client_secret: "client-secret".to_string(),
//!     redirect_url: "https://groom.example.com/auth/callback".to_string(),
//!     domain: "example.com".to_string(),
//!     ..AuthConfig::default()
//! };
//!
//! let provider = Arc::new(GoogleIdentityProvider::new(config)?);
//! let gate = IdentityGate::new(provider, "example.com");
//!
//! let state = IdentityGate::<GoogleIdentityProvider>::new_state();
//! println!("Send the browser to {}", gate.begin_login(&state)?);
//!
//! // In the callback handler:
//! let outcome = gate.complete_login("code-from-callback", Some("/standup")).await?;
//! println!("{} -> {}", outcome.user.email, outcome.redirect_to);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod gate;
pub mod provider;
pub mod token;

pub use client::GoogleIdentityProvider;
pub use error::{AuthError, Result};
pub use gate::{safe_redirect, IdentityGate, DEFAULT_REDIRECT};
pub use provider::IdentityProvider;
pub use token::{LoginOutcome, OAuthToken, SessionUser, UserInfo};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockIdentityProvider;

/// Scopes requested at login: the identity plus the meeting scopes.
pub const LOGIN_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/meetings.space.created",
    "https://www.googleapis.com/auth/meetings.space.readonly",
];

/// Configuration for the Google OAuth2 client.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Callback URL registered for the client.
    pub redirect_url: String,
    /// Required hosted (Workspace) domain.
    pub domain: String,
    /// Authorization endpoint.
    pub auth_url: String,
    /// Token endpoint.
    pub token_url: String,
    /// Userinfo endpoint.
    pub userinfo_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: String::new(),
            domain: String::new(),
            auth_url: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints() {
        let config = AuthConfig::default();
        assert_eq!(config.auth_url, "https://accounts.google.com/o/oauth2/auth");
        assert_eq!(config.token_url, "https://oauth2.googleapis.com/token");
        assert!(config.userinfo_url.ends_with("/oauth2/v2/userinfo"));
    }

    #[test]
    fn auth_error_status_codes() {
        assert_eq!(AuthError::NotAuthenticated.http_status_code(), 401);
        assert_eq!(
            AuthError::UnauthorizedDomain("other.org".into()).http_status_code(),
            401
        );
        assert_eq!(AuthError::StateMismatch.http_status_code(), 400);
        assert_eq!(AuthError::Exchange("x".into()).http_status_code(), 500);
        assert_eq!(AuthError::UserInfo("x".into()).http_status_code(), 500);
    }
}
