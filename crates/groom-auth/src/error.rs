//! Authentication error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur during login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request carries no authenticated session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The identity belongs to a different hosted domain.
    #[error("unauthorized domain: {0}")]
    UnauthorizedDomain(String),

    /// The callback `state` does not match the one issued at login.
    #[error("OAuth state mismatch")]
    StateMismatch,

    /// The authorization code could not be exchanged for tokens.
    #[error("token exchange failed: {0}")]
    Exchange(String),

    /// The identity could not be fetched with the access token.
    #[error("userinfo fetch failed: {0}")]
    UserInfo(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns the appropriate HTTP status code for this error.
    ///
    /// Login failures are never retried automatically.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotAuthenticated | Self::UnauthorizedDomain(_) => 401,
            Self::StateMismatch => 400,
            Self::Exchange(_) | Self::UserInfo(_) | Self::Internal(_) => 500,
        }
    }
}
