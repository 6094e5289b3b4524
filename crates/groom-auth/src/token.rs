//! Tokens and identities carried in the browser session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth2 tokens obtained at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token, present when offline access was granted.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token type, normally `Bearer`.
    pub token_type: String,
    /// When the access token expires.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthToken {
    /// Check whether the access token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Identity returned by the userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    /// Primary e-mail address.
    pub email: String,
    /// Hosted (Workspace) domain; absent for consumer accounts.
    #[serde(default)]
    pub hd: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A domain-validated user, stored in the session after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// E-mail of the authenticated user.
    pub email: String,
    /// Tokens issued at login.
    pub token: OAuthToken,
}

/// Result of a completed login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// The authenticated user, to be written to the session.
    pub user: SessionUser,
    /// Local path to send the browser to.
    pub redirect_to: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(expires_at: Option<DateTime<Utc>>) -> OAuthToken {
        OAuthToken {
            access_token: "ya29.a0".to_string(),
            refresh_token: Some("1//refresh".to_string()),
            token_type: "Bearer".to_string(),
            expires_at,
        }
    }

    #[test]
    fn session_user_survives_serialization() {
        let user = SessionUser {
            email: "alice@example.com".to_string(),
            token: token(Some(Utc::now())),
        };

        let json = serde_json::to_value(&user).unwrap();
        let back: SessionUser = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn expiry() {
        let now = Utc::now();
        assert!(token(Some(now - Duration::seconds(1))).is_expired_at(now));
        assert!(!token(Some(now + Duration::hours(1))).is_expired_at(now));
        assert!(!token(None).is_expired_at(now));
    }

    #[test]
    fn userinfo_without_hosted_domain() {
        let info: UserInfo =
            serde_json::from_str(r#"{"email": "bob@gmail.com", "verified_email": true}"#).unwrap();
        assert!(info.hd.is_none());
    }
}
