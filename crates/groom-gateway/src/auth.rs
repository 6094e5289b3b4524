//! Authentication extractors.
//!
//! Browser routes use [`AuthUser`], which reads the domain-validated user from
//! the cookie session. The `/api` routes use [`ApiKey`], which checks the
//! `X-API-KEY` header against the configured secret.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::uri::PathAndQuery;
use tower_sessions::Session;

use groom_auth::{IdentityProvider, SessionUser};
use groom_control::RoomControl;
use groom_core::Slug;

use crate::error::ApiError;
use crate::state::GatewayState;

/// Session key holding the [`SessionUser`].
pub const SESSION_USER_KEY: &str = "user";

/// Session key holding the path to return to after login.
pub const PENDING_REDIRECT_KEY: &str = "pending_redirect";

/// Session key holding the OAuth CSRF state of an in-flight login.
pub const OAUTH_STATE_KEY: &str = "oauth_state";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// A logged-in user from the workspace domain.
///
/// Rejects with [`ApiError::NotAuthenticated`] when the session is empty.
/// Requests for the directory or a room slug are remembered so the callback
/// can return to them; other paths leave the pending redirect untouched.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

impl AuthUser {
    /// E-mail of the user.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

#[async_trait]
impl<C, P> FromRequestParts<Arc<GatewayState<C, P>>> for AuthUser
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<GatewayState<C, P>>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::Internal(msg.to_string()))?;

        if let Some(user) = session.get::<SessionUser>(SESSION_USER_KEY).await? {
            return Ok(Self(user));
        }

        let requested = parts
            .uri
            .path_and_query()
            .map_or("/", PathAndQuery::as_str);
        if is_return_target(parts.uri.path()) {
            session.insert(PENDING_REDIRECT_KEY, requested).await?;
        }

        tracing::debug!(path = %requested, "No session user, redirecting to login");
        Err(ApiError::NotAuthenticated)
    }
}

/// Whether a browser path is worth returning to after login.
fn is_return_target(path: &str) -> bool {
    match path.strip_prefix('/') {
        Some("") => true,
        Some(rest) => Slug::parse(rest).is_ok(),
        None => false,
    }
}

/// Proof that the request carried the configured API key.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

#[async_trait]
impl<C, P> FromRequestParts<Arc<GatewayState<C, P>>> for ApiKey
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<GatewayState<C, P>>,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        if state.api_key_matches(presented) {
            Ok(Self)
        } else {
            tracing::warn!(path = %parts.uri.path(), "Rejected request with bad API key");
            Err(ApiError::Unauthorized)
        }
    }
}
