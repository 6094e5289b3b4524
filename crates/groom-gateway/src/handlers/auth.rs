//! Login, OAuth callback and logout.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use serde::Deserialize;
use tower_sessions::Session;

use groom_auth::{IdentityGate, IdentityProvider, DEFAULT_REDIRECT};
use groom_control::RoomControl;

use crate::auth::{OAUTH_STATE_KEY, PENDING_REDIRECT_KEY, SESSION_USER_KEY};
use crate::error::ApiError;
use crate::state::GatewayState;

/// Query parameters Google appends to the callback URL.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Authorization code.
    #[serde(default)]
    pub code: Option<String>,
    /// CSRF state echoed back.
    #[serde(default)]
    pub state: Option<String>,
    /// Set when the user denied consent.
    #[serde(default)]
    pub error: Option<String>,
}

/// Start the OAuth flow.
///
/// A fresh CSRF state is stored in the session before the browser is sent
/// to the consent screen.
pub async fn login<C, P>(
    State(state): State<Arc<GatewayState<C, P>>>,
    session: Session,
) -> Result<impl IntoResponse, ApiError>
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    let csrf = IdentityGate::<P>::new_state();
    session.insert(OAUTH_STATE_KEY, &csrf).await?;

    let url = state.gate.begin_login(&csrf)?;
    Ok(Redirect::to(&url))
}

/// Handle the OAuth callback.
///
/// On success the session id is rotated, the user is written to the session
/// and the browser returns to the page it originally asked for.
pub async fn callback<C, P>(
    State(state): State<Arc<GatewayState<C, P>>>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, ApiError>
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    if let Some(error) = params.error {
        tracing::info!(error = %error, "Login denied by user");
        return Err(ApiError::BadRequest(format!("login failed: {error}")));
    }

    let code = params
        .code
        .ok_or_else(|| ApiError::BadRequest("missing authorization code".to_string()))?;
    let received = params.state.unwrap_or_default();

    // The state is single-use whether or not it matches.
    let expected: Option<String> = session.remove(OAUTH_STATE_KEY).await?;
    IdentityGate::<P>::verify_state(expected.as_deref(), &received)?;

    let pending: Option<String> = session.remove(PENDING_REDIRECT_KEY).await?;
    let outcome = state.gate.complete_login(&code, pending.as_deref()).await?;

    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, &outcome.user).await?;

    Ok(Redirect::to(&outcome.redirect_to))
}

/// Clear the session and return to the home page.
pub async fn logout(session: Session) -> Result<impl IntoResponse, ApiError> {
    session.flush().await?;
    Ok(Redirect::to(DEFAULT_REDIRECT))
}
