//! API error types and responses.
//!
//! This module defines the standard error format for all API responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use groom_auth::AuthError;
use groom_control::ControlError;
use groom_meet::MeetError;
use groom_store::StoreError;

/// Where browsers without a session are sent.
pub const LOGIN_PATH: &str = "/auth/login";

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid API key.
    #[error("unauthorized")]
    Unauthorized,

    /// The browser has no session; answered with a redirect to the login page.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The identity belongs to a different Workspace domain.
    #[error("unauthorized domain: {0}")]
    UnauthorizedDomain(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request conflicts with the current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Invalid request body or parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The meeting provider failed.
    #[error("provider unavailable")]
    ProviderUnavailable,

    /// The room store failed.
    #[error("store unavailable")]
    StoreUnavailable,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Error details.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::NotAuthenticated | Self::UnauthorizedDomain(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ProviderUnavailable | Self::StoreUnavailable | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotAuthenticated => "not_authenticated",
            Self::UnauthorizedDomain(_) => "unauthorized_domain",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::BadRequest(_) => "bad_request",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::StoreUnavailable => "store_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::NotAuthenticated) {
            return Redirect::to(LOGIN_PATH).into_response();
        }

        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated => Self::NotAuthenticated,
            AuthError::UnauthorizedDomain(domain) => Self::UnauthorizedDomain(domain),
            AuthError::StateMismatch => Self::BadRequest("OAuth state mismatch".to_string()),
            AuthError::Exchange(_) | AuthError::UserInfo(_) | AuthError::Internal(_) => {
                tracing::error!(error = %err, "Login failed");
                Self::Internal("login failed".to_string())
            }
        }
    }
}

impl From<MeetError> for ApiError {
    fn from(err: MeetError) -> Self {
        tracing::error!(error = %err, "Meet provider error");
        Self::ProviderUnavailable
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Store error");
        Self::StoreUnavailable
    }
}

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::RoomNotFound(what) => Self::NotFound(format!("room {what}")),
            ControlError::SlugTaken(slug) => Self::Conflict(format!("slug {slug} is already taken")),
            ControlError::InvalidSlug(e) => Self::BadRequest(e.to_string()),
            ControlError::InvalidInput(msg) => Self::BadRequest(msg),
            ControlError::Provider(e) => Self::from(e),
            ControlError::Store(e) => Self::from(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        tracing::error!(error = %err, "Session error");
        Self::Internal("session error".to_string())
    }
}
