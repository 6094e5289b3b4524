//! Health check endpoint.
//!
//! This module provides the public health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use groom_auth::IdentityProvider;
use groom_control::RoomControl;

use crate::state::GatewayState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// The room store answered.
    pub database: bool,
    /// The Meet API answered.
    pub provider: bool,
}

/// Health check handler.
///
/// Pings the room store and the Meet API. This endpoint is public and
/// does not require authentication.
///
/// # Example
///
/// ```text
/// GET /healthz
///
/// Response: 200 OK
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": true,
///   "provider": true
/// }
/// ```
pub async fn health<C, P>(State(state): State<Arc<GatewayState<C, P>>>) -> impl IntoResponse
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    let report = state.rooms.health().await;

    let (status_code, status) = if report.is_healthy() {
        (StatusCode::OK, "healthy")
    } else {
        tracing::warn!(
            database = report.database,
            provider = report.provider,
            "Health check failed"
        );
        (StatusCode::INTERNAL_SERVER_ERROR, "unhealthy")
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database: report.database,
        provider: report.provider,
    };

    (status_code, Json(response))
}
