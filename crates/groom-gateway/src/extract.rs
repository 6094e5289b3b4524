//! Request extractors with gateway error responses.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON request body.
///
/// Same as [`axum::Json`], but malformed bodies are answered with an
/// [`ApiError::BadRequest`] in the standard error envelope.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);
