//! Error types for room resolution and management.

use groom_core::SlugError;
use groom_meet::MeetError;
use groom_store::StoreError;
use thiserror::Error;

/// A result type using `ControlError`.
pub type Result<T> = std::result::Result<T, ControlError>;

/// Errors that can occur in room operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// No room matches the slug or ID.
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// Another room already uses the slug.
    #[error("slug already taken: {0}")]
    SlugTaken(String),

    /// The slug is malformed.
    #[error("invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),

    /// The request is otherwise malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The meeting provider failed.
    #[error("provider error: {0}")]
    Provider(#[from] MeetError),

    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ControlError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::RoomNotFound(_) => 404,
            Self::SlugTaken(_) => 409,
            Self::InvalidSlug(_) | Self::InvalidInput(_) => 400,
            Self::Provider(_) | Self::Store(_) => 500,
        }
    }

    /// Returns true if this error might be resolved by retrying.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Provider(e) => e.is_retriable(),
            Self::Store(e) => matches!(e, StoreError::Database(_)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(ControlError::RoomNotFound("x".into()).http_status_code(), 404);
        assert_eq!(ControlError::SlugTaken("x".into()).http_status_code(), 409);
        assert_eq!(
            ControlError::InvalidSlug(SlugError::Empty).http_status_code(),
            400
        );
        assert_eq!(
            ControlError::Provider(MeetError::ProviderUnavailable("down".into()))
                .http_status_code(),
            500
        );
        assert_eq!(
            ControlError::Store(StoreError::Database("down".into())).http_status_code(),
            500
        );
    }

    #[test]
    fn retriable() {
        assert!(ControlError::Provider(MeetError::ProviderUnavailable("x".into())).is_retriable());
        assert!(ControlError::Store(StoreError::Database("x".into())).is_retriable());
        assert!(!ControlError::RoomNotFound("x".into()).is_retriable());
    }
}
