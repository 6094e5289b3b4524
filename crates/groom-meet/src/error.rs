//! Error types for the Meet directory client.

use thiserror::Error;

/// Errors that can occur when talking to the meeting provider.
#[derive(Error, Debug)]
pub enum MeetError {
    /// Transport failure or an error status from the provider.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The requested space does not exist.
    #[error("space not found: {0}")]
    SpaceNotFound(String),

    /// The provider returned a body that could not be decoded.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Service-account credentials could not be loaded or exchanged.
    #[error("credentials error: {0}")]
    Credentials(String),
}

impl MeetError {
    /// Check if this error is retriable.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_))
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::SpaceNotFound(_) => 404,
            Self::ProviderUnavailable(_) | Self::InvalidResponse(_) | Self::Credentials(_) => 500,
        }
    }
}

/// A specialized Result type for Meet operations.
pub type Result<T> = std::result::Result<T, MeetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(MeetError::SpaceNotFound("spaces/x".into()).http_status_code(), 404);
        assert_eq!(
            MeetError::ProviderUnavailable("timeout".into()).http_status_code(),
            500
        );
        assert!(MeetError::ProviderUnavailable("timeout".into()).is_retriable());
        assert!(!MeetError::Credentials("bad key".into()).is_retriable());
    }
}
