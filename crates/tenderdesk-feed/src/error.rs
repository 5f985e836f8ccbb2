//! Feed error types.
//!
//! Outcomes are fanned out to every caller that joined an in-flight
//! fetch, so the error type is `Clone` and carries plain strings
//! instead of the underlying transport errors.

use tenderdesk_backend::BackendError;

/// Errors surfaced by the fetch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    /// The backend call failed; the message is what the consumer shows.
    #[error("Backend failure: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },

    /// The request leading this fingerprint went away before settling.
    #[error("Request abandoned before completion")]
    Abandoned,
}

impl FeedError {
    /// Creates a new `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

impl From<BackendError> for FeedError {
    fn from(err: BackendError) -> Self {
        Self::backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_is_flattened_to_a_string() {
        let err: FeedError = BackendError::network("connection refused").into();
        assert_eq!(
            err,
            FeedError::backend("Network error: connection refused")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            FeedError::backend("boom").to_string(),
            "Backend failure: boom"
        );
        assert_eq!(
            FeedError::Abandoned.to_string(),
            "Request abandoned before completion"
        );
    }
}
