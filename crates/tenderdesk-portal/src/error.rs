use thiserror::Error;

use tenderdesk_backend::BackendError;
use tenderdesk_feed::FeedError;

/// Errors surfaced by the session layer.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Administrator role required to {action}")]
    Forbidden {
        /// The attempted action.
        action: String,
    },
}

impl PortalError {
    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    /// Returns `true` when the caller must sign in first.
    #[must_use]
    pub fn is_not_signed_in(&self) -> bool {
        matches!(self, Self::NotSignedIn)
    }

    /// Returns `true` for role failures.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}

/// Convenience result type for session operations.
pub type Result<T> = std::result::Result<T, PortalError>;
