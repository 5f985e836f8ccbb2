//! Backend error types.
//!
//! Every remote failure is folded into [`BackendError`] at the seam so
//! the layers above never see transport-library types.

use std::fmt;

/// Errors that can occur while talking to the hosted backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced an HTTP response (DNS, connect,
    /// timeout, TLS).
    #[error("Network error: {message}")]
    Network {
        /// Description of the transport failure.
        message: String,
    },

    /// The backend answered with a non-success status.
    #[error("Backend error (HTTP {status}): {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    /// The session is missing, expired, or lacks permission.
    #[error("Authentication error: {message}")]
    Auth {
        /// Description of the auth failure.
        message: String,
    },

    /// The named entity does not exist on the backend.
    #[error("Not found: {what}")]
    NotFound {
        /// What was looked up.
        what: String,
    },

    /// The request was rejected as malformed before being sent.
    #[error("Invalid request: {message}")]
    Invalid {
        /// Why the request is invalid.
        message: String,
    },
}

impl BackendError {
    /// Creates a new `Network` error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a new `Http` error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a new `Auth` error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Creates a new `Invalid` error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is an auth error.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network { .. } => ErrorCategory::Network,
            Self::Http { .. } => ErrorCategory::Remote,
            Self::Decode { .. } => ErrorCategory::Decode,
            Self::Auth { .. } => ErrorCategory::Auth,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Invalid { .. } => ErrorCategory::Validation,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::http(status.as_u16(), err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Categories of backend errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport-level failure.
    Network,
    /// Non-success HTTP response.
    Remote,
    /// Response decoding failure.
    Decode,
    /// Authentication/authorization failure.
    Auth,
    /// Entity not found.
    NotFound,
    /// Request-side validation failure.
    Validation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Remote => write!(f, "remote"),
            Self::Decode => write!(f, "decode"),
            Self::Auth => write!(f, "auth"),
            Self::NotFound => write!(f, "not_found"),
            Self::Validation => write!(f, "validation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::http(500, "internal error");
        assert_eq!(err.to_string(), "Backend error (HTTP 500): internal error");

        let err = BackendError::not_found("tender 42");
        assert_eq!(err.to_string(), "Not found: tender 42");
    }

    #[test]
    fn test_error_predicates() {
        assert!(BackendError::not_found("bid").is_not_found());
        assert!(!BackendError::not_found("bid").is_auth());
        assert!(BackendError::auth("expired token").is_auth());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            BackendError::network("connection refused").category(),
            ErrorCategory::Network
        );
        assert_eq!(BackendError::http(502, "bad gateway").category(), ErrorCategory::Remote);
        assert_eq!(BackendError::decode("bad json").category(), ErrorCategory::Decode);
        assert_eq!(BackendError::invalid("empty body").category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Network.to_string(), "network");
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
    }
}
