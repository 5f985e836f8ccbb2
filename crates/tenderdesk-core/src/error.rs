use thiserror::Error;

/// Core error types for TenderDesk operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Invalid tender query: {message}")]
    InvalidQuery { message: String },

    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Create a new InvalidUserId error
    pub fn invalid_user_id(id: impl Into<String>) -> Self {
        Self::InvalidUserId(id.into())
    }

    /// Create a new InvalidQuery error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new InvalidDateTime error
    pub fn invalid_date_time(datetime: impl Into<String>) -> Self {
        Self::InvalidDateTime(datetime.into())
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this error is a client error (caller supplied bad input)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUserId(_)
                | Self::InvalidQuery { .. }
                | Self::InvalidDateTime(_)
                | Self::JsonError(_)
                | Self::UrlError(_)
        )
    }

    /// Check if this error is a server/environment error
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::TimeError(_) | Self::UuidError(_)
        )
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidUserId(_) | Self::InvalidQuery { .. } | Self::InvalidDateTime(_) => {
                ErrorCategory::Validation
            }
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::TimeError(_) | Self::UuidError(_) => ErrorCategory::System,
            Self::UrlError(_) => ErrorCategory::Validation,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Serialization,
    System,
    Configuration,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Serialization => write!(f, "serialization"),
            Self::System => write!(f, "system"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CoreError::invalid_user_id("not-a-uuid");
        assert_eq!(err.to_string(), "Invalid user id: not-a-uuid");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_invalid_query_error() {
        let err = CoreError::invalid_query("page must be >= 1");
        assert_eq!(err.to_string(), "Invalid tender query: page must be >= 1");
        assert!(err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_configuration_error() {
        let err = CoreError::configuration("backend URL is empty");
        assert_eq!(err.to_string(), "Configuration error: backend URL is empty");
        assert!(err.is_server_error());
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let core_err: CoreError = json_err.into();

        assert!(matches!(core_err, CoreError::JsonError(_)));
        assert!(core_err.is_client_error());
        assert_eq!(core_err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_uuid_error_conversion() {
        let uuid_err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let core_err: CoreError = uuid_err.into();

        assert!(matches!(core_err, CoreError::UuidError(_)));
        assert!(core_err.is_server_error());
        assert_eq!(core_err.category(), ErrorCategory::System);
    }

    #[test]
    fn test_url_error_conversion() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let core_err: CoreError = url_err.into();

        assert!(matches!(core_err, CoreError::UrlError(_)));
        assert!(core_err.is_client_error());
        assert_eq!(core_err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_client_vs_server_classification() {
        let client_err = CoreError::invalid_query("bad");
        assert!(client_err.is_client_error());
        assert!(!client_err.is_server_error());

        let server_err = CoreError::configuration("bad");
        assert!(server_err.is_server_error());
        assert!(!server_err.is_client_error());
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
        assert_eq!(ErrorCategory::System.to_string(), "system");
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
    }
}
