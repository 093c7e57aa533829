//! Error taxonomy for the review pipeline.
//!
//! Only [`ReviewError::Upstream`] and configuration errors are fatal to a
//! run. Quality check failures are captured per check (see
//! [`crate::domain::CheckOutcome`]) and malformed completion output is
//! absorbed by the parser.

/// Errors produced by the review pipeline and its ports.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// A remote service (source control, completion endpoint) failed.
    #[error("{service} request failed: {message}")]
    Upstream { service: String, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid change-set reference: {0}")]
    InvalidChangeSet(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReviewError {
    /// Build an upstream failure for the named service.
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        ReviewError::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from a remote service.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ReviewError::Upstream { .. })
    }
}

impl From<toml::de::Error> for ReviewError {
    fn from(err: toml::de::Error) -> Self {
        ReviewError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ReviewError {
    fn from(err: toml::ser::Error) -> Self {
        ReviewError::Config(err.to_string())
    }
}

/// Result type for review operations.
pub type Result<T> = std::result::Result<T, ReviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_display() {
        let err = ReviewError::upstream("github", "connection refused");
        assert_eq!(err.to_string(), "github request failed: connection refused");
        assert!(err.is_upstream());
    }

    #[test]
    fn test_config_error_is_not_upstream() {
        let err = ReviewError::Config("missing OPENAI_API_KEY".to_string());
        assert!(err.to_string().contains("invalid configuration"));
        assert!(!err.is_upstream());
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ReviewError = io.into();
        assert!(matches!(err, ReviewError::Io(_)));
    }
}
