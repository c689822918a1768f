//! Error types for the contact relay.

use thiserror::Error;

/// Common error type for process-level failures.
///
/// Request-level failures (rate limiting, validation, delivery) are mapped to
/// HTTP responses by [`crate::web::ApiError`] and never surface here.
#[derive(Error, Debug)]
pub enum RelayError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The mail transport could not be constructed.
    #[error("mail transport error: {0}")]
    Transport(String),
}

/// Result type alias for contact relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = RelayError::Config("mail.username is not set".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: mail.username is not set"
        );
    }

    #[test]
    fn test_transport_error_display() {
        let err = RelayError::Transport("unknown host".to_string());
        assert_eq!(err.to_string(), "mail transport error: unknown host");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RelayError = io_err.into();
        assert!(matches!(err, RelayError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }
}
