//! Error types for stream delivery operations.
//!
//! Any error from the downstream publish call is retried while budget
//! remains, so the taxonomy here exists for logging and response mapping,
//! not for retry gating. When the budget runs out the last underlying
//! error is returned to the caller unchanged.

use std::fmt;

use thiserror::Error;

/// Result type alias for delivery operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Errors raised while publishing a record to the downstream stream.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// Network-level connectivity failure.
    #[error("network connection failed: {message}")]
    Network {
        /// Description of the network failure
        message: String,
    },

    /// Publish request exceeded the sink timeout.
    #[error("request timeout after {timeout_seconds}s")]
    Timeout {
        /// Seconds before the request timed out
        timeout_seconds: u64,
    },

    /// The stream service answered with a non-success status.
    #[error("stream service error: HTTP {status_code}")]
    Service {
        /// HTTP status code returned by the stream service
        status_code: u16,
        /// Response body content
        body: String,
    },

    /// The sink is misconfigured and cannot be used.
    #[error("invalid sink configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },

    /// The record could not be encoded for the wire.
    #[error("failed to encode record: {message}")]
    Serialization {
        /// Encoding error message
        message: String,
    },
}

impl DeliveryError {
    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Creates a service error from an HTTP response.
    pub fn service(status_code: u16, body: impl Into<String>) -> Self {
        Self::Service { status_code, body: body.into() }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization { message: message.into() }
    }
}

/// Category of delivery error, used as a structured logging field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network connectivity issues.
    Network,
    /// Request timeouts.
    Timeout,
    /// Stream service rejections.
    Service,
    /// Configuration problems.
    Configuration,
    /// Record encoding failures.
    Serialization,
}

impl From<&DeliveryError> for ErrorCategory {
    fn from(error: &DeliveryError) -> Self {
        match error {
            DeliveryError::Network { .. } => Self::Network,
            DeliveryError::Timeout { .. } => Self::Timeout,
            DeliveryError::Service { .. } => Self::Service,
            DeliveryError::Configuration { .. } => Self::Configuration,
            DeliveryError::Serialization { .. } => Self::Serialization,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Timeout => write!(f, "timeout"),
            Self::Service => write!(f, "service"),
            Self::Configuration => write!(f, "configuration"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_format() {
        let error = DeliveryError::timeout(30);
        assert_eq!(error.to_string(), "request timeout after 30s");

        let error = DeliveryError::service(503, "unavailable");
        assert_eq!(error.to_string(), "stream service error: HTTP 503");
    }

    #[test]
    fn categories_map_to_variants() {
        assert_eq!(ErrorCategory::from(&DeliveryError::network("refused")), ErrorCategory::Network);
        assert_eq!(ErrorCategory::from(&DeliveryError::timeout(30)), ErrorCategory::Timeout);
        assert_eq!(
            ErrorCategory::from(&DeliveryError::service(500, "oops")),
            ErrorCategory::Service
        );
        assert_eq!(
            ErrorCategory::from(&DeliveryError::serialization("bad value")),
            ErrorCategory::Serialization
        );
    }

    #[test]
    fn category_display_is_snake_case() {
        assert_eq!(ErrorCategory::Service.to_string(), "service");
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
    }
}
