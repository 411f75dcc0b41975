//! Error types for record normalization.
//!
//! Transform failures are data-shape errors, not transient faults: they are
//! never retried and propagate to the caller of the pipeline.

use thiserror::Error;

/// Result type alias for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Errors raised while normalizing a record.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Serializing the original payload into the raw field failed.
    #[error("failed to serialize raw payload: {0}")]
    RawEncode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_format() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = TransformError::RawEncode(source);
        assert!(error.to_string().starts_with("failed to serialize raw payload"));
    }
}
