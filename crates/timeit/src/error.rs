//! Error types for timed regions and their reactions.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while configuring a region or dispatching its reactions.
#[derive(Debug, Error)]
pub enum TimeItError {
    /// The region ran strictly longer than the configured threshold
    #[error("Code region executed in {elapsed:?} (exceeds threshold: {threshold:?})")]
    ThresholdExceeded {
        elapsed: Duration,
        threshold: Duration,
    },

    /// A log template's placeholders don't match the supplied arguments.
    ///
    /// `arguments` counts the caller's arguments only; the elapsed time
    /// always fills the final placeholder.
    #[error(
        "Log template has {placeholders} placeholder(s) but {arguments} argument(s) were supplied before the elapsed time"
    )]
    TemplateArgumentMismatch { placeholders: usize, arguments: usize },

    /// Rejected before the region was entered
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A caller-supplied reaction failed
    #[error("Reaction failed: {0}")]
    Reaction(#[from] anyhow::Error),

    /// Failed to serialize a dump record
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure while writing a dump or reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for timing operations.
pub type TimeItResult<T> = Result<T, TimeItError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TimeItError::ThresholdExceeded {
            elapsed: Duration::from_millis(50),
            threshold: Duration::from_millis(10),
        };
        assert_eq!(
            err.to_string(),
            "Code region executed in 50ms (exceeds threshold: 10ms)"
        );

        let err = TimeItError::InvalidConfiguration("negative threshold".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: negative threshold");
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: TimeItError = anyhow::anyhow!("sink offline").into();
        assert!(matches!(err, TimeItError::Reaction(_)));
        assert_eq!(err.to_string(), "Reaction failed: sink offline");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err: Result<(), serde_json::Error> = serde_json::from_str::<()>("invalid json");
        let err: TimeItError = json_err.unwrap_err().into();
        assert!(matches!(err, TimeItError::Serialization(_)));
    }
}
