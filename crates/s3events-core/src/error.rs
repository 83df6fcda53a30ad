//! Error types for the S3 events handler

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Processing Errors
    #[error("Message is not a notification batch: {0}")]
    Parse(String),

    #[error("Failed to serialize envelope: {0}")]
    Serialization(String),

    #[error("Sink rejected envelope: {0}")]
    Sink(String),

    #[error(
        "Batch completed with failures: {parse_failures} unparsable, \
         {serialization_failures} unserializable, {sink_failures} undelivered"
    )]
    BatchFailed {
        parse_failures: usize,
        serialization_failures: usize,
        sink_failures: usize,
    },

    // Validation Errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Parse(_) => "ParseFailure",
            Error::Serialization(_) => "SerializationFailure",
            Error::Sink(_) => "SinkFailure",
            Error::BatchFailed { .. } => "BatchFailed",
            Error::InvalidArgument(_) => "InvalidArgument",
            Error::Config(_) => "InvalidConfiguration",
            Error::Io(_) => "InternalError",
        }
    }

    /// Whether redelivering the same input could succeed.
    ///
    /// Parse and serialization failures are deterministic for a given
    /// message, so only delivery-side failures qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Sink(_) | Error::Io(_) => true,
            Error::BatchFailed { sink_failures, .. } => *sink_failures > 0,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::Parse("bad".into()).code(), "ParseFailure");
        assert_eq!(
            Error::Serialization("bad".into()).code(),
            "SerializationFailure"
        );
        assert_eq!(Error::Config("x".into()).code(), "InvalidConfiguration");
    }

    #[test]
    fn test_retryable() {
        assert!(!Error::Parse("bad".into()).is_retryable());
        assert!(!Error::Serialization("bad".into()).is_retryable());
        assert!(Error::Sink("closed".into()).is_retryable());

        let only_parse = Error::BatchFailed {
            parse_failures: 2,
            serialization_failures: 0,
            sink_failures: 0,
        };
        assert!(!only_parse.is_retryable());

        let with_sink = Error::BatchFailed {
            parse_failures: 0,
            serialization_failures: 0,
            sink_failures: 1,
        };
        assert!(with_sink.is_retryable());
    }

    #[test]
    fn test_batch_failed_message() {
        let err = Error::BatchFailed {
            parse_failures: 1,
            serialization_failures: 2,
            sink_failures: 0,
        };
        assert_eq!(
            err.to_string(),
            "Batch completed with failures: 1 unparsable, 2 unserializable, 0 undelivered"
        );
    }
}
