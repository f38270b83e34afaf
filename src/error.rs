//! Error types for the transcript analysis CLI.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Errors from the completion/embedding gateway.
///
/// The variants are the failure taxonomy the retry layer keys on:
/// `RateLimited` and `Transient` are retried up to the configured bound,
/// `Permanent` and `Invalid` fail immediately, and `Unavailable` is what
/// an exhausted retry escalates to.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("rate limited by gateway: {0}")]
    RateLimited(String),

    #[error("transient gateway error: {0}")]
    Transient(String),

    #[error("permanent gateway error (status {status}): {message}")]
    Permanent { status: u16, message: String },

    #[error("gateway unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },

    #[error("invalid request: {0}")]
    Invalid(String),
}

impl Retryable for GatewayError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimited(_) | GatewayError::Transient(_)
        )
    }
}

/// Errors related to vector store operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("failed to connect to vector store: {0}")]
    ConnectionError(String),

    #[error("collection error: {0}")]
    CollectionError(String),

    #[error("upsert error: {0}")]
    UpsertError(String),

    #[error("search error: {0}")]
    SearchError(String),

    #[error("lookup error: {0}")]
    LookupError(String),
}

/// Errors related to loading processed transcripts.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("no processed transcripts found in {0}")]
    NoTranscripts(String),
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_retryability() {
        assert!(GatewayError::RateLimited("429".into()).is_retryable());
        assert!(GatewayError::Transient("connection reset".into()).is_retryable());
        assert!(
            !GatewayError::Permanent {
                status: 400,
                message: "bad request".into()
            }
            .is_retryable()
        );
        assert!(!GatewayError::Invalid("empty text".into()).is_retryable());
        assert!(
            !GatewayError::Unavailable {
                attempts: 3,
                last_error: "rate limited".into()
            }
            .is_retryable()
        );
    }
}
