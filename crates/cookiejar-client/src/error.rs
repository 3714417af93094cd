//! Error types for the client module.

use cookiejar_core::CoreError;
use thiserror::Error;

/// Errors surfaced to callers of the client. None are retried automatically.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The gateway could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The gateway answered with a non-success status.
    #[error("gateway error ({status}): {message}")]
    Gateway { status: u16, message: String },

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The confirmation deadline passed.
    #[error("timed out waiting for batch {batch_id}")]
    Timeout { batch_id: String },

    /// The signing capability refused.
    #[error("signing error: {0}")]
    Signing(String),

    /// An envelope could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<CoreError> for ClientError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::SigningError(msg) | CoreError::InvalidPrivateKey(msg) => {
                ClientError::Signing(msg)
            }
            CoreError::DecodingError(msg) => ClientError::Decode(msg),
            other => ClientError::Encoding(other.to_string()),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
