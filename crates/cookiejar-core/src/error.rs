//! Error types for the cookie-jar core.

use thiserror::Error;

/// Core errors that can occur while building or decoding envelopes.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("payload hash mismatch: expected {expected}, got {actual}")]
    PayloadHashMismatch { expected: String, actual: String },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Validation errors for transaction and batch envelopes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("signature verification failed")]
    SignatureFailed,

    #[error("payload hash does not match header")]
    PayloadHashMismatch,

    #[error("batch lists {declared} transaction ids but carries {actual} transactions")]
    TransactionCountMismatch { declared: usize, actual: usize },

    #[error("transaction id mismatch at position {position}")]
    TransactionIdMismatch { position: usize },

    #[error("batch contains no transactions")]
    EmptyBatch,

    #[error("transaction batcher does not match batch signer")]
    BatcherMismatch,

    #[error("structural error: {0}")]
    StructuralError(String),
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSignature | CoreError::InvalidPublicKey => {
                ValidationError::SignatureFailed
            }
            CoreError::PayloadHashMismatch { .. } => ValidationError::PayloadHashMismatch,
            CoreError::InvalidPrivateKey(msg)
            | CoreError::SigningError(msg)
            | CoreError::MalformedPayload(msg)
            | CoreError::EncodingError(msg)
            | CoreError::DecodingError(msg) => ValidationError::StructuralError(msg),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
