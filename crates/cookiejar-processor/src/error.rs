//! Error types for the processor module.

use cookiejar_core::{Address, CoreError};
use thiserror::Error;

/// Errors raised while applying a transaction.
///
/// `MalformedPayload` and `Validation` are attributable to the submitter and
/// mark the transaction invalid. `Internal` means the processor could not do
/// its job (state unreadable, write refused) and is reported as a fault.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    /// Payload could not be parsed into an action.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Business rule violated (missing jar, insufficient cookies).
    #[error("invalid transaction: {0}")]
    Validation(String),

    /// State access failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplyError {
    /// Whether the submitter is to blame (the transaction is invalid).
    pub fn is_invalid_transaction(&self) -> bool {
        matches!(self, ApplyError::MalformedPayload(_) | ApplyError::Validation(_))
    }
}

impl From<ContextError> for ApplyError {
    fn from(e: ContextError) -> Self {
        ApplyError::Internal(e.to_string())
    }
}

impl From<CoreError> for ApplyError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::MalformedPayload(msg) => ApplyError::MalformedPayload(msg),
            other => ApplyError::Internal(other.to_string()),
        }
    }
}

/// Errors from the state-access capability.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// Address outside the transaction's declared inputs or outputs.
    #[error("address not declared for {access}: {address}")]
    AuthorizationFailed {
        address: Address,
        access: &'static str,
    },

    /// Backing state could not be reached.
    #[error("state unavailable: {0}")]
    Unavailable(String),
}

/// Result type for handler operations.
pub type Result<T> = std::result::Result<T, ApplyError>;
