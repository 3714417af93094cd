//! Handler registry and transaction dispatch.

use std::sync::Arc;

use tracing::{debug, warn};

use cookiejar_core::{Sha512Hash, Transaction};

use crate::context::{Context, TpProcessRequest, TransactionHandler};
use crate::error::ApplyError;

/// Outcome class of one processed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TpStatus {
    /// Applied; state changes may be committed.
    Ok,
    /// The submitter is at fault; the enclosing batch is invalid.
    InvalidTransaction,
    /// The processor could not do its job.
    InternalError,
}

/// Result of [`TransactionProcessor::process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TpProcessResponse {
    pub status: TpStatus,
    /// Human-readable reason, empty on success.
    pub message: String,
}

impl TpProcessResponse {
    fn ok() -> Self {
        Self {
            status: TpStatus::Ok,
            message: String::new(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            status: TpStatus::InvalidTransaction,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: TpStatus::InternalError,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == TpStatus::Ok
    }
}

impl From<ApplyError> for TpProcessResponse {
    fn from(e: ApplyError) -> Self {
        if e.is_invalid_transaction() {
            Self::invalid(e.to_string())
        } else {
            Self::internal(e.to_string())
        }
    }
}

/// Routes transactions to registered handlers by family name and version.
#[derive(Default, Clone)]
pub struct TransactionProcessor {
    handlers: Vec<Arc<dyn TransactionHandler>>,
}

impl TransactionProcessor {
    /// Create a processor with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Later registrations do not shadow earlier ones.
    pub fn add_handler(&mut self, handler: impl TransactionHandler + 'static) {
        debug!(
            family = handler.family_name(),
            versions = ?handler.family_versions(),
            "registered handler"
        );
        self.handlers.push(Arc::new(handler));
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    fn route(&self, family: &str, version: &str) -> Option<&Arc<dyn TransactionHandler>> {
        self.handlers.iter().find(|h| {
            h.family_name() == family && h.family_versions().iter().any(|v| v == version)
        })
    }

    /// Decode, check and apply one transaction against `context`.
    pub fn process(&self, txn: &Transaction, context: &mut dyn Context) -> TpProcessResponse {
        let header = match txn.decode_header() {
            Ok(h) => h,
            Err(e) => return TpProcessResponse::invalid(format!("undecodable header: {e}")),
        };

        if Sha512Hash::hash(&txn.payload).to_hex() != header.payload_sha512 {
            return TpProcessResponse::invalid("payload hash mismatch");
        }

        let Some(handler) = self.route(&header.family_name, &header.family_version) else {
            warn!(
                family = %header.family_name,
                version = %header.family_version,
                "no handler for transaction family"
            );
            return TpProcessResponse::invalid(format!(
                "no handler for {} {}",
                header.family_name, header.family_version
            ));
        };

        let request = TpProcessRequest {
            header,
            payload: txn.payload.clone(),
            signature: txn.header_signature.clone(),
        };

        match handler.apply(&request, context) {
            Ok(()) => TpProcessResponse::ok(),
            Err(e) => {
                debug!(txn = %request.signature, error = %e, "transaction rejected");
                e.into()
            }
        }
    }
}
