//! An in-process gateway for tests and local experiments.
//!
//! Submitted batches are validated and applied through a
//! [`TransactionProcessor`] against a [`MemoryState`], one batch at a time.
//! A batch commits only if every transaction in it succeeds. A batch id seen
//! before, or a transaction that already committed, is not applied again.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use cookiejar_core::canonical::decode_batch_list;
use cookiejar_core::{validate_batch, Address, Batch};
use cookiejar_processor::{CookieJarHandler, Event, MemoryState, TransactionProcessor};

use super::Gateway;
use crate::error::{ClientError, Result};
use crate::responses::{
    BatchStatus, BatchStatusEntry, BatchStatusResponse, InvalidTransaction, StateResponse,
    SubmitResponse,
};

/// Base of the links returned by the in-memory gateway.
pub const LINK_BASE: &str = "memory://devnet";

#[derive(Default)]
struct Ledger {
    statuses: HashMap<String, BatchStatusEntry>,
    committed_txns: HashSet<String>,
    held: Vec<Batch>,
    holding: bool,
    events: Vec<Event>,
}

/// In-memory ledger behind the [`Gateway`] interface.
pub struct MemoryGateway {
    state: MemoryState,
    processor: TransactionProcessor,
    ledger: Mutex<Ledger>,
}

impl MemoryGateway {
    /// A devnet running the cookie-jar handler.
    pub fn new() -> Self {
        let mut processor = TransactionProcessor::new();
        processor.add_handler(CookieJarHandler::new());
        Self::with_processor(processor)
    }

    /// A devnet running the given processor.
    pub fn with_processor(processor: TransactionProcessor) -> Self {
        Self {
            state: MemoryState::new(),
            processor,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    /// Direct access to the ledger state.
    pub fn state_store(&self) -> &MemoryState {
        &self.state
    }

    /// Keep newly submitted batches `PENDING` until [`release`](Self::release).
    pub async fn hold(&self) {
        self.ledger.lock().await.holding = true;
    }

    /// Apply held batches in submission order and stop holding.
    pub async fn release(&self) {
        let mut ledger = self.ledger.lock().await;
        ledger.holding = false;
        let held = std::mem::take(&mut ledger.held);
        for batch in held {
            let entry = self.apply_batch(&batch, &mut ledger);
            ledger.statuses.insert(entry.id.clone(), entry);
        }
    }

    /// Events emitted by committed batches, oldest first.
    pub async fn events(&self) -> Vec<Event> {
        self.ledger.lock().await.events.clone()
    }

    fn apply_batch(&self, batch: &Batch, ledger: &mut Ledger) -> BatchStatusEntry {
        let batch_id = batch.id().to_string();

        if let Err(e) = validate_batch(batch) {
            warn!(batch = %batch_id, error = %e, "rejecting batch");
            return invalid(&batch_id, &batch_id, e.to_string());
        }

        let mut seen = HashSet::new();
        for txn in &batch.transactions {
            if ledger.committed_txns.contains(txn.id()) || !seen.insert(txn.id()) {
                warn!(batch = %batch_id, txn = %txn.id(), "replayed transaction");
                return invalid(&batch_id, txn.id(), "duplicate transaction".into());
            }
        }

        let mut scope = self.state.scope();
        for txn in &batch.transactions {
            let header = match txn.decode_header() {
                Ok(h) => h,
                Err(e) => return invalid(&batch_id, txn.id(), e.to_string()),
            };
            scope.declare(&header.inputs, &header.outputs);

            let response = self.processor.process(txn, &mut scope);
            if !response.is_ok() {
                warn!(
                    batch = %batch_id,
                    txn = %txn.id(),
                    status = ?response.status,
                    message = %response.message,
                    "transaction rejected, batch discarded"
                );
                return invalid(&batch_id, txn.id(), response.message);
            }
        }

        match scope.commit() {
            Ok(events) => {
                debug!(batch = %batch_id, events = events.len(), "batch committed");
                ledger.events.extend(events);
                ledger
                    .committed_txns
                    .extend(batch.transactions.iter().map(|t| t.id().to_string()));
                BatchStatusEntry::new(batch_id, BatchStatus::Committed)
            }
            Err(e) => invalid(&batch_id, &batch_id, e.to_string()),
        }
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(batch_id: &str, txn_id: &str, message: String) -> BatchStatusEntry {
    BatchStatusEntry {
        id: batch_id.to_string(),
        status: BatchStatus::Invalid,
        invalid_transactions: vec![InvalidTransaction {
            id: txn_id.to_string(),
            message,
            extended_data: None,
        }],
    }
}

fn unavailable(e: impl std::fmt::Display) -> ClientError {
    ClientError::Gateway {
        status: 503,
        message: e.to_string(),
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn state(&self, address: &Address) -> Result<StateResponse> {
        match self.state.get(address).map_err(unavailable)? {
            Some(bytes) => Ok(StateResponse::from_bytes(&bytes)),
            None => Err(ClientError::NotFound(address.to_string())),
        }
    }

    async fn submit_batches(&self, batch_list: Vec<u8>) -> Result<SubmitResponse> {
        let list = decode_batch_list(&batch_list).map_err(|e| ClientError::Gateway {
            status: 400,
            message: e.to_string(),
        })?;
        if list.batches.is_empty() {
            return Err(ClientError::Gateway {
                status: 400,
                message: "no batches submitted".into(),
            });
        }

        let mut ledger = self.ledger.lock().await;
        let mut fresh = HashSet::new();
        for batch in &list.batches {
            if ledger.statuses.contains_key(batch.id()) || !fresh.insert(batch.id()) {
                return Err(ClientError::Gateway {
                    status: 400,
                    message: format!("duplicate batch {}", batch.id()),
                });
            }
        }

        let mut ids = Vec::with_capacity(list.batches.len());
        for batch in list.batches {
            let id = batch.id().to_string();
            let entry = if ledger.holding {
                ledger.held.push(batch);
                BatchStatusEntry::new(id.clone(), BatchStatus::Pending)
            } else {
                self.apply_batch(&batch, &mut ledger)
            };
            ledger.statuses.insert(id.clone(), entry);
            ids.push(id);
        }

        Ok(SubmitResponse {
            link: format!("{LINK_BASE}/batch_statuses?id={}", ids.join(",")),
        })
    }

    async fn batch_status(&self, batch_id: &str, _wait: Duration) -> Result<BatchStatusResponse> {
        let ledger = self.ledger.lock().await;
        let entry = ledger
            .statuses
            .get(batch_id)
            .cloned()
            .unwrap_or_else(|| BatchStatusEntry::new(batch_id, BatchStatus::Unknown));
        Ok(BatchStatusResponse {
            data: vec![entry],
            link: None,
        })
    }
}
