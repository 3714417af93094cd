//! Gateway abstraction.
//!
//! The gateway is the ledger network's front door: state reads, batch
//! submission and batch status queries. [`rest::RestGateway`] talks to a real
//! REST API; [`memory::MemoryGateway`] runs the cookie-jar processor in
//! process.

use std::time::Duration;

use async_trait::async_trait;

use cookiejar_core::Address;

use crate::error::Result;
use crate::responses::{BatchStatusResponse, StateResponse, SubmitResponse};

pub mod memory;
pub mod rest;

/// The gateway operations the client needs.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Read the state entry at `address`.
    ///
    /// Returns [`ClientError::NotFound`](crate::ClientError::NotFound) if the
    /// address has never been written.
    async fn state(&self, address: &Address) -> Result<StateResponse>;

    /// Submit an encoded `BatchList`.
    async fn submit_batches(&self, batch_list: Vec<u8>) -> Result<SubmitResponse>;

    /// Query the status of one batch, letting the gateway hold the request
    /// for up to `wait` while the batch is pending.
    async fn batch_status(&self, batch_id: &str, wait: Duration) -> Result<BatchStatusResponse>;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for std::sync::Arc<G> {
    async fn state(&self, address: &Address) -> Result<StateResponse> {
        (**self).state(address).await
    }

    async fn submit_batches(&self, batch_list: Vec<u8>) -> Result<SubmitResponse> {
        (**self).submit_batches(batch_list).await
    }

    async fn batch_status(&self, batch_id: &str, wait: Duration) -> Result<BatchStatusResponse> {
        (**self).batch_status(batch_id, wait).await
    }
}
