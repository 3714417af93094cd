//! Canonical protobuf encoding for envelopes.
//!
//! The envelope messages in [`crate::envelope`] are `prost` messages, so the
//! wire rules come from proto3:
//! - Fields written in ascending field-number order
//! - Default values (empty strings, empty bytes, `false`) omitted
//! - Repeated fields written element by element, in order
//!
//! Because signatures cover header bytes, the same header must always encode
//! to the same bytes. Decoders skip unknown fields and reject truncated or
//! mistyped input.

use prost::Message;

use crate::envelope::{Batch, BatchHeader, BatchList, Transaction, TransactionHeader};
use crate::error::{CoreError, Result};

/// Encode any envelope message.
pub fn encode<M: Message>(message: &M) -> Vec<u8> {
    message.encode_to_vec()
}

/// Decode any envelope message.
pub fn decode<M: Message + Default>(bytes: &[u8]) -> Result<M> {
    M::decode(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

/// Decode a transaction header.
pub fn decode_transaction_header(bytes: &[u8]) -> Result<TransactionHeader> {
    decode(bytes)
}

/// Decode a transaction.
pub fn decode_transaction(bytes: &[u8]) -> Result<Transaction> {
    decode(bytes)
}

/// Decode a batch header.
pub fn decode_batch_header(bytes: &[u8]) -> Result<BatchHeader> {
    decode(bytes)
}

/// Decode a batch.
pub fn decode_batch(bytes: &[u8]) -> Result<Batch> {
    decode(bytes)
}

/// Decode a batch list: the body posted to the gateway.
pub fn decode_batch_list(bytes: &[u8]) -> Result<BatchList> {
    decode(bytes)
}
