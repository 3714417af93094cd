//! Envelopes: signed transactions and the batches that carry them.
//!
//! A transaction is a canonical header, a signature over those header bytes,
//! and the raw payload. A batch wraps one or more transactions under a second
//! signed header listing their ids in execution order. The batch is the unit
//! the network accepts or rejects as a whole.

use bytes::Bytes;
use prost::Message;

use crate::address::{address_for, FAMILY_NAME, FAMILY_VERSION};
use crate::canonical::{decode_batch_header, decode_transaction_header, encode};
use crate::crypto::{Sha512Hash, Signer};
use crate::error::{CoreError, Result};
use crate::nonce::NonceSource;
use crate::payload::Action;

/// Transaction header, in wire form.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct TransactionHeader {
    /// Public key of the batch signer.
    #[prost(string, tag = "1")]
    pub batcher_public_key: String,
    /// Ids of transactions that must commit first.
    #[prost(string, repeated, tag = "2")]
    pub dependencies: Vec<String>,
    /// Transaction family name.
    #[prost(string, tag = "3")]
    pub family_name: String,
    /// Transaction family version.
    #[prost(string, tag = "4")]
    pub family_version: String,
    /// Addresses the transaction may read.
    #[prost(string, repeated, tag = "5")]
    pub inputs: Vec<String>,
    /// Per-transaction uniqueness token.
    #[prost(string, tag = "6")]
    pub nonce: String,
    /// Addresses the transaction may write.
    #[prost(string, repeated, tag = "7")]
    pub outputs: Vec<String>,
    /// SHA-512 of the payload, hex.
    #[prost(string, tag = "9")]
    pub payload_sha512: String,
    /// Public key of the transaction signer.
    #[prost(string, tag = "10")]
    pub signer_public_key: String,
}

/// A signed transaction.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Transaction {
    /// Canonical header bytes (what was signed).
    #[prost(bytes = "bytes", tag = "1")]
    pub header: Bytes,
    /// Hex signature over `header`; doubles as the transaction id.
    #[prost(string, tag = "2")]
    pub header_signature: String,
    /// Raw payload bytes.
    #[prost(bytes = "bytes", tag = "3")]
    pub payload: Bytes,
}

impl Transaction {
    /// The transaction id.
    pub fn id(&self) -> &str {
        &self.header_signature
    }

    /// Decode the header bytes.
    pub fn decode_header(&self) -> Result<TransactionHeader> {
        decode_transaction_header(&self.header)
    }
}

/// Batch header, in wire form.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct BatchHeader {
    /// Public key of the batch signer.
    #[prost(string, tag = "1")]
    pub signer_public_key: String,
    /// Ids of the contained transactions, in execution order.
    #[prost(string, repeated, tag = "2")]
    pub transaction_ids: Vec<String>,
}

/// A signed batch of transactions.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Batch {
    /// Canonical header bytes (what was signed).
    #[prost(bytes = "bytes", tag = "1")]
    pub header: Bytes,
    /// Hex signature over `header`; doubles as the batch id.
    #[prost(string, tag = "2")]
    pub header_signature: String,
    /// The transactions, in the order listed by the header.
    #[prost(message, repeated, tag = "3")]
    pub transactions: Vec<Transaction>,
    /// Ask the validator to log this batch's progress.
    #[prost(bool, tag = "4")]
    pub trace: bool,
}

impl Batch {
    /// The batch id.
    pub fn id(&self) -> &str {
        &self.header_signature
    }

    /// Decode the header bytes.
    pub fn decode_header(&self) -> Result<BatchHeader> {
        decode_batch_header(&self.header)
    }
}

/// The body posted to the gateway.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct BatchList {
    #[prost(message, repeated, tag = "1")]
    pub batches: Vec<Batch>,
}

impl BatchList {
    /// Wrap a single batch.
    pub fn single(batch: Batch) -> Self {
        Self {
            batches: vec![batch],
        }
    }

    /// Encode to the wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(self)
    }
}

/// Builder for signed transactions.
pub struct TransactionBuilder {
    payload: Bytes,
    nonce: String,
    family_name: String,
    family_version: String,
    batcher: Option<String>,
    dependencies: Vec<String>,
}

impl TransactionBuilder {
    /// Start building a transaction for an action.
    pub fn new(action: Action, nonce: impl Into<String>) -> Self {
        Self {
            payload: Bytes::from(action.encode()),
            nonce: nonce.into(),
            family_name: FAMILY_NAME.to_string(),
            family_version: FAMILY_VERSION.to_string(),
            batcher: None,
            dependencies: Vec::new(),
        }
    }

    /// Use a batcher other than the transaction signer.
    pub fn batcher(mut self, batcher_public_key: impl Into<String>) -> Self {
        self.batcher = Some(batcher_public_key.into());
        self
    }

    /// Require another transaction to commit first.
    pub fn depends_on(mut self, transaction_id: impl Into<String>) -> Self {
        self.dependencies.push(transaction_id.into());
        self
    }

    /// Override the family version.
    pub fn family_version(mut self, version: impl Into<String>) -> Self {
        self.family_version = version.into();
        self
    }

    /// Build the header and sign it.
    ///
    /// Inputs and outputs both declare exactly the signer's jar address.
    pub fn sign(self, signer: &dyn Signer) -> Result<Transaction> {
        let identity = signer.public_key().to_hex();
        let address = address_for(&identity).as_str().to_string();

        let header = TransactionHeader {
            batcher_public_key: self.batcher.unwrap_or_else(|| identity.clone()),
            dependencies: self.dependencies,
            family_name: self.family_name,
            family_version: self.family_version,
            inputs: vec![address.clone()],
            nonce: self.nonce,
            outputs: vec![address],
            payload_sha512: Sha512Hash::hash(&self.payload).to_hex(),
            signer_public_key: identity,
        };

        let header_bytes = encode(&header);
        let signature = signer.sign(&header_bytes)?;

        Ok(Transaction {
            header: Bytes::from(header_bytes),
            header_signature: signature.to_hex(),
            payload: self.payload,
        })
    }
}

/// Builder for signed batches.
pub struct BatchBuilder {
    transactions: Vec<Transaction>,
    trace: bool,
}

impl BatchBuilder {
    /// Start an empty batch.
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            trace: false,
        }
    }

    /// Append a transaction. Order of calls is execution order.
    pub fn add(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }

    /// Append several transactions, preserving their order.
    pub fn extend(mut self, transactions: impl IntoIterator<Item = Transaction>) -> Self {
        self.transactions.extend(transactions);
        self
    }

    /// Request validator tracing for this batch.
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Build the header over the transaction ids and sign it.
    pub fn sign(self, signer: &dyn Signer) -> Result<Batch> {
        if self.transactions.is_empty() {
            return Err(CoreError::EncodingError(
                "a batch needs at least one transaction".into(),
            ));
        }

        let header = BatchHeader {
            signer_public_key: signer.public_key().to_hex(),
            transaction_ids: self
                .transactions
                .iter()
                .map(|t| t.header_signature.clone())
                .collect(),
        };

        let header_bytes = encode(&header);
        let signature = signer.sign(&header_bytes)?;

        Ok(Batch {
            header: Bytes::from(header_bytes),
            header_signature: signature.to_hex(),
            transactions: self.transactions,
            trace: self.trace,
        })
    }
}

impl Default for BatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a signed transaction for `action` with a fresh nonce.
pub fn build_transaction(
    action: Action,
    signer: &dyn Signer,
    nonces: &dyn NonceSource,
) -> Result<Transaction> {
    TransactionBuilder::new(action, nonces.next_nonce()).sign(signer)
}

/// Build a signed batch over `transactions`, keeping their order.
pub fn build_batch(transactions: Vec<Transaction>, signer: &dyn Signer) -> Result<Batch> {
    BatchBuilder::new().extend(transactions).sign(signer)
}
