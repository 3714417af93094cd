//! # Cookie Jar Core
//!
//! Pure primitives for the cookie-jar transaction family: addresses,
//! payloads, keys, and signed transaction/batch envelopes.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Address`] - Deterministic storage key for an identity's jar
//! - [`Action`] - `bake`, `eat` or `clear`, with its amount
//! - [`Transaction`] / [`Batch`] - Signed envelopes in wire form
//! - [`Signer`] - The signing capability, implemented by [`Keypair`]
//! - [`NonceSource`] - Injectable per-transaction nonce generator
//!
//! ## Canonicalization
//!
//! Envelopes are `prost` messages, encoded with the proto3 wire rules so
//! that signatures verify on the network side. See the [`canonical`] module.

pub mod address;
pub mod canonical;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod nonce;
pub mod payload;
pub mod validation;

pub use address::{address_for, namespace_prefix, Address, FAMILY_NAME, FAMILY_VERSION};
pub use crypto::{hexdigest, Keypair, PublicKey, Sha512Hash, Signature, Signer};
pub use envelope::{
    build_batch, build_transaction, Batch, BatchBuilder, BatchHeader, BatchList, Transaction,
    TransactionBuilder, TransactionHeader,
};
pub use error::{CoreError, Result, ValidationError};
pub use nonce::{NonceSource, RandomNonce, SequenceNonce};
pub use payload::{Action, CookieCount};
pub use validation::{validate_batch, validate_transaction};
