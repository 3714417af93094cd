//! # Cookie Jar
//!
//! A transaction family for a permissioned ledger: each identity owns a jar
//! holding a cookie count, and can bake into it, eat from it, or clear it.
//!
//! ## Overview
//!
//! - **Client**: derives the jar address, signs a transaction and batch,
//!   submits it, and waits for a terminal status under a deadline
//! - **Processor**: applies bake / eat / clear deterministically against
//!   ledger state and emits events
//! - **CLI**: the `cookiejar` binary, a thin layer over the client
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cookiejar::{ClientConfig, CookieJarClient, Keypair};
//!
//! async fn example() {
//!     let keypair = Keypair::generate();
//!     let client = CookieJarClient::connect(keypair, ClientConfig::default()).unwrap();
//!
//!     client.bake(5).await.unwrap();
//!     client.eat(2).await.unwrap();
//!     assert_eq!(client.count().await.unwrap().0, 3);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `cookiejar::core` - Addresses, payloads, keys, envelopes
//! - `cookiejar::processor` - Handler and runtime contract
//! - `cookiejar::client` - Gateways and the submission client

pub mod commands;
pub mod config;
pub mod error;

pub use cookiejar_client as client;
pub use cookiejar_core as core;
pub use cookiejar_processor as processor;

pub use commands::{execute, Command};
pub use error::{CookieJarError, Result};

pub use cookiejar_client::{
    BatchStatus, BatchStatusEntry, ClientConfig, ClientError, CookieJarClient, Gateway,
    MemoryGateway, RestGateway, SubmissionReceipt,
};
pub use cookiejar_core::{address_for, namespace_prefix, Action, Address, CookieCount, Keypair};
pub use cookiejar_processor::{CookieJarHandler, TransactionProcessor};
