//! # Cookie Jar Client
//!
//! Submission client for the cookie-jar transaction family.
//!
//! ## Overview
//!
//! The client derives the caller's jar address, builds and signs a
//! transaction and its batch, submits the batch through a [`Gateway`], and
//! polls for a terminal status under a deadline.
//!
//! ## Key Properties
//!
//! - **Bounded**: `await_status` resolves exactly once, with the first
//!   terminal status, the first query error, or a timeout
//! - **No retries**: errors surface directly; only `PENDING` is re-polled
//! - **Typed responses**: gateway bodies decode into explicit schemas
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cookiejar_client::{ClientConfig, CookieJarClient};
//! use cookiejar_core::Keypair;
//!
//! async fn example() -> cookiejar_client::Result<()> {
//!     let keypair = Keypair::generate();
//!     let client = CookieJarClient::connect(keypair, ClientConfig::default())?;
//!
//!     let outcome = client.bake(5).await?;
//!     println!("{}", outcome.status);
//!     println!("{}", client.count().await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Status Flow
//!
//! ```text
//! Client                              Gateway
//!   |-------- POST /batches ---------->|
//!   |<------- { link } ----------------|
//!   |-------- GET /batch_statuses ---->|
//!   |<------- PENDING -----------------|
//!   |          ... poll_interval ...   |
//!   |-------- GET /batch_statuses ---->|
//!   |<------- COMMITTED | INVALID -----|
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod responses;

pub use client::{CookieJarClient, SubmissionReceipt};
pub use config::{ClientConfig, DEFAULT_URL};
pub use error::{ClientError, Result};
pub use gateway::{memory::MemoryGateway, rest::RestGateway, Gateway};
pub use responses::{
    BatchStatus, BatchStatusEntry, BatchStatusResponse, InvalidTransaction, StateResponse,
    SubmitResponse,
};
