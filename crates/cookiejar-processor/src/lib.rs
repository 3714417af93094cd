//! # Cookie Jar Processor
//!
//! The deterministic state handler for the `cookiejar` transaction family and
//! the runtime contract it is driven through.
//!
//! ## Key Types
//!
//! - [`TransactionHandler`] - What a family handler implements
//! - [`Context`] - Scoped state access handed to a handler
//! - [`CookieJarHandler`] - bake / eat / clear against a signer's jar
//! - [`TransactionProcessor`] - Routes transactions to handlers
//! - [`MemoryState`] - In-memory state for tests and the local devnet
//!
//! ## Usage
//!
//! ```rust
//! use cookiejar_core::{Action, Keypair, TransactionBuilder};
//! use cookiejar_processor::{CookieJarHandler, MemoryState, TransactionProcessor};
//!
//! let mut processor = TransactionProcessor::new();
//! processor.add_handler(CookieJarHandler::new());
//!
//! let keypair = Keypair::generate();
//! let txn = TransactionBuilder::new(Action::Bake(3), "nonce").sign(&keypair).unwrap();
//! let header = txn.decode_header().unwrap();
//!
//! let state = MemoryState::new();
//! let mut ctx = state.scope();
//! ctx.declare(&header.inputs, &header.outputs);
//! assert!(processor.process(&txn, &mut ctx).is_ok());
//! ctx.commit().unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Deterministic**: the handler reads only the signer's jar, and its
//!   result depends only on the payload, the signer, and prior state
//! - **Fail before read**: payloads are parsed before any state access
//! - **Error classes**: submitter faults are invalid transactions, state
//!   access failures are internal errors

pub mod context;
pub mod error;
pub mod handler;
pub mod memory;
pub mod processor;

pub use context::{Context, Event, TpProcessRequest, TransactionHandler};
pub use error::{ApplyError, ContextError, Result};
pub use handler::CookieJarHandler;
pub use memory::{MemoryState, ScopedContext};
pub use processor::{TpProcessResponse, TpStatus, TransactionProcessor};
