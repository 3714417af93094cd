//! The runtime contract: what a handler is given and what it must provide.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use cookiejar_core::{Address, TransactionHeader};

use crate::error::{ContextError, Result};

/// A decoded transaction, as delivered to a handler.
#[derive(Debug, Clone)]
pub struct TpProcessRequest {
    /// The decoded transaction header.
    pub header: TransactionHeader,
    /// Raw payload bytes.
    pub payload: Bytes,
    /// The transaction id.
    pub signature: String,
}

/// A notification emitted by a handler and forwarded to the event bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event type, conventionally `<family>/<action>`.
    pub event_type: String,
    /// Named string attributes.
    pub attributes: BTreeMap<String, String>,
    /// Opaque extra data.
    pub data: Vec<u8>,
}

impl Event {
    /// Create an event with no attributes.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            attributes: BTreeMap::new(),
            data: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// State access for one transaction.
///
/// Reads and writes are limited to the transaction's declared addresses.
/// Reads observe the transaction's own earlier writes.
pub trait Context {
    /// Read the given addresses. Addresses with no entry are absent from the map.
    fn get_state(
        &self,
        addresses: &[Address],
    ) -> std::result::Result<HashMap<Address, Vec<u8>>, ContextError>;

    /// Write entries. Returns the addresses that were written.
    fn set_state(
        &mut self,
        entries: HashMap<Address, Vec<u8>>,
    ) -> std::result::Result<Vec<Address>, ContextError>;

    /// Emit an event.
    fn add_event(&mut self, event: Event) -> std::result::Result<(), ContextError>;
}

/// A transaction family handler, registered with a processor.
pub trait TransactionHandler: Send + Sync {
    /// The family this handler processes.
    fn family_name(&self) -> &str;

    /// The family versions this handler accepts.
    fn family_versions(&self) -> Vec<String>;

    /// The address prefixes this handler owns.
    fn namespaces(&self) -> Vec<String>;

    /// Apply one transaction against state.
    fn apply(&self, request: &TpProcessRequest, context: &mut dyn Context) -> Result<()>;
}
