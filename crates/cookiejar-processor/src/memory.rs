//! In-memory state and scoped contexts.
//!
//! This stands in for the ledger's replicated store in tests and in the
//! in-process gateway. Writes made through a [`ScopedContext`] are buffered
//! and only reach the shared [`MemoryState`] on [`ScopedContext::commit`],
//! so a failed batch leaves state untouched.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use cookiejar_core::Address;

use crate::context::{Context, Event};
use crate::error::ContextError;

type ContextResult<T> = std::result::Result<T, ContextError>;

/// Shared key-value state. Thread-safe via RwLock.
pub struct MemoryState {
    entries: RwLock<BTreeMap<Address, Vec<u8>>>,
}

impl MemoryState {
    /// Create empty state.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Read one entry.
    pub fn get(&self, address: &Address) -> ContextResult<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(address).cloned())
    }

    /// Write one entry directly, bypassing any scope.
    pub fn insert(&self, address: Address, value: Vec<u8>) -> ContextResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(address, value);
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> ContextResult<usize> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.len())
    }

    /// Whether state holds no entries.
    pub fn is_empty(&self) -> ContextResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Open a scope with nothing declared yet.
    pub fn scope(&self) -> ScopedContext<'_> {
        ScopedContext {
            state: self,
            inputs: Vec::new(),
            outputs: Vec::new(),
            writes: BTreeMap::new(),
            events: Vec::new(),
        }
    }
}

impl Default for MemoryState {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> ContextError {
    ContextError::Unavailable("state lock poisoned".into())
}

/// A write-buffering view over [`MemoryState`].
///
/// The declared input and output sets may be changed between transactions
/// with [`ScopedContext::declare`]; buffered writes carry over, which lets
/// several transactions of one batch see each other's effects before the
/// batch commits. Declarations are address prefixes; a full address is the
/// narrowest possible prefix.
pub struct ScopedContext<'a> {
    state: &'a MemoryState,
    inputs: Vec<String>,
    outputs: Vec<String>,
    writes: BTreeMap<Address, Vec<u8>>,
    events: Vec<Event>,
}

impl<'a> ScopedContext<'a> {
    /// Set the declared inputs and outputs for the next transaction.
    pub fn declare(&mut self, inputs: &[String], outputs: &[String]) {
        self.inputs = inputs.to_vec();
        self.outputs = outputs.to_vec();
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Flush buffered writes to state and return the emitted events.
    pub fn commit(self) -> ContextResult<Vec<Event>> {
        let mut entries = self.state.entries.write().map_err(|_| poisoned())?;
        entries.extend(self.writes);
        Ok(self.events)
    }

    fn permitted(declared: &[String], address: &Address) -> bool {
        declared.iter().any(|p| address.as_str().starts_with(p.as_str()))
    }
}

impl Context for ScopedContext<'_> {
    fn get_state(&self, addresses: &[Address]) -> ContextResult<HashMap<Address, Vec<u8>>> {
        let mut found = HashMap::with_capacity(addresses.len());
        for address in addresses {
            if !Self::permitted(&self.inputs, address) {
                return Err(ContextError::AuthorizationFailed {
                    address: address.clone(),
                    access: "read",
                });
            }
            let value = match self.writes.get(address) {
                Some(v) => Some(v.clone()),
                None => self.state.get(address)?,
            };
            if let Some(v) = value {
                found.insert(address.clone(), v);
            }
        }
        Ok(found)
    }

    fn set_state(&mut self, entries: HashMap<Address, Vec<u8>>) -> ContextResult<Vec<Address>> {
        if let Some(address) = entries
            .keys()
            .find(|a| !Self::permitted(&self.outputs, a))
        {
            return Err(ContextError::AuthorizationFailed {
                address: address.clone(),
                access: "write",
            });
        }

        let mut written: Vec<Address> = entries.keys().cloned().collect();
        written.sort();
        self.writes.extend(entries);
        Ok(written)
    }

    fn add_event(&mut self, event: Event) -> ContextResult<()> {
        self.events.push(event);
        Ok(())
    }
}
