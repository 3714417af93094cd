//! The cookie-jar handler: deterministic state transitions for bake, eat and clear.
//!
//! Each action touches exactly one address, derived from the transaction
//! signer, and reads it before writing. The handler keeps no state of its own
//! between calls.

use std::collections::HashMap;

use tracing::debug;

use cookiejar_core::{
    address_for, namespace_prefix, Action, Address, CookieCount, FAMILY_NAME, FAMILY_VERSION,
};

use crate::context::{Context, Event, TpProcessRequest, TransactionHandler};
use crate::error::{ApplyError, Result};

/// Handler for the `cookiejar` transaction family.
#[derive(Debug, Clone, Default)]
pub struct CookieJarHandler;

impl CookieJarHandler {
    /// Create a handler.
    pub fn new() -> Self {
        Self
    }

    /// Apply an already-decoded action on behalf of `signer`.
    pub fn apply_action(
        &self,
        action: Action,
        signer: &str,
        context: &mut dyn Context,
    ) -> Result<()> {
        let address = address_for(signer);
        debug!(%action, signer, address = %address, "applying cookie jar action");

        match action {
            Action::Bake(amount) => self.bake(context, &address, amount),
            Action::Eat(amount) => self.eat(context, &address, amount),
            Action::Clear => self.clear(context, &address),
        }
    }

    fn bake(&self, context: &mut dyn Context, address: &Address, amount: u64) -> Result<()> {
        let prior = load_count(context, address)?.unwrap_or_default();
        let count = prior
            .0
            .checked_add(amount)
            .ok_or_else(|| ApplyError::Validation("cookie count overflow".into()))?;

        store_count(context, address, CookieCount(count))?;

        context.add_event(
            Event::new(format!("{FAMILY_NAME}/bake")).attribute("cookies-baked", amount.to_string()),
        )?;
        Ok(())
    }

    fn eat(&self, context: &mut dyn Context, address: &Address, amount: u64) -> Result<()> {
        let prior = load_count(context, address)?
            .ok_or_else(|| ApplyError::Validation("no such jar".into()))?;

        if prior.0 < amount {
            debug!(have = prior.0, want = amount, "not enough cookies in the jar");
            return Err(ApplyError::Validation("insufficient cookies".into()));
        }

        let written = store_count(context, address, CookieCount(prior.0 - amount))?;
        if written.is_empty() {
            return Err(ApplyError::Internal("no addresses in set response".into()));
        }

        context.add_event(
            Event::new(format!("{FAMILY_NAME}/eat")).attribute("cookies-ate", amount.to_string()),
        )?;
        Ok(())
    }

    fn clear(&self, context: &mut dyn Context, address: &Address) -> Result<()> {
        if load_count(context, address)?.is_none() {
            return Err(ApplyError::Validation("no such jar".into()));
        }
        store_count(context, address, CookieCount(0))?;
        Ok(())
    }
}

/// Read the jar at `address`. A stored value that is not a count is corrupt state.
fn load_count(context: &dyn Context, address: &Address) -> Result<Option<CookieCount>> {
    let mut state = context.get_state(std::slice::from_ref(address))?;
    state
        .remove(address)
        .map(|bytes| {
            CookieCount::from_state_bytes(&bytes)
                .map_err(|e| ApplyError::Internal(format!("corrupt jar at {address}: {e}")))
        })
        .transpose()
}

fn store_count(
    context: &mut dyn Context,
    address: &Address,
    count: CookieCount,
) -> Result<Vec<Address>> {
    let entries = HashMap::from([(address.clone(), count.to_state_bytes())]);
    Ok(context.set_state(entries)?)
}

impl TransactionHandler for CookieJarHandler {
    fn family_name(&self) -> &str {
        FAMILY_NAME
    }

    fn family_versions(&self) -> Vec<String> {
        vec![FAMILY_VERSION.to_string()]
    }

    fn namespaces(&self) -> Vec<String> {
        vec![namespace_prefix().to_string()]
    }

    fn apply(&self, request: &TpProcessRequest, context: &mut dyn Context) -> Result<()> {
        // Parse before touching state.
        let action = Action::decode(&request.payload)?;
        self.apply_action(action, &request.header.signer_public_key, context)
    }
}
