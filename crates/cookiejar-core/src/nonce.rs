//! Nonce sources for transaction headers.
//!
//! A nonce must differ for every transaction a client builds, otherwise two
//! identical actions would produce identical headers and collide on id.
//! Sources are injected into the client and shared across tasks, so they
//! carry no seed state that callers could race on.

use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};

/// A thread-safe source of per-transaction nonces.
pub trait NonceSource: Send + Sync {
    /// Produce the next nonce.
    fn next_nonce(&self) -> String;
}

/// 128 random bits per call from the OS-seeded thread RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNonce;

impl NonceSource for RandomNonce {
    fn next_nonce(&self) -> String {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// A per-instance random prefix followed by a strictly increasing counter.
///
/// The prefix keeps two instances (or two runs) from colliding; the counter
/// makes nonces from one instance totally ordered.
#[derive(Debug)]
pub struct SequenceNonce {
    prefix: String,
    counter: AtomicU64,
}

impl SequenceNonce {
    /// Create a sequence with a fresh random prefix.
    pub fn new() -> Self {
        let mut bytes = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::with_prefix(hex::encode(bytes))
    }

    /// Create a sequence with a fixed prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SequenceNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceSource for SequenceNonce {
    fn next_nonce(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:016x}", self.prefix, n)
    }
}
