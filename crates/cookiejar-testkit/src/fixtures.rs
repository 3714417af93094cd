//! Test fixtures and helpers.
//!
//! A fixture is one identity with a client wired to an in-memory devnet.
//! Several fixtures can share a devnet to act as independent parties.

use std::sync::Arc;
use std::time::Duration;

use cookiejar_client::{ClientConfig, CookieJarClient, MemoryGateway};
use cookiejar_core::{address_for, Address, Keypair, SequenceNonce, Signer};

/// Client configuration tuned for tests: fast polling, short deadline.
pub fn test_config() -> ClientConfig {
    ClientConfig::default()
        .with_url("memory://devnet")
        .with_wait_timeout(Duration::from_secs(2))
        .with_poll_interval(Duration::from_millis(5))
}

/// An identity, its client, and the devnet it talks to.
pub struct TestFixture {
    pub keypair: Keypair,
    pub gateway: Arc<MemoryGateway>,
    pub client: CookieJarClient<Arc<MemoryGateway>>,
}

impl TestFixture {
    /// Create a fixture with a random keypair on a fresh devnet.
    pub fn new() -> Self {
        Self::on(Arc::new(MemoryGateway::new()), Keypair::generate())
    }

    /// Create with a deterministic keypair. `seed` must be non-zero.
    pub fn with_seed(seed: u8) -> Self {
        Self::on(Arc::new(MemoryGateway::new()), seeded_keypair(seed))
    }

    /// Another party on the same devnet.
    pub fn join(&self, seed: u8) -> Self {
        Self::on(Arc::clone(&self.gateway), seeded_keypair(seed))
    }

    fn on(gateway: Arc<MemoryGateway>, keypair: Keypair) -> Self {
        let client = CookieJarClient::new(Arc::clone(&gateway), keypair.clone(), test_config())
            .with_nonce_source(SequenceNonce::new());
        Self {
            keypair,
            gateway,
            client,
        }
    }

    /// The hex public key this fixture signs as.
    pub fn identity(&self) -> String {
        self.keypair.public_key().to_hex()
    }

    /// This fixture's jar address.
    pub fn address(&self) -> Address {
        address_for(&self.identity())
    }

    /// The raw stored count, read straight from devnet state.
    pub fn stored_count(&self) -> Option<String> {
        self.gateway
            .state_store()
            .get(&self.address())
            .ok()
            .flatten()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A keypair whose secret is `seed` repeated.
pub fn seeded_keypair(seed: u8) -> Keypair {
    Keypair::from_secret(&[seed; 32]).expect("non-zero seed is a valid secret")
}

/// Create several parties sharing one devnet.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    let first = TestFixture::with_seed(1);
    let mut parties: Vec<TestFixture> = (1..count)
        .map(|i| first.join(i as u8 + 1))
        .collect();
    parties.insert(0, first);
    parties.truncate(count);
    parties
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookiejar_client::BatchStatus;

    #[tokio::test]
    async fn test_fixture_bake() {
        let fixture = TestFixture::new();
        assert_eq!(fixture.stored_count(), None);

        let entry = fixture.client.bake(3).await.unwrap();
        assert_eq!(entry.status, BatchStatus::Committed);
        assert_eq!(fixture.stored_count().as_deref(), Some("3"));
    }

    #[test]
    fn test_seeded_fixture_deterministic() {
        let a = TestFixture::with_seed(7);
        let b = TestFixture::with_seed(7);
        assert_eq!(a.identity(), b.identity());
        assert_eq!(a.address(), b.address());
    }

    #[tokio::test]
    async fn test_multi_party_jars_are_separate() {
        let parties = multi_party_fixtures(3);
        assert_eq!(parties.len(), 3);
        assert_ne!(parties[0].address(), parties[1].address());
        assert_ne!(parties[1].address(), parties[2].address());

        parties[0].client.bake(4).await.unwrap();
        parties[1].client.bake(9).await.unwrap();

        assert_eq!(parties[0].stored_count().as_deref(), Some("4"));
        assert_eq!(parties[1].stored_count().as_deref(), Some("9"));
        assert_eq!(parties[2].stored_count(), None);
        assert_eq!(parties[0].gateway.state_store().len().unwrap(), 2);
    }
}
