//! The submission client: build, submit, and wait for a terminal status.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use cookiejar_core::{
    address_for, build_batch, build_transaction, Action, Batch, BatchList, CookieCount,
    NonceSource, RandomNonce, Signer,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::gateway::rest::RestGateway;
use crate::gateway::Gateway;
use crate::responses::BatchStatusEntry;

/// Deadline used when a timeout is too large to represent.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Acknowledgement of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// The batch id (its header signature).
    pub batch_id: String,
    /// Status link returned by the gateway.
    pub link: String,
}

/// Client for the cookie-jar family.
///
/// Each call derives a fresh nonce; concurrent calls for one identity are not
/// ordered with respect to each other. Callers that care about ordering must
/// serialize their submissions.
pub struct CookieJarClient<G: Gateway> {
    gateway: G,
    signer: Arc<dyn Signer>,
    nonces: Arc<dyn NonceSource>,
    config: ClientConfig,
}

impl CookieJarClient<RestGateway> {
    /// Connect to the REST gateway named in `config`.
    pub fn connect(signer: impl Signer + 'static, config: ClientConfig) -> Result<Self> {
        let gateway = RestGateway::new(&config)?;
        Ok(Self::new(gateway, signer, config))
    }
}

impl<G: Gateway> CookieJarClient<G> {
    /// Create a client over any gateway.
    pub fn new(gateway: G, signer: impl Signer + 'static, config: ClientConfig) -> Self {
        Self {
            gateway,
            signer: Arc::new(signer),
            nonces: Arc::new(RandomNonce),
            config,
        }
    }

    /// Replace the nonce source.
    pub fn with_nonce_source(mut self, nonces: impl NonceSource + 'static) -> Self {
        self.nonces = Arc::new(nonces);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The identity (hex public key) this client signs as.
    pub fn identity(&self) -> String {
        self.signer.public_key().to_hex()
    }

    /// Build one signed batch carrying `actions` in order.
    pub fn build(&self, actions: &[Action]) -> Result<Batch> {
        self.build_as(actions, self.signer.as_ref())
    }

    fn build_as(&self, actions: &[Action], signer: &dyn Signer) -> Result<Batch> {
        let transactions = actions
            .iter()
            .map(|action| build_transaction(*action, signer, self.nonces.as_ref()))
            .collect::<cookiejar_core::Result<Vec<_>>>()?;
        Ok(build_batch(transactions, signer)?)
    }

    /// Send a batch to the gateway.
    pub async fn submit(&self, batch: &Batch) -> Result<SubmissionReceipt> {
        let body = BatchList::single(batch.clone()).to_bytes();
        let ack = self.gateway.submit_batches(body).await?;
        info!(batch = %batch.id(), link = %ack.link, "batch submitted");
        Ok(SubmissionReceipt {
            batch_id: batch.id().to_string(),
            link: ack.link,
        })
    }

    /// Poll until the batch reaches a terminal status, a query fails, or
    /// `timeout` elapses, whichever happens first.
    pub async fn await_status(&self, batch_id: &str, timeout: Duration) -> Result<BatchStatusEntry> {
        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);

        tokio::select! {
            biased;
            result = self.poll_until_terminal(batch_id, deadline) => result,
            _ = tokio::time::sleep_until(deadline) => Err(timed_out(batch_id)),
        }
    }

    async fn poll_until_terminal(&self, batch_id: &str, deadline: Instant) -> Result<BatchStatusEntry> {
        let mut polls = 0u32;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out(batch_id));
            }

            polls += 1;
            let entry = self
                .gateway
                .batch_status(batch_id, remaining)
                .await?
                .into_first()?;
            if entry.status.is_terminal() {
                debug!(batch = %batch_id, status = %entry.status, polls, "batch resolved");
                return Ok(entry);
            }

            debug!(batch = %batch_id, polls, "batch pending");
            let remaining = deadline.saturating_duration_since(Instant::now());
            tokio::time::sleep(self.config.poll_interval.min(remaining)).await;
        }
    }

    /// Build, submit, and wait for one action signed by `signer`.
    pub async fn perform_as(
        &self,
        action: Action,
        signer: &dyn Signer,
        timeout: Duration,
    ) -> Result<BatchStatusEntry> {
        let batch = self.build_as(&[action], signer)?;
        let receipt = self.submit(&batch).await?;
        self.await_status(&receipt.batch_id, timeout).await
    }

    /// Build, submit, and wait for one action signed by this client.
    pub async fn perform(&self, action: Action, timeout: Duration) -> Result<BatchStatusEntry> {
        self.perform_as(action, self.signer.as_ref(), timeout).await
    }

    /// Read the cookie count stored for `identity`.
    pub async fn read_state(&self, identity: &str) -> Result<CookieCount> {
        let address = address_for(identity);
        debug!(identity, address = %address, "reading jar");
        let bytes = self.gateway.state(&address).await?.decode_data()?;
        CookieCount::from_state_bytes(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn bake(&self, amount: u64) -> Result<BatchStatusEntry> {
        self.perform(Action::Bake(amount), self.config.wait_timeout).await
    }

    pub async fn eat(&self, amount: u64) -> Result<BatchStatusEntry> {
        self.perform(Action::Eat(amount), self.config.wait_timeout).await
    }

    pub async fn clear(&self) -> Result<BatchStatusEntry> {
        self.perform(Action::Clear, self.config.wait_timeout).await
    }

    /// The cookie count in this client's own jar.
    pub async fn count(&self) -> Result<CookieCount> {
        self.read_state(&self.identity()).await
    }
}

fn timed_out(batch_id: &str) -> ClientError {
    ClientError::Timeout {
        batch_id: batch_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryGateway;
    use crate::responses::{BatchStatus, BatchStatusResponse, StateResponse, SubmitResponse};
    use async_trait::async_trait;
    use cookiejar_core::{Address, Keypair, SequenceNonce};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn client() -> CookieJarClient<Arc<MemoryGateway>> {
        let config = ClientConfig::default().with_poll_interval(Duration::from_millis(5));
        CookieJarClient::new(Arc::new(MemoryGateway::new()), Keypair::generate(), config)
            .with_nonce_source(SequenceNonce::new())
    }

    #[tokio::test]
    async fn test_perform_commits() {
        let client = client();
        let entry = client.bake(5).await.unwrap();
        assert_eq!(entry.status, BatchStatus::Committed);
        assert_eq!(client.count().await.unwrap(), CookieCount(5));
    }

    #[tokio::test]
    async fn test_rejected_action_reports_invalid() {
        let client = client();
        let entry = client.eat(1).await.unwrap();
        assert_eq!(entry.status, BatchStatus::Invalid);
        assert_eq!(entry.rejection(), Some("invalid transaction: no such jar"));
    }

    #[tokio::test]
    async fn test_zero_timeout_times_out() {
        let client = client();
        client.gateway().hold().await;
        let batch = client.build(&[Action::Bake(1)]).unwrap();
        let receipt = client.submit(&batch).await.unwrap();

        let err = client
            .await_status(&receipt.batch_id, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_pending_until_deadline() {
        let client = client();
        client.gateway().hold().await;
        let batch = client.build(&[Action::Bake(1)]).unwrap();
        let receipt = client.submit(&batch).await.unwrap();

        let started = Instant::now();
        let err = client
            .await_status(&receipt.batch_id, Duration::from_millis(60))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }));
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn test_resolves_after_release() {
        let client = client();
        let gateway = Arc::clone(client.gateway());
        gateway.hold().await;
        let batch = client.build(&[Action::Bake(2)]).unwrap();
        let receipt = client.submit(&batch).await.unwrap();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            gateway.release().await;
        });

        let entry = client
            .await_status(&receipt.batch_id, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(entry.status, BatchStatus::Committed);
    }

    #[tokio::test]
    async fn test_unknown_batch_is_terminal() {
        let client = client();
        let entry = client
            .await_status("never-submitted", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(entry.status, BatchStatus::Unknown);
    }

    #[tokio::test]
    async fn test_read_state_missing_jar() {
        let client = client();
        assert!(matches!(
            client.count().await,
            Err(ClientError::NotFound(_))
        ));
    }

    /// Answers PENDING a few times, then fails.
    struct Flaky {
        polls: AtomicU32,
    }

    #[async_trait]
    impl Gateway for Flaky {
        async fn state(&self, _address: &Address) -> Result<StateResponse> {
            Ok(StateResponse::from_bytes(b"seven"))
        }

        async fn submit_batches(&self, _batch_list: Vec<u8>) -> Result<SubmitResponse> {
            Ok(SubmitResponse { link: "flaky".into() })
        }

        async fn batch_status(&self, batch_id: &str, _wait: Duration) -> Result<BatchStatusResponse> {
            if self.polls.fetch_add(1, Ordering::SeqCst) < 3 {
                Ok(BatchStatusResponse {
                    data: vec![BatchStatusEntry::new(batch_id, BatchStatus::Pending)],
                    link: None,
                })
            } else {
                Err(ClientError::Gateway {
                    status: 503,
                    message: "unavailable".into(),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_query_error_propagates() {
        let flaky = Flaky {
            polls: AtomicU32::new(0),
        };
        let config = ClientConfig::default().with_poll_interval(Duration::from_millis(1));
        let client = CookieJarClient::new(flaky, Keypair::generate(), config);

        let err = client
            .await_status("b1", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Gateway { status: 503, .. }));
        assert_eq!(client.gateway().polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_corrupt_state_is_decode_error() {
        let flaky = Flaky {
            polls: AtomicU32::new(0),
        };
        let client = CookieJarClient::new(flaky, Keypair::generate(), ClientConfig::default());
        assert!(matches!(
            client.read_state("anyone").await,
            Err(ClientError::Decode(_))
        ));
    }
}
