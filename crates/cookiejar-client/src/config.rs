//! Client configuration.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default gateway URL.
pub const DEFAULT_URL: &str = "http://localhost:8008";

/// Configuration for the submission client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Gateway base URL.
    pub url: String,
    /// Deadline for a batch to reach a terminal status.
    pub wait_timeout: Duration,
    /// Pause between status queries that report `PENDING`.
    pub poll_interval: Duration,
    /// Transport timeout for state reads and submissions.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            wait_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Use a different gateway URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Use a different confirmation deadline.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Use a different poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The gateway URL with a scheme and without a trailing slash.
    pub fn base_url(&self) -> Result<String> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ClientError::InvalidConfig("empty gateway url".into()));
        }
        let url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{url}")
        };
        Ok(url.trim_end_matches('/').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url().unwrap(), "http://localhost:8008");
        assert_eq!(config.wait_timeout, Duration::from_secs(10));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_scheme_added() {
        let config = ClientConfig::default().with_url("rest-api:8008/");
        assert_eq!(config.base_url().unwrap(), "http://rest-api:8008");

        let config = ClientConfig::default().with_url("https://ledger.example");
        assert_eq!(config.base_url().unwrap(), "https://ledger.example");
    }

    #[test]
    fn test_empty_url_rejected() {
        let config = ClientConfig::default().with_url("  ");
        assert!(matches!(
            config.base_url(),
            Err(ClientError::InvalidConfig(_))
        ));
    }
}
