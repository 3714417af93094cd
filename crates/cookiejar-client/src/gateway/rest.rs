//! REST gateway over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use tracing::debug;

use cookiejar_core::Address;

use super::Gateway;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::responses::{
    decode_json, BatchStatusResponse, ErrorResponse, StateResponse, SubmitResponse,
};

/// A gateway reached over HTTP.
#[derive(Debug, Clone)]
pub struct RestGateway {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl RestGateway {
    /// Create a gateway client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url()?,
            request_timeout: config.request_timeout,
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<Vec<u8>> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            return Err(ClientError::Gateway {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }
        Ok(body.to_vec())
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

/// Best-effort message from an error body.
fn error_message(body: &[u8], status: StatusCode) -> String {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(e) if !e.error.message.is_empty() => e.error.message,
        Ok(e) if !e.error.title.is_empty() => e.error.title,
        _ => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    }
}

#[async_trait]
impl Gateway for RestGateway {
    async fn state(&self, address: &Address) -> Result<StateResponse> {
        let url = format!("{}/state/{}", self.base_url, address);
        debug!(%url, "reading state");
        let body = self
            .send(self.http.get(&url).timeout(self.request_timeout), address.as_str())
            .await?;
        decode_json(&body)
    }

    async fn submit_batches(&self, batch_list: Vec<u8>) -> Result<SubmitResponse> {
        let url = format!("{}/batches", self.base_url);
        debug!(%url, bytes = batch_list.len(), "submitting batches");
        let request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(batch_list)
            .timeout(self.request_timeout);
        let body = self.send(request, "batches").await?;
        decode_json(&body)
    }

    async fn batch_status(&self, batch_id: &str, wait: Duration) -> Result<BatchStatusResponse> {
        let url = format!("{}/batch_statuses", self.base_url);
        let wait_secs = wait.as_secs().to_string();
        let mut request = self
            .http
            .get(&url)
            .query(&[("id", batch_id), ("wait", wait_secs.as_str())]);
        // A zero timeout would fail every request; the caller's deadline bounds it instead.
        if !wait.is_zero() {
            request = request.timeout(wait);
        }
        let body = self.send(request, batch_id).await?;
        decode_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_body() {
        let body = br#"{"error": {"code": 34, "title": "Submitted Batches Invalid", "message": "bad header"}}"#;
        assert_eq!(error_message(body, StatusCode::BAD_REQUEST), "bad header");
        assert_eq!(
            error_message(b"<html>", StatusCode::SERVICE_UNAVAILABLE),
            "Service Unavailable"
        );
    }

    #[test]
    fn test_base_url_normalised() {
        let gateway = RestGateway::new(&ClientConfig::default().with_url("rest-api:8008/")).unwrap();
        assert_eq!(gateway.base_url(), "http://rest-api:8008");
    }
}
