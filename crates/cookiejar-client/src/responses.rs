//! Gateway response schemas.
//!
//! Bodies are decoded into these types directly; anything that does not fit
//! is a [`ClientError::Decode`].

use std::fmt;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Body of `GET /state/{address}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResponse {
    /// Base64-encoded state bytes.
    pub data: String,
    /// State root the read was served from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl StateResponse {
    /// Wrap raw state bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            head: None,
            link: None,
        }
    }

    /// The raw state bytes.
    pub fn decode_data(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| ClientError::Decode(format!("state data is not base64: {e}")))
    }
}

/// Body of `POST /batches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Where the batch status can be queried.
    pub link: String,
}

/// Lifecycle status of a submitted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BatchStatus {
    Pending,
    Committed,
    Invalid,
    Unknown,
}

impl BatchStatus {
    /// Whether no further change is expected.
    pub fn is_terminal(self) -> bool {
        !matches!(self, BatchStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BatchStatus::Pending => "PENDING",
            BatchStatus::Committed => "COMMITTED",
            BatchStatus::Invalid => "INVALID",
            BatchStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a transaction in an invalid batch was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidTransaction {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_data: Option<String>,
}

/// Status of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatusEntry {
    pub id: String,
    pub status: BatchStatus,
    #[serde(default)]
    pub invalid_transactions: Vec<InvalidTransaction>,
}

impl BatchStatusEntry {
    /// Create an entry with no rejection details.
    pub fn new(id: impl Into<String>, status: BatchStatus) -> Self {
        Self {
            id: id.into(),
            status,
            invalid_transactions: Vec::new(),
        }
    }

    /// The first rejection message, if any.
    pub fn rejection(&self) -> Option<&str> {
        self.invalid_transactions
            .first()
            .map(|t| t.message.as_str())
    }
}

/// Body of `GET /batch_statuses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatusResponse {
    pub data: Vec<BatchStatusEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl BatchStatusResponse {
    /// The first result element, which answers a single-id query.
    pub fn into_first(self) -> Result<BatchStatusEntry> {
        self.data
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Decode("batch status response has no results".into()))
    }
}

/// Body of a gateway error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

/// Decode a JSON body into `T`.
pub fn decode_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}
