//! Error types for the command-line surface.

use std::path::PathBuf;

use cookiejar_client::{BatchStatus, ClientError};
use cookiejar_core::CoreError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CookieJarError {
    /// No key file was given and none could be located.
    #[error("no key file given and HOME is not set")]
    NoKeyFile,

    /// The key file could not be read.
    #[error("cannot read key file {}: {source}", .path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key file does not hold a usable private key.
    #[error("invalid private key in {}: {source}", .path.display())]
    InvalidKey {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    /// The batch reached a terminal status other than committed.
    #[error("batch {batch_id} {status}: {reason}")]
    NotCommitted {
        batch_id: String,
        status: BatchStatus,
        reason: String,
    },

    /// Client error.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, CookieJarError>;
