//! Command-line configuration: environment names and key-file loading.

use std::path::{Path, PathBuf};

use tracing::debug;

use cookiejar_core::Keypair;

use crate::error::{CookieJarError, Result};

/// Gateway URL.
pub const ENV_URL: &str = "COOKIEJAR_URL";
/// Private key file.
pub const ENV_KEY_FILE: &str = "COOKIEJAR_KEY_FILE";
/// Confirmation deadline in seconds.
pub const ENV_TIMEOUT: &str = "COOKIEJAR_TIMEOUT";

/// Name of the default key.
pub const KEY_NAME: &str = "mycookiejar";

/// Default confirmation deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// `<home>/.sawtooth/keys/mycookiejar.priv`
pub fn key_file_in(home: &Path) -> PathBuf {
    home.join(".sawtooth")
        .join("keys")
        .join(format!("{KEY_NAME}.priv"))
}

/// The key file to use: the explicit one, or the default under `$HOME`.
pub fn resolve_key_file(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| key_file_in(Path::new(&home)))
        .ok_or(CookieJarError::NoKeyFile)
}

/// Load a hex-encoded secp256k1 private key. Surrounding whitespace is ignored.
pub fn load_keypair(path: &Path) -> Result<Keypair> {
    let text = std::fs::read_to_string(path).map_err(|source| CookieJarError::KeyFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded key file");
    Keypair::from_hex(text.trim()).map_err(|source| CookieJarError::InvalidKey {
        path: path.to_path_buf(),
        source,
    })
}
