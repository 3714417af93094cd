//! Key-file loading for the command-line tool.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use cookiejar::config::{key_file_in, load_keypair, resolve_key_file};
use cookiejar::core::Signer;
use cookiejar::{CookieJarError, Keypair};

#[test]
fn test_loads_hex_key_with_whitespace() {
    let dir = TempDir::new().unwrap();
    let original = Keypair::from_secret(&[0x42; 32]).unwrap();
    let path = dir.path().join("mycookiejar.priv");
    fs::write(&path, format!("  {}\n", original.secret_hex())).unwrap();

    let loaded = load_keypair(&path).unwrap();
    assert_eq!(loaded.public_key(), original.public_key());
}

#[test]
fn test_missing_key_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.priv");
    assert!(matches!(
        load_keypair(&path),
        Err(CookieJarError::KeyFile { .. })
    ));
}

#[test]
fn test_garbage_key_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.priv");
    fs::write(&path, "not a key").unwrap();
    let err = load_keypair(&path).unwrap_err();
    assert!(matches!(err, CookieJarError::InvalidKey { .. }));
    assert!(err.to_string().contains("bad.priv"));
}

#[test]
fn test_default_location() {
    assert_eq!(
        key_file_in(Path::new("/home/baker")),
        PathBuf::from("/home/baker/.sawtooth/keys/mycookiejar.priv")
    );
}

#[test]
fn test_explicit_key_file_wins() {
    let explicit = PathBuf::from("/tmp/other.priv");
    assert_eq!(resolve_key_file(Some(explicit.clone())).unwrap(), explicit);
}
