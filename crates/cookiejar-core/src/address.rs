//! Address derivation for the cookie-jar namespace.
//!
//! An address is the 6-character namespace prefix (derived from the family
//! name) followed by the first 64 hex characters of SHA-512 of the identity.
//! Derivation is a pure function of its input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::crypto::hexdigest;
use crate::error::CoreError;

/// The transaction family name.
pub const FAMILY_NAME: &str = "cookiejar";

/// The transaction family version this crate speaks.
pub const FAMILY_VERSION: &str = "1.0";

/// Length of the namespace prefix in hex characters.
pub const PREFIX_LEN: usize = 6;

/// Total address length in hex characters.
pub const ADDRESS_LEN: usize = 70;

static NAMESPACE_PREFIX: OnceLock<String> = OnceLock::new();

/// The namespace prefix shared by every cookie-jar address.
///
/// Computed on first use, read-only afterwards.
pub fn namespace_prefix() -> &'static str {
    NAMESPACE_PREFIX.get_or_init(|| hexdigest(FAMILY_NAME)[..PREFIX_LEN].to_string())
}

/// Derive the storage address for an identity (public key hex).
pub fn address_for(identity: &str) -> Address {
    let hashed = hexdigest(identity);
    Address(format!("{}{}", namespace_prefix(), &hashed[..ADDRESS_LEN - PREFIX_LEN]))
}

/// A 70-character hex storage address.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Wrap an address string received from the network.
    ///
    /// Returns `None` unless the string is 70 lowercase hex characters.
    pub fn parse(s: &str) -> Option<Self> {
        let well_formed = s.len() == ADDRESS_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(s.to_string()))
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this address belongs to the cookie-jar namespace.
    pub fn in_namespace(&self) -> bool {
        self.0.starts_with(namespace_prefix())
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| CoreError::DecodingError(format!("not an address: '{s}'")))
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = self.0.get(..PREFIX_LEN);
        let tail = self.0.len().checked_sub(8).and_then(|i| self.0.get(i..));
        match (head, tail) {
            (Some(head), Some(tail)) if self.0.len() == ADDRESS_LEN => {
                write!(f, "Address({head}..{tail})")
            }
            _ => write!(f, "Address({:?})", self.0),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
