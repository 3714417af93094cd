//! Cryptographic primitives for the cookie-jar family.
//!
//! Wraps SHA-512 hashing and secp256k1 ECDSA signing with strong types.
//! Signatures are deterministic (RFC 6979) over SHA-256 of the message and
//! serialized as 64-byte compact `r || s`. Public keys are 33-byte
//! compressed SEC1 points.

use k256::ecdsa::signature::{Signer as _, Verifier as _};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use sha2::{Digest, Sha512};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// A 64-byte SHA-512 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha512Hash(pub [u8; 64]);

impl Sha512Hash {
    /// Compute the SHA-512 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        let digest = Sha512::digest(data);
        let mut arr = [0u8; 64];
        arr.copy_from_slice(&digest);
        Self(arr)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to lowercase hex string (128 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha512Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha512({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Sha512Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Lowercase hex SHA-512 digest of a string.
pub fn hexdigest(data: &str) -> String {
    Sha512Hash::hash(data.as_bytes()).to_hex()
}

/// A 33-byte compressed secp256k1 public key.
///
/// The hex form of this key is the actor's identity on the network.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 33]);

impl PublicKey {
    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string. The point must lie on the curve.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| CoreError::InvalidPublicKey)?;
        let key = VerifyingKey::from_sec1_bytes(&bytes).map_err(|_| CoreError::InvalidPublicKey)?;
        Ok(Self::from_verifying_key(&key))
    }

    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(true);
        let mut arr = [0u8; 33];
        arr.copy_from_slice(point.as_bytes());
        Self(arr)
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        let sig =
            EcdsaSignature::from_slice(&signature.0).map_err(|_| CoreError::InvalidSignature)?;

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// A 64-byte compact ECDSA signature (`r || s`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string. Header signatures double as transaction and
    /// batch ids in this form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| CoreError::InvalidSignature)?;
        let arr: [u8; 64] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::InvalidSignature)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The signing capability used to seal envelopes.
///
/// Implementations must be safe to call concurrently with distinct inputs.
pub trait Signer: Send + Sync {
    /// The public key whose hex form identifies the signer.
    fn public_key(&self) -> PublicKey;

    /// Sign a message.
    fn sign(&self, message: &[u8]) -> Result<Signature>;
}

impl<S: Signer + ?Sized> Signer for std::sync::Arc<S> {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, message: &[u8]) -> Result<Signature> {
        (**self).sign(message)
    }
}

/// A secp256k1 keypair.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        Self { signing_key }
    }

    /// Create from a 32-byte secret scalar.
    pub fn from_secret(secret: &[u8; 32]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(secret)
            .map_err(|e| CoreError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// Parse a hex-encoded secret key, ignoring surrounding whitespace.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes =
            hex::decode(s.trim()).map_err(|e| CoreError::InvalidPrivateKey(e.to_string()))?;
        let secret: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::InvalidPrivateKey("expected 32 bytes".into()))?;
        Self::from_secret(&secret)
    }

    /// Hex-encoded secret key (the key-file format).
    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }
}

impl Signer for Keypair {
    fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    fn sign(&self, message: &[u8]) -> Result<Signature> {
        let sig: EcdsaSignature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| CoreError::SigningError(e.to_string()))?;
        let mut arr = [0u8; 64];
        arr.copy_from_slice(&sig.to_bytes());
        Ok(Signature(arr))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}
