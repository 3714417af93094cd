//! Golden test vectors for deterministic verification.
//!
//! Addresses and payload hashes must be identical across every client and
//! processor implementation of the family, or reads will miss and payloads
//! will be rejected.

use cookiejar_core::{address_for, hexdigest, namespace_prefix, Action};

/// The namespace prefix of the `cookiejar` family.
pub const NAMESPACE_PREFIX: &str = "a4d219";

/// An identity and the address its jar lives at.
#[derive(Debug, Clone)]
pub struct AddressVector {
    pub identity: &'static str,
    pub address: &'static str,
}

/// An action, its payload bytes, and the payload's SHA-512.
#[derive(Debug, Clone)]
pub struct PayloadVector {
    pub action: Action,
    pub payload: &'static str,
    /// Expected `payload_sha512`; empty when only the encoding is pinned.
    pub sha512: &'static str,
}

/// Get all address vectors.
pub fn address_vectors() -> Vec<AddressVector> {
    vec![
        AddressVector {
            identity: "alice",
            address: "a4d219408b27d3097eea5a46bf2ab6433a7234a33d5e49957b13ec7acc2ca08e1a13c7",
        },
        AddressVector {
            identity: "bob",
            address: "a4d2190416a26ba554334286b1954918ecad7ba6c33575b49df915ff3367b5cef7ecd9",
        },
        AddressVector {
            identity: "",
            address: "a4d219cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce",
        },
        AddressVector {
            identity: "02aabb",
            address: "a4d2197abd16c35442171d08fd8977af697de91f1cc3031df55117fcb9aadfc1f3fb3d",
        },
    ]
}

/// Get all payload vectors.
pub fn payload_vectors() -> Vec<PayloadVector> {
    vec![
        PayloadVector {
            action: Action::Bake(5),
            payload: "bake,5",
            sha512: "1fb27bb2b5e3ec57e2f02b346d3e47ea928e79d7001cf6062479c28bf4b716645d7d0339da8f27b5597aa13508a9c3333e40397d21ab8140043c91de8b17a5a3",
        },
        PayloadVector {
            action: Action::Eat(20),
            payload: "eat,20",
            sha512: "",
        },
        PayloadVector {
            action: Action::Clear,
            payload: "clear",
            sha512: "",
        },
    ]
}

/// Check every vector against the implementation.
pub fn verify_all_vectors() -> Result<(), String> {
    if namespace_prefix() != NAMESPACE_PREFIX {
        return Err(format!(
            "namespace prefix: expected {NAMESPACE_PREFIX}, got {}",
            namespace_prefix()
        ));
    }

    for vector in address_vectors() {
        let got = address_for(vector.identity);
        if got.as_str() != vector.address {
            return Err(format!(
                "address for {:?}: expected {}, got {}",
                vector.identity, vector.address, got
            ));
        }
    }

    for vector in payload_vectors() {
        let encoded = vector.action.encode();
        if encoded != vector.payload.as_bytes() {
            return Err(format!(
                "{}: expected payload {:?}, got {:?}",
                vector.action,
                vector.payload,
                String::from_utf8_lossy(&encoded)
            ));
        }
        if !vector.sha512.is_empty() && hexdigest(vector.payload) != vector.sha512 {
            return Err(format!("{}: payload hash mismatch", vector.action));
        }
    }

    Ok(())
}

/// Decode a hex vector field.
pub fn decode_hex(field: &str) -> Vec<u8> {
    hex::decode(field).expect("vector fields are valid hex")
}
