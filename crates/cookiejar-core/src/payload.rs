//! Payload codec: the comma-separated action format carried in transactions.
//!
//! `bake,<n>` and `eat,<n>` carry a non-negative amount; `clear` carries none.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// An action against a cookie jar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Add cookies to the jar, creating it if needed.
    Bake(u64),
    /// Remove cookies from an existing jar.
    Eat(u64),
    /// Reset an existing jar to zero.
    Clear,
}

impl Action {
    /// The wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Bake(_) => "bake",
            Action::Eat(_) => "eat",
            Action::Clear => "clear",
        }
    }

    /// The amount carried by the action, if any.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Action::Bake(n) | Action::Eat(n) => Some(*n),
            Action::Clear => None,
        }
    }

    /// Encode to payload bytes.
    pub fn encode(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Decode payload bytes. Any deviation from the format is malformed.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| CoreError::MalformedPayload("payload is not UTF-8".into()))?;
        let fields: Vec<&str> = text.split(',').collect();

        match fields.as_slice() {
            ["bake", amount] => Ok(Action::Bake(parse_amount(amount)?)),
            ["eat", amount] => Ok(Action::Eat(parse_amount(amount)?)),
            ["clear"] => Ok(Action::Clear),
            [name @ ("bake" | "eat" | "clear"), ..] => Err(CoreError::MalformedPayload(format!(
                "wrong field count for {name}: {}",
                fields.len()
            ))),
            [name, ..] => Err(CoreError::MalformedPayload(format!(
                "invalid action: '{name}'"
            ))),
            [] => Err(CoreError::MalformedPayload("empty payload".into())),
        }
    }
}

fn parse_amount(field: &str) -> Result<u64> {
    if field.starts_with('-') {
        return Err(CoreError::MalformedPayload(format!(
            "negative amount: {field}"
        )));
    }
    // u64::from_str accepts a leading '+', which is not part of the format.
    if !field.bytes().all(|b| b.is_ascii_digit()) || field.is_empty() {
        return Err(CoreError::MalformedPayload(format!(
            "couldn't parse amount: '{field}'"
        )));
    }
    field
        .parse()
        .map_err(|e| CoreError::MalformedPayload(format!("couldn't parse amount: {e}")))
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.amount() {
            Some(n) => write!(f, "{},{}", self.name(), n),
            None => f.write_str(self.name()),
        }
    }
}

/// The value stored at a jar's address: a decimal cookie count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CookieCount(pub u64);

impl CookieCount {
    /// Encode as decimal state bytes.
    pub fn to_state_bytes(self) -> Vec<u8> {
        self.0.to_string().into_bytes()
    }

    /// Decode decimal state bytes.
    pub fn from_state_bytes(bytes: &[u8]) -> Result<Self> {
        std::str::from_utf8(bytes)
            .map_err(|_| CoreError::DecodingError("state entry is not UTF-8".into()))?
            .parse()
    }
}

impl fmt::Display for CookieCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CookieCount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::DecodingError(format!(
                "state entry is not a cookie count: '{s}'"
            )));
        }
        s.parse()
            .map(CookieCount)
            .map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(Action::Bake(5).encode(), b"bake,5");
        assert_eq!(Action::Eat(0).encode(), b"eat,0");
        assert_eq!(Action::Clear.encode(), b"clear");
    }

    #[test]
    fn test_decode_valid() {
        assert_eq!(Action::decode(b"bake,12").unwrap(), Action::Bake(12));
        assert_eq!(Action::decode(b"eat,3").unwrap(), Action::Eat(3));
        assert_eq!(Action::decode(b"clear").unwrap(), Action::Clear);
    }

    #[test]
    fn test_decode_malformed() {
        for bad in [
            &b"bake"[..],
            b"bake,1,2",
            b"bake,-1",
            b"bake,+1",
            b"bake,",
            b"eat,ten",
            b"clear,0",
            b"steal,3",
            b"",
            b"\xff\xfe",
        ] {
            assert!(
                matches!(Action::decode(bad), Err(CoreError::MalformedPayload(_))),
                "expected malformed: {:?}",
                String::from_utf8_lossy(bad)
            );
        }
    }

    #[test]
    fn test_cookie_count_state_bytes() {
        assert_eq!(CookieCount(8).to_state_bytes(), b"8");
        assert_eq!(CookieCount::from_state_bytes(b"42").unwrap(), CookieCount(42));
        assert!(CookieCount::from_state_bytes(b"-1").is_err());
        assert!(CookieCount::from_state_bytes(b"").is_err());
    }
}
