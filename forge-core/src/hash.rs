//! Content-addressed object hash.
//!
//! An [`ObjectHash`] is the sole identity of a blob in the object store: the
//! lowercase hexadecimal SHA-256 digest of its bytes.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Lowercase hex SHA-256 digest, 64 characters, `[0-9a-f]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectHash(String);

impl ObjectHash {
    /// Computes the hash of `bytes`.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        Self(hex::encode(digest))
    }

    /// Validates and wraps an already-computed hex digest.
    ///
    /// # Errors
    /// Returns [`CoreError::Invalid`] if `s` is not 64 lowercase hex characters.
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()) {
            Ok(Self(s))
        } else {
            Err(CoreError::Invalid { reason: format!("not a valid object hash: {s:?}") })
        }
    }

    /// Returns the hash as a `&str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectHash {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<ObjectHash> for String {
    fn from(h: ObjectHash) -> Self {
        h.0
    }
}

impl fmt::Display for ObjectHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimal local hex encoder to avoid an extra dependency for a one-liner.
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        use std::fmt::Write as _;
        let mut out = String::with_capacity(bytes.as_ref().len() * 2);
        for byte in bytes.as_ref() {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_empty_matches_known_sha256() {
        let hash = ObjectHash::of(b"");
        assert_eq!(
            hash.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn of_is_deterministic() {
        assert_eq!(ObjectHash::of(b"hello"), ObjectHash::of(b"hello"));
        assert_ne!(ObjectHash::of(b"hello"), ObjectHash::of(b"world"));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(ObjectHash::parse("abc").is_err());
    }

    #[test]
    fn parse_rejects_uppercase() {
        let upper = "A".repeat(64);
        assert!(ObjectHash::parse(upper).is_err());
    }

    #[test]
    fn parse_accepts_valid_hex() {
        let hash = ObjectHash::of(b"hello");
        assert!(ObjectHash::parse(hash.as_str().to_owned()).is_ok());
    }

    #[test]
    fn display_round_trips_through_json() {
        let hash = ObjectHash::of(b"round-trip");
        let json = serde_json::to_string(&hash).expect("serialize");
        let back: ObjectHash = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(hash, back);
    }
}
