use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Length of a digest in bytes (SHA-256).
pub const DIGEST_LEN: usize = 32;

/// Content digest of a byte sequence.
///
/// A `Digest` is the SHA-256 hash of a chunk or of a whole document. Identical
/// bytes always produce the same `Digest`, which is what makes chunks
/// deduplicatable. Digests are rendered and serialized as 64 lowercase hex
/// characters; this form is the one stored in the document index and used to
/// derive chunk keys.
///
/// Computing digests lives in `frag-crypto`; this type only carries them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Create a `Digest` from a pre-computed hash.
    pub const fn from_hash(hash: [u8; DIGEST_LEN]) -> Self {
        Self(hash)
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a lowercase hex string of exactly 64 characters.
    ///
    /// Uppercase input is rejected so that every digest has exactly one
    /// textual form (and therefore exactly one chunk key).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if let Some(bad) = s.chars().find(|c| c.is_ascii_uppercase()) {
            return Err(TypeError::InvalidHex(format!(
                "digest must be lowercase hex, found {bad:?}"
            )));
        }
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != DIGEST_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; DIGEST_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Digest {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_LEN] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Digest {
        let mut bytes = [0u8; DIGEST_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        Digest::from_hash(bytes)
    }

    #[test]
    fn hex_roundtrip() {
        let digest = sample();
        let hex = digest.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(Digest::from_hex(&hex).unwrap(), digest);
    }

    #[test]
    fn hex_is_lowercase() {
        let digest = Digest::from_hash([0xAB; DIGEST_LEN]);
        assert_eq!(digest.to_hex(), "ab".repeat(32));
    }

    #[test]
    fn uppercase_is_rejected() {
        let upper = "AB".repeat(32);
        assert!(matches!(
            Digest::from_hex(&upper),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = Digest::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn non_hex_is_rejected() {
        let bad = "zz".repeat(32);
        assert!(matches!(Digest::from_hex(&bad), Err(TypeError::InvalidHex(_))));
    }

    #[test]
    fn short_hex_is_8_chars() {
        assert_eq!(sample().short_hex(), "00010203");
    }

    #[test]
    fn display_is_full_hex() {
        let digest = sample();
        assert_eq!(format!("{digest}"), digest.to_hex());
    }

    #[test]
    fn serde_uses_hex_string() {
        let digest = sample();
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest.to_hex()));
        let parsed: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, digest);
    }

    #[test]
    fn serde_rejects_garbage() {
        assert!(serde_json::from_str::<Digest>("\"nope\"").is_err());
    }

    #[test]
    fn from_str_parses() {
        let digest = sample();
        let parsed: Digest = digest.to_hex().parse().unwrap();
        assert_eq!(parsed, digest);
    }
}
