use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::Digest;
use crate::error::TypeError;

/// Namespace prefix under which all chunk blobs live.
pub const CHUNK_PREFIX: &str = "chunks";

/// Blob-store key for a chunk.
///
/// The key is a pure function of the chunk digest:
/// `chunks/{h[0:2]}/{h[2:4]}/{h}` where `h` is the lowercase hex digest. The
/// two hex-prefix levels bound directory fan-out on backends that behave
/// poorly with large flat namespaces. No index is ever needed to locate a
/// chunk; equal bytes always map to the same key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    path: String,
    digest: Digest,
}

impl ChunkKey {
    /// Derive the key for a chunk digest.
    pub fn for_digest(digest: &Digest) -> Self {
        let h = digest.to_hex();
        Self {
            path: format!("{CHUNK_PREFIX}/{}/{}/{h}", &h[0..2], &h[2..4]),
            digest: *digest,
        }
    }

    /// Parse a key string, checking that its shard prefixes agree with the
    /// embedded digest.
    pub fn parse(key: &str) -> Result<Self, TypeError> {
        let invalid = || TypeError::InvalidChunkKey(key.to_string());
        let mut parts = key.split('/');
        let (prefix, shard1, shard2, hex) = match (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) {
            (Some(p), Some(a), Some(b), Some(h), None) => (p, a, b, h),
            _ => return Err(invalid()),
        };
        if prefix != CHUNK_PREFIX {
            return Err(invalid());
        }
        let digest = Digest::from_hex(hex).map_err(|_| invalid())?;
        if shard1 != &hex[0..2] || shard2 != &hex[2..4] {
            return Err(invalid());
        }
        Ok(Self::for_digest(&digest))
    }

    /// The digest this key was derived from.
    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// The key as a `/`-separated path string.
    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl From<&Digest> for ChunkKey {
    fn from(digest: &Digest) -> Self {
        Self::for_digest(digest)
    }
}

impl AsRef<str> for ChunkKey {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkKey({})", self.path)
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl Serialize for ChunkKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path)
    }
}

impl<'de> Deserialize<'de> for ChunkKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
