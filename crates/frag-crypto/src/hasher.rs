use frag_types::Digest;
use sha2::{Digest as _, Sha256};

/// One-shot SHA-256 content hasher.
///
/// Pure and infallible: the same bytes always yield the same [`Digest`].
pub struct ContentHasher;

impl ContentHasher {
    /// Digest a byte sequence.
    pub fn digest(data: &[u8]) -> Digest {
        Digest::from_hash(Sha256::digest(data).into())
    }

    /// Verify that data produces the expected digest.
    pub fn verify(data: &[u8], expected: &Digest) -> bool {
        Self::digest(data) == *expected
    }
}

/// Incremental digest over a sequence of byte slices.
///
/// Feeding slices `a`, `b`, `c` produces exactly `digest(a ++ b ++ c)`; slice
/// boundaries do not affect the result. Used to digest a whole document from
/// its chunks without materialising the concatenation.
#[derive(Clone, Default)]
pub struct StreamingDigest {
    inner: Sha256,
    len: u64,
}

impl StreamingDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
        self.len += data.len() as u64;
    }

    /// Total bytes fed so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn finalize(self) -> Digest {
        Digest::from_hash(self.inner.finalize().into())
    }
}

impl std::fmt::Debug for StreamingDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingDigest")
            .field("len", &self.len)
            .finish()
    }
}
