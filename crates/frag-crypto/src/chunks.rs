use frag_types::Digest;

use crate::hasher::{ContentHasher, StreamingDigest};

/// Chunk size used by tooling that splits files before upload (128 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 131_072;

/// Per-chunk digests and the whole-document digest of an ordered chunk list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkDigests {
    /// One digest per chunk, in submitted order (the fragment list).
    pub fragments: Vec<Digest>,
    /// Digest of the concatenation of all chunks in order.
    pub full: Digest,
    /// Total document length in bytes.
    pub total_len: u64,
}

impl ChunkDigests {
    /// Digest every chunk and the concatenation in a single pass.
    ///
    /// The full digest is taken over the chunk bytes, never over the list of
    /// chunk digests.
    pub fn compute<B: AsRef<[u8]>>(chunks: &[B]) -> Self {
        let mut full = StreamingDigest::new();
        let fragments = chunks
            .iter()
            .map(|chunk| {
                let bytes = chunk.as_ref();
                full.update(bytes);
                ContentHasher::digest(bytes)
            })
            .collect();
        let total_len = full.len();
        Self {
            fragments,
            full: full.finalize(),
            total_len,
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
