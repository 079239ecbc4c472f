use async_trait::async_trait;
use bytes::Bytes;
use frag_types::ChunkKey;

use crate::error::StoreResult;

/// Content-addressed chunk store.
///
/// All implementations must satisfy these invariants:
/// - A key always names the same bytes; `put` of an existing key carries
///   identical content and may overwrite.
/// - `exists` never transfers the body.
/// - `get` of an unknown key fails with [`StoreError::NotFound`], distinct
///   from backend failures.
/// - Concurrent calls are always safe.
///
/// [`StoreError::NotFound`]: crate::StoreError::NotFound
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Probe whether a chunk is present.
    ///
    /// Returns `Ok(false)` only for genuine absence. Backend failures are
    /// returned as `Err`; whether to treat them as absence is the caller's
    /// policy.
    async fn exists(&self, key: &ChunkKey) -> StoreResult<bool>;

    /// Write the chunk body under `key`. Durable once this returns `Ok`.
    async fn put(&self, key: &ChunkKey, data: Bytes) -> StoreResult<()>;

    /// Read a previously written chunk.
    async fn get(&self, key: &ChunkKey) -> StoreResult<Bytes>;
}
