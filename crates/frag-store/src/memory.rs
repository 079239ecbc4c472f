use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use frag_types::ChunkKey;

use crate::error::{StoreError, StoreResult};
use crate::traits::ChunkStore;

/// In-memory, HashMap-based chunk store.
///
/// Intended for tests and embedding. Blobs are held behind a `RwLock`; `Bytes`
/// makes reads a reference-count bump rather than a copy. The store also
/// counts puts so callers can observe how often a blob was (re)written.
pub struct InMemoryChunkStore {
    blobs: RwLock<HashMap<ChunkKey, Bytes>>,
    puts: AtomicU64,
}

impl InMemoryChunkStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            puts: AtomicU64::new(0),
        }
    }

    /// Number of distinct blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|b| b.len() as u64)
            .sum()
    }

    /// Number of successful `put` calls, including overwrites.
    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::SeqCst)
    }

    /// Return a sorted list of all keys in the store.
    pub fn keys(&self) -> Vec<ChunkKey> {
        let map = self.blobs.read().expect("lock poisoned");
        let mut keys: Vec<ChunkKey> = map.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Direct lookup without going through the async trait.
    pub fn blob(&self, key: &ChunkKey) -> Option<Bytes> {
        self.blobs.read().expect("lock poisoned").get(key).cloned()
    }

    /// Drop a blob. Simulates a backend that lost data; chunk deletion is not
    /// part of the store's contract.
    pub fn evict(&self, key: &ChunkKey) -> bool {
        self.blobs
            .write()
            .expect("lock poisoned")
            .remove(key)
            .is_some()
    }

    /// Replace a blob's bytes without counting a put. Simulates on-disk
    /// corruption.
    pub fn tamper(&self, key: &ChunkKey, data: Bytes) {
        self.blobs
            .write()
            .expect("lock poisoned")
            .insert(key.clone(), data);
    }
}

impl Default for InMemoryChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn exists(&self, key: &ChunkKey) -> StoreResult<bool> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.contains_key(key))
    }

    async fn put(&self, key: &ChunkKey, data: Bytes) -> StoreResult<()> {
        let mut map = self.blobs.write().expect("lock poisoned");
        // Full overwrite, like an object store PUT.
        map.insert(key.clone(), data);
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, key: &ChunkKey) -> StoreResult<Bytes> {
        let map = self.blobs.read().expect("lock poisoned");
        map.get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }
}

impl std::fmt::Debug for InMemoryChunkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryChunkStore")
            .field("blob_count", &self.len())
            .field("put_count", &self.put_count())
            .finish()
    }
}
