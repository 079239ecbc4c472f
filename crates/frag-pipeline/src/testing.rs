//! Fault-injecting backends for pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use frag_index::{
    DocumentIndex, DocumentRecord, DocumentUpsert, IndexError, IndexResult,
    InMemoryDocumentIndex, UpsertOutcome,
};
use frag_store::{ChunkStore, InMemoryChunkStore, StoreError, StoreOp, StoreResult};
use frag_types::{ChunkKey, DocumentId};

pub(crate) fn doc(id: &str) -> DocumentId {
    DocumentId::new(id).unwrap()
}

/// Which chunk store call fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fault {
    Exists,
    Put,
    Get,
}

/// Wraps an in-memory store and fails every call of one kind.
pub(crate) struct FlakyChunkStore {
    inner: Arc<InMemoryChunkStore>,
    fault: Fault,
}

impl FlakyChunkStore {
    pub(crate) fn new(inner: Arc<InMemoryChunkStore>, fault: Fault) -> Self {
        Self { inner, fault }
    }

    fn injected(op: StoreOp, key: &ChunkKey) -> StoreError {
        StoreError::Backend {
            op,
            key: key.clone(),
            message: "injected fault".into(),
        }
    }
}

#[async_trait]
impl ChunkStore for FlakyChunkStore {
    async fn exists(&self, key: &ChunkKey) -> StoreResult<bool> {
        if self.fault == Fault::Exists {
            return Err(Self::injected(StoreOp::Exists, key));
        }
        self.inner.exists(key).await
    }

    async fn put(&self, key: &ChunkKey, data: Bytes) -> StoreResult<()> {
        if self.fault == Fault::Put {
            return Err(Self::injected(StoreOp::Put, key));
        }
        self.inner.put(key, data).await
    }

    async fn get(&self, key: &ChunkKey) -> StoreResult<Bytes> {
        if self.fault == Fault::Get {
            return Err(StoreError::Timeout {
                op: StoreOp::Get,
                key: key.clone(),
                after: Duration::from_secs(1),
            });
        }
        self.inner.get(key).await
    }
}

/// Wraps an in-memory index and times out the first `n` upserts.
pub(crate) struct FlakyIndex {
    inner: InMemoryDocumentIndex,
    remaining_failures: AtomicUsize,
}

impl FlakyIndex {
    pub(crate) fn failing_first(n: usize) -> Self {
        Self {
            inner: InMemoryDocumentIndex::new(),
            remaining_failures: AtomicUsize::new(n),
        }
    }

    pub(crate) fn inner(&self) -> &InMemoryDocumentIndex {
        &self.inner
    }
}

#[async_trait]
impl DocumentIndex for FlakyIndex {
    async fn upsert(&self, doc: &DocumentUpsert) -> IndexResult<UpsertOutcome> {
        let failed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(IndexError::Timeout {
                op: "upsert",
                after: Duration::from_secs(1),
            });
        }
        self.inner.upsert(doc).await
    }

    async fn fetch(&self, id: &DocumentId) -> IndexResult<Option<DocumentRecord>> {
        self.inner.fetch(id).await
    }
}
