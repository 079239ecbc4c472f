use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use frag_crypto::{ContentHasher, StreamingDigest};
use frag_index::{DocumentIndex, DocumentRecord};
use frag_store::{ChunkStore, StoreError};
use frag_types::{ChunkKey, Digest, DocumentId};
use futures_util::{stream, StreamExt, TryStreamExt};
use tracing::{debug, error};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::request::Document;

/// Look up a document row and reassemble its chunks in fragment order.
pub struct ReadPipeline {
    chunks: Arc<dyn ChunkStore>,
    index: Arc<dyn DocumentIndex>,
    config: PipelineConfig,
}

impl ReadPipeline {
    pub fn new(chunks: Arc<dyn ChunkStore>, index: Arc<dyn DocumentIndex>) -> Self {
        Self {
            chunks,
            index,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// The index row for a document, without touching the chunk store.
    pub async fn stat(&self, id: &DocumentId) -> PipelineResult<DocumentRecord> {
        self.index
            .fetch(id)
            .await?
            .ok_or_else(|| PipelineError::DocumentNotFound(id.clone()))
    }

    /// Read a document.
    ///
    /// Chunk fetches run concurrently but are yielded in fragment order, so
    /// the concatenation is exactly the bytes that were written. A fragment
    /// missing from the store fails the read; there is no partial result.
    pub async fn read(&self, id: &DocumentId) -> PipelineResult<Document> {
        let record = self.stat(id).await?;

        let parts: Vec<Bytes> = stream::iter(record.fragments.iter().copied())
            .map(|digest| self.fetch_chunk(&record.id, digest))
            .buffered(self.config.effective_concurrency())
            .try_collect()
            .await?;

        if self.config.verify_reads {
            verify(&record, &parts)?;
        }

        let total: usize = parts.iter().map(Bytes::len).sum();
        let mut buf = BytesMut::with_capacity(total);
        for part in &parts {
            buf.extend_from_slice(part);
        }

        debug!(doc_id = %record.id, chunks = parts.len(), bytes = total, "document read");

        Ok(Document {
            id: record.id,
            mime: record.mime,
            created: record.created,
            updated: record.updated,
            full_digest: record.full_digest,
            bytes: buf.freeze(),
        })
    }

    async fn fetch_chunk(&self, doc_id: &DocumentId, digest: Digest) -> PipelineResult<Bytes> {
        let key = ChunkKey::for_digest(&digest);
        match self.chunks.get(&key).await {
            Ok(data) => Ok(data),
            Err(StoreError::NotFound(_)) => {
                error!(doc_id = %doc_id, %key, "indexed chunk missing from store");
                Err(PipelineError::MissingChunk {
                    doc_id: doc_id.clone(),
                    digest,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Check every chunk against its fragment digest and the whole document
/// against the full digest.
fn verify(record: &DocumentRecord, parts: &[Bytes]) -> PipelineResult<()> {
    let mut full = StreamingDigest::new();
    for (i, (expected, data)) in record.fragments.iter().zip(parts).enumerate() {
        if !ContentHasher::verify(data, expected) {
            error!(doc_id = %record.id, fragment = i, digest = %expected, "chunk digest mismatch");
            return Err(PipelineError::Integrity {
                doc_id: record.id.clone(),
                reason: format!("fragment {i} does not hash to {expected}"),
            });
        }
        full.update(data);
    }
    let actual = full.finalize();
    if actual != record.full_digest {
        error!(doc_id = %record.id, expected = %record.full_digest, %actual, "full digest mismatch");
        return Err(PipelineError::Integrity {
            doc_id: record.id.clone(),
            reason: format!(
                "reassembled content hashes to {actual}, expected {}",
                record.full_digest
            ),
        });
    }
    Ok(())
}

impl std::fmt::Debug for ReadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
