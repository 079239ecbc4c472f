use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use frag_crypto::ChunkDigests;
use frag_index::{DocumentIndex, DocumentUpsert};
use frag_store::ChunkStore;
use frag_types::{ChunkKey, Clock, SystemClock};
use futures_util::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::request::{WriteReceipt, WriteRequest};

/// What happened to one distinct chunk during a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkWrite {
    /// The probe found the chunk; nothing was written.
    Skipped,
    /// The chunk was put, either because it was absent or because the probe
    /// could not confirm it.
    Written,
}

/// Digest, deduplicate, persist, and index one document.
pub struct WritePipeline {
    chunks: Arc<dyn ChunkStore>,
    index: Arc<dyn DocumentIndex>,
    clock: Arc<dyn Clock>,
    config: PipelineConfig,
}

impl WritePipeline {
    pub fn new(chunks: Arc<dyn ChunkStore>, index: Arc<dyn DocumentIndex>) -> Self {
        Self {
            chunks,
            index,
            clock: Arc::new(SystemClock),
            config: PipelineConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Write a document.
    ///
    /// Steps, in order:
    /// 1. digest each chunk and the concatenation of all chunks;
    /// 2. for each distinct digest, probe the store and put if absent;
    /// 3. upsert the document row stamped with the current time.
    ///
    /// Any put or upsert failure aborts the write. Chunks already put stay
    /// put; they are content-addressed, so a retry re-probes and skips them.
    pub async fn write(&self, request: WriteRequest) -> PipelineResult<WriteReceipt> {
        self.validate(&request)?;

        let digests = ChunkDigests::compute(&request.chunks);

        // A chunk repeated within one document is probed and put once.
        let mut seen = HashSet::with_capacity(digests.len());
        let distinct: Vec<(ChunkKey, Bytes)> = digests
            .fragments
            .iter()
            .zip(&request.chunks)
            .filter(|(digest, _)| seen.insert(**digest))
            .map(|(digest, data)| (ChunkKey::for_digest(digest), data.clone()))
            .collect();

        let results: Vec<ChunkWrite> = stream::iter(distinct)
            .map(|(key, data)| self.persist_chunk(key, data))
            .buffer_unordered(self.config.effective_concurrency())
            .try_collect()
            .await?;
        let chunks_written = results.iter().filter(|r| **r == ChunkWrite::Written).count();
        let chunks_skipped = results.len() - chunks_written;

        let upsert = DocumentUpsert {
            id: request.doc_id.clone(),
            mime: request.effective_mime().to_string(),
            timestamp: self.clock.now(),
            fragments: digests.fragments,
            full_digest: digests.full,
        };
        let outcome = self.index.upsert(&upsert).await?;

        info!(
            doc_id = %upsert.id,
            %outcome,
            chunks = upsert.fragments.len(),
            written = chunks_written,
            skipped = chunks_skipped,
            bytes = digests.total_len,
            full_hash = %upsert.full_digest,
            "document written"
        );

        Ok(WriteReceipt {
            doc_id: upsert.id,
            outcome,
            fragments: upsert.fragments,
            full_digest: upsert.full_digest,
            chunks_written,
            chunks_skipped,
            total_bytes: digests.total_len,
        })
    }

    /// Probe-then-put for one chunk.
    ///
    /// The probe and put are not atomic. A failed probe counts as absence, so
    /// the chunk is rewritten with identical bytes.
    async fn persist_chunk(&self, key: ChunkKey, data: Bytes) -> PipelineResult<ChunkWrite> {
        match self.chunks.exists(&key).await {
            Ok(true) => {
                debug!(%key, "chunk already stored");
                return Ok(ChunkWrite::Skipped);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(%key, error = %e, "chunk probe failed; writing anyway");
            }
        }
        let len = data.len();
        self.chunks.put(&key, data).await?;
        debug!(%key, len, "chunk stored");
        Ok(ChunkWrite::Written)
    }

    fn validate(&self, request: &WriteRequest) -> PipelineResult<()> {
        if let Some(max) = self.config.max_chunks {
            if request.chunks.len() > max {
                return Err(PipelineError::InvalidInput(format!(
                    "{} chunks exceeds the limit of {max}",
                    request.chunks.len()
                )));
            }
        }
        for (i, chunk) in request.chunks.iter().enumerate() {
            if chunk.is_empty() {
                return Err(PipelineError::InvalidInput(format!("chunk {i} is empty")));
            }
            if let Some(max) = self.config.max_chunk_bytes {
                if chunk.len() > max {
                    return Err(PipelineError::InvalidInput(format!(
                        "chunk {i} is {} bytes, limit is {max}",
                        chunk.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for WritePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WritePipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
