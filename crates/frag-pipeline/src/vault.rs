use std::sync::Arc;

use frag_index::{DocumentIndex, DocumentRecord};
use frag_store::ChunkStore;
use frag_types::{Clock, DocumentId, SystemClock};

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::read::ReadPipeline;
use crate::request::{Document, WriteReceipt, WriteRequest};
use crate::write::WritePipeline;

/// A chunk store and a document index wired together.
///
/// This is the handle applications hold. It owns both pipelines and shares
/// the backends between them.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use bytes::Bytes;
/// use frag_index::InMemoryDocumentIndex;
/// use frag_pipeline::{ChunkVault, DocumentId, WriteRequest};
/// use frag_store::InMemoryChunkStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let vault = ChunkVault::new(
///     Arc::new(InMemoryChunkStore::new()),
///     Arc::new(InMemoryDocumentIndex::new()),
/// );
/// let id = DocumentId::new("greeting")?;
/// vault
///     .write(WriteRequest::new(id.clone(), vec![Bytes::from_static(b"hi")]))
///     .await?;
/// assert_eq!(vault.read(&id).await?.text()?, "hi");
/// # Ok(())
/// # }
/// ```
pub struct ChunkVault {
    chunks: Arc<dyn ChunkStore>,
    index: Arc<dyn DocumentIndex>,
    clock: Arc<dyn Clock>,
    config: PipelineConfig,
    writer: WritePipeline,
    reader: ReadPipeline,
}

impl ChunkVault {
    pub fn new(chunks: Arc<dyn ChunkStore>, index: Arc<dyn DocumentIndex>) -> Self {
        Self::assemble(chunks, index, Arc::new(SystemClock), PipelineConfig::default())
    }

    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self::assemble(self.chunks, self.index, clock, self.config)
    }

    pub fn with_config(self, config: PipelineConfig) -> Self {
        Self::assemble(self.chunks, self.index, self.clock, config)
    }

    fn assemble(
        chunks: Arc<dyn ChunkStore>,
        index: Arc<dyn DocumentIndex>,
        clock: Arc<dyn Clock>,
        config: PipelineConfig,
    ) -> Self {
        let writer = WritePipeline::new(Arc::clone(&chunks), Arc::clone(&index))
            .with_clock(Arc::clone(&clock))
            .with_config(config.clone());
        let reader =
            ReadPipeline::new(Arc::clone(&chunks), Arc::clone(&index)).with_config(config.clone());
        Self {
            chunks,
            index,
            clock,
            config,
            writer,
            reader,
        }
    }

    pub async fn write(&self, request: WriteRequest) -> PipelineResult<WriteReceipt> {
        self.writer.write(request).await
    }

    pub async fn read(&self, id: &DocumentId) -> PipelineResult<Document> {
        self.reader.read(id).await
    }

    /// Document metadata without fetching any chunk.
    pub async fn stat(&self, id: &DocumentId) -> PipelineResult<DocumentRecord> {
        self.reader.stat(id).await
    }

    /// Check that the index backend answers.
    pub async fn ping(&self) -> PipelineResult<()> {
        self.index.ping().await?;
        Ok(())
    }

    pub fn chunks(&self) -> &Arc<dyn ChunkStore> {
        &self.chunks
    }

    pub fn index(&self) -> &Arc<dyn DocumentIndex> {
        &self.index
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl std::fmt::Debug for ChunkVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkVault")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
