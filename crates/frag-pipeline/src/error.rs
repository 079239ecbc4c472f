use frag_types::{Digest, DocumentId, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request was rejected before touching any backend.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// The index references a chunk the chunk store does not hold.
    #[error("document {doc_id} references missing chunk {digest}")]
    MissingChunk { doc_id: DocumentId, digest: Digest },

    /// Retrieved bytes do not hash to the digest they were stored under.
    #[error("integrity violation in {doc_id}: {reason}")]
    Integrity { doc_id: DocumentId, reason: String },

    #[error("chunk store error: {0}")]
    ChunkStore(#[from] frag_store::StoreError),

    #[error("index error: {0}")]
    Index(#[from] frag_index::IndexError),
}

impl PipelineError {
    /// Returns `true` when the failure is a backend call that ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ChunkStore(frag_store::StoreError::Timeout { .. })
                | Self::Index(frag_index::IndexError::Timeout { .. })
        )
    }
}

impl From<TypeError> for PipelineError {
    fn from(e: TypeError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
