use serde::{Deserialize, Serialize};

/// Tuning and input limits shared by the write and read pipelines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Reject any chunk larger than this many bytes. Unbounded when unset.
    pub max_chunk_bytes: Option<usize>,
    /// Reject writes with more chunks than this. Unbounded when unset.
    pub max_chunks: Option<usize>,
    /// Chunk store calls kept in flight per request.
    pub concurrency: usize,
    /// Re-digest chunks and the reassembled document on read.
    pub verify_reads: bool,
}

impl PipelineConfig {
    /// In-flight limit, never zero.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chunk_bytes: None,
            max_chunks: None,
            concurrency: 8,
            verify_reads: true,
        }
    }
}
