use bytes::Bytes;
use frag_index::UpsertOutcome;
use frag_types::{Digest, DocumentId, Timestamp, DEFAULT_MIME};
use serde::Serialize;

/// A document submitted for writing: its id, MIME type, and chunks in order.
///
/// Chunks are raw bytes; any transport encoding has already been removed.
#[derive(Clone, Debug)]
pub struct WriteRequest {
    pub doc_id: DocumentId,
    pub mime: Option<String>,
    pub chunks: Vec<Bytes>,
}

impl WriteRequest {
    pub fn new(doc_id: DocumentId, chunks: Vec<Bytes>) -> Self {
        Self {
            doc_id,
            mime: None,
            chunks,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// The MIME type to record, falling back to `text/plain`.
    pub fn effective_mime(&self) -> &str {
        self.mime.as_deref().unwrap_or(DEFAULT_MIME)
    }
}

/// Acknowledgement of a completed write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WriteReceipt {
    pub doc_id: DocumentId,
    pub outcome: UpsertOutcome,
    pub fragments: Vec<Digest>,
    pub full_digest: Digest,
    /// Distinct chunks put to the store by this write.
    pub chunks_written: usize,
    /// Distinct chunks the store already held.
    pub chunks_skipped: usize,
    pub total_bytes: u64,
}

/// A reassembled document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub mime: String,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub full_digest: Digest,
    pub bytes: Bytes,
}

impl Document {
    /// The content as UTF-8 text.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
