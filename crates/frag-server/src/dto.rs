//! JSON bodies exchanged over HTTP.

use frag_index::{DocumentRecord, UpsertOutcome};
use frag_pipeline::WriteReceipt;
use frag_types::{Digest, DocumentId, Timestamp};
use serde::{Deserialize, Serialize};

/// `POST /write` request body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WriteBody {
    pub doc_id: String,
    pub chunks_b64: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

/// `POST /write` response body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WriteResponse {
    pub status: String,
    pub doc_id: DocumentId,
    pub outcome: UpsertOutcome,
    pub fragments: Vec<Digest>,
    pub full_hash: Digest,
    pub chunks_written: usize,
    pub chunks_skipped: usize,
}

impl From<WriteReceipt> for WriteResponse {
    fn from(r: WriteReceipt) -> Self {
        Self {
            status: "ok".into(),
            doc_id: r.doc_id,
            outcome: r.outcome,
            fragments: r.fragments,
            full_hash: r.full_digest,
            chunks_written: r.chunks_written,
            chunks_skipped: r.chunks_skipped,
        }
    }
}

/// `GET /read/{doc_id}` response body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReadResponse {
    pub doc_id: DocumentId,
    pub text: String,
}

/// `GET /stat/{doc_id}` response body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatResponse {
    pub doc_id: DocumentId,
    pub mime: String,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub fragments: Vec<Digest>,
    pub full_hash: Digest,
}

impl From<DocumentRecord> for StatResponse {
    fn from(r: DocumentRecord) -> Self {
        Self {
            doc_id: r.id,
            mime: r.mime,
            created: r.created,
            updated: r.updated,
            fragments: r.fragments,
            full_hash: r.full_digest,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
}
