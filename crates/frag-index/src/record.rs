use std::fmt;

use frag_types::{Digest, DocumentId, Timestamp};
use serde::{Deserialize, Serialize};

/// A document row as stored in the index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub mime: String,
    /// Set by the first write of this id and never changed afterwards.
    pub created: Timestamp,
    /// Set by every write.
    pub updated: Timestamp,
    /// Chunk digests in document order. Order reconstructs the bytes.
    pub fragments: Vec<Digest>,
    /// Digest of the concatenated chunk bytes.
    pub full_digest: Digest,
}

/// The values written by a single upsert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentUpsert {
    pub id: DocumentId,
    pub mime: String,
    pub timestamp: Timestamp,
    pub fragments: Vec<Digest>,
    pub full_digest: Digest,
}

impl DocumentUpsert {
    /// The row this upsert produces when `id` is new.
    pub fn into_new_record(self) -> DocumentRecord {
        DocumentRecord {
            id: self.id,
            mime: self.mime,
            created: self.timestamp,
            updated: self.timestamp,
            fragments: self.fragments,
            full_digest: self.full_digest,
        }
    }

    /// Replace every mutable column of `existing`, keeping `created`.
    pub fn apply_to(self, existing: &mut DocumentRecord) {
        existing.mime = self.mime;
        existing.updated = self.timestamp;
        existing.fragments = self.fragments;
        existing.full_digest = self.full_digest;
    }
}

/// Whether an upsert inserted a new row or replaced an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
        }
    }
}
