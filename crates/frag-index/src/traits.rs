use async_trait::async_trait;
use frag_types::DocumentId;

use crate::error::IndexResult;
use crate::record::{DocumentRecord, DocumentUpsert, UpsertOutcome};

/// Storage backend for document rows.
///
/// Implementations must make `upsert` a single atomic insert-or-update keyed
/// on the document id: concurrent upserts of one id converge to exactly one
/// writer's values, never a mix. Which writer wins is up to the backend.
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Insert the row if the id is new (`created = updated = timestamp`),
    /// otherwise replace `mime`, `updated`, `fragments` and `full_digest`
    /// in place and leave `created` untouched.
    async fn upsert(&self, doc: &DocumentUpsert) -> IndexResult<UpsertOutcome>;

    /// Fetch a row by id. Returns `Ok(None)` if the id was never written.
    async fn fetch(&self, id: &DocumentId) -> IndexResult<Option<DocumentRecord>>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> IndexResult<()> {
        Ok(())
    }
}
