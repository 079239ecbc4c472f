//! In-memory document index for testing and ephemeral use.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use frag_types::DocumentId;

use crate::error::IndexResult;
use crate::record::{DocumentRecord, DocumentUpsert, UpsertOutcome};
use crate::traits::DocumentIndex;

/// An in-memory implementation of [`DocumentIndex`].
///
/// Upserts run entirely under the write lock, which gives the same
/// single-statement atomicity the relational backend provides.
#[derive(Debug, Default)]
pub struct InMemoryDocumentIndex {
    rows: RwLock<HashMap<DocumentId, DocumentRecord>>,
}

impl InMemoryDocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored ids, sorted.
    pub fn ids(&self) -> Vec<DocumentId> {
        let rows = self.rows.read().expect("lock poisoned");
        let mut ids: Vec<DocumentId> = rows.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl DocumentIndex for InMemoryDocumentIndex {
    async fn upsert(&self, doc: &DocumentUpsert) -> IndexResult<UpsertOutcome> {
        let mut rows = self.rows.write().expect("lock poisoned");
        match rows.entry(doc.id.clone()) {
            Entry::Occupied(mut slot) => {
                doc.clone().apply_to(slot.get_mut());
                Ok(UpsertOutcome::Updated)
            }
            Entry::Vacant(slot) => {
                slot.insert(doc.clone().into_new_record());
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn fetch(&self, id: &DocumentId) -> IndexResult<Option<DocumentRecord>> {
        let rows = self.rows.read().expect("lock poisoned");
        Ok(rows.get(id).cloned())
    }
}
