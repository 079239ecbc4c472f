use std::sync::Arc;

use frag_index::InMemoryDocumentIndex;
use frag_pipeline::ChunkVault;
use frag_store::InMemoryChunkStore;

use crate::config::Limits;

/// Shared handler state: the vault and the transport limits.
#[derive(Clone, Debug)]
pub struct AppState {
    pub vault: Arc<ChunkVault>,
    pub limits: Limits,
}

impl AppState {
    pub fn new(vault: ChunkVault, limits: Limits) -> Self {
        Self {
            vault: Arc::new(vault),
            limits,
        }
    }

    /// State backed by in-memory chunk store and index.
    pub fn in_memory() -> Self {
        let vault = ChunkVault::new(
            Arc::new(InMemoryChunkStore::new()),
            Arc::new(InMemoryDocumentIndex::new()),
        );
        Self::new(vault, Limits::default())
    }
}
