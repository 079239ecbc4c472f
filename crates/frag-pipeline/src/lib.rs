//! Write and read pipelines for the frag chunk store.
//!
//! The write pipeline digests every chunk and the whole document, persists
//! each chunk the backend does not already hold, then upserts the document
//! row. The read pipeline fetches the row and reassembles the chunks in
//! fragment order.
//!
//! Both pipelines take their backends as injected `Arc<dyn ...>` handles;
//! nothing here is global. [`ChunkVault`] bundles the two for applications.
//!
//! # Consistency
//!
//! Chunk persistence is at-most-effectively-once, not exactly-once: the
//! probe and the put are separate calls, so racing writers may both put the
//! same chunk, and a failed probe is treated as absence. Both cases rewrite
//! identical bytes under the same key, so the outcome is the same. Chunks are
//! always written before the row that references them, and a failed write is
//! never rolled back; retrying the whole write is safe.

pub mod config;
pub mod error;
pub mod read;
pub mod request;
pub mod vault;
pub mod write;

#[cfg(test)]
mod testing;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use read::ReadPipeline;
pub use request::{Document, WriteReceipt, WriteRequest};
pub use vault::ChunkVault;
pub use write::{ChunkWrite, WritePipeline};

pub use frag_index::{DocumentRecord, UpsertOutcome};
pub use frag_types::{Digest, DocumentId, DEFAULT_MIME};
