//! Chunk store adapter for frag.
//!
//! Chunks are immutable blobs stored under a key derived from their digest
//! (see [`ChunkKey`](frag_types::ChunkKey)). This crate wraps the blob
//! backend behind the async [`ChunkStore`] trait: an existence probe that
//! never transfers the body, a full-overwrite put, and a get that fails
//! distinctly on an unknown key.
//!
//! # Storage Backends
//!
//! - [`InMemoryChunkStore`] -- `HashMap`-based store for tests and embedding
//! - [`ObjectChunkStore`] -- any `object_store` backend: S3-compatible
//!   services, the local filesystem, or the `object_store` in-memory store
//!
//! # Design Rules
//!
//! 1. Chunks are never updated or deleted; a put for an existing key writes
//!    identical bytes, so overwrite is harmless.
//! 2. Concurrent reads are always safe.
//! 3. The store never interprets chunk contents.
//! 4. Backend calls are bounded by a timeout and surface as errors rather
//!    than hanging.

pub mod config;
pub mod error;
pub mod memory;
pub mod object;
pub mod traits;

pub use config::S3Config;
pub use error::{StoreError, StoreOp, StoreResult};
pub use memory::InMemoryChunkStore;
pub use object::ObjectChunkStore;
pub use traits::ChunkStore;
