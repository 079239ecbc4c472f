//! Digest engine for the frag chunk store.
//!
//! Every digest in frag is plain SHA-256 over the raw bytes, with no domain
//! tag, so a document's full digest can be checked with any stock `sha256sum`.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod chunks;
pub mod hasher;

pub use chunks::{ChunkDigests, DEFAULT_CHUNK_SIZE};
pub use hasher::{ContentHasher, StreamingDigest};
