//! Foundation types for the frag content-addressed chunk store.
//!
//! This crate provides the identity and temporal types shared by every other
//! frag crate.
//!
//! # Key Types
//!
//! - [`Digest`] — SHA-256 content digest, lowercase hex on the wire
//! - [`ChunkKey`] — Sharded blob-store key derived from a chunk digest
//! - [`DocumentId`] — Validated caller-supplied document identifier
//! - [`Timestamp`] — Second-granularity wall-clock time
//! - [`Clock`] — Time source seam ([`SystemClock`], [`ManualClock`])

pub mod digest;
pub mod document;
pub mod error;
pub mod key;
pub mod temporal;

pub use digest::{Digest, DIGEST_LEN};
pub use document::{DocumentId, DEFAULT_MIME};
pub use error::TypeError;
pub use key::{ChunkKey, CHUNK_PREFIX};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
