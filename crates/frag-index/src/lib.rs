//! Document index for frag.
//!
//! Maps a caller-supplied document id to its ordered fragment list (chunk
//! digests) and whole-document digest. A write replaces the fragment list and
//! digest wholesale; nothing is ever appended.
//!
//! # Key Types
//!
//! - [`DocumentIndex`] -- async storage interface (upsert, fetch)
//! - [`DocumentRecord`] -- a stored row
//! - [`DocumentUpsert`] -- the values written by one upsert
//! - [`InMemoryDocumentIndex`] -- `HashMap`-backed index for tests
//! - [`PgDocumentIndex`] -- PostgreSQL index over a bounded `sqlx` pool

pub mod config;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod traits;

pub use config::PgConfig;
pub use error::{IndexError, IndexResult};
pub use memory::InMemoryDocumentIndex;
pub use postgres::PgDocumentIndex;
pub use record::{DocumentRecord, DocumentUpsert, UpsertOutcome};
pub use traits::DocumentIndex;
