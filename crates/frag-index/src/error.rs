//! Error types for the index crate.

use std::time::Duration;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The relational backend failed the statement or the connection.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the embedded schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The statement did not finish within the configured timeout.
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    /// A stored row could not be decoded into a document record.
    #[error("corrupt index row for {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    /// The index could not be constructed from its configuration.
    #[error("index configuration error: {0}")]
    Config(String),
}

impl IndexError {
    pub(crate) fn corrupt(id: &str, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
