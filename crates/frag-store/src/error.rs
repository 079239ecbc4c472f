use std::fmt;
use std::time::Duration;

use frag_types::ChunkKey;

/// The chunk store operation that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOp {
    Exists,
    Put,
    Get,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists => write!(f, "exists"),
            Self::Put => write!(f, "put"),
            Self::Get => write!(f, "get"),
        }
    }
}

/// Errors from chunk store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested chunk is unknown to the backend.
    #[error("chunk not found: {0}")]
    NotFound(ChunkKey),

    /// The backend rejected or failed the request.
    #[error("{op} failed for {key}: {message}")]
    Backend {
        op: StoreOp,
        key: ChunkKey,
        message: String,
    },

    /// The backend did not answer within the configured timeout.
    #[error("{op} timed out for {key} after {after:?}")]
    Timeout {
        op: StoreOp,
        key: ChunkKey,
        after: Duration,
    },

    /// The backend could not be constructed from its configuration.
    #[error("chunk store configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns `true` if this error means the key is absent, as opposed to
    /// the backend failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
