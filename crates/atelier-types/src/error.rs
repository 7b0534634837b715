use thiserror::Error;

use crate::collection::Collection;
use crate::id::RecordId;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid {collection} document {id}: {reason}")]
    InvalidDocument {
        collection: Collection,
        id: RecordId,
        reason: String,
    },

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TypeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
