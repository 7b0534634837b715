use atelier_types::{Collection, RecordId, TypeError};

/// Errors from remote store operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The store could not be reached or is otherwise unusable.
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// A read was attempted and failed.
    #[error("read of {collection}/{id} failed: {reason}")]
    ReadFailed {
        collection: Collection,
        id: RecordId,
        reason: String,
    },

    /// The store refused a write.
    #[error("write to {collection}/{id} rejected: {reason}")]
    Rejected {
        collection: Collection,
        id: RecordId,
        reason: String,
    },

    /// A partial update was not a JSON object.
    #[error("partial update for {collection}/{id} must be an object")]
    InvalidUpdate { collection: Collection, id: RecordId },

    /// A document could not be converted to or from its record type.
    #[error("document error: {0}")]
    Document(#[from] TypeError),
}

/// Result alias for remote store operations.
pub type RemoteResult<T> = Result<T, RemoteError>;
