use thiserror::Error;

/// Errors from the local state store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The store task has stopped; no further actions can be applied.
    #[error("state store is closed")]
    Closed,
}

/// Result alias for state store operations.
pub type StateResult<T> = Result<T, StateError>;
