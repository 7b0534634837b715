use atelier_remote::RemoteError;
use atelier_state::StateError;
use atelier_types::{Collection, RecordId, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("type error: {0}")]
    Type(#[from] TypeError),

    #[error("{collection}/{id} does not exist")]
    MissingRecord { collection: Collection, id: RecordId },

    #[error("{owner} references unknown tag {tag}")]
    UnknownTag { owner: RecordId, tag: RecordId },

    #[error("design {design} selects option {option}, which surface {surface} does not offer")]
    UnknownSurfaceOption {
        design: RecordId,
        surface: RecordId,
        option: RecordId,
    },

    #[error("design {design} has no resolved layer {layer}")]
    LayerNotFound { design: RecordId, layer: RecordId },

    #[error("hydration task failed: {0}")]
    Join(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub(crate) fn missing(collection: Collection, id: &RecordId) -> Self {
        Self::MissingRecord {
            collection,
            id: id.clone(),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
