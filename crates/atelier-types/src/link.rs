use serde_json::Value;

use crate::collection::Collection;
use crate::error::{TypeError, TypeResult};
use crate::id::RecordId;

/// A record that lives in one remote collection.
///
/// Remote documents do not contain their own key, so conversion from a
/// document always takes the id separately and stores it on the record.
pub trait Record: Clone + Send + Sync + 'static {
    /// Collection this record type is stored in.
    const COLLECTION: Collection;

    /// Remote key of this record.
    fn id(&self) -> &RecordId;

    /// Build a record from its remote document, filling the id from the key.
    fn from_document(id: RecordId, doc: Value) -> TypeResult<Self>;

    /// The normalized remote document for this record.
    fn to_document(&self) -> TypeResult<Value>;
}

/// Wrap a `serde_json` failure for a specific document.
pub(crate) fn invalid_document(
    collection: Collection,
    id: &RecordId,
    err: serde_json::Error,
) -> TypeError {
    TypeError::InvalidDocument {
        collection,
        id: id.clone(),
        reason: err.to_string(),
    }
}

/// A relationship to another record.
///
/// Normalized records hold [`Link::Id`]; hydration replaces each id with
/// [`Link::Resolved`]. The two states are exclusive, so a link can never
/// disagree with itself about which record it points to.
#[derive(Clone, Debug, PartialEq)]
pub enum Link<T> {
    Id(RecordId),
    Resolved(Box<T>),
}

impl<T: Record> Link<T> {
    /// Wrap a resolved record.
    pub fn resolved_from(record: T) -> Self {
        Self::Resolved(Box::new(record))
    }

    /// Id of the linked record, whichever state the link is in.
    pub fn id(&self) -> &RecordId {
        match self {
            Self::Id(id) => id,
            Self::Resolved(record) => record.id(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Resolved(record) => Some(record),
        }
    }

    pub fn into_resolved(self) -> Option<T> {
        match self {
            Self::Id(_) => None,
            Self::Resolved(record) => Some(*record),
        }
    }

    /// Drop the resolved record, keeping only its id.
    pub fn to_id(&self) -> Self {
        Self::Id(self.id().clone())
    }
}

impl<T> From<RecordId> for Link<T> {
    fn from(id: RecordId) -> Self {
        Self::Id(id)
    }
}

impl<T> From<&str> for Link<T> {
    fn from(id: &str) -> Self {
        Self::Id(RecordId::from(id))
    }
}
