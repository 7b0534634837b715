use std::collections::BTreeMap;

use async_trait::async_trait;
use atelier_types::{Collection, RecordId};
use serde_json::Value;

use crate::error::RemoteResult;

/// Keyed JSON document store, addressed by collection and record id.
///
/// Implementations must satisfy these invariants:
/// - Documents never contain a reliable copy of their own key; callers take
///   the id from the key they read.
/// - Writing `null` with [`set`](RemoteStore::set) removes the document.
/// - Every call is a single round trip; nothing is cached client-side.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read one document. Returns `Ok(None)` if it does not exist.
    async fn get(&self, collection: Collection, id: &RecordId) -> RemoteResult<Option<Value>>;

    /// Read every document of a collection, keyed by id.
    async fn get_all(&self, collection: Collection) -> RemoteResult<BTreeMap<RecordId, Value>>;

    /// Replace one document.
    async fn set(&self, collection: Collection, id: &RecordId, doc: Value) -> RemoteResult<()>;

    /// Shallow-merge the top-level keys of `partial` into one document,
    /// creating it if absent. A `null` value removes that key.
    async fn update(
        &self,
        collection: Collection,
        id: &RecordId,
        partial: Value,
    ) -> RemoteResult<()>;

    /// Append a document under a store-generated key and return the key.
    async fn push(&self, collection: Collection, doc: Value) -> RemoteResult<RecordId>;
}
