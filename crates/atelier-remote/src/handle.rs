use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use atelier_types::{Collection, Record, RecordId};
use serde_json::Value;

use crate::error::RemoteResult;
use crate::traits::RemoteStore;

/// A store bound to one record type.
///
/// `Handle::<Layer>::new(store)` reads and writes the `layers` collection
/// and converts documents to [`Layer`](atelier_types::Layer)s.
pub struct Handle<T> {
    store: Arc<dyn RemoteStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Handle<T> {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> Collection {
        T::COLLECTION
    }

    /// Read one record, with its id filled from the key.
    pub async fn get(&self, id: &RecordId) -> RemoteResult<Option<T>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(T::from_document(id.clone(), doc)?)),
            None => Ok(None),
        }
    }

    /// Read the whole collection, in key order, ids filled.
    pub async fn get_all(&self) -> RemoteResult<Vec<T>> {
        let docs = self.store.get_all(T::COLLECTION).await?;
        let mut records = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            records.push(T::from_document(id, doc)?);
        }
        Ok(records)
    }

    /// Write the record's normalized document under its own id.
    pub async fn set(&self, record: &T) -> RemoteResult<()> {
        let doc = record.to_document()?;
        self.store.set(T::COLLECTION, record.id(), doc).await
    }

    /// Shallow-merge `partial` into the record stored at `id`.
    pub async fn update(&self, id: &RecordId, partial: Value) -> RemoteResult<()> {
        self.store.update(T::COLLECTION, id, partial).await
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _record: PhantomData,
        }
    }
}

impl<T: Record> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("collection", &T::COLLECTION)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::memory::InMemoryRemoteStore;
    use atelier_types::{Layer, Link, Tag, TypeError};
    use serde_json::json;

    fn store() -> Arc<InMemoryRemoteStore> {
        Arc::new(InMemoryRemoteStore::new())
    }

    #[tokio::test]
    async fn get_fills_id_from_key() {
        let store = store();
        store.insert(Collection::Tags, "t1", json!({ "name": "Floral" }));
        let tags: Handle<Tag> = Handle::new(store.clone());

        let tag = tags.get(&"t1".into()).await.unwrap().unwrap();
        assert_eq!(tag.id.as_str(), "t1");
        assert!(tags.get(&"missing".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_all_returns_key_order() {
        let store = store();
        store.insert(Collection::Tags, "b", json!({ "name": "B" }));
        store.insert(Collection::Tags, "a", json!({ "name": "A" }));
        let tags: Handle<Tag> = Handle::new(store.clone());

        let all = tags.get_all().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn set_writes_normalized_document() {
        let store = store();
        let layers: Handle<Layer> = Handle::new(store.clone());
        let layer = Layer {
            id: "l1".into(),
            selected_layer_image: Link::resolved_from(atelier_types::LayerImage::new("img")),
            color_palette: Link::from("pal"),
            tags: vec![],
            attrs: Default::default(),
        };
        layers.set(&layer).await.unwrap();

        let doc = store.document(Collection::Layers, "l1").unwrap();
        assert_eq!(doc["selectedLayerImage"], json!("img"));
        assert_eq!(doc["colorPalette"], json!("pal"));
    }

    #[tokio::test]
    async fn malformed_document_is_a_document_error() {
        let store = store();
        store.insert(Collection::Layers, "bad", json!({ "colorPalette": 7 }));
        let layers: Handle<Layer> = Handle::new(store.clone());

        let err = layers.get(&"bad".into()).await.unwrap_err();
        assert!(matches!(err, RemoteError::Document(TypeError::InvalidDocument { .. })));
    }
}
