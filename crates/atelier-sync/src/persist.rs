//! Writing edits back to the remote store.
//!
//! Every write sends the normalized shape: relationships become bare ids and
//! tag sets become `{id: true}` maps, whatever the in-memory design holds.

use std::sync::Arc;

use atelier_remote::{Handle, RemoteStore};
use atelier_types::{Collection, Design, Layer, Link, Order, Record, RecordId};
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};

/// Writes designs, orders and partial updates.
#[derive(Clone)]
pub struct Persister {
    remote: Arc<dyn RemoteStore>,
    layers: Handle<Layer>,
    designs: Handle<Design>,
    debug_writes: bool,
}

impl Persister {
    pub fn new(remote: Arc<dyn RemoteStore>, config: &SyncConfig) -> Self {
        Self {
            layers: Handle::new(Arc::clone(&remote)),
            designs: Handle::new(Arc::clone(&remote)),
            remote,
            debug_writes: config.debug_writes,
        }
    }

    /// Write every resolved layer of `design`, then the design itself.
    ///
    /// Layers held only by id already exist remotely and are not rewritten.
    /// Stops at the first failed write; earlier writes are not undone.
    pub async fn persist_new_design(&self, design: &Design) -> SyncResult<()> {
        let mut written = 0;
        for link in &design.layers {
            match link.resolved() {
                Some(layer) => {
                    self.layers.set(layer).await?;
                    written += 1;
                }
                None => {
                    warn!(design = %design.id, layer = %link.id(), "skipping unresolved layer")
                }
            }
        }
        self.designs.set(design).await?;
        info!(design = %design.id, layers = written, "design persisted");
        Ok(())
    }

    /// Append `order` under a fresh remote key and return that key.
    pub async fn persist_and_create_new_order(&self, order: &Order) -> SyncResult<RecordId> {
        let id = self
            .remote
            .push(Collection::Orders, order.to_document()?)
            .await?;
        info!(order = %id, "order created");
        Ok(id)
    }

    /// Shallow-merge `partial` into the record at `collection/id`.
    pub async fn persist_with_ref(
        &self,
        collection: Collection,
        id: &RecordId,
        partial: Value,
    ) -> SyncResult<()> {
        if self.debug_writes {
            debug!(%collection, %id, "saving");
        } else {
            trace!(%collection, %id, "saving");
        }
        self.remote.update(collection, id, partial).await?;
        Ok(())
    }

    /// A [`persist_with_ref`](Self::persist_with_ref) bound to one collection.
    pub fn updater(&self, collection: Collection) -> RefUpdater {
        RefUpdater {
            persister: self.clone(),
            collection,
        }
    }

    pub async fn persist_design(&self, id: &RecordId, partial: Value) -> SyncResult<()> {
        self.updater(Collection::Designs).update(id, partial).await
    }

    pub async fn persist_layer(&self, id: &RecordId, partial: Value) -> SyncResult<()> {
        self.updater(Collection::Layers).update(id, partial).await
    }

    pub async fn persist_surface(&self, id: &RecordId, partial: Value) -> SyncResult<()> {
        self.updater(Collection::Surfaces).update(id, partial).await
    }

    pub async fn persist_tag(&self, id: &RecordId, partial: Value) -> SyncResult<()> {
        self.updater(Collection::Tags).update(id, partial).await
    }
}

/// Partial updates against one collection.
#[derive(Clone)]
pub struct RefUpdater {
    persister: Persister,
    collection: Collection,
}

impl RefUpdater {
    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub async fn update(&self, id: &RecordId, partial: Value) -> SyncResult<()> {
        self.persister
            .persist_with_ref(self.collection, id, partial)
            .await
    }
}

/// Return a copy of `design` with the resolved layer `layer_id` replaced by
/// `update(layer)`. Every other layer is kept as is. If no resolved layer
/// has that id, the copy is unchanged.
pub fn update_layer_of_design<F>(design: &Design, layer_id: &RecordId, update: F) -> Design
where
    F: FnOnce(Layer) -> Layer,
{
    try_update_layer_of_design(design, layer_id, update).unwrap_or_else(|_| design.clone())
}

/// Like [`update_layer_of_design`], but a missing layer is an error.
pub fn try_update_layer_of_design<F>(
    design: &Design,
    layer_id: &RecordId,
    update: F,
) -> SyncResult<Design>
where
    F: FnOnce(Layer) -> Layer,
{
    let (index, layer) = design
        .layers
        .iter()
        .enumerate()
        .find_map(|(i, link)| link.resolved().filter(|l| &l.id == layer_id).map(|l| (i, l)))
        .ok_or_else(|| SyncError::LayerNotFound {
            design: design.id.clone(),
            layer: layer_id.clone(),
        })?;

    let mut next = design.clone();
    next.layers[index] = Link::resolved_from(update(layer.clone()));
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use atelier_remote::InMemoryRemoteStore;
    use serde_json::json;

    async fn hydrated() -> (Arc<InMemoryRemoteStore>, crate::Session, Design) {
        let (remote, session) = fixtures::session(SyncConfig::default());
        let design = session
            .hydrator()
            .hydrate_design(fixtures::shell(&remote))
            .await
            .unwrap();
        (remote, session, design)
    }

    #[tokio::test]
    async fn new_design_writes_layers_then_design() {
        let (remote, session, design) = hydrated().await;
        let before = remote.stats().sets;

        session.persister().persist_new_design(&design).await.unwrap();
        assert_eq!(remote.stats().sets - before, 3);

        let layer = remote.document(Collection::Layers, "l1").unwrap();
        assert_eq!(layer["selectedLayerImage"], json!("img1"));
        assert_eq!(layer["colorPalette"], json!("pal1"));
        assert_eq!(layer["tags"], json!({ "t1": true }));

        let doc = remote.document(Collection::Designs, "d1").unwrap();
        assert_eq!(doc["layers"], json!(["l1", "l2"]));
        assert_eq!(doc["surface"], json!("s1"));
        assert_eq!(doc["surfaceOption"], json!("o2"));
        assert_eq!(doc["tags"], json!({ "t1": true }));
        assert_eq!(doc["title"], json!("Garden"));
        assert_eq!(doc["id"], json!("d1"));
    }

    #[tokio::test]
    async fn hydrate_then_persist_is_lossless() {
        let (remote, session, design) = hydrated().await;
        let stored = remote.document(Collection::Designs, "d1").unwrap();

        session.persister().persist_new_design(&design).await.unwrap();
        let mut written = remote.document(Collection::Designs, "d1").unwrap();
        written.as_object_mut().unwrap().remove("id");
        assert_eq!(written, stored);
    }

    #[tokio::test]
    async fn dangling_tags_survive_round_trip() {
        let (remote, session) = fixtures::session(SyncConfig::default());
        let mut design_doc = remote.document(Collection::Designs, "d1").unwrap();
        design_doc["tags"] = json!({ "t1": true, "ghost": true });
        remote.insert(Collection::Designs, "d1", design_doc.clone());
        let mut layer_doc = remote.document(Collection::Layers, "l1").unwrap();
        layer_doc["tags"] = json!({ "t1": true, "ghost": true });
        remote.insert(Collection::Layers, "l1", layer_doc.clone());

        let design = session
            .hydrator()
            .hydrate_design(fixtures::shell(&remote))
            .await
            .unwrap();
        session.persister().persist_new_design(&design).await.unwrap();

        let mut written = remote.document(Collection::Designs, "d1").unwrap();
        written.as_object_mut().unwrap().remove("id");
        assert_eq!(written, design_doc);
        let layer = remote.document(Collection::Layers, "l1").unwrap();
        assert_eq!(layer["tags"], json!({ "t1": true, "ghost": true }));
    }

    #[tokio::test]
    async fn unresolved_layers_are_not_rewritten() {
        let (remote, session) = fixtures::session(SyncConfig::default());
        let before = remote.stats().sets;
        session
            .persister()
            .persist_new_design(&fixtures::shell(&remote))
            .await
            .unwrap();
        assert_eq!(remote.stats().sets - before, 1);
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let (remote, session, design) = hydrated().await;
        remote.fail_writes_to(Collection::Designs);

        let err = session
            .persister()
            .persist_new_design(&design)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Remote(_)));
    }

    #[tokio::test]
    async fn order_gets_fresh_key() {
        let (remote, session) = fixtures::session(SyncConfig::default());
        let order = Order::from_attrs([("design".to_string(), json!("d1"))].into());

        let persister = session.persister();
        let a = persister.persist_and_create_new_order(&order).await.unwrap();
        let b = persister.persist_and_create_new_order(&order).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(remote.len(Collection::Orders), 2);
        assert_eq!(
            remote.document(Collection::Orders, a.as_str()).unwrap()["design"],
            json!("d1")
        );
    }

    #[tokio::test]
    async fn partial_update_merges() {
        let (remote, session) = fixtures::session(SyncConfig {
            debug_writes: true,
            ..Default::default()
        });
        session
            .persister()
            .persist_design(&"d1".into(), json!({ "title": "Orchard" }))
            .await
            .unwrap();

        let doc = remote.document(Collection::Designs, "d1").unwrap();
        assert_eq!(doc["title"], json!("Orchard"));
        assert_eq!(doc["surface"], json!("s1"));
    }

    #[tokio::test]
    async fn updater_targets_its_collection() {
        let (remote, session) = fixtures::session(SyncConfig::default());
        let tags = session.persister().updater(Collection::Tags);
        assert_eq!(tags.collection(), Collection::Tags);

        tags.update(&"t1".into(), json!({ "name": "Botanical" }))
            .await
            .unwrap();
        session
            .persister()
            .persist_layer(&"l2".into(), json!({ "opacity": 0.5 }))
            .await
            .unwrap();
        session
            .persister()
            .persist_surface(&"s1".into(), json!({ "name": "Linen" }))
            .await
            .unwrap();
        session
            .persister()
            .persist_tag(&"t2".into(), json!({ "name": null }))
            .await
            .unwrap();

        assert_eq!(remote.document(Collection::Tags, "t1").unwrap()["name"], json!("Botanical"));
        assert_eq!(remote.document(Collection::Layers, "l2").unwrap()["opacity"], json!(0.5));
        assert_eq!(remote.document(Collection::Surfaces, "s1").unwrap()["name"], json!("Linen"));
        assert!(remote.document(Collection::Tags, "t2").unwrap().get("name").is_none());
    }

    #[tokio::test]
    async fn update_failure_is_reported() {
        let (remote, session) = fixtures::session(SyncConfig::default());
        remote.fail_writes_to(Collection::Layers);
        let err = session
            .persister()
            .persist_layer(&"l1".into(), json!({ "opacity": 0 }))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Remote(_)));
    }

    #[tokio::test]
    async fn update_layer_replaces_only_target() {
        let (_, _, design) = hydrated().await;
        let updated = update_layer_of_design(&design, &"l2".into(), |mut layer| {
            layer.attrs.insert("opacity".into(), json!(0.25));
            layer
        });

        assert_eq!(updated.layers[0], design.layers[0]);
        let l2 = updated.layers[1].resolved().unwrap();
        assert_eq!(l2.attrs["opacity"], json!(0.25));
        assert!(design.layers[1].resolved().unwrap().attrs.get("opacity").is_none());
    }

    #[tokio::test]
    async fn update_unknown_layer() {
        let (_, _, design) = hydrated().await;
        let unchanged = update_layer_of_design(&design, &"nope".into(), |l| l);
        assert_eq!(unchanged, design);

        let err = try_update_layer_of_design(&design, &"nope".into(), |l| l).unwrap_err();
        assert!(matches!(
            err,
            SyncError::LayerNotFound { ref layer, .. } if layer.as_str() == "nope"
        ));
    }
}
