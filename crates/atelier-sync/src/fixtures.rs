//! Shared test data: a two-layer design on a two-option surface.

use std::sync::Arc;

use atelier_remote::InMemoryRemoteStore;
use atelier_types::{Collection, Design, Record};
use serde_json::json;

use crate::config::SyncConfig;
use crate::session::Session;

pub fn seeded_store() -> Arc<InMemoryRemoteStore> {
    let remote = Arc::new(InMemoryRemoteStore::new());

    remote.insert(Collection::Tags, "t1", json!({ "name": "Floral" }));
    remote.insert(Collection::Tags, "t2", json!({ "name": "Geometric" }));

    remote.insert(Collection::LayerImages, "img1", json!({ "url": "https://img/1.png" }));
    remote.insert(Collection::LayerImages, "img2", json!({ "url": "https://img/2.png" }));

    remote.insert(Collection::ColorPalettes, "pal1", json!({ "name": "Dusk" }));
    remote.insert(Collection::ColorPalettes, "pal2", json!({ "name": "Dawn" }));

    remote.insert(
        Collection::Layers,
        "l1",
        json!({
            "selectedLayerImage": "img1",
            "colorPalette": "pal1",
            "tags": { "t1": true },
            "opacity": 1
        }),
    );
    remote.insert(
        Collection::Layers,
        "l2",
        json!({
            "selectedLayerImage": "img2",
            "colorPalette": "pal2",
            "tags": { "t2": true }
        }),
    );

    remote.insert(
        Collection::SurfaceOptions,
        "o1",
        json!({ "height": 16, "width": 20, "units": "in", "salePrice": 40 }),
    );
    remote.insert(
        Collection::SurfaceOptions,
        "o2",
        json!({ "height": 8, "width": 10, "depth": 2, "units": "in", "finish": "matte" }),
    );
    remote.insert(
        Collection::Surfaces,
        "s1",
        json!({ "name": "Canvas", "options": { "o1": true, "o2": true } }),
    );

    remote.insert(
        Collection::Designs,
        "d1",
        json!({
            "title": "Garden",
            "layers": ["l1", "l2"],
            "surface": "s1",
            "surfaceOption": "o2",
            "tags": { "t1": true }
        }),
    );

    remote
}

/// The stored design `d1`, unresolved.
pub fn shell(remote: &InMemoryRemoteStore) -> Design {
    let doc = remote
        .document(Collection::Designs, "d1")
        .expect("fixture design");
    Design::from_document("d1".into(), doc).expect("fixture design parses")
}

pub fn session(config: SyncConfig) -> (Arc<InMemoryRemoteStore>, Session) {
    let remote = seeded_store();
    let session = Session::start(remote.clone(), &config);
    (remote, session)
}
