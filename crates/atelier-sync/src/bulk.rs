//! Whole-collection loaders.
//!
//! Each loader reads one remote collection and dispatches every record in a
//! single `AddMany*` action. A failed read dispatches nothing.

use std::sync::Arc;

use atelier_remote::{Handle, RemoteStore};
use atelier_state::{Action, StateHandle};
use atelier_types::{ColorPalette, LayerImage, Record, Surface, Tag};
use tracing::info;

use crate::error::SyncResult;

async fn load_all<T: Record>(
    remote: &Arc<dyn RemoteStore>,
    state: &StateHandle,
    wrap: fn(Vec<T>) -> Action,
) -> SyncResult<usize> {
    let records = Handle::<T>::new(Arc::clone(remote)).get_all().await?;
    let count = records.len();
    state.dispatch(wrap(records)).await?;
    let collection = T::COLLECTION;
    info!(%collection, count, "collection loaded");
    Ok(count)
}

pub async fn load_layer_images(
    remote: &Arc<dyn RemoteStore>,
    state: &StateHandle,
) -> SyncResult<usize> {
    load_all::<LayerImage>(remote, state, Action::AddManyLayerImages).await
}

/// Surfaces are loaded with option ids only.
pub async fn load_surfaces(
    remote: &Arc<dyn RemoteStore>,
    state: &StateHandle,
) -> SyncResult<usize> {
    load_all::<Surface>(remote, state, Action::AddManySurfaces).await
}

/// Unconditional; see [`TagCache`](crate::TagCache) for the load-once path.
pub async fn load_tags(remote: &Arc<dyn RemoteStore>, state: &StateHandle) -> SyncResult<usize> {
    load_all::<Tag>(remote, state, Action::AddManyTags).await
}

pub async fn load_color_palettes(
    remote: &Arc<dyn RemoteStore>,
    state: &StateHandle,
) -> SyncResult<usize> {
    load_all::<ColorPalette>(remote, state, Action::AddManyColorPalettes).await
}
