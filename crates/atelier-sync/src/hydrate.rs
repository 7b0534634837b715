//! Design hydration.
//!
//! A design as read from the remote store holds only ids. Hydration fetches
//! every referenced record, dispatches each one into local state as soon as
//! it resolves, and returns the design with every link resolved.
//!
//! Layers are fetched concurrently, as are the options of a surface. Results
//! keep the order of the ids they came from.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use atelier_remote::{Handle, RemoteStore};
use atelier_state::{Action, StateHandle};
use atelier_types::{
    Collection, ColorPalette, Design, Layer, LayerImage, Link, RecordId, Surface, SurfaceOption,
    Tag,
};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::tags::{resolve_tags, TagCache};

/// Run `fetch` for every id concurrently and return the results in id order.
///
/// Every task runs to completion. If any failed, the error of the earliest
/// id is returned; side effects of the other tasks are kept.
async fn fetch_ordered<T, F, Fut>(ids: Vec<RecordId>, fetch: F) -> SyncResult<Vec<T>>
where
    T: Send + 'static,
    F: Fn(RecordId) -> Fut,
    Fut: Future<Output = SyncResult<T>> + Send + 'static,
{
    let count = ids.len();
    let mut tasks = JoinSet::new();
    for (index, id) in ids.into_iter().enumerate() {
        let fut = fetch(id);
        tasks.spawn(async move { (index, fut.await) });
    }

    let mut slots: Vec<Option<T>> = (0..count).map(|_| None).collect();
    let mut first_error: Option<(usize, SyncError)> = None;
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = match joined {
            Ok(done) => done,
            Err(e) => (usize::MAX, Err(SyncError::Join(e.to_string()))),
        };
        match result {
            Ok(value) => slots[index] = Some(value),
            Err(e) => {
                if first_error.as_ref().map_or(true, |(i, _)| index < *i) {
                    first_error = Some((index, e));
                }
            }
        }
    }

    match first_error {
        Some((_, e)) => Err(e),
        None => Ok(slots.into_iter().flatten().collect()),
    }
}

struct Inner {
    layers: Handle<Layer>,
    layer_images: Handle<LayerImage>,
    color_palettes: Handle<ColorPalette>,
    surfaces: Handle<Surface>,
    surface_options: Handle<SurfaceOption>,
    state: StateHandle,
    tags: Arc<TagCache>,
    strict: bool,
}

/// Resolves designs and surfaces against the remote store.
///
/// Cheap to clone; clones share the tag cache.
#[derive(Clone)]
pub struct Hydrator {
    inner: Arc<Inner>,
}

impl Hydrator {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        state: StateHandle,
        tags: Arc<TagCache>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                layers: Handle::new(Arc::clone(&remote)),
                layer_images: Handle::new(Arc::clone(&remote)),
                color_palettes: Handle::new(Arc::clone(&remote)),
                surfaces: Handle::new(Arc::clone(&remote)),
                surface_options: Handle::new(remote),
                state,
                tags,
                strict: config.strict,
            }),
        }
    }

    /// Resolve the full object graph of `shell`.
    ///
    /// Dispatches, in order: an `AddLayerImage` and an `AddColorPalette` per
    /// layer, one `AddSurface`, and finally one `AddDesign` with the result.
    /// On failure the error is logged and returned; records dispatched
    /// before the failure stay in local state and no `AddDesign` is sent.
    pub async fn hydrate_design(&self, shell: Design) -> SyncResult<Design> {
        let id = shell.id.clone();
        match self.resolve_design(shell).await {
            Ok(design) => {
                info!(design = %id, layers = design.layers.len(), "design hydrated");
                Ok(design)
            }
            Err(e) => {
                error!(design = %id, error = %e, "design hydration failed");
                Err(e)
            }
        }
    }

    /// Like [`hydrate_design`](Self::hydrate_design), but a failure yields
    /// `None` after being logged.
    pub async fn hydrate_design_logged(&self, shell: Design) -> Option<Design> {
        self.hydrate_design(shell).await.ok()
    }

    async fn resolve_design(&self, shell: Design) -> SyncResult<Design> {
        let strict = self.inner.strict;
        self.inner.tags.ensure_loaded().await?;
        let snapshot = self.inner.state.snapshot().await?;
        let dictionary = Arc::new(snapshot.tags().clone());

        let layer_ids: Vec<RecordId> = shell.layers.iter().map(|l| l.id().clone()).collect();
        let layers = fetch_ordered(layer_ids, |id| {
            let this = self.clone();
            let dictionary = Arc::clone(&dictionary);
            async move { this.resolve_layer(&id, &dictionary).await }
        })
        .await?;

        let (surface, surface_option) = match &shell.surface {
            Some(link) => {
                let surface = self.hydrate_surface(link.id()).await?;
                let selected = self.select_option(&shell, &surface)?;
                self.inner
                    .state
                    .dispatch(Action::AddSurface(surface.clone()))
                    .await?;
                (Some(Link::resolved_from(surface)), selected)
            }
            None => {
                if let Some(option) = &shell.surface_option {
                    warn!(
                        design = %shell.id,
                        option = %option.id(),
                        "design selects a surface option but has no surface"
                    );
                }
                (None, None)
            }
        };

        let design = Design {
            tags: resolve_tags(&shell.tags, &dictionary, &shell.id, strict)?,
            layers: layers.into_iter().map(Link::resolved_from).collect(),
            surface,
            surface_option,
            id: shell.id,
            attrs: shell.attrs,
        };
        self.inner
            .state
            .dispatch(Action::AddDesign(design.clone()))
            .await?;
        Ok(design)
    }

    async fn resolve_layer(
        &self,
        id: &RecordId,
        dictionary: &BTreeMap<RecordId, Tag>,
    ) -> SyncResult<Layer> {
        let mut layer = self
            .inner
            .layers
            .get(id)
            .await?
            .ok_or_else(|| SyncError::missing(Collection::Layers, id))?;

        let image_id = layer.selected_layer_image.id().clone();
        let image = self
            .inner
            .layer_images
            .get(&image_id)
            .await?
            .ok_or_else(|| SyncError::missing(Collection::LayerImages, &image_id))?;
        self.inner
            .state
            .dispatch(Action::AddLayerImage(image.clone()))
            .await?;
        layer.selected_layer_image = Link::resolved_from(image);

        layer.tags = resolve_tags(&layer.tags, dictionary, id, self.inner.strict)?;

        let palette = self.hydrate_color_palette(layer.color_palette.id()).await?;
        self.inner
            .state
            .dispatch(Action::AddColorPalette(palette.clone()))
            .await?;
        layer.color_palette = Link::resolved_from(palette);

        debug!(layer = %id, "layer hydrated");
        Ok(layer)
    }

    fn select_option(
        &self,
        shell: &Design,
        surface: &Surface,
    ) -> SyncResult<Option<Link<SurfaceOption>>> {
        let Some(selected) = &shell.surface_option else {
            return Ok(None);
        };
        match surface.option(selected.id()) {
            Some(option) => Ok(Some(Link::resolved_from(option.clone()))),
            None if self.inner.strict => Err(SyncError::UnknownSurfaceOption {
                design: shell.id.clone(),
                surface: surface.id.clone(),
                option: selected.id().clone(),
            }),
            None => {
                warn!(
                    design = %shell.id,
                    surface = %surface.id,
                    option = %selected.id(),
                    "selected surface option not offered by surface"
                );
                Ok(None)
            }
        }
    }

    /// Fetch a surface and resolve all of its options.
    pub async fn hydrate_surface(&self, id: &RecordId) -> SyncResult<Surface> {
        let mut surface = self
            .inner
            .surfaces
            .get(id)
            .await?
            .ok_or_else(|| SyncError::missing(Collection::Surfaces, id))?;
        let options = self.hydrate_surface_options_for_surface(&surface).await?;
        surface.options = options.into_iter().map(Link::resolved_from).collect();
        Ok(surface)
    }

    /// Fetch every option of `surface` concurrently, each with its derived
    /// size label, in the surface's option order.
    pub async fn hydrate_surface_options_for_surface(
        &self,
        surface: &Surface,
    ) -> SyncResult<Vec<SurfaceOption>> {
        let ids: Vec<RecordId> = surface.options.iter().map(|o| o.id().clone()).collect();
        fetch_ordered(ids, |id| {
            let options = self.inner.surface_options.clone();
            async move {
                let option = options
                    .get(&id)
                    .await?
                    .ok_or_else(|| SyncError::missing(Collection::SurfaceOptions, &id))?;
                Ok(option.with_size())
            }
        })
        .await
    }

    pub async fn hydrate_color_palette(&self, id: &RecordId) -> SyncResult<ColorPalette> {
        self.inner
            .color_palettes
            .get(id)
            .await?
            .ok_or_else(|| SyncError::missing(Collection::ColorPalettes, id))
    }
}
