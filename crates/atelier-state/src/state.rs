use std::collections::BTreeMap;

use atelier_types::{ColorPalette, Design, LayerImage, Record, RecordId, Surface, Tag};
use tracing::warn;

use crate::action::Action;

/// The application state tree: one normalized collection per record type.
///
/// `AppState` is a plain value. [`apply`](AppState::apply) consumes the
/// current state and returns the next one; the store keeps the previous
/// value alive for any reader still holding it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    designs: BTreeMap<RecordId, Design>,
    surfaces: BTreeMap<RecordId, Surface>,
    layer_images: BTreeMap<RecordId, LayerImage>,
    color_palettes: BTreeMap<RecordId, ColorPalette>,
    tags: BTreeMap<RecordId, Tag>,
}

fn put<T: Record>(map: &mut BTreeMap<RecordId, T>, record: T) {
    if record.id().is_empty() {
        let collection = T::COLLECTION;
        warn!(%collection, "dropping record without id");
        return;
    }
    map.insert(record.id().clone(), record);
}

fn put_many<T: Record>(map: &mut BTreeMap<RecordId, T>, records: Vec<T>) {
    for record in records {
        put(map, record);
    }
}

impl AppState {
    /// Apply one action and return the resulting state.
    ///
    /// Adding a record whose id is already present replaces it, so
    /// re-dispatching the same records is idempotent.
    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::AddLayerImage(r) => put(&mut self.layer_images, r),
            Action::AddColorPalette(r) => put(&mut self.color_palettes, r),
            Action::AddSurface(r) => put(&mut self.surfaces, r),
            Action::AddDesign(r) => put(&mut self.designs, r),
            Action::AddManyTags(rs) => put_many(&mut self.tags, rs),
            Action::AddManySurfaces(rs) => put_many(&mut self.surfaces, rs),
            Action::AddManyLayerImages(rs) => put_many(&mut self.layer_images, rs),
            Action::AddManyColorPalettes(rs) => put_many(&mut self.color_palettes, rs),
        }
        self
    }

    // ---- Getters ----

    /// The tag dictionary.
    pub fn tags(&self) -> &BTreeMap<RecordId, Tag> {
        &self.tags
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.get(id)
    }

    pub fn designs(&self) -> &BTreeMap<RecordId, Design> {
        &self.designs
    }

    pub fn design(&self, id: &str) -> Option<&Design> {
        self.designs.get(id)
    }

    pub fn surfaces(&self) -> &BTreeMap<RecordId, Surface> {
        &self.surfaces
    }

    pub fn surface(&self, id: &str) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    pub fn layer_images(&self) -> &BTreeMap<RecordId, LayerImage> {
        &self.layer_images
    }

    pub fn layer_image(&self, id: &str) -> Option<&LayerImage> {
        self.layer_images.get(id)
    }

    pub fn color_palettes(&self) -> &BTreeMap<RecordId, ColorPalette> {
        &self.color_palettes
    }

    pub fn color_palette(&self, id: &str) -> Option<&ColorPalette> {
        self.color_palettes.get(id)
    }
}
