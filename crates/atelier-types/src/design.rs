use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::error::TypeResult;
use crate::id::{id_set, IdSet, RecordId};
use crate::link::{invalid_document, Link, Record};
use crate::records::{ColorPalette, LayerImage, Tag};
use crate::surface::{Surface, SurfaceOption};

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// Normalized remote shape of a [`Layer`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRecord {
    #[serde(default, skip_serializing_if = "RecordId::is_empty")]
    pub id: RecordId,
    pub selected_layer_image: RecordId,
    pub color_palette: RecordId,
    #[serde(default, skip_serializing_if = "IdSet::is_empty")]
    pub tags: IdSet,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, Value>,
}

/// One layer of a design: an image rendered with a color palette.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub id: RecordId,
    pub selected_layer_image: Link<LayerImage>,
    pub color_palette: Link<ColorPalette>,
    pub tags: Vec<Link<Tag>>,
    pub attrs: BTreeMap<String, Value>,
}

impl Layer {
    pub fn from_record(record: LayerRecord) -> Self {
        Self {
            id: record.id,
            selected_layer_image: Link::Id(record.selected_layer_image),
            color_palette: Link::Id(record.color_palette),
            tags: record.tags.into_keys().map(Link::Id).collect(),
            attrs: record.attrs,
        }
    }

    /// Normalize: every relationship becomes its bare id.
    pub fn to_record(&self) -> LayerRecord {
        LayerRecord {
            id: self.id.clone(),
            selected_layer_image: self.selected_layer_image.id().clone(),
            color_palette: self.color_palette.id().clone(),
            tags: id_set(self.tags.iter().map(Link::id)),
            attrs: self.attrs.clone(),
        }
    }

    pub fn is_hydrated(&self) -> bool {
        self.selected_layer_image.is_resolved()
            && self.color_palette.is_resolved()
            && self.tags.iter().all(Link::is_resolved)
    }
}

impl Record for Layer {
    const COLLECTION: Collection = Collection::Layers;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_document(id: RecordId, doc: Value) -> TypeResult<Self> {
        let mut record: LayerRecord =
            serde_json::from_value(doc).map_err(|e| invalid_document(Self::COLLECTION, &id, e))?;
        record.id = id;
        Ok(Self::from_record(record))
    }

    fn to_document(&self) -> TypeResult<Value> {
        Ok(serde_json::to_value(self.to_record())?)
    }
}

// ---------------------------------------------------------------------------
// Design
// ---------------------------------------------------------------------------

/// Normalized remote shape of a [`Design`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRecord {
    #[serde(default, skip_serializing_if = "RecordId::is_empty")]
    pub id: RecordId,
    #[serde(default)]
    pub layers: Vec<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_option: Option<RecordId>,
    #[serde(default, skip_serializing_if = "IdSet::is_empty")]
    pub tags: IdSet,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, Value>,
}

/// A user's design: ordered layers printed on a surface option.
///
/// A design read from the store is a *shell*: every link is an id. After
/// hydration every link is resolved, except `surface_option`, which is
/// absent when the stored id does not match any option of the surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Design {
    pub id: RecordId,
    pub layers: Vec<Link<Layer>>,
    pub surface: Option<Link<Surface>>,
    pub surface_option: Option<Link<SurfaceOption>>,
    pub tags: Vec<Link<Tag>>,
    pub attrs: BTreeMap<String, Value>,
}

impl Design {
    pub fn from_record(record: DesignRecord) -> Self {
        Self {
            id: record.id,
            layers: record.layers.into_iter().map(Link::Id).collect(),
            surface: record.surface.map(Link::Id),
            surface_option: record.surface_option.map(Link::Id),
            tags: record.tags.into_keys().map(Link::Id).collect(),
            attrs: record.attrs,
        }
    }

    /// Normalize: layers, surface, surface option and tags become bare ids.
    pub fn to_record(&self) -> DesignRecord {
        DesignRecord {
            id: self.id.clone(),
            layers: self.layers.iter().map(|l| l.id().clone()).collect(),
            surface: self.surface.as_ref().map(|s| s.id().clone()),
            surface_option: self.surface_option.as_ref().map(|o| o.id().clone()),
            tags: id_set(self.tags.iter().map(Link::id)),
            attrs: self.attrs.clone(),
        }
    }

    /// Resolved layers, in order. Unresolved layers are skipped.
    pub fn resolved_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter_map(Link::resolved)
    }

    /// `true` once the whole graph below this design is resolved.
    pub fn is_hydrated(&self) -> bool {
        let layers = self
            .layers
            .iter()
            .all(|l| l.resolved().is_some_and(Layer::is_hydrated));
        let surface = self
            .surface
            .as_ref()
            .map_or(true, |s| s.resolved().is_some_and(Surface::is_hydrated));
        let option = self.surface_option.as_ref().map_or(true, Link::is_resolved);
        layers && surface && option && self.tags.iter().all(Link::is_resolved)
    }
}

impl Record for Design {
    const COLLECTION: Collection = Collection::Designs;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_document(id: RecordId, doc: Value) -> TypeResult<Self> {
        let mut record: DesignRecord =
            serde_json::from_value(doc).map_err(|e| invalid_document(Self::COLLECTION, &id, e))?;
        record.id = id;
        Ok(Self::from_record(record))
    }

    fn to_document(&self) -> TypeResult<Value> {
        Ok(serde_json::to_value(self.to_record())?)
    }
}
