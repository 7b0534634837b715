//! Flat records: stored as-is, no relationships to normalize.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::id::RecordId;

/// A rendered image that can be selected for a layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerImage {
    #[serde(default, skip_serializing_if = "RecordId::is_empty")]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, Value>,
}

impl LayerImage {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A named set of colors applied to a layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    #[serde(default, skip_serializing_if = "RecordId::is_empty")]
    pub id: RecordId,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, Value>,
}

impl ColorPalette {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A label attached to designs and layers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default, skip_serializing_if = "RecordId::is_empty")]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, Value>,
}

impl Tag {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            attrs: BTreeMap::new(),
        }
    }
}

/// A placed order. The payload is opaque to Atelier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "RecordId::is_empty")]
    pub id: RecordId,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, Value>,
}

impl Order {
    /// Build an unsaved order from a JSON object's fields.
    pub fn from_attrs(attrs: BTreeMap<String, Value>) -> Self {
        Self {
            id: RecordId::default(),
            attrs,
        }
    }
}

flat_record!(LayerImage, Collection::LayerImages);
flat_record!(ColorPalette, Collection::ColorPalettes);
flat_record!(Tag, Collection::Tags);
flat_record!(Order, Collection::Orders);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TypeError;
    use crate::link::Record;
    use serde_json::json;

    #[test]
    fn id_comes_from_key_not_document() {
        let tag = Tag::from_document("t1".into(), json!({ "name": "Floral" })).unwrap();
        assert_eq!(tag.id, RecordId::from("t1"));
        assert_eq!(tag.name.as_deref(), Some("Floral"));

        // A stale id inside the document is overridden by the key.
        let tag = Tag::from_document("t2".into(), json!({ "id": "old", "name": "x" })).unwrap();
        assert_eq!(tag.id, RecordId::from("t2"));
    }

    #[test]
    fn unknown_fields_are_preserved() {
        let doc = json!({ "url": "https://cdn/img.png", "width": 300, "artist": "kb" });
        let image = LayerImage::from_document("img".into(), doc).unwrap();
        assert_eq!(image.url.as_deref(), Some("https://cdn/img.png"));
        assert_eq!(image.attrs.get("width"), Some(&json!(300)));

        let out = image.to_document().unwrap();
        assert_eq!(out["artist"], json!("kb"));
        assert_eq!(out["id"], json!("img"));
    }

    #[test]
    fn non_object_document_is_invalid() {
        let err = ColorPalette::from_document("p".into(), json!(true)).unwrap_err();
        assert!(matches!(
            err,
            TypeError::InvalidDocument { collection: Collection::ColorPalettes, .. }
        ));
    }

    #[test]
    fn order_payload_round_trips() {
        let mut attrs = BTreeMap::new();
        attrs.insert("designId".to_string(), json!("d1"));
        attrs.insert("quantity".to_string(), json!(2));
        let order = Order::from_attrs(attrs);
        let doc = order.to_document().unwrap();
        assert_eq!(doc, json!({ "designId": "d1", "quantity": 2 }));
    }
}
