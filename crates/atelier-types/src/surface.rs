use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::collection::Collection;
use crate::error::TypeResult;
use crate::id::{IdSet, RecordId};
use crate::link::{invalid_document, Link, Record};

/// Surface option keys that describe pricing, dimensions, or bookkeeping
/// rather than a choice the buyer makes.
pub const NON_OPTION_KEYS: &[&str] = &[
    "id",
    "printingPrice",
    "salePrice",
    "units",
    "vendorId",
    "height",
    "width",
    "depth",
    "printingImageWidth",
    "printingImageHeight",
];

/// A physical dimension as stored remotely: usually a number, sometimes a
/// pre-formatted string such as `"8.5"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Number(Number),
    Text(String),
}

impl Dimension {
    /// A dimension counts as present only when it is a non-zero number or a
    /// non-empty string. Zero and `""` are treated like a missing value.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Dimension {
    fn from(v: u64) -> Self {
        Self::Number(v.into())
    }
}

impl From<&str> for Dimension {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// One purchasable variant of a surface (size, finish, price).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceOption {
    #[serde(default, skip_serializing_if = "RecordId::is_empty")]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Human-readable size label, derived by [`SurfaceOption::with_size`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, Value>,
}

impl SurfaceOption {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Attach the derived `size` label.
    ///
    /// `"<height> x <width> <units>"`, or `"<height> x <width> x <depth>
    /// <units>"` when a depth is present. An option without both height and
    /// width is returned unchanged. Recomputing yields the same label.
    pub fn with_size(mut self) -> Self {
        if let Some(size) = self.size_label() {
            self.size = Some(size);
        }
        self
    }

    fn size_label(&self) -> Option<String> {
        let height = self.height.as_ref().filter(|d| d.is_present())?;
        let width = self.width.as_ref().filter(|d| d.is_present())?;

        let mut label = match self.depth.as_ref().filter(|d| d.is_present()) {
            Some(depth) => format!("{height} x {width} x {depth}"),
            None => format!("{height} x {width}"),
        };
        if let Some(units) = self.units.as_deref().filter(|u| !u.is_empty()) {
            label.push(' ');
            label.push_str(units);
        }
        Some(label)
    }

    /// Attributes that describe a buyer-facing choice, i.e. everything
    /// outside [`NON_OPTION_KEYS`] and the derived size.
    pub fn option_attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs
            .iter()
            .filter(|(k, _)| k.as_str() != "size" && !NON_OPTION_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v))
    }
}

flat_record!(SurfaceOption, Collection::SurfaceOptions);

/// Normalized remote shape of a [`Surface`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceRecord {
    #[serde(default, skip_serializing_if = "RecordId::is_empty")]
    pub id: RecordId,
    /// Option ids keyed in the `{ id: true }` set shape.
    #[serde(default)]
    pub options: IdSet,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, Value>,
}

/// A printable product (canvas, mug, poster...) with its purchasable options.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Surface {
    pub id: RecordId,
    /// Options in remote key order.
    pub options: Vec<Link<SurfaceOption>>,
    pub attrs: BTreeMap<String, Value>,
}

impl Surface {
    pub fn from_record(record: SurfaceRecord) -> Self {
        Self {
            id: record.id,
            options: record.options.into_keys().map(Link::Id).collect(),
            attrs: record.attrs,
        }
    }

    pub fn to_record(&self) -> SurfaceRecord {
        SurfaceRecord {
            id: self.id.clone(),
            options: crate::id::id_set(self.options.iter().map(Link::id)),
            attrs: self.attrs.clone(),
        }
    }

    /// Id of the option a new design on this surface starts with.
    pub fn default_option_id(&self) -> Option<&RecordId> {
        self.options.first().map(Link::id)
    }

    /// Find a resolved option by id.
    pub fn option(&self, id: &RecordId) -> Option<&SurfaceOption> {
        self.options
            .iter()
            .filter_map(Link::resolved)
            .find(|o| &o.id == id)
    }

    /// `true` once every option link has been resolved.
    pub fn is_hydrated(&self) -> bool {
        self.options.iter().all(Link::is_resolved)
    }
}

impl Record for Surface {
    const COLLECTION: Collection = Collection::Surfaces;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_document(id: RecordId, doc: Value) -> TypeResult<Self> {
        let mut record: SurfaceRecord =
            serde_json::from_value(doc).map_err(|e| invalid_document(Self::COLLECTION, &id, e))?;
        record.id = id;
        Ok(Self::from_record(record))
    }

    fn to_document(&self) -> TypeResult<Value> {
        Ok(serde_json::to_value(self.to_record())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn n(v: u64) -> Option<Dimension> {
        Some(Dimension::from(v))
    }

    fn option(
        height: Option<Dimension>,
        width: Option<Dimension>,
        depth: Option<Dimension>,
    ) -> SurfaceOption {
        SurfaceOption {
            id: "opt".into(),
            height,
            width,
            depth,
            units: Some("in".into()),
            ..Default::default()
        }
    }

    #[test]
    fn size_without_depth() {
        let opt = option(n(16), n(20), None).with_size();
        assert_eq!(opt.size.as_deref(), Some("16 x 20 in"));
    }

    #[test]
    fn size_with_depth() {
        let opt = option(n(16), n(20), Some(Dimension::from("1.5"))).with_size();
        assert_eq!(opt.size.as_deref(), Some("16 x 20 x 1.5 in"));
    }

    #[test]
    fn missing_width_leaves_option_unchanged() {
        let before = option(n(16), None, n(2));
        assert_eq!(before.clone().with_size(), before);
    }

    #[test]
    fn zero_dimension_counts_as_missing() {
        let before = option(n(0), n(20), None);
        assert_eq!(before.clone().with_size(), before);

        let opt = option(n(16), n(20), n(0)).with_size();
        assert_eq!(opt.size.as_deref(), Some("16 x 20 in"));
    }

    #[test]
    fn fractional_numbers_keep_their_digits() {
        let doc = json!({ "height": 8.5, "width": 11, "units": "in" });
        let opt = SurfaceOption::from_document("o".into(), doc).unwrap().with_size();
        assert_eq!(opt.size.as_deref(), Some("8.5 x 11 in"));
    }

    #[test]
    fn option_attributes_skip_bookkeeping_keys() {
        let doc = json!({
            "height": 10, "width": 10, "units": "cm",
            "salePrice": 40, "vendorId": "v1", "finish": "matte", "frame": "oak",
        });
        let opt = SurfaceOption::from_document("o".into(), doc).unwrap();
        let keys: Vec<&str> = opt.option_attributes().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["finish", "frame"]);
    }

    #[test]
    fn surface_options_follow_key_order() {
        let doc = json!({ "name": "Canvas", "options": { "b": true, "a": true, "c": true } });
        let surface = Surface::from_document("s1".into(), doc).unwrap();
        let ids: Vec<&str> = surface.options.iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(surface.default_option_id(), Some(&RecordId::from("a")));
        assert!(!surface.is_hydrated());
    }

    #[test]
    fn surface_record_round_trip() {
        let doc = json!({ "name": "Mug", "options": { "o1": true, "o2": true } });
        let surface = Surface::from_document("s".into(), doc).unwrap();
        let out = surface.to_document().unwrap();
        assert_eq!(out, json!({ "id": "s", "name": "Mug", "options": { "o1": true, "o2": true } }));
    }

    #[test]
    fn surface_without_options_has_no_default() {
        let surface = Surface::from_document("s".into(), json!({})).unwrap();
        assert!(surface.default_option_id().is_none());
    }

    proptest! {
        #[test]
        fn size_label_format(
            h in 1u64..500,
            w in 1u64..500,
            d in proptest::option::of(1u64..50),
            units in "[a-z]{1,3}"
        ) {
            let opt = SurfaceOption {
                id: "p".into(),
                height: Some(h.into()),
                width: Some(w.into()),
                depth: d.map(Dimension::from),
                units: Some(units.clone()),
                ..Default::default()
            };
            let sized = opt.with_size();
            let expected = match d {
                Some(d) => format!("{h} x {w} x {d} {units}"),
                None => format!("{h} x {w} {units}"),
            };
            prop_assert_eq!(sized.size.as_deref(), Some(expected.as_str()));
            prop_assert_eq!(sized.clone().with_size(), sized);
        }
    }
}
