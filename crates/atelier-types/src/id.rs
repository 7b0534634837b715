use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Remote key of a record.
///
/// Keys are either assigned by the client (designs, layers) or generated by
/// the store on append (orders). They are opaque strings; the only
/// structure Atelier relies on is ordering, which matches the store's key
/// ordering.
#[derive(
    Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the default id, i.e. a record whose key has not been
    /// filled in yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A set of ids in the store's native shape: `{ "<id>": true, ... }`.
///
/// Values are kept as raw JSON when read so that sets written by other
/// clients (which sometimes store a payload instead of `true`) still load.
pub type IdSet = BTreeMap<RecordId, Value>;

/// Convert a list of ids into the `{ id: true }` set shape.
pub fn id_set<'a, I>(ids: I) -> IdSet
where
    I: IntoIterator<Item = &'a RecordId>,
{
    ids.into_iter()
        .map(|id| (id.clone(), Value::Bool(true)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_key() {
        let id = RecordId::new("-Kx9design");
        assert_eq!(id.to_string(), "-Kx9design");
        assert_eq!(format!("{id:?}"), "RecordId(-Kx9design)");
    }

    #[test]
    fn serializes_transparently() {
        let id = RecordId::from("abc");
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("abc"));
        let back: RecordId = serde_json::from_value(serde_json::json!("abc")).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn id_set_marks_every_id_true() {
        let ids = vec![RecordId::from("b"), RecordId::from("a")];
        let set = id_set(&ids);
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            serde_json::json!({ "a": true, "b": true })
        );
    }

    #[test]
    fn map_lookup_by_str() {
        let set = id_set(&[RecordId::from("tag-1")]);
        assert!(set.contains_key("tag-1"));
    }
}
