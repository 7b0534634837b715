/// Implement [`Record`](crate::Record) for a record whose remote document is
/// its own serde shape (no links to normalize).
macro_rules! flat_record {
    ($ty:ty, $collection:expr) => {
        impl $crate::link::Record for $ty {
            const COLLECTION: $crate::collection::Collection = $collection;

            fn id(&self) -> &$crate::id::RecordId {
                &self.id
            }

            fn from_document(
                id: $crate::id::RecordId,
                doc: serde_json::Value,
            ) -> $crate::error::TypeResult<Self> {
                let mut record: Self = serde_json::from_value(doc)
                    .map_err(|e| $crate::link::invalid_document($collection, &id, e))?;
                record.id = id;
                Ok(record)
            }

            fn to_document(&self) -> $crate::error::TypeResult<serde_json::Value> {
                Ok(serde_json::to_value(self)?)
            }
        }
    };
}
