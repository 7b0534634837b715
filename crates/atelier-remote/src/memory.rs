use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use atelier_types::{Collection, RecordId};
use serde_json::Value;
use tracing::trace;

use crate::error::{RemoteError, RemoteResult};
use crate::traits::RemoteStore;

/// Snapshot of the operations an [`InMemoryRemoteStore`] has served.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemoteStats {
    pub gets: u64,
    pub get_alls: u64,
    pub sets: u64,
    pub updates: u64,
    pub pushes: u64,
}

impl RemoteStats {
    /// Total number of write operations (set, update, push).
    pub fn writes(&self) -> u64 {
        self.sets + self.updates + self.pushes
    }
}

#[derive(Debug, Default)]
struct Counters {
    gets: AtomicU64,
    get_alls: AtomicU64,
    sets: AtomicU64,
    updates: AtomicU64,
    pushes: AtomicU64,
}

#[derive(Debug, Default)]
struct Faults {
    reads: HashSet<(Collection, RecordId)>,
    writes: HashSet<Collection>,
}

type Collections = HashMap<Collection, BTreeMap<RecordId, Value>>;

/// In-memory, HashMap-based remote store.
///
/// Intended for tests and embedding. Documents are held behind a `RwLock`
/// and cloned on read/write. Every trait call is counted (see
/// [`stats`](Self::stats)); seeding and inspection helpers are not.
#[derive(Debug, Default)]
pub struct InMemoryRemoteStore {
    collections: RwLock<Collections>,
    faults: RwLock<Faults>,
    counters: Counters,
}

impl InMemoryRemoteStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without counting it as a write.
    pub fn insert(&self, collection: Collection, id: impl Into<RecordId>, doc: Value) {
        if let Ok(mut map) = self.collections.write() {
            map.entry(collection).or_default().insert(id.into(), doc);
        }
    }

    /// Inspect one stored document.
    pub fn document(&self, collection: Collection, id: &str) -> Option<Value> {
        let map = self.collections.read().ok()?;
        map.get(&collection)?.get(id).cloned()
    }

    /// Number of documents stored in a collection.
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .map(|map| map.get(&collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    /// Make every subsequent read of `collection/id` fail.
    pub fn fail_reads_of(&self, collection: Collection, id: impl Into<RecordId>) {
        if let Ok(mut faults) = self.faults.write() {
            faults.reads.insert((collection, id.into()));
        }
    }

    /// Make every subsequent write to `collection` fail.
    pub fn fail_writes_to(&self, collection: Collection) {
        if let Ok(mut faults) = self.faults.write() {
            faults.writes.insert(collection);
        }
    }

    /// Remove all injected faults.
    pub fn clear_faults(&self) {
        if let Ok(mut faults) = self.faults.write() {
            *faults = Faults::default();
        }
    }

    /// Operations served so far.
    pub fn stats(&self) -> RemoteStats {
        RemoteStats {
            gets: self.counters.gets.load(Ordering::Relaxed),
            get_alls: self.counters.get_alls.load(Ordering::Relaxed),
            sets: self.counters.sets.load(Ordering::Relaxed),
            updates: self.counters.updates.load(Ordering::Relaxed),
            pushes: self.counters.pushes.load(Ordering::Relaxed),
        }
    }

    fn check_read(&self, collection: Collection, id: &RecordId) -> RemoteResult<()> {
        let faults = self.faults.read().map_err(poisoned)?;
        if faults.reads.contains(&(collection, id.clone())) {
            return Err(RemoteError::ReadFailed {
                collection,
                id: id.clone(),
                reason: "injected fault".into(),
            });
        }
        Ok(())
    }

    fn check_write(&self, collection: Collection, id: &RecordId) -> RemoteResult<()> {
        let faults = self.faults.read().map_err(poisoned)?;
        if faults.writes.contains(&collection) {
            return Err(RemoteError::Rejected {
                collection,
                id: id.clone(),
                reason: "injected fault".into(),
            });
        }
        Ok(())
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> RemoteError {
    RemoteError::Unavailable(format!("lock poisoned: {e}"))
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn get(&self, collection: Collection, id: &RecordId) -> RemoteResult<Option<Value>> {
        self.counters.gets.fetch_add(1, Ordering::Relaxed);
        self.check_read(collection, id)?;
        let map = self.collections.read().map_err(poisoned)?;
        Ok(map.get(&collection).and_then(|c| c.get(id)).cloned())
    }

    async fn get_all(&self, collection: Collection) -> RemoteResult<BTreeMap<RecordId, Value>> {
        self.counters.get_alls.fetch_add(1, Ordering::Relaxed);
        // A collection read fails if any of its documents is marked faulty.
        {
            let faults = self.faults.read().map_err(poisoned)?;
            if let Some((_, id)) = faults.reads.iter().find(|(c, _)| *c == collection) {
                return Err(RemoteError::ReadFailed {
                    collection,
                    id: id.clone(),
                    reason: "injected fault".into(),
                });
            }
        }
        let map = self.collections.read().map_err(poisoned)?;
        Ok(map.get(&collection).cloned().unwrap_or_default())
    }

    async fn set(&self, collection: Collection, id: &RecordId, doc: Value) -> RemoteResult<()> {
        self.counters.sets.fetch_add(1, Ordering::Relaxed);
        self.check_write(collection, id)?;
        let mut map = self.collections.write().map_err(poisoned)?;
        let docs = map.entry(collection).or_default();
        if doc.is_null() {
            docs.remove(id);
        } else {
            docs.insert(id.clone(), doc);
        }
        trace!(%collection, %id, "set");
        Ok(())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &RecordId,
        partial: Value,
    ) -> RemoteResult<()> {
        self.counters.updates.fetch_add(1, Ordering::Relaxed);
        self.check_write(collection, id)?;
        let Value::Object(fields) = partial else {
            return Err(RemoteError::InvalidUpdate {
                collection,
                id: id.clone(),
            });
        };

        let mut map = self.collections.write().map_err(poisoned)?;
        let doc = map
            .entry(collection)
            .or_default()
            .entry(id.clone())
            .or_insert_with(|| Value::Object(Default::default()));
        if !doc.is_object() {
            *doc = Value::Object(Default::default());
        }
        if let Value::Object(target) = doc {
            for (key, value) in fields {
                if value.is_null() {
                    target.remove(&key);
                } else {
                    target.insert(key, value);
                }
            }
        }
        trace!(%collection, %id, "update");
        Ok(())
    }

    async fn push(&self, collection: Collection, doc: Value) -> RemoteResult<RecordId> {
        self.counters.pushes.fetch_add(1, Ordering::Relaxed);
        let id = RecordId::new(uuid::Uuid::now_v7().to_string());
        self.check_write(collection, &id)?;
        let mut map = self.collections.write().map_err(poisoned)?;
        map.entry(collection).or_default().insert(id.clone(), doc);
        trace!(%collection, %id, "push");
        Ok(id)
    }
}
