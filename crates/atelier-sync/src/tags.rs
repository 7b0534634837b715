use std::collections::BTreeMap;
use std::sync::Arc;

use atelier_remote::{Handle, RemoteStore};
use atelier_state::{Action, StateHandle};
use atelier_types::{Link, RecordId, Tag};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};

/// Outcome of [`TagCache::ensure_loaded`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagLoad {
    /// Local state already held tags; nothing was fetched.
    Cached,
    /// The dictionary was fetched and dispatched with this many tags.
    Loaded(usize),
}

/// Loads the remote tag dictionary into local state at most once.
///
/// Concurrent callers that find the dictionary empty wait on a single
/// in-flight fetch instead of each issuing their own.
pub struct TagCache {
    tags: Handle<Tag>,
    state: StateHandle,
    loading: Mutex<()>,
}

impl TagCache {
    pub fn new(remote: Arc<dyn RemoteStore>, state: StateHandle) -> Self {
        Self {
            tags: Handle::new(remote),
            state,
            loading: Mutex::new(()),
        }
    }

    async fn is_cached(&self) -> SyncResult<bool> {
        Ok(!self.state.snapshot().await?.tags().is_empty())
    }

    /// Make sure local state holds the tag dictionary.
    pub async fn ensure_loaded(&self) -> SyncResult<TagLoad> {
        if self.is_cached().await? {
            debug!("tag dictionary cached");
            return Ok(TagLoad::Cached);
        }

        let _guard = self.loading.lock().await;
        // The fetch we waited on may have filled the dictionary.
        if self.is_cached().await? {
            return Ok(TagLoad::Cached);
        }

        let tags = self.tags.get_all().await?;
        let count = tags.len();
        self.state.dispatch(Action::AddManyTags(tags)).await?;
        info!(count, "tag dictionary loaded");
        Ok(TagLoad::Loaded(count))
    }
}

/// Replace each tag link with the dictionary entry of the same id.
///
/// An id missing from the dictionary is an error when `strict`, otherwise it
/// stays a bare id so that writing the owner back keeps it.
pub(crate) fn resolve_tags(
    links: &[Link<Tag>],
    dictionary: &BTreeMap<RecordId, Tag>,
    owner: &RecordId,
    strict: bool,
) -> SyncResult<Vec<Link<Tag>>> {
    let mut resolved = Vec::with_capacity(links.len());
    for link in links {
        match dictionary.get(link.id()) {
            Some(tag) => resolved.push(Link::resolved_from(tag.clone())),
            None if strict => {
                return Err(SyncError::UnknownTag {
                    owner: owner.clone(),
                    tag: link.id().clone(),
                })
            }
            None => {
                warn!(%owner, tag = %link.id(), "keeping unknown tag unresolved");
                resolved.push(Link::Id(link.id().clone()));
            }
        }
    }
    Ok(resolved)
}
