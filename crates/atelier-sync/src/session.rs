use std::sync::Arc;

use atelier_remote::RemoteStore;
use atelier_state::{StateHandle, StateStore};

use crate::config::SyncConfig;
use crate::hydrate::Hydrator;
use crate::persist::Persister;
use crate::tags::TagCache;

/// One remote store, one local state store, and the services between them.
#[derive(Clone)]
pub struct Session {
    remote: Arc<dyn RemoteStore>,
    state: StateHandle,
    tags: Arc<TagCache>,
    hydrator: Hydrator,
    persister: Persister,
}

impl Session {
    /// Spawn a state store per `config.state` and wire it to `remote`.
    /// Must be called inside a Tokio runtime.
    pub fn start(remote: Arc<dyn RemoteStore>, config: &SyncConfig) -> Self {
        let state = StateStore::spawn(&config.state);
        let tags = Arc::new(TagCache::new(Arc::clone(&remote), state.clone()));
        let hydrator = Hydrator::new(
            Arc::clone(&remote),
            state.clone(),
            Arc::clone(&tags),
            config,
        );
        let persister = Persister::new(Arc::clone(&remote), config);
        Self {
            remote,
            state,
            tags,
            hydrator,
            persister,
        }
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub fn tags(&self) -> &TagCache {
        &self.tags
    }

    pub fn hydrator(&self) -> &Hydrator {
        &self.hydrator
    }

    pub fn persister(&self) -> &Persister {
        &self.persister
    }
}
