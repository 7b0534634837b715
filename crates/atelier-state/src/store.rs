use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use atelier_types::{RecordId, Tag};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, trace};

use crate::action::Action;
use crate::error::{StateError, StateResult};
use crate::state::AppState;

/// Configuration for the [`StateStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Commands that may wait in the dispatch queue before senders block.
    pub queue_capacity: usize,
    /// Capacity of the change broadcast channel. Slow subscribers that fall
    /// further behind than this lose the oldest changes.
    pub change_capacity: usize,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            change_capacity: 64,
        }
    }
}

/// Notification published after each applied action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateChange {
    /// State version after the action; starts at 1 and increases by one.
    pub version: u64,
    /// Dispatch message name of the action.
    pub action: &'static str,
    /// Ids of the records the action carried.
    pub ids: Vec<RecordId>,
}

enum Command {
    Dispatch {
        action: Action,
        done: oneshot::Sender<u64>,
    },
    Snapshot {
        reply: oneshot::Sender<Arc<AppState>>,
    },
    Shutdown,
}

/// Owner of the application state tree.
///
/// Runs as a single Tokio task that drains a command queue in order, so
/// actions are applied one at a time and never re-entrantly. The task
/// stops on [`StateHandle::shutdown`] or once every handle has been dropped.
pub struct StateStore {
    state: Arc<AppState>,
    version: u64,
    commands: mpsc::Receiver<Command>,
    changes: broadcast::Sender<StateChange>,
}

impl StateStore {
    /// Start a store with an empty state. Must be called inside a Tokio
    /// runtime.
    pub fn spawn(config: &StateConfig) -> StateHandle {
        Self::spawn_with(AppState::default(), config)
    }

    /// Start a store from an existing state.
    pub fn spawn_with(initial: AppState, config: &StateConfig) -> StateHandle {
        let (commands_tx, commands_rx) = mpsc::channel(config.queue_capacity.max(1));
        let (changes, _) = broadcast::channel(config.change_capacity.max(1));

        let store = Self {
            state: Arc::new(initial),
            version: 0,
            commands: commands_rx,
            changes: changes.clone(),
        };
        tokio::spawn(store.run());

        StateHandle {
            commands: commands_tx,
            changes,
        }
    }

    async fn run(mut self) {
        debug!("state store started");
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Dispatch { action, done } => {
                    let version = self.apply(action);
                    // The dispatcher may have stopped waiting; the action
                    // stays applied either way.
                    let _ = done.send(version);
                }
                Command::Snapshot { reply } => {
                    let _ = reply.send(Arc::clone(&self.state));
                }
                Command::Shutdown => break,
            }
        }
        debug!(version = self.version, "state store stopped");
    }

    fn apply(&mut self, action: Action) -> u64 {
        let name = action.name();
        let ids = action.ids();

        // Clones the tree only if a reader still holds the current snapshot.
        let current = std::mem::take(&mut self.state);
        self.state = Arc::new(Arc::unwrap_or_clone(current).apply(action));
        self.version += 1;

        trace!(action = name, count = ids.len(), version = self.version, "action applied");
        let _ = self.changes.send(StateChange {
            version: self.version,
            action: name,
            ids,
        });
        self.version
    }
}

/// Cloneable handle to a running [`StateStore`].
#[derive(Clone)]
pub struct StateHandle {
    commands: mpsc::Sender<Command>,
    changes: broadcast::Sender<StateChange>,
}

impl StateHandle {
    /// Queue an action and wait until it has been applied.
    ///
    /// Returns the state version that includes the action.
    pub async fn dispatch(&self, action: Action) -> StateResult<u64> {
        let (done, applied) = oneshot::channel();
        self.commands
            .send(Command::Dispatch { action, done })
            .await
            .map_err(|_| StateError::Closed)?;
        applied.await.map_err(|_| StateError::Closed)
    }

    /// Current state. The snapshot reflects every action whose dispatch
    /// completed before this call.
    pub async fn snapshot(&self) -> StateResult<Arc<AppState>> {
        let (reply, snapshot) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| StateError::Closed)?;
        snapshot.await.map_err(|_| StateError::Closed)
    }

    /// The current tag dictionary.
    pub async fn tags(&self) -> StateResult<BTreeMap<RecordId, Tag>> {
        Ok(self.snapshot().await?.tags().clone())
    }

    /// Receive a [`StateChange`] for every action applied from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    /// Stop the store after every command queued before this one.
    /// Later calls on any handle fail with [`StateError::Closed`].
    pub async fn shutdown(&self) -> StateResult<()> {
        self.commands
            .send(Command::Shutdown)
            .await
            .map_err(|_| StateError::Closed)
    }

    /// `true` once the store task has stopped.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

impl fmt::Debug for StateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHandle")
            .field("closed", &self.is_closed())
            .field("subscribers", &self.changes.receiver_count())
            .finish()
    }
}
