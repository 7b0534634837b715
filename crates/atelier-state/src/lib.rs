//! Local application state for Atelier.
//!
//! The state tree holds normalized collections keyed by id. It is never
//! mutated in place by callers: every change is an [`Action`] sent through a
//! [`StateHandle`] to the one task that owns the tree, which applies actions
//! strictly one at a time and publishes a new immutable [`AppState`] after
//! each.
//!
//! # Design Rules
//!
//! 1. One owner: only the store task touches the tree.
//! 2. Dispatch is a queue, not a lock. A dispatch issued while another is
//!    being applied waits its turn; it is never rejected or re-entered.
//! 3. Readers get `Arc<AppState>` snapshots that never change under them.
//! 4. Records without an id are not stored.

pub mod action;
pub mod error;
pub mod state;
pub mod store;

pub use action::Action;
pub use error::{StateError, StateResult};
pub use state::AppState;
pub use store::{StateChange, StateConfig, StateHandle, StateStore};
