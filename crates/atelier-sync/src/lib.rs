//! Hydration and persistence for Atelier.
//!
//! Connects a [`RemoteStore`](atelier_remote::RemoteStore) to the local
//! [`StateStore`](atelier_state::StateStore):
//!
//! - [`Hydrator`]: loads a design's full object graph (layers with their
//!   images, palettes and tags; the surface with its options) and dispatches
//!   every resolved record into local state
//! - [`Persister`]: writes designs back in normalized form, creates orders,
//!   and applies partial updates
//! - [`TagCache`]: loads the tag dictionary at most once
//! - [`bulk`]: whole-collection loaders
//! - [`Session`]: wires the above to one remote store and one state store
//!
//! # Failure Policy
//!
//! Every failure is a typed [`SyncError`]. Nothing is retried and nothing
//! already dispatched is rolled back: a hydration that fails halfway leaves
//! the records it resolved before the failure in local state.

pub mod bulk;
pub mod config;
pub mod error;
pub mod hydrate;
pub mod persist;
pub mod session;
pub mod tags;
pub mod telemetry;

#[cfg(test)]
mod fixtures;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use hydrate::Hydrator;
pub use persist::{try_update_layer_of_design, update_layer_of_design, Persister, RefUpdater};
pub use session::Session;
pub use tags::{TagCache, TagLoad};
pub use telemetry::init_tracing;
