//! Remote document store client for Atelier.
//!
//! The remote store is a keyed JSON document store split into logical
//! [`Collection`](atelier_types::Collection)s. This crate defines the
//! operations Atelier consumes from it and nothing more: point reads,
//! collection reads, point writes, shallow updates, and appends with a
//! store-generated key. There is no live-subscription support.
//!
//! # Storage Backends
//!
//! All backends implement the [`RemoteStore`] trait:
//!
//! - [`InMemoryRemoteStore`] -- `HashMap`-based store for tests and embedding,
//!   with operation counters and fault injection
//!
//! # Typed Access
//!
//! [`Handle`] binds a store to one record type, converting documents to
//! records and filling each record's id from its key.

pub mod error;
pub mod handle;
pub mod memory;
pub mod traits;

pub use error::{RemoteError, RemoteResult};
pub use handle::Handle;
pub use memory::{InMemoryRemoteStore, RemoteStats};
pub use traits::RemoteStore;
