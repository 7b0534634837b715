//! Foundation types for Atelier.
//!
//! Atelier designs are stored in a remote keyed document store in normalized
//! form (relationships as bare ids) and held in memory in denormalized form
//! (relationships as embedded records). This crate defines both shapes and
//! the conversions between them. Every other Atelier crate depends on
//! `atelier-types`.
//!
//! # Key Types
//!
//! - [`RecordId`] -- remote key of any record
//! - [`Collection`] -- logical remote collection a record lives in
//! - [`Link`] -- a relationship that is either a bare id or a resolved record
//! - [`Record`] -- conversion between a record and its remote document
//! - [`Design`], [`Layer`], [`Surface`] -- denormalizable records
//! - [`DesignRecord`], [`LayerRecord`], [`SurfaceRecord`] -- their normalized
//!   remote shapes
//! - [`SurfaceOption`] -- a purchasable size/variant of a surface, with the
//!   derived `size` label
//!
//! # Invariants
//!
//! 1. Remote documents omit their own id; every record read from the store
//!    has its id filled from the remote key.
//! 2. A [`Link`] is either an id or a resolved record, never both.
//! 3. `to_record` of a hydrated value recovers the bare-id shape it was
//!    hydrated from.

#[macro_use]
mod macros;

pub mod collection;
pub mod design;
pub mod error;
pub mod id;
pub mod link;
pub mod records;
pub mod surface;

pub use collection::Collection;
pub use design::{Design, DesignRecord, Layer, LayerRecord};
pub use error::{TypeError, TypeResult};
pub use id::{id_set, IdSet, RecordId};
pub use link::{Link, Record};
pub use records::{ColorPalette, LayerImage, Order, Tag};
pub use surface::{Dimension, Surface, SurfaceOption, SurfaceRecord, NON_OPTION_KEYS};
