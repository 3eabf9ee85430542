//! Core types for cellmesh simulations.
//!
//! This is the leaf crate of the workspace. It defines the identifiers,
//! error types and the node / element / cell data model that the spatial
//! partition reads through the [`MeshView`] trait.
//!
//! Entities live in a central arena ([`Tissue`]) and refer to each other by
//! id. Nothing holds an owning reference to anything else, so removing a
//! cell's nodes and elements is an id invalidation rather than a pointer
//! chase.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod tissue;
pub mod traits;

pub use error::MeshError;
pub use glam::DVec2;
pub use id::{CellId, ElementId, NodeId};
pub use tissue::{Cell, Element, Node, Tissue};
pub use traits::MeshView;
