//! cellmesh: spatial partitioning for deformable polygon cell simulations.
//!
//! This is the facade crate re-exporting the public API of the cellmesh
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use cellmesh::prelude::*;
//!
//! let mut tissue = Tissue::new();
//! let a = tissue.add_node(DVec2::new(0.0, 0.0));
//! let b = tissue.add_node(DVec2::new(1.0, 0.0));
//! let probe = tissue.add_node(DVec2::new(1.0, 1.0));
//! let edge = tissue.add_element(a, b).unwrap();
//!
//! let mut partition = SpacePartition::build(&tissue, PartitionConfig::default()).unwrap();
//! assert!(partition.query_neighbors(&tissue, probe, 0.2).unwrap().is_empty());
//! assert!(partition.query_neighbors(&tissue, probe, 1.5).unwrap().contains(&edge));
//!
//! // After every integration step, report each moved node.
//! tissue.move_node(a, DVec2::new(0.0, 0.31)).unwrap();
//! partition.on_node_moved(&tissue, a).unwrap();
//! assert!(partition.audit(&tissue).unwrap().is_clean());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`mesh`] | `cellmesh-core` | Ids, `Tissue` arena, `MeshView`, `MeshError` |
//! | [`space`] | `cellmesh-space` | Bucket mapping, grid, updater, queries, audit |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Node / element / cell data model (`cellmesh-core`).
pub use cellmesh_core as mesh;

/// Spatial partition (`cellmesh-space`).
///
/// [`space::SpacePartition`] is the entry point; [`space::BoxIndexMapping`]
/// and [`space::SpatialGrid`] expose the underlying bucket lattice.
pub use cellmesh_space as space;

/// Common imports for typical cellmesh usage.
pub mod prelude {
    // Mesh
    pub use cellmesh_core::{CellId, DVec2, ElementId, MeshView, NodeId, Tissue};

    // Errors
    pub use cellmesh_core::MeshError;
    pub use cellmesh_space::PartitionError;

    // Partition
    pub use cellmesh_space::{CandidateMode, Diagnostics, PartitionConfig, SpacePartition};
}
