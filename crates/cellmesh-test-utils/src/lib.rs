//! Test utilities for cellmesh development.
//!
//! - [`fixtures`]: hand-built scenes and a seeded generator of random,
//!   non-overlapping polygon cells.
//! - [`oracle`]: O(n) per query brute-force versions of the neighbour
//!   queries, for checking the partition's bucket pre-filter.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod oracle;

pub use fixtures::{polygon_cell, random_scene, random_step, unit_square_scene, SceneParams};
pub use oracle::{brute_force_neighbors, brute_force_neighbouring_nodes};
