//! Spatial partition for cellmesh simulations.
//!
//! A [`SpacePartition`] distributes every node, and every non-internal
//! element, into fixed-size buckets of an unbounded 2D lattice. The outer
//! simulation calls three entry points:
//!
//! - [`SpacePartition::build`] once, to register the initial mesh;
//! - [`SpacePartition::on_node_moved`] after integrating each node, which
//!   relocates the node and repairs the bucket spans of its elements;
//! - [`SpacePartition::query_neighbors`] from interaction forces, which
//!   returns the elements within a radius of a node.
//!
//! # Layout
//!
//! ```text
//! SpacePartition
//! ├── PartitionConfig   (bucket size, candidate mode)
//! └── SpatialGrid
//!     ├── BoxIndexMapping   position → BucketKey
//!     ├── IndexMap<BucketKey, Bucket>   lazily created, pruned when empty
//!     └── Diagnostics       duplicate / missing registration counters
//! ```
//!
//! Element spans are an intentional over-approximation: an element is
//! registered in every bucket of the rectangle between its endpoint
//! buckets (see [`BucketRect`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod audit;
pub mod bucket;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod mapping;
pub mod partition;
pub mod query;
pub mod span;
pub mod update;

pub use audit::{AuditReport, MisplacedNode, SpanMismatch};
pub use bucket::Bucket;
pub use config::{CandidateMode, ConfigError, PartitionConfig};
pub use diagnostics::Diagnostics;
pub use error::PartitionError;
pub use grid::SpatialGrid;
pub use mapping::{BoxIndexMapping, BucketKey, Quadrant};
pub use partition::SpacePartition;
pub use span::{BucketRect, SpanDiff};
