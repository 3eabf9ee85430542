//! Error types for partition operations.

use crate::config::ConfigError;
use cellmesh_core::MeshError;
use std::error::Error;
use std::fmt;

/// Errors that abort a partition operation.
///
/// Every variant is fatal for the current simulation step: it means an
/// invariant upstream has already been broken. Recoverable disagreements
/// between the grid and the mesh (an id inserted twice, or removed from a
/// bucket it is not in) are not errors; they are logged and counted in
/// [`Diagnostics`](crate::Diagnostics).
#[derive(Clone, Debug, PartialEq)]
pub enum PartitionError {
    /// A quadrant tag outside `0..=3` reached the index mapping.
    InvalidQuadrant(u8),
    /// A quadrant-local index too large for the signed lattice.
    InvalidLocalIndex {
        /// Local index along x.
        i: u32,
        /// Local index along y.
        j: u32,
    },
    /// A position with a NaN or infinite coordinate.
    NonFinitePosition {
        /// The x coordinate.
        x: f64,
        /// The y coordinate.
        y: f64,
    },
    /// A finite position whose bucket index does not fit in `i32`.
    PositionOutOfRange {
        /// The x coordinate.
        x: f64,
        /// The y coordinate.
        y: f64,
    },
    /// A query radius that is negative or not finite.
    InvalidRadius(f64),
    /// The partition configuration failed validation.
    Config(ConfigError),
    /// A node or element lookup failed.
    Mesh(MeshError),
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidQuadrant(q) => {
                write!(f, "quadrant must be 0, 1, 2 or 3; got {q}")
            }
            Self::InvalidLocalIndex { i, j } => {
                write!(f, "local bucket index ({i}, {j}) exceeds the lattice range")
            }
            Self::NonFinitePosition { x, y } => {
                write!(f, "position ({x}, {y}) is not finite")
            }
            Self::PositionOutOfRange { x, y } => {
                write!(f, "position ({x}, {y}) lies outside the bucket lattice")
            }
            Self::InvalidRadius(r) => {
                write!(f, "query radius must be finite and >= 0, got {r}")
            }
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Mesh(e) => write!(f, "mesh: {e}"),
        }
    }
}

impl Error for PartitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Mesh(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MeshError> for PartitionError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}

impl From<ConfigError> for PartitionError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
