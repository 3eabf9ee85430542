//! Partition configuration and validation.

use std::error::Error;
use std::fmt;

/// Which buckets a neighbour query inspects before the exact filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CandidateMode {
    /// Visit the anchor's own bucket plus only those neighbours the query
    /// radius actually reaches. Best when buckets are large relative to the
    /// radius, or nodes are dense.
    #[default]
    Proximity,
    /// Always visit the full 3×3 neighbourhood (more if the radius reaches
    /// further). Skips the per-axis boundary tests, which can win when
    /// buckets are small compared to element length.
    AllAdjacent,
}

/// Configuration for a [`SpacePartition`](crate::SpacePartition).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartitionConfig {
    /// Bucket width along x. Default: 0.3.
    pub dx: f64,
    /// Bucket height along y. Default: 0.3.
    pub dy: f64,
    /// Candidate gathering strategy. Default: [`CandidateMode::Proximity`].
    pub candidate_mode: CandidateMode,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            dx: 0.3,
            dy: 0.3,
            candidate_mode: CandidateMode::Proximity,
        }
    }
}

impl PartitionConfig {
    /// Configuration with the given bucket size and default candidate mode.
    pub fn new(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            ..Self::default()
        }
    }

    /// Set the candidate gathering strategy.
    pub fn with_candidate_mode(mut self, mode: CandidateMode) -> Self {
        self.candidate_mode = mode;
        self
    }

    /// Check that both bucket dimensions are finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_spacing("dx", self.dx)?;
        check_spacing("dy", self.dy)?;
        Ok(())
    }
}

fn check_spacing(axis: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSpacing { axis, value })
    }
}

/// Errors detected by [`PartitionConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A bucket dimension is zero, negative, NaN or infinite.
    InvalidSpacing {
        /// `"dx"` or `"dy"`.
        axis: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpacing { axis, value } => {
                write!(f, "bucket spacing {axis} must be finite and > 0, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}
