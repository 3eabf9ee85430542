//! Coordinate to bucket mapping.
//!
//! Buckets are addressed by a signed lattice key `(I, J) = (floor(x/dx),
//! floor(y/dy))`, so adjacency across the axes is a plain ±1 step. The
//! quadrant form `(quadrant, i, j)` with non-negative local indices is kept
//! as an interface for callers that think in terms of the four sign
//! combinations of the plane:
//!
//! ```text
//!          (-1, 1) | ( 0,  1)
//! (-2, 0)  (-1, 0) | ( 0,  0)  ( 1, 0)       q3 | q0
//! -----------------+------------------      ----+----
//! (-2,-1)  (-1,-1) | ( 0, -1)  ( 1,-1)       q2 | q1
//!          (-1,-2) | ( 0, -2)
//! ```

use crate::config::{ConfigError, PartitionConfig};
use crate::error::PartitionError;
use glam::DVec2;
use std::fmt;

/// Signed lattice coordinate of a bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    /// Column index, `floor(x / dx)`.
    pub i: i32,
    /// Row index, `floor(y / dy)`.
    pub j: i32,
}

impl BucketKey {
    /// Construct a key from lattice indices.
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// The key `(i + di, j + dj)`, saturating at the lattice edge.
    pub fn offset(self, di: i32, dj: i32) -> Self {
        Self {
            i: self.i.saturating_add(di),
            j: self.j.saturating_add(dj),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// One of the four sign combinations of the plane. Zero counts as positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Quadrant {
    /// `x >= 0, y >= 0` (tag 0).
    PosPos = 0,
    /// `x >= 0, y < 0` (tag 1).
    PosNeg = 1,
    /// `x < 0, y < 0` (tag 2).
    NegNeg = 2,
    /// `x < 0, y >= 0` (tag 3).
    NegPos = 3,
}

impl Quadrant {
    /// All quadrants in tag order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::PosPos,
        Quadrant::PosNeg,
        Quadrant::NegNeg,
        Quadrant::NegPos,
    ];

    /// Numeric tag, `0..=3`.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Parse a numeric tag. Anything outside `0..=3` is an invariant
    /// violation.
    pub fn from_tag(tag: u8) -> Result<Self, PartitionError> {
        match tag {
            0 => Ok(Self::PosPos),
            1 => Ok(Self::PosNeg),
            2 => Ok(Self::NegNeg),
            3 => Ok(Self::NegPos),
            other => Err(PartitionError::InvalidQuadrant(other)),
        }
    }

    fn from_signs(x_negative: bool, y_negative: bool) -> Self {
        match (x_negative, y_negative) {
            (false, false) => Self::PosPos,
            (false, true) => Self::PosNeg,
            (true, true) => Self::NegNeg,
            (true, false) => Self::NegPos,
        }
    }

    fn x_negative(self) -> bool {
        matches!(self, Self::NegNeg | Self::NegPos)
    }

    fn y_negative(self) -> bool {
        matches!(self, Self::PosNeg | Self::NegNeg)
    }
}

/// Maps real positions to buckets of size `dx × dy`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxIndexMapping {
    dx: f64,
    dy: f64,
}

impl BoxIndexMapping {
    /// Create a mapping with the given bucket size.
    pub fn new(dx: f64, dy: f64) -> Result<Self, ConfigError> {
        PartitionConfig::new(dx, dy).validate()?;
        Ok(Self { dx, dy })
    }

    /// Bucket width.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Bucket height.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Quadrant of a point, by the signs of its coordinates.
    pub fn quadrant_of(x: f64, y: f64) -> Quadrant {
        Quadrant::from_signs(x < 0.0, y < 0.0)
    }

    /// The bucket containing `pos`.
    ///
    /// Buckets are half-open, `[I·dx, (I+1)·dx) × [J·dy, (J+1)·dy)`, on both
    /// sides of the origin.
    pub fn bucket_of(&self, pos: DVec2) -> Result<BucketKey, PartitionError> {
        if !pos.is_finite() {
            return Err(PartitionError::NonFinitePosition { x: pos.x, y: pos.y });
        }
        let out_of_range = || PartitionError::PositionOutOfRange { x: pos.x, y: pos.y };
        let i = lattice_index(pos.x, self.dx).ok_or_else(out_of_range)?;
        let j = lattice_index(pos.y, self.dy).ok_or_else(out_of_range)?;
        Ok(BucketKey { i, j })
    }

    /// Like [`bucket_of`](Self::bucket_of), but clamps to the lattice edge
    /// instead of failing. Used for query bounds, where `pos ± radius` may
    /// lie beyond the lattice even though `pos` does not.
    pub(crate) fn bucket_of_clamped(&self, pos: DVec2) -> BucketKey {
        // Float to int `as` casts saturate.
        BucketKey {
            i: (pos.x / self.dx).floor() as i32,
            j: (pos.y / self.dy).floor() as i32,
        }
    }

    /// Non-negative quadrant-local indices of the bucket containing
    /// `(x, y)`.
    ///
    /// Away from bucket edges this is `(floor(|x|/dx), floor(|y|/dy))`. On
    /// an exact negative multiple of the spacing the point belongs to the
    /// bucket on its positive side, matching [`bucket_of`](Self::bucket_of):
    /// `x = -dx` gives local `0`, where `floor(|x|/dx)` would give `1`.
    pub fn local_indices(&self, x: f64, y: f64) -> Result<(u32, u32), PartitionError> {
        let (_, i, j) = Self::to_quadrant(self.bucket_of(DVec2::new(x, y))?);
        Ok((i, j))
    }

    /// Convert quadrant-local indices to the signed lattice key.
    pub fn to_global(quadrant: Quadrant, i: u32, j: u32) -> Result<BucketKey, PartitionError> {
        let bad = || PartitionError::InvalidLocalIndex { i, j };
        let li = i32::try_from(i).map_err(|_| bad())?;
        let lj = i32::try_from(j).map_err(|_| bad())?;
        let gi = if quadrant.x_negative() { -li - 1 } else { li };
        let gj = if quadrant.y_negative() { -lj - 1 } else { lj };
        Ok(BucketKey { i: gi, j: gj })
    }

    /// Convert a signed lattice key to `(quadrant, i, j)`. Exact inverse of
    /// [`to_global`](Self::to_global).
    pub fn to_quadrant(key: BucketKey) -> (Quadrant, u32, u32) {
        let quadrant = Quadrant::from_signs(key.i < 0, key.j < 0);
        (quadrant, local_index(key.i), local_index(key.j))
    }
}

/// `floor(v / d)` as an `i32`, or `None` if it does not fit.
fn lattice_index(v: f64, d: f64) -> Option<i32> {
    let f = (v / d).floor();
    if f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

fn local_index(g: i32) -> u32 {
    if g >= 0 {
        g as u32
    } else {
        // -g - 1 without overflowing at i32::MIN.
        !g as u32
    }
}
