//! Counters for non-fatal registration mismatches.

use std::fmt;

/// Running totals of recoverable grid/mesh disagreements.
///
/// Neither kind aborts an operation. Duplicates are expected while a mesh
/// is being assembled; missing registrations are rare and point at a caller
/// that skipped an update (or mutated an element before removing it).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Inserts of an id already present in the target bucket.
    pub duplicate_registrations: u64,
    /// Removals of an id absent from the target bucket.
    pub missing_registrations: u64,
}

impl Diagnostics {
    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        self.duplicate_registrations + self.missing_registrations
    }

    /// `true` if no removal ever missed. Duplicates are not counted against
    /// cleanliness.
    pub fn is_clean(&self) -> bool {
        self.missing_registrations == 0
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} duplicate registration(s), {} missing registration(s)",
            self.duplicate_registrations, self.missing_registrations
        )
    }
}
