//! Element spans: the block of buckets an element is registered in.

use crate::mapping::BucketKey;
use smallvec::SmallVec;

/// Inclusive rectangle of bucket keys, `lo.i..=hi.i × lo.j..=hi.j`.
///
/// An element is registered in every bucket of the rectangle spanned by
/// its two endpoint buckets. For a diagonal element this over-covers the
/// elbow corners, which only costs a few extra candidates in the query's
/// exact filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BucketRect {
    lo: BucketKey,
    hi: BucketKey,
}

impl BucketRect {
    /// The rectangle with `a` and `b` as opposite corners, in either order.
    pub fn spanning(a: BucketKey, b: BucketKey) -> Self {
        Self {
            lo: BucketKey::new(a.i.min(b.i), a.j.min(b.j)),
            hi: BucketKey::new(a.i.max(b.i), a.j.max(b.j)),
        }
    }

    /// A single bucket.
    pub fn single(key: BucketKey) -> Self {
        Self { lo: key, hi: key }
    }

    /// Lowest-indexed corner.
    pub fn lo(&self) -> BucketKey {
        self.lo
    }

    /// Highest-indexed corner.
    pub fn hi(&self) -> BucketKey {
        self.hi
    }

    /// Whether `key` lies inside the rectangle.
    pub fn contains(&self, key: BucketKey) -> bool {
        (self.lo.i..=self.hi.i).contains(&key.i) && (self.lo.j..=self.hi.j).contains(&key.j)
    }

    /// Number of buckets covered, saturating at `u64::MAX`.
    pub fn len(&self) -> u64 {
        let w = (i64::from(self.hi.i) - i64::from(self.lo.i) + 1) as u64;
        let h = (i64::from(self.hi.j) - i64::from(self.lo.j) + 1) as u64;
        w.saturating_mul(h)
    }

    /// Always `false`: a rectangle covers at least one bucket.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The rectangle grown by `n` buckets on every side.
    pub fn expand(&self, n: i32) -> Self {
        Self {
            lo: self.lo.offset(-n, -n),
            hi: self.hi.offset(n, n),
        }
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self::spanning(
            BucketKey::new(self.lo.i.min(other.lo.i), self.lo.j.min(other.lo.j)),
            BucketKey::new(self.hi.i.max(other.hi.i), self.hi.j.max(other.hi.j)),
        )
    }

    /// Keys in row-major order (`i` fastest).
    pub fn keys(&self) -> RectKeys {
        RectKeys {
            rect: *self,
            next: Some(self.lo),
        }
    }
}

/// Iterator over the keys of a [`BucketRect`].
#[derive(Clone, Debug)]
pub struct RectKeys {
    rect: BucketRect,
    next: Option<BucketKey>,
}

impl Iterator for RectKeys {
    type Item = BucketKey;

    fn next(&mut self) -> Option<BucketKey> {
        let current = self.next?;
        self.next = if current.i < self.rect.hi.i {
            Some(BucketKey::new(current.i + 1, current.j))
        } else if current.j < self.rect.hi.j {
            Some(BucketKey::new(self.rect.lo.i, current.j + 1))
        } else {
            None
        };
        Some(current)
    }
}

/// Buckets to add and remove when an element's span changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanDiff {
    /// In the new span only.
    pub added: SmallVec<[BucketKey; 16]>,
    /// In the old span only.
    pub removed: SmallVec<[BucketKey; 16]>,
}

impl SpanDiff {
    /// Difference between an old and a new span. Buckets present in both
    /// appear in neither list.
    pub fn between(old: &BucketRect, new: &BucketRect) -> Self {
        if old == new {
            return Self::default();
        }
        Self {
            added: new.keys().filter(|k| !old.contains(*k)).collect(),
            removed: old.keys().filter(|k| !new.contains(*k)).collect(),
        }
    }

    /// Whether nothing changes.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn k(i: i32, j: i32) -> BucketKey {
        BucketKey::new(i, j)
    }

    #[test]
    fn spanning_is_order_independent() {
        assert_eq!(
            BucketRect::spanning(k(3, -1), k(0, 2)),
            BucketRect::spanning(k(0, 2), k(3, -1))
        );
        let r = BucketRect::spanning(k(3, -1), k(0, 2));
        assert_eq!(r.lo(), k(0, -1));
        assert_eq!(r.hi(), k(3, 2));
        assert_eq!(r.len(), 16);
    }

    #[test]
    fn keys_cover_rectangle_row_major() {
        let keys: Vec<_> = BucketRect::spanning(k(-1, 0), k(0, 1)).keys().collect();
        assert_eq!(keys, vec![k(-1, 0), k(0, 0), k(-1, 1), k(0, 1)]);
    }

    #[test]
    fn keys_at_lattice_edge_terminate() {
        let r = BucketRect::spanning(k(i32::MAX - 1, i32::MAX), k(i32::MAX, i32::MAX));
        assert_eq!(r.keys().count(), 2);
    }

    #[test]
    fn horizontal_element_span() {
        // (0,0) → (1,0) with 0.3 buckets.
        let r = BucketRect::spanning(k(0, 0), k(3, 0));
        let keys: Vec<_> = r.keys().collect();
        assert_eq!(keys, vec![k(0, 0), k(1, 0), k(2, 0), k(3, 0)]);
    }

    #[test]
    fn diagonal_span_overcovers_elbow() {
        let r = BucketRect::spanning(k(0, 0), k(1, 1));
        assert!(r.contains(k(1, 0)));
        assert!(r.contains(k(0, 1)));
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn shared_buckets_are_untouched() {
        let old = BucketRect::spanning(k(0, 0), k(3, 0));
        let new = BucketRect::spanning(k(0, 1), k(3, 0));
        let diff = SpanDiff::between(&old, &new);
        assert!(diff.removed.is_empty());
        assert_eq!(diff.added.as_slice(), &[k(0, 1), k(1, 1), k(2, 1), k(3, 1)]);
    }

    #[test]
    fn identical_spans_diff_to_nothing() {
        let r = BucketRect::spanning(k(-2, -2), k(2, 2));
        assert!(SpanDiff::between(&r, &r).is_empty());
    }

    #[test]
    fn disjoint_spans_swap_everything() {
        let old = BucketRect::single(k(0, 0));
        let new = BucketRect::single(k(5, 5));
        let diff = SpanDiff::between(&old, &new);
        assert_eq!(diff.added.as_slice(), &[k(5, 5)]);
        assert_eq!(diff.removed.as_slice(), &[k(0, 0)]);
    }

    #[test]
    fn expand_and_union() {
        let r = BucketRect::single(k(0, 0)).expand(1);
        assert_eq!(r, BucketRect::spanning(k(-1, -1), k(1, 1)));
        let u = r.union(&BucketRect::single(k(4, 0)));
        assert_eq!(u, BucketRect::spanning(k(-1, -1), k(4, 1)));
    }

    fn arb_rect() -> impl Strategy<Value = BucketRect> {
        (-6i32..6, -6i32..6, -6i32..6, -6i32..6)
            .prop_map(|(a, b, c, d)| BucketRect::spanning(k(a, b), k(c, d)))
    }

    proptest! {
        #[test]
        fn applying_diff_yields_new_span(old in arb_rect(), new in arb_rect()) {
            use std::collections::BTreeSet;
            let diff = SpanDiff::between(&old, &new);
            let mut set: BTreeSet<_> = old.keys().collect();
            for key in &diff.removed {
                prop_assert!(set.remove(key));
            }
            for key in &diff.added {
                prop_assert!(set.insert(*key));
            }
            let expected: BTreeSet<_> = new.keys().collect();
            prop_assert_eq!(set, expected);
        }

        #[test]
        fn len_matches_key_count(r in arb_rect()) {
            prop_assert_eq!(r.keys().count() as u64, r.len());
        }
    }
}
