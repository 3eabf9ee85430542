//! Sparse bucket storage.

use crate::bucket::Bucket;
use crate::diagnostics::Diagnostics;
use crate::error::PartitionError;
use crate::mapping::{BoxIndexMapping, BucketKey, Quadrant};
use cellmesh_core::{ElementId, NodeId};
use indexmap::{IndexMap, IndexSet};

/// Sparse, lazily grown lattice of [`Bucket`]s.
///
/// A bucket exists only while it holds something: inserting into an absent
/// bucket creates it, and removing the last member drops it. Nothing is
/// sized to the simulation domain.
///
/// The insert/remove primitives here are keyed by bucket. They never fail:
/// a duplicate insert or a missing remove is a no-op that is logged and
/// counted in [`Diagnostics`].
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    mapping: BoxIndexMapping,
    buckets: IndexMap<BucketKey, Bucket>,
    diagnostics: Diagnostics,
}

impl SpatialGrid {
    /// Create an empty grid.
    pub fn new(mapping: BoxIndexMapping) -> Self {
        Self {
            mapping,
            buckets: IndexMap::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// The position → bucket mapping.
    pub fn mapping(&self) -> &BoxIndexMapping {
        &self.mapping
    }

    /// Registration mismatch counters accumulated so far.
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// The bucket at `key`, if it holds anything.
    pub fn bucket(&self, key: BucketKey) -> Option<&Bucket> {
        self.buckets.get(&key)
    }

    /// Iterate over non-empty buckets.
    pub fn buckets(&self) -> impl Iterator<Item = (BucketKey, &Bucket)> {
        self.buckets.iter().map(|(k, b)| (*k, b))
    }

    /// Node set of the bucket addressed in quadrant form.
    pub fn node_bucket_at(
        &self,
        quadrant: Quadrant,
        i: u32,
        j: u32,
    ) -> Result<Option<&IndexSet<NodeId>>, PartitionError> {
        let key = BoxIndexMapping::to_global(quadrant, i, j)?;
        Ok(self.bucket(key).map(Bucket::nodes))
    }

    /// Element set of the bucket addressed in quadrant form.
    pub fn element_bucket_at(
        &self,
        quadrant: Quadrant,
        i: u32,
        j: u32,
    ) -> Result<Option<&IndexSet<ElementId>>, PartitionError> {
        let key = BoxIndexMapping::to_global(quadrant, i, j)?;
        Ok(self.bucket(key).map(Bucket::elements))
    }

    /// Register `node` in the bucket at `key`. Returns `false` if it was
    /// already there.
    pub fn insert_node_at(&mut self, key: BucketKey, node: NodeId) -> bool {
        let inserted = self.buckets.entry(key).or_default().insert_node(node);
        if !inserted {
            log::debug!("node {node} already in bucket {key}");
            self.diagnostics.duplicate_registrations += 1;
        }
        inserted
    }

    /// Unregister `node` from the bucket at `key`. Returns `false` if it
    /// was not there.
    pub fn remove_node_at(&mut self, key: BucketKey, node: NodeId) -> bool {
        let removed = match self.buckets.get_mut(&key) {
            Some(bucket) => bucket.remove_node(node),
            None => false,
        };
        if removed {
            self.prune(key);
        } else {
            log::warn!("node {node} not found in bucket {key}");
            self.diagnostics.missing_registrations += 1;
        }
        removed
    }

    /// Register `element` in the bucket at `key`. Returns `false` if it was
    /// already there.
    pub fn insert_element_at(&mut self, key: BucketKey, element: ElementId) -> bool {
        let inserted = self
            .buckets
            .entry(key)
            .or_default()
            .insert_element(element);
        if !inserted {
            log::debug!("element {element} already in bucket {key}");
            self.diagnostics.duplicate_registrations += 1;
        }
        inserted
    }

    /// Unregister `element` from the bucket at `key`. Returns `false` if it
    /// was not there.
    pub fn remove_element_at(&mut self, key: BucketKey, element: ElementId) -> bool {
        let removed = match self.buckets.get_mut(&key) {
            Some(bucket) => bucket.remove_element(element),
            None => false,
        };
        if removed {
            self.prune(key);
        } else {
            log::warn!("element {element} expected in bucket {key} but not found");
            self.diagnostics.missing_registrations += 1;
        }
        removed
    }

    /// Every bucket holding `node`, in key order. A full scan, intended for
    /// audits and tests.
    pub fn buckets_containing_node(&self, node: NodeId) -> Vec<BucketKey> {
        let mut keys: Vec<BucketKey> = self
            .buckets
            .iter()
            .filter(|(_, b)| b.contains_node(node))
            .map(|(k, _)| *k)
            .collect();
        keys.sort();
        keys
    }

    /// Every bucket holding `element`, in key order. A full scan, intended
    /// for audits and tests.
    pub fn buckets_containing_element(&self, element: ElementId) -> Vec<BucketKey> {
        let mut keys: Vec<BucketKey> = self
            .buckets
            .iter()
            .filter(|(_, b)| b.contains_element(element))
            .map(|(k, _)| *k)
            .collect();
        keys.sort();
        keys
    }

    fn prune(&mut self, key: BucketKey) {
        if self.buckets.get(&key).is_some_and(Bucket::is_empty) {
            self.buckets.swap_remove(&key);
        }
    }
}
