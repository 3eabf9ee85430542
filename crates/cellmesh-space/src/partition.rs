//! The partition itself: construction and entity-level registration.

use crate::bucket::Bucket;
use crate::config::PartitionConfig;
use crate::diagnostics::Diagnostics;
use crate::error::PartitionError;
use crate::grid::SpatialGrid;
use crate::mapping::{BoxIndexMapping, BucketKey};
use crate::span::BucketRect;
use cellmesh_core::{ElementId, MeshView, NodeId};
use glam::DVec2;

/// Bucketed index of node positions and element spans.
///
/// The partition holds ids only; positions and adjacency are read from a
/// [`MeshView`] passed to each call. The caller is responsible for keeping
/// the two in step: call [`on_node_moved`](Self::on_node_moved) after every
/// node move, and the removal methods *before* the mesh forgets an entity.
#[derive(Clone, Debug)]
pub struct SpacePartition {
    config: PartitionConfig,
    grid: SpatialGrid,
}

impl SpacePartition {
    /// An empty partition.
    pub fn new(config: PartitionConfig) -> Result<Self, PartitionError> {
        let mapping = BoxIndexMapping::new(config.dx, config.dy)?;
        Ok(Self {
            config,
            grid: SpatialGrid::new(mapping),
        })
    }

    /// Register every node of `mesh`, and every non-internal element.
    pub fn build<M: MeshView + ?Sized>(
        mesh: &M,
        config: PartitionConfig,
    ) -> Result<Self, PartitionError> {
        let mut partition = Self::new(config)?;
        let mut nodes = 0usize;
        for node in mesh.node_ids() {
            partition.insert_node(mesh, node)?;
            nodes += 1;
        }
        let mut elements = 0usize;
        let mut internal = 0usize;
        for element in mesh.element_ids() {
            if mesh.try_element(element)?.is_internal() {
                internal += 1;
                continue;
            }
            partition.insert_element(mesh, element)?;
            elements += 1;
        }
        log::debug!(
            "built partition ({} x {}): {nodes} nodes, {elements} elements, \
             {internal} internal skipped, {} buckets",
            config.dx,
            config.dy,
            partition.grid.bucket_count()
        );
        Ok(partition)
    }

    /// The configuration this partition was created with.
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Underlying bucket storage.
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut SpatialGrid {
        &mut self.grid
    }

    /// Duplicate / missing registration counters.
    pub fn diagnostics(&self) -> Diagnostics {
        self.grid.diagnostics()
    }

    /// Key of the bucket containing `pos`.
    pub fn bucket_of(&self, pos: DVec2) -> Result<BucketKey, PartitionError> {
        self.grid.mapping().bucket_of(pos)
    }

    /// The bucket containing `pos`, if it holds anything.
    pub fn bucket_at(&self, pos: DVec2) -> Result<Option<&Bucket>, PartitionError> {
        Ok(self.grid.bucket(self.bucket_of(pos)?))
    }

    /// The bucket the node's current position maps to.
    pub fn node_bucket<M: MeshView + ?Sized>(
        &self,
        mesh: &M,
        node: NodeId,
    ) -> Result<Option<&Bucket>, PartitionError> {
        self.bucket_at(mesh.try_node(node)?.position())
    }

    /// Span of buckets between the buckets of `a` and `b`.
    pub fn span_between(&self, a: DVec2, b: DVec2) -> Result<BucketRect, PartitionError> {
        Ok(BucketRect::spanning(self.bucket_of(a)?, self.bucket_of(b)?))
    }

    /// Span of the element at its endpoints' current positions.
    pub fn element_span<M: MeshView + ?Sized>(
        &self,
        mesh: &M,
        element: ElementId,
    ) -> Result<BucketRect, PartitionError> {
        let (p1, p2) = mesh.endpoints(element)?;
        self.span_between(p1, p2)
    }

    /// Register a node in the bucket of its current position. Returns
    /// `false` if it was already there.
    pub fn insert_node<M: MeshView + ?Sized>(
        &mut self,
        mesh: &M,
        node: NodeId,
    ) -> Result<bool, PartitionError> {
        let key = self.bucket_of(mesh.try_node(node)?.position())?;
        Ok(self.grid.insert_node_at(key, node))
    }

    /// Unregister a node from the bucket of its current position. Returns
    /// `false` if it was not there.
    pub fn remove_node<M: MeshView + ?Sized>(
        &mut self,
        mesh: &M,
        node: NodeId,
    ) -> Result<bool, PartitionError> {
        let key = self.bucket_of(mesh.try_node(node)?.position())?;
        Ok(self.grid.remove_node_at(key, node))
    }

    /// Register an element in every bucket of its current span. Internal
    /// elements are never registered.
    ///
    /// Returns the number of buckets the element was newly added to;
    /// repeating the call leaves the grid unchanged and returns 0.
    pub fn insert_element<M: MeshView + ?Sized>(
        &mut self,
        mesh: &M,
        element: ElementId,
    ) -> Result<usize, PartitionError> {
        if mesh.try_element(element)?.is_internal() {
            return Ok(0);
        }
        let span = self.element_span(mesh, element)?;
        Ok(span
            .keys()
            .filter(|key| self.grid.insert_element_at(*key, element))
            .count())
    }

    /// Unregister an element from every bucket of its current span.
    /// Internal elements are skipped, as they were never registered.
    ///
    /// Returns the number of buckets it was actually removed from.
    pub fn remove_element<M: MeshView + ?Sized>(
        &mut self,
        mesh: &M,
        element: ElementId,
    ) -> Result<usize, PartitionError> {
        if mesh.try_element(element)?.is_internal() {
            return Ok(0);
        }
        let span = self.element_span(mesh, element)?;
        Ok(span
            .keys()
            .filter(|key| self.grid.remove_element_at(*key, element))
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use cellmesh_core::{MeshError, Tissue};

    fn square() -> (Tissue, [NodeId; 4], ElementId) {
        let mut t = Tissue::new();
        let n = [
            t.add_node(DVec2::new(0.0, 0.0)),
            t.add_node(DVec2::new(1.0, 0.0)),
            t.add_node(DVec2::new(1.0, 1.0)),
            t.add_node(DVec2::new(0.0, 1.0)),
        ];
        let e = t.add_element(n[0], n[1]).unwrap();
        (t, n, e)
    }

    #[test]
    fn new_rejects_bad_spacing() {
        let err = SpacePartition::new(PartitionConfig::new(0.0, 0.3)).unwrap_err();
        assert_eq!(
            err,
            PartitionError::Config(ConfigError::InvalidSpacing {
                axis: "dx",
                value: 0.0
            })
        );
    }

    #[test]
    fn build_registers_nodes_once() {
        let (t, n, _) = square();
        let p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        for (id, key) in n.iter().zip([(0, 0), (3, 0), (3, 3), (0, 3)]) {
            let expected = BucketKey::new(key.0, key.1);
            assert_eq!(p.grid().buckets_containing_node(*id), vec![expected]);
        }
        assert!(p.diagnostics().is_clean());
        assert_eq!(p.diagnostics().duplicate_registrations, 0);
    }

    #[test]
    fn build_registers_element_span() {
        let (t, _, e) = square();
        let p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        let expected: Vec<_> = (0..=3).map(|i| BucketKey::new(i, 0)).collect();
        assert_eq!(p.grid().buckets_containing_element(e), expected);
    }

    #[test]
    fn build_skips_internal_elements() {
        let (mut t, n, e) = square();
        let diag = t.add_element(n[0], n[2]).unwrap();
        t.set_internal(diag, true).unwrap();
        let p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        assert!(p.grid().buckets_containing_element(diag).is_empty());
        assert!(!p.grid().buckets_containing_element(e).is_empty());
    }

    #[test]
    fn insert_element_is_idempotent() {
        let (t, _, e) = square();
        let mut p = SpacePartition::new(PartitionConfig::default()).unwrap();
        assert_eq!(p.insert_element(&t, e).unwrap(), 4);
        let once: Vec<_> = p.grid().buckets().map(|(k, b)| (k, b.clone())).collect();
        assert_eq!(p.insert_element(&t, e).unwrap(), 0);
        let twice: Vec<_> = p.grid().buckets().map(|(k, b)| (k, b.clone())).collect();
        assert_eq!(once, twice);
        assert_eq!(p.diagnostics().duplicate_registrations, 4);
    }

    #[test]
    fn remove_element_clears_span_and_prunes() {
        let (t, _, e) = square();
        let mut p = SpacePartition::new(PartitionConfig::default()).unwrap();
        p.insert_element(&t, e).unwrap();
        assert_eq!(p.remove_element(&t, e).unwrap(), 4);
        assert_eq!(p.grid().bucket_count(), 0);
        // A second removal is tolerated and counted.
        assert_eq!(p.remove_element(&t, e).unwrap(), 0);
        assert_eq!(p.diagnostics().missing_registrations, 4);
    }

    #[test]
    fn remove_node_then_lookup() {
        let (t, n, _) = square();
        let mut p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        assert!(p.node_bucket(&t, n[2]).unwrap().is_some());
        assert!(p.remove_node(&t, n[2]).unwrap());
        assert!(p.node_bucket(&t, n[2]).unwrap().is_none());
        assert!(!p.remove_node(&t, n[2]).unwrap());
    }

    #[test]
    fn unknown_ids_are_errors() {
        let (t, _, _) = square();
        let mut p = SpacePartition::new(PartitionConfig::default()).unwrap();
        assert_eq!(
            p.insert_node(&t, NodeId(99)),
            Err(PartitionError::Mesh(MeshError::UnknownNode(NodeId(99))))
        );
        assert_eq!(
            p.insert_element(&t, ElementId(99)),
            Err(PartitionError::Mesh(MeshError::UnknownElement(ElementId(99))))
        );
    }

    #[test]
    fn bucket_at_reports_contents() {
        let (t, n, _) = square();
        let p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        let bucket = p.bucket_at(DVec2::new(0.95, 0.95)).unwrap().unwrap();
        assert!(bucket.contains_node(n[2]));
        assert!(p.bucket_at(DVec2::new(-5.0, -5.0)).unwrap().is_none());
    }
}
