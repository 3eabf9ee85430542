//! Incremental relocation as nodes move.
//!
//! Each node move touches at most two node buckets and, per attached
//! element, only the buckets that enter or leave its span. Buckets in both
//! the old and the new span are left alone.
//!
//! The old span of an element is taken between this node's *previous*
//! bucket and the other endpoint's *current* bucket. If both endpoints move
//! in one step, the first move reconciles the element against a stationary
//! partner and the second move reconciles against the first's new
//! position, so the registered span always matches the current endpoints
//! once every moved node has been reported.

use crate::error::PartitionError;
use crate::partition::SpacePartition;
use crate::span::{BucketRect, SpanDiff};
use cellmesh_core::{ElementId, MeshError, MeshView, NodeId};
use glam::DVec2;

impl SpacePartition {
    /// Relocate a node after [`Tissue::move_node`](cellmesh_core::Tissue::move_node).
    ///
    /// The old bucket is derived from the node's previous position. Returns
    /// `true` if the node changed bucket.
    pub fn on_node_moved<M: MeshView + ?Sized>(
        &mut self,
        mesh: &M,
        node: NodeId,
    ) -> Result<bool, PartitionError> {
        let from = mesh.try_node(node)?.previous_position();
        self.relocate_node(mesh, node, from)
    }

    /// Relocate a node placed directly, without updating its previous
    /// position. `pre_adjusted` is where it was before the adjustment.
    pub fn on_node_adjusted<M: MeshView + ?Sized>(
        &mut self,
        mesh: &M,
        node: NodeId,
        pre_adjusted: DVec2,
    ) -> Result<bool, PartitionError> {
        self.relocate_node(mesh, node, pre_adjusted)
    }

    /// Move a node's registration from the bucket of `from` to the bucket
    /// of its current position, and repair the spans of its non-internal
    /// elements.
    pub fn relocate_node<M: MeshView + ?Sized>(
        &mut self,
        mesh: &M,
        node: NodeId,
        from: DVec2,
    ) -> Result<bool, PartitionError> {
        let n = mesh.try_node(node)?;
        let old_key = self.bucket_of(from)?;
        let new_key = self.bucket_of(n.position())?;
        if old_key == new_key {
            return Ok(false);
        }
        log::trace!("node {node}: bucket {old_key} -> {new_key}");

        // Every partner is resolved before the grid is touched, so an error
        // leaves the registration as it was.
        let mut diffs = Vec::with_capacity(n.elements().len());
        for &element in n.elements() {
            let e = mesh.try_element(element)?;
            if e.is_internal() {
                continue;
            }
            let other = e
                .other_node(node)
                .ok_or(MeshError::NodeNotInElement { node, element })?;
            let other_key = self.bucket_of(mesh.try_node(other)?.position())?;
            let diff = SpanDiff::between(
                &BucketRect::spanning(old_key, other_key),
                &BucketRect::spanning(new_key, other_key),
            );
            diffs.push((element, diff));
        }

        let grid = self.grid_mut();
        grid.insert_node_at(new_key, node);
        grid.remove_node_at(old_key, node);
        for (element, diff) in &diffs {
            self.apply_span_diff(*element, diff);
        }
        Ok(true)
    }

    /// Bring an element's registration in line with its current endpoints
    /// after one of them was re-linked. `old_endpoints` are the positions
    /// the span was last computed from.
    ///
    /// Returns the buckets that changed. Internal elements are not
    /// registered and yield an empty diff.
    pub fn repair_element<M: MeshView + ?Sized>(
        &mut self,
        mesh: &M,
        element: ElementId,
        old_endpoints: (DVec2, DVec2),
    ) -> Result<SpanDiff, PartitionError> {
        if mesh.try_element(element)?.is_internal() {
            return Ok(SpanDiff::default());
        }
        let old = self.span_between(old_endpoints.0, old_endpoints.1)?;
        let new = self.element_span(mesh, element)?;
        let diff = SpanDiff::between(&old, &new);
        self.apply_span_diff(element, &diff);
        Ok(diff)
    }

    fn apply_span_diff(&mut self, element: ElementId, diff: &SpanDiff) {
        let grid = self.grid_mut();
        for &key in &diff.added {
            grid.insert_element_at(key, element);
        }
        for &key in &diff.removed {
            grid.remove_element_at(key, element);
        }
    }
}
