//! Read-only access to the mesh, as consumed by the spatial partition.

use crate::error::MeshError;
use crate::id::{ElementId, NodeId};
use crate::tissue::{Element, Node};
use glam::DVec2;

/// Read-only view of the node / element graph.
///
/// The spatial partition never owns mesh entities. It reads positions,
/// adjacency and orientation through this trait and stores ids only.
/// [`Tissue`](crate::Tissue) is the in-tree implementation; force and
/// division layers with their own storage can implement it directly.
pub trait MeshView {
    /// Look up a node by id.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Look up an element by id.
    fn element(&self, id: ElementId) -> Option<&Element>;

    /// All live node ids in a deterministic order.
    fn node_ids(&self) -> Box<dyn Iterator<Item = NodeId> + '_>;

    /// All live element ids in a deterministic order.
    fn element_ids(&self) -> Box<dyn Iterator<Item = ElementId> + '_>;

    /// Like [`node`](Self::node), but an unknown id is an error.
    fn try_node(&self, id: NodeId) -> Result<&Node, MeshError> {
        self.node(id).ok_or(MeshError::UnknownNode(id))
    }

    /// Like [`element`](Self::element), but an unknown id is an error.
    fn try_element(&self, id: ElementId) -> Result<&Element, MeshError> {
        self.element(id).ok_or(MeshError::UnknownElement(id))
    }

    /// The endpoint of `element` that is not `node`.
    fn other_node(&self, element: ElementId, node: NodeId) -> Result<NodeId, MeshError> {
        self.try_element(element)?
            .other_node(node)
            .ok_or(MeshError::NodeNotInElement { node, element })
    }

    /// Current positions of `(node_1, node_2)`.
    fn endpoints(&self, element: ElementId) -> Result<(DVec2, DVec2), MeshError> {
        let e = self.try_element(element)?;
        let p1 = self.try_node(e.node_1())?.position();
        let p2 = self.try_node(e.node_2())?.position();
        Ok((p1, p2))
    }

    /// Unit vector pointing from `node_1` to `node_2`.
    fn vector_1_to_2(&self, element: ElementId) -> Result<DVec2, MeshError> {
        let (p1, p2) = self.endpoints(element)?;
        (p2 - p1)
            .try_normalize()
            .ok_or(MeshError::DegenerateElement(element))
    }

    /// Unit outward normal: the 1→2 direction rotated a quarter turn clockwise.
    ///
    /// Cells wind their elements anticlockwise, so this points out of the
    /// cell the element bounds.
    fn outward_normal(&self, element: ElementId) -> Result<DVec2, MeshError> {
        let u = self.vector_1_to_2(element)?;
        Ok(DVec2::new(u.y, -u.x))
    }
}
