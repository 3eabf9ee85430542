//! Per-bucket membership sets.

use cellmesh_core::{ElementId, NodeId};
use indexmap::IndexSet;

/// The nodes and elements currently registered in one grid bucket.
///
/// Membership is defined purely by position: a node is here if its current
/// position falls in the bucket, an element if the bucket lies in its span.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bucket {
    nodes: IndexSet<NodeId>,
    elements: IndexSet<ElementId>,
}

impl Bucket {
    /// Node ids in this bucket.
    pub fn nodes(&self) -> &IndexSet<NodeId> {
        &self.nodes
    }

    /// Element ids in this bucket.
    pub fn elements(&self) -> &IndexSet<ElementId> {
        &self.elements
    }

    /// `true` if the bucket holds neither nodes nor elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.elements.is_empty()
    }

    /// `true` if `node` is registered here.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// `true` if `element` is registered here.
    pub fn contains_element(&self, element: ElementId) -> bool {
        self.elements.contains(&element)
    }

    pub(crate) fn insert_node(&mut self, node: NodeId) -> bool {
        self.nodes.insert(node)
    }

    pub(crate) fn remove_node(&mut self, node: NodeId) -> bool {
        self.nodes.swap_remove(&node)
    }

    pub(crate) fn insert_element(&mut self, element: ElementId) -> bool {
        self.elements.insert(element)
    }

    pub(crate) fn remove_element(&mut self, element: ElementId) -> bool {
        self.elements.swap_remove(&element)
    }
}
