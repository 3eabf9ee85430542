//! Error types for mesh access and mutation.

use crate::id::{CellId, ElementId, NodeId};
use std::error::Error;
use std::fmt;

/// Errors arising from looking up or editing mesh entities.
///
/// Every variant indicates a caller bug (a stale or foreign id, or a
/// geometrically meaningless element). None of them are recoverable inside
/// a simulation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// The node id does not resolve to a live node.
    UnknownNode(NodeId),
    /// The element id does not resolve to a live element.
    UnknownElement(ElementId),
    /// The cell id does not resolve to a live cell.
    UnknownCell(CellId),
    /// The node is not an endpoint of the element.
    NodeNotInElement {
        /// The node that was expected to be an endpoint.
        node: NodeId,
        /// The element that was searched.
        element: ElementId,
    },
    /// The element's endpoints coincide, so it has no direction.
    DegenerateElement(ElementId),
    /// An element was requested between a node and itself.
    SelfLoop(NodeId),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node {id}"),
            Self::UnknownElement(id) => write!(f, "unknown element {id}"),
            Self::UnknownCell(id) => write!(f, "unknown cell {id}"),
            Self::NodeNotInElement { node, element } => {
                write!(f, "node {node} is not an endpoint of element {element}")
            }
            Self::DegenerateElement(id) => {
                write!(f, "element {id} has zero length and no direction")
            }
            Self::SelfLoop(id) => write!(f, "cannot join node {id} to itself"),
        }
    }
}

impl Error for MeshError {}
