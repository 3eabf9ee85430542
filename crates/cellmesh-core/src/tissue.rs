//! Central arena of nodes, elements and cells.
//!
//! [`Tissue`] owns every entity and hands out sequential ids. Back
//! references (node → elements, element → cells, ...) are id lists kept in
//! sync by the mutation methods here.

use crate::error::MeshError;
use crate::id::{CellId, ElementId, NodeId};
use crate::traits::MeshView;
use glam::DVec2;
use indexmap::IndexMap;

/// A boundary node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    id: NodeId,
    position: DVec2,
    previous_position: DVec2,
    elements: Vec<ElementId>,
    cells: Vec<CellId>,
}

impl Node {
    /// The node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Current position.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Position before the most recent [`Tissue::move_node`].
    ///
    /// A freshly created node has `previous_position == position`, so the
    /// first relocation has something to compare against.
    pub fn previous_position(&self) -> DVec2 {
        self.previous_position
    }

    /// Elements this node is an endpoint of.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Cells this node belongs to.
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }
}

/// An oriented edge between two nodes.
///
/// The order `node_1 → node_2` fixes the orientation: travelling 1 → 2 goes
/// anticlockwise around the owning cell, so the outward normal is the 1 → 2
/// direction turned clockwise.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    id: ElementId,
    node_1: NodeId,
    node_2: NodeId,
    internal: bool,
    cells: Vec<CellId>,
}

impl Element {
    /// The element's id.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// First endpoint.
    pub fn node_1(&self) -> NodeId {
        self.node_1
    }

    /// Second endpoint.
    pub fn node_2(&self) -> NodeId {
        self.node_2
    }

    /// Both endpoints in orientation order.
    pub fn nodes(&self) -> [NodeId; 2] {
        [self.node_1, self.node_2]
    }

    /// `true` if `node` is one of the endpoints.
    pub fn contains(&self, node: NodeId) -> bool {
        self.node_1 == node || self.node_2 == node
    }

    /// The endpoint that is not `node`, or `None` if `node` is not an endpoint.
    pub fn other_node(&self, node: NodeId) -> Option<NodeId> {
        if node == self.node_1 {
            Some(self.node_2)
        } else if node == self.node_2 {
            Some(self.node_1)
        } else {
            None
        }
    }

    /// Internal elements are shared boundaries between joined cells. They
    /// are never placed in the spatial partition.
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    /// Cells this element bounds.
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }
}

/// A polygon cell, described by its boundary elements.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    id: CellId,
    elements: Vec<ElementId>,
    nodes: Vec<NodeId>,
}

impl Cell {
    /// The cell's id.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Boundary elements in the order supplied at creation.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Boundary nodes, each listed once, in first-seen order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

/// Arena owning every node, element and cell of a simulation.
#[derive(Clone, Debug, Default)]
pub struct Tissue {
    nodes: IndexMap<NodeId, Node>,
    elements: IndexMap<ElementId, Element>,
    cells: IndexMap<CellId, Cell>,
    next_node: u32,
    next_element: u32,
    next_cell: u32,
}

impl Tissue {
    /// Create an empty tissue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of live cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Look up a cell by id.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    /// Iterate over live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over live elements in creation order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Iterate over live cells in creation order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Create a node at `position`.
    pub fn add_node(&mut self, position: DVec2) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                position,
                previous_position: position,
                elements: Vec::new(),
                cells: Vec::new(),
            },
        );
        id
    }

    /// Create an element oriented `node_1 → node_2` and register it on both
    /// endpoints.
    pub fn add_element(&mut self, node_1: NodeId, node_2: NodeId) -> Result<ElementId, MeshError> {
        if node_1 == node_2 {
            return Err(MeshError::SelfLoop(node_1));
        }
        self.try_node(node_1)?;
        self.try_node(node_2)?;

        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.elements.insert(
            id,
            Element {
                id,
                node_1,
                node_2,
                internal: false,
                cells: Vec::new(),
            },
        );
        for n in [node_1, node_2] {
            if let Some(node) = self.nodes.get_mut(&n) {
                node.elements.push(id);
            }
        }
        Ok(id)
    }

    /// Create a cell bounded by `elements` and link it to the elements and
    /// their nodes.
    ///
    /// An element listed twice is linked once; the repeat is logged.
    pub fn add_cell(&mut self, elements: &[ElementId]) -> Result<CellId, MeshError> {
        for &e in elements {
            self.try_element(e)?;
        }

        let id = CellId(self.next_cell);
        self.next_cell += 1;

        let mut cell = Cell {
            id,
            elements: Vec::with_capacity(elements.len()),
            nodes: Vec::with_capacity(elements.len()),
        };
        for &e in elements {
            if cell.elements.contains(&e) {
                log::warn!("element {e} listed twice for cell {id}; linked once");
                continue;
            }
            cell.elements.push(e);
            let element = match self.elements.get_mut(&e) {
                Some(element) => element,
                None => continue,
            };
            element.cells.push(id);
            for n in element.nodes() {
                if !cell.nodes.contains(&n) {
                    cell.nodes.push(n);
                }
                if let Some(node) = self.nodes.get_mut(&n) {
                    if !node.cells.contains(&id) {
                        node.cells.push(id);
                    }
                }
            }
        }
        self.cells.insert(id, cell);
        Ok(id)
    }

    /// Mark an element as internal (a shared boundary between joined cells)
    /// or external.
    ///
    /// The spatial partition does not observe this flag changing. Remove the
    /// element from the partition before marking it internal, and insert it
    /// after marking it external.
    pub fn set_internal(&mut self, element: ElementId, internal: bool) -> Result<(), MeshError> {
        let e = self
            .elements
            .get_mut(&element)
            .ok_or(MeshError::UnknownElement(element))?;
        e.internal = internal;
        Ok(())
    }

    /// Advance a node to `position` as part of time integration.
    ///
    /// The current position becomes the previous position. Follow with
    /// `SpacePartition::on_node_moved`.
    pub fn move_node(&mut self, node: NodeId, position: DVec2) -> Result<(), MeshError> {
        let n = self
            .nodes
            .get_mut(&node)
            .ok_or(MeshError::UnknownNode(node))?;
        n.previous_position = n.position;
        n.position = position;
        Ok(())
    }

    /// Place a node at `position` without touching its previous position.
    ///
    /// Used by simulation modifiers after integration. Returns the position
    /// the node had before the adjustment; pass it to
    /// `SpacePartition::on_node_adjusted`.
    pub fn adjust_node(&mut self, node: NodeId, position: DVec2) -> Result<DVec2, MeshError> {
        let n = self
            .nodes
            .get_mut(&node)
            .ok_or(MeshError::UnknownNode(node))?;
        let before = n.position;
        n.position = position;
        Ok(before)
    }

    /// Re-attach one end of an element from `old` to `new`, keeping its
    /// orientation. Division uses this to split a cell along a new node.
    ///
    /// `new` joins every cell the element bounds. `old` leaves a cell once
    /// none of its remaining elements bound it.
    ///
    /// Returns the element's endpoint positions before the change; pass them
    /// to `SpacePartition::repair_element`.
    pub fn replace_endpoint(
        &mut self,
        element: ElementId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(DVec2, DVec2), MeshError> {
        let before = self.endpoints(element)?;
        self.try_node(new)?;
        let e = self
            .elements
            .get_mut(&element)
            .ok_or(MeshError::UnknownElement(element))?;
        let other = e
            .other_node(old)
            .ok_or(MeshError::NodeNotInElement { node: old, element })?;
        if other == new {
            return Err(MeshError::SelfLoop(new));
        }
        if e.node_1 == old {
            e.node_1 = new;
        } else {
            e.node_2 = new;
        }
        if let Some(node) = self.nodes.get_mut(&old) {
            node.elements.retain(|&id| id != element);
        }
        let cells = e.cells.clone();
        if let Some(node) = self.nodes.get_mut(&new) {
            if !node.elements.contains(&element) {
                node.elements.push(element);
            }
        }

        for c in cells {
            if let Some(node) = self.nodes.get_mut(&new) {
                if !node.cells.contains(&c) {
                    node.cells.push(c);
                }
            }
            if let Some(cell) = self.cells.get_mut(&c) {
                if !cell.nodes.contains(&new) {
                    cell.nodes.push(new);
                }
            }
            if !self.bounds_cell(old, c) {
                if let Some(node) = self.nodes.get_mut(&old) {
                    node.cells.retain(|&id| id != c);
                }
                if let Some(cell) = self.cells.get_mut(&c) {
                    cell.nodes.retain(|&n| n != old);
                }
            }
        }
        Ok(before)
    }

    /// Whether any element attached to `node` bounds `cell`.
    fn bounds_cell(&self, node: NodeId, cell: CellId) -> bool {
        self.nodes.get(&node).is_some_and(|n| {
            n.elements.iter().any(|e| {
                self.elements
                    .get(e)
                    .is_some_and(|element| element.cells.contains(&cell))
            })
        })
    }

    /// Remove an element and unlink it from its nodes and cells.
    pub fn remove_element(&mut self, element: ElementId) -> Result<Element, MeshError> {
        let removed = self
            .elements
            .shift_remove(&element)
            .ok_or(MeshError::UnknownElement(element))?;
        for n in removed.nodes() {
            if let Some(node) = self.nodes.get_mut(&n) {
                node.elements.retain(|&e| e != element);
            }
        }
        for c in &removed.cells {
            if let Some(cell) = self.cells.get_mut(c) {
                cell.elements.retain(|&e| e != element);
            }
        }
        Ok(removed)
    }

    /// Remove a node together with every element it is an endpoint of.
    ///
    /// Returns the node as it was before its elements were unlinked.
    pub fn remove_node(&mut self, node: NodeId) -> Result<Node, MeshError> {
        let attached = self.try_node(node)?.elements.clone();
        let snapshot = self.try_node(node)?.clone();
        for e in attached {
            self.remove_element(e)?;
        }
        self.nodes.shift_remove(&node);
        for c in &snapshot.cells {
            if let Some(cell) = self.cells.get_mut(c) {
                cell.nodes.retain(|&n| n != node);
            }
        }
        Ok(snapshot)
    }

    /// Remove a cell and unlink it from its elements and nodes. The nodes and
    /// elements themselves are kept.
    pub fn remove_cell(&mut self, cell: CellId) -> Result<Cell, MeshError> {
        let removed = self
            .cells
            .shift_remove(&cell)
            .ok_or(MeshError::UnknownCell(cell))?;
        for e in &removed.elements {
            if let Some(element) = self.elements.get_mut(e) {
                element.cells.retain(|&c| c != cell);
            }
        }
        for n in &removed.nodes {
            if let Some(node) = self.nodes.get_mut(n) {
                node.cells.retain(|&c| c != cell);
            }
        }
        Ok(removed)
    }
}

impl MeshView for Tissue {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    fn node_ids(&self) -> Box<dyn Iterator<Item = NodeId> + '_> {
        Box::new(self.nodes.keys().copied())
    }

    fn element_ids(&self) -> Box<dyn Iterator<Item = ElementId> + '_> {
        Box::new(self.elements.keys().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> (Tissue, [NodeId; 4], [ElementId; 4], CellId) {
        let mut t = Tissue::new();
        let n = [
            t.add_node(DVec2::new(0.0, 0.0)),
            t.add_node(DVec2::new(1.0, 0.0)),
            t.add_node(DVec2::new(1.0, 1.0)),
            t.add_node(DVec2::new(0.0, 1.0)),
        ];
        let e = [
            t.add_element(n[0], n[1]).unwrap(),
            t.add_element(n[1], n[2]).unwrap(),
            t.add_element(n[2], n[3]).unwrap(),
            t.add_element(n[3], n[0]).unwrap(),
        ];
        let c = t.add_cell(&e).unwrap();
        (t, n, e, c)
    }

    #[test]
    fn add_element_links_both_endpoints() {
        let (t, n, e, _) = square();
        assert_eq!(t.node(n[0]).unwrap().elements(), &[e[0], e[3]]);
        assert_eq!(t.node(n[1]).unwrap().elements(), &[e[0], e[1]]);
        assert_eq!(t.other_node(e[0], n[0]), Ok(n[1]));
        assert_eq!(
            t.other_node(e[0], n[2]),
            Err(MeshError::NodeNotInElement {
                node: n[2],
                element: e[0]
            })
        );
    }

    #[test]
    fn add_element_rejects_self_loop_and_unknown_nodes() {
        let mut t = Tissue::new();
        let a = t.add_node(DVec2::ZERO);
        assert_eq!(t.add_element(a, a), Err(MeshError::SelfLoop(a)));
        assert_eq!(
            t.add_element(a, NodeId(99)),
            Err(MeshError::UnknownNode(NodeId(99)))
        );
    }

    #[test]
    fn add_cell_links_nodes_once() {
        let (t, n, e, c) = square();
        let cell = t.cell(c).unwrap();
        assert_eq!(cell.elements(), &e);
        assert_eq!(cell.nodes(), &n);
        for id in n {
            assert_eq!(t.node(id).unwrap().cells(), &[c]);
        }
        for id in e {
            assert_eq!(t.element(id).unwrap().cells(), &[c]);
        }
    }

    #[test]
    fn add_cell_skips_repeated_element() {
        let mut t = Tissue::new();
        let a = t.add_node(DVec2::ZERO);
        let b = t.add_node(DVec2::X);
        let e = t.add_element(a, b).unwrap();
        let c = t.add_cell(&[e, e]).unwrap();
        assert_eq!(t.cell(c).unwrap().elements(), &[e]);
        assert_eq!(t.element(e).unwrap().cells(), &[c]);
    }

    #[test]
    fn outward_normal_points_out_of_anticlockwise_square() {
        let (t, _, e, _) = square();
        // Bottom edge runs +x, so outward is -y.
        let v = t.outward_normal(e[0]).unwrap();
        assert!((v - DVec2::new(0.0, -1.0)).length() < 1e-12);
        // Right edge runs +y, so outward is +x.
        let v = t.outward_normal(e[1]).unwrap();
        assert!((v - DVec2::new(1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn degenerate_element_has_no_direction() {
        let mut t = Tissue::new();
        let a = t.add_node(DVec2::ONE);
        let b = t.add_node(DVec2::ONE);
        let e = t.add_element(a, b).unwrap();
        assert_eq!(t.vector_1_to_2(e), Err(MeshError::DegenerateElement(e)));
    }

    #[test]
    fn move_node_shifts_previous_position() {
        let (mut t, n, _, _) = square();
        t.move_node(n[0], DVec2::new(0.0, 0.31)).unwrap();
        let node = t.node(n[0]).unwrap();
        assert_eq!(node.previous_position(), DVec2::ZERO);
        assert_eq!(node.position(), DVec2::new(0.0, 0.31));
    }

    #[test]
    fn adjust_node_keeps_previous_position() {
        let (mut t, n, _, _) = square();
        t.move_node(n[2], DVec2::new(1.1, 1.0)).unwrap();
        let before = t.adjust_node(n[2], DVec2::new(2.0, 2.0)).unwrap();
        assert_eq!(before, DVec2::new(1.1, 1.0));
        let node = t.node(n[2]).unwrap();
        assert_eq!(node.previous_position(), DVec2::new(1.0, 1.0));
        assert_eq!(node.position(), DVec2::new(2.0, 2.0));
    }

    #[test]
    fn replace_endpoint_relinks_and_reports_old_positions() {
        let (mut t, n, e, _) = square();
        let mid = t.add_node(DVec2::new(0.5, 0.5));
        let before = t.replace_endpoint(e[0], n[1], mid).unwrap();
        assert_eq!(before, (DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)));
        let element = t.element(e[0]).unwrap();
        assert_eq!(element.nodes(), [n[0], mid]);
        assert_eq!(t.node(n[1]).unwrap().elements(), &[e[1]]);
        assert_eq!(t.node(mid).unwrap().elements(), &[e[0]]);
    }

    #[test]
    fn replace_endpoint_carries_cell_membership() {
        let (mut t, n, e, c) = square();
        let mid = t.add_node(DVec2::new(0.5, 0.0));
        t.replace_endpoint(e[0], n[1], mid).unwrap();
        assert_eq!(t.node(mid).unwrap().cells(), &[c]);
        // n1 still bounds the cell through e1.
        assert_eq!(t.node(n[1]).unwrap().cells(), &[c]);
        assert_eq!(t.cell(c).unwrap().nodes(), &[n[0], n[1], n[2], n[3], mid]);

        t.replace_endpoint(e[1], n[1], mid).unwrap();
        assert!(t.node(n[1]).unwrap().elements().is_empty());
        assert!(t.node(n[1]).unwrap().cells().is_empty());
        assert_eq!(t.node(mid).unwrap().cells(), &[c]);
        assert_eq!(t.cell(c).unwrap().nodes(), &[n[0], n[2], n[3], mid]);
    }

    #[test]
    fn replace_endpoint_rejects_bad_links() {
        let (mut t, n, e, _) = square();
        assert_eq!(
            t.replace_endpoint(e[0], n[2], n[3]),
            Err(MeshError::NodeNotInElement {
                node: n[2],
                element: e[0]
            })
        );
        assert_eq!(
            t.replace_endpoint(e[0], n[1], n[0]),
            Err(MeshError::SelfLoop(n[0]))
        );
        assert_eq!(
            t.replace_endpoint(e[0], n[1], NodeId(99)),
            Err(MeshError::UnknownNode(NodeId(99)))
        );
    }

    #[test]
    fn remove_element_unlinks_back_references() {
        let (mut t, n, e, c) = square();
        let removed = t.remove_element(e[0]).unwrap();
        assert_eq!(removed.id(), e[0]);
        assert!(t.element(e[0]).is_none());
        assert_eq!(t.node(n[0]).unwrap().elements(), &[e[3]]);
        assert_eq!(t.cell(c).unwrap().elements(), &[e[1], e[2], e[3]]);
        assert_eq!(
            t.remove_element(e[0]),
            Err(MeshError::UnknownElement(e[0]))
        );
    }

    #[test]
    fn remove_node_drops_attached_elements() {
        let (mut t, n, e, c) = square();
        t.remove_node(n[0]).unwrap();
        assert_eq!(t.node_count(), 3);
        assert_eq!(t.element_count(), 2);
        assert!(t.element(e[0]).is_none());
        assert!(t.element(e[3]).is_none());
        assert_eq!(t.cell(c).unwrap().nodes(), &[n[1], n[2], n[3]]);
    }

    #[test]
    fn remove_cell_keeps_geometry() {
        let (mut t, n, e, c) = square();
        t.remove_cell(c).unwrap();
        assert_eq!(t.cell_count(), 0);
        assert!(t.node(n[0]).unwrap().cells().is_empty());
        assert!(t.element(e[0]).unwrap().cells().is_empty());
        assert_eq!(t.element_count(), 4);
    }

    proptest! {
        #[test]
        fn ids_are_never_reused(count in 1usize..20) {
            let mut t = Tissue::new();
            let mut seen = Vec::new();
            for i in 0..count {
                let id = t.add_node(DVec2::new(i as f64, 0.0));
                prop_assert!(!seen.contains(&id));
                seen.push(id);
                if i % 3 == 0 {
                    t.remove_node(id).unwrap();
                }
            }
            let fresh = t.add_node(DVec2::ZERO);
            prop_assert!(!seen.contains(&fresh));
        }
    }
}
