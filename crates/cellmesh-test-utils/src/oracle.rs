//! Brute-force neighbour queries.
//!
//! These scan every element (or node) of the mesh and apply the same
//! exclusion rules and exact test as the partition, but without any bucket
//! pre-filter. Agreement with [`SpacePartition::query_neighbors`] shows
//! that the candidate region never drops a true neighbour.
//!
//! [`SpacePartition::query_neighbors`]: cellmesh_space::SpacePartition::query_neighbors

use cellmesh_core::{ElementId, MeshError, MeshView, NodeId};
use cellmesh_space::geometry::{element_rectangle, point_in_polygon};
use indexmap::IndexSet;

/// Every non-internal element within `radius` of `anchor`, excluding the
/// anchor's own elements and those of its cells. Ordered by id.
pub fn brute_force_neighbors<M: MeshView + ?Sized>(
    mesh: &M,
    anchor: NodeId,
    radius: f64,
) -> Result<IndexSet<ElementId>, MeshError> {
    let node = mesh.try_node(anchor)?;
    let pos = node.position();
    let mut found = IndexSet::new();
    for id in mesh.element_ids() {
        let element = mesh.try_element(id)?;
        if element.is_internal()
            || element.contains(anchor)
            || element.cells().iter().any(|c| node.cells().contains(c))
        {
            continue;
        }
        let normal = match mesh.outward_normal(id) {
            Ok(normal) => normal,
            Err(MeshError::DegenerateElement(_)) => continue,
            Err(e) => return Err(e),
        };
        let (p1, p2) = mesh.endpoints(id)?;
        if point_in_polygon(pos, &element_rectangle(p1, p2, normal, radius)) {
            found.insert(id);
        }
    }
    found.sort();
    Ok(found)
}

/// Every node other than `anchor` within Euclidean distance `radius` of
/// it. Ordered by id.
pub fn brute_force_neighbouring_nodes<M: MeshView + ?Sized>(
    mesh: &M,
    anchor: NodeId,
    radius: f64,
) -> Result<IndexSet<NodeId>, MeshError> {
    let pos = mesh.try_node(anchor)?.position();
    let mut found = IndexSet::new();
    for id in mesh.node_ids() {
        if id != anchor && mesh.try_node(id)?.position().distance(pos) <= radius {
            found.insert(id);
        }
    }
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::unit_square_scene;

    #[test]
    fn oracle_matches_square_scenario() {
        let (t, n, e) = unit_square_scene().unwrap();
        assert!(brute_force_neighbors(&t, n[2], 0.2).unwrap().is_empty());
        let found: Vec<_> = brute_force_neighbors(&t, n[2], 1.5)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(found, vec![e]);
    }

    #[test]
    fn oracle_skips_internal() {
        let (mut t, n, e) = unit_square_scene().unwrap();
        t.set_internal(e, true).unwrap();
        assert!(brute_force_neighbors(&t, n[2], 1.5).unwrap().is_empty());
    }

    #[test]
    fn node_oracle_by_distance() {
        let (t, n, _) = unit_square_scene().unwrap();
        let found: Vec<_> = brute_force_neighbouring_nodes(&t, n[0], 1.0)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(found, vec![n[1], n[3]]);
    }
}
