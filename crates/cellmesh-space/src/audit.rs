//! Consistency checks between a partition and the mesh it indexes.

use crate::error::PartitionError;
use crate::mapping::BucketKey;
use crate::partition::SpacePartition;
use cellmesh_core::{ElementId, MeshView, NodeId};
use indexmap::IndexMap;
use std::fmt;

/// A node registered somewhere other than the bucket of its position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MisplacedNode {
    /// The node.
    pub node: NodeId,
    /// Bucket of its current position.
    pub expected: BucketKey,
    /// Buckets it is actually registered in, sorted.
    pub found: Vec<BucketKey>,
}

/// An element whose registered buckets differ from its current span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanMismatch {
    /// The element.
    pub element: ElementId,
    /// In the span but not registered.
    pub missing: Vec<BucketKey>,
    /// Registered but outside the span (or anywhere, for internal elements).
    pub extra: Vec<BucketKey>,
}

/// Result of [`SpacePartition::audit`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Nodes not registered exactly once, in the bucket of their position.
    pub misplaced_nodes: Vec<MisplacedNode>,
    /// Elements whose membership is not exactly their span.
    pub span_mismatches: Vec<SpanMismatch>,
    /// Node ids in the grid that the mesh no longer knows.
    pub stale_nodes: Vec<NodeId>,
    /// Element ids in the grid that the mesh no longer knows.
    pub stale_elements: Vec<ElementId>,
    /// Buckets that exist but hold nothing.
    pub empty_buckets: usize,
}

impl AuditReport {
    /// Whether no problem was found.
    pub fn is_clean(&self) -> bool {
        self.misplaced_nodes.is_empty()
            && self.span_mismatches.is_empty()
            && self.stale_nodes.is_empty()
            && self.stale_elements.is_empty()
            && self.empty_buckets == 0
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} misplaced nodes, {} span mismatches, {} stale nodes, \
             {} stale elements, {} empty buckets",
            self.misplaced_nodes.len(),
            self.span_mismatches.len(),
            self.stale_nodes.len(),
            self.stale_elements.len(),
            self.empty_buckets
        )
    }
}

impl SpacePartition {
    /// Compare every registration against the mesh.
    ///
    /// A full scan of grid and mesh. Intended for tests and for debugging a
    /// simulation that reports non-zero [`Diagnostics`](crate::Diagnostics);
    /// not for use inside a step.
    pub fn audit<M: MeshView + ?Sized>(&self, mesh: &M) -> Result<AuditReport, PartitionError> {
        let mut node_buckets: IndexMap<NodeId, Vec<BucketKey>> = IndexMap::new();
        let mut element_buckets: IndexMap<ElementId, Vec<BucketKey>> = IndexMap::new();
        let mut report = AuditReport::default();

        for (key, bucket) in self.grid().buckets() {
            if bucket.is_empty() {
                report.empty_buckets += 1;
            }
            for &n in bucket.nodes() {
                node_buckets.entry(n).or_default().push(key);
            }
            for &e in bucket.elements() {
                element_buckets.entry(e).or_default().push(key);
            }
        }

        for node in mesh.node_ids() {
            let expected = self.bucket_of(mesh.try_node(node)?.position())?;
            let mut found = node_buckets.swap_remove(&node).unwrap_or_default();
            found.sort();
            if found != [expected] {
                report.misplaced_nodes.push(MisplacedNode {
                    node,
                    expected,
                    found,
                });
            }
        }

        for element in mesh.element_ids() {
            let mut found = element_buckets.swap_remove(&element).unwrap_or_default();
            found.sort();
            let mut span: Vec<BucketKey> = if mesh.try_element(element)?.is_internal() {
                Vec::new()
            } else {
                self.element_span(mesh, element)?.keys().collect()
            };
            span.sort();
            if found != span {
                let missing = span
                    .iter()
                    .filter(|k| found.binary_search(k).is_err())
                    .copied()
                    .collect();
                let extra = found
                    .iter()
                    .filter(|k| span.binary_search(k).is_err())
                    .copied()
                    .collect();
                report.span_mismatches.push(SpanMismatch {
                    element,
                    missing,
                    extra,
                });
            }
        }

        report.stale_nodes = node_buckets.into_keys().collect();
        report.stale_nodes.sort();
        report.stale_elements = element_buckets.into_keys().collect();
        report.stale_elements.sort();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartitionConfig;
    use cellmesh_core::Tissue;
    use glam::DVec2;

    fn square() -> (Tissue, [NodeId; 4], [ElementId; 4]) {
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
        t.add_cell(&e).unwrap();
        (t, n, e)
    }

    #[test]
    fn fresh_build_is_clean() {
        let (t, _, _) = square();
        let p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        let report = p.audit(&t).unwrap();
        assert!(report.is_clean(), "{report}");
    }

    #[test]
    fn unreported_move_is_detected() {
        let (mut t, n, e) = square();
        let p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        t.move_node(n[0], DVec2::new(-0.5, -0.5)).unwrap();
        let report = p.audit(&t).unwrap();
        assert_eq!(
            report.misplaced_nodes,
            vec![MisplacedNode {
                node: n[0],
                expected: BucketKey::new(-2, -2),
                found: vec![BucketKey::new(0, 0)],
            }]
        );
        let mismatched: Vec<_> = report.span_mismatches.iter().map(|m| m.element).collect();
        assert_eq!(mismatched, vec![e[0], e[3]]);
        assert!(report.span_mismatches.iter().all(|m| m.extra.is_empty()));
    }

    #[test]
    fn reported_moves_stay_clean() {
        let (mut t, n, _) = square();
        let mut p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        let path = [(0.1, -0.4), (-0.4, -0.4), (-0.7, 0.2), (0.35, 0.62)];
        for (x, y) in path {
            t.move_node(n[0], DVec2::new(x, y)).unwrap();
            p.on_node_moved(&t, n[0]).unwrap();
            assert!(p.audit(&t).unwrap().is_clean());
        }
    }

    #[test]
    fn removal_order_for_cell_death() {
        let (mut t, n, e) = square();
        let mut p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        // Unregister first, then let the mesh forget.
        for id in e {
            p.remove_element(&t, id).unwrap();
        }
        for id in n {
            p.remove_node(&t, id).unwrap();
        }
        for id in n {
            t.remove_node(id).unwrap();
        }
        assert!(p.audit(&t).unwrap().is_clean());
        assert_eq!(p.grid().bucket_count(), 0);
        assert!(p.diagnostics().is_clean());
    }

    #[test]
    fn forgotten_unregistration_leaves_stale_ids() {
        let (mut t, n, e) = square();
        let p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        t.remove_node(n[0]).unwrap();
        let report = p.audit(&t).unwrap();
        assert_eq!(report.stale_nodes, vec![n[0]]);
        assert_eq!(report.stale_elements, vec![e[0], e[3]]);
    }

    #[test]
    fn internal_elements_must_be_unregistered() {
        let (mut t, _, e) = square();
        let p = SpacePartition::build(&t, PartitionConfig::default()).unwrap();
        t.set_internal(e[1], true).unwrap();
        let report = p.audit(&t).unwrap();
        assert_eq!(report.span_mismatches.len(), 1);
        assert_eq!(report.span_mismatches[0].element, e[1]);
        assert!(report.span_mismatches[0].missing.is_empty());
        assert!(!report.span_mismatches[0].extra.is_empty());
    }
}
