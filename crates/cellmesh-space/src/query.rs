//! Neighbour queries.

use crate::bucket::Bucket;
use crate::config::CandidateMode;
use crate::error::PartitionError;
use crate::geometry::{element_rectangle, point_in_polygon};
use crate::partition::SpacePartition;
use crate::span::BucketRect;
use cellmesh_core::{ElementId, MeshError, MeshView, NodeId};
use glam::DVec2;
use indexmap::IndexSet;

impl SpacePartition {
    /// Buckets a query of `radius` around `pos` must inspect.
    ///
    /// In [`CandidateMode::Proximity`] this is the anchor's own bucket,
    /// extended along an axis only when `floor(p/d) != floor((p ± r)/d)`.
    /// A diagonal neighbour is included only when both of its axes fire.
    /// When the radius exceeds the bucket size the rectangle extends as far
    /// as the radius reaches. [`CandidateMode::AllAdjacent`] additionally
    /// always includes the full 3×3 neighbourhood.
    pub fn candidate_region(&self, pos: DVec2, radius: f64) -> Result<BucketRect, PartitionError> {
        check_radius(radius)?;
        let own = self.bucket_of(pos)?;
        let mapping = self.grid().mapping();
        let reach = DVec2::splat(radius);
        let proximity = BucketRect::spanning(
            mapping.bucket_of_clamped(pos - reach),
            mapping.bucket_of_clamped(pos + reach),
        );
        Ok(match self.config().candidate_mode {
            CandidateMode::Proximity => proximity,
            CandidateMode::AllAdjacent => proximity.union(&BucketRect::single(own).expand(1)),
        })
    }

    /// Non-empty buckets inside `region`.
    ///
    /// Walks whichever is smaller: the keys of the region or the occupied
    /// buckets of the grid.
    fn buckets_in(&self, region: &BucketRect) -> Vec<&Bucket> {
        let grid = self.grid();
        if region.len() > grid.bucket_count() as u64 {
            grid.buckets()
                .filter(|(key, _)| region.contains(*key))
                .map(|(_, bucket)| bucket)
                .collect()
        } else {
            region.keys().filter_map(|key| grid.bucket(key)).collect()
        }
    }

    /// Elements within `radius` of `anchor`, ordered by id.
    ///
    /// An element is a neighbour when the anchor lies inside (or on the
    /// edge of) the rectangle swept by the element's outward normal scaled
    /// by `radius` on both sides. The anchor's own elements and elements of
    /// any cell the anchor belongs to are never returned. Zero-length
    /// elements have no normal and are skipped.
    pub fn query_neighbors<M: MeshView + ?Sized>(
        &self,
        mesh: &M,
        anchor: NodeId,
        radius: f64,
    ) -> Result<IndexSet<ElementId>, PartitionError> {
        let node = mesh.try_node(anchor)?;
        let pos = node.position();
        let region = self.candidate_region(pos, radius)?;

        let mut candidates: IndexSet<ElementId> = IndexSet::new();
        for bucket in self.buckets_in(&region) {
            candidates.extend(bucket.elements().iter().copied());
        }
        candidates.sort();

        let mut found = IndexSet::new();
        for id in candidates {
            if node.elements().contains(&id) {
                continue;
            }
            let element = mesh.try_element(id)?;
            if element.cells().iter().any(|c| node.cells().contains(c)) {
                continue;
            }
            let normal = match mesh.outward_normal(id) {
                Ok(normal) => normal,
                Err(MeshError::DegenerateElement(_)) => {
                    log::debug!("skipping zero-length element {id} in query from {anchor}");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let (p1, p2) = mesh.endpoints(id)?;
            if point_in_polygon(pos, &element_rectangle(p1, p2, normal, radius)) {
                found.insert(id);
            }
        }
        Ok(found)
    }

    /// Nodes other than `anchor` within Euclidean distance `radius` of it,
    /// ordered by id. Uses the same candidate region as
    /// [`query_neighbors`](Self::query_neighbors).
    pub fn query_neighbouring_nodes<M: MeshView + ?Sized>(
        &self,
        mesh: &M,
        anchor: NodeId,
        radius: f64,
    ) -> Result<IndexSet<NodeId>, PartitionError> {
        let pos = mesh.try_node(anchor)?.position();
        let region = self.candidate_region(pos, radius)?;

        let mut found = IndexSet::new();
        for bucket in self.buckets_in(&region) {
            for &id in bucket.nodes() {
                if id != anchor && mesh.try_node(id)?.position().distance(pos) <= radius {
                    found.insert(id);
                }
            }
        }
        found.sort();
        Ok(found)
    }
}

fn check_radius(radius: f64) -> Result<(), PartitionError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(PartitionError::InvalidRadius(radius))
    }
}
