//! Reusable mesh scenes.

use cellmesh_core::{CellId, ElementId, MeshError, NodeId, Tissue};
use glam::DVec2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

/// Four nodes at the corners of the unit square and one element along the
/// bottom edge, `(0,0) → (1,0)`. No cell.
///
/// Returns the tissue, the corner nodes anticlockwise from the origin, and
/// the element.
pub fn unit_square_scene() -> Result<(Tissue, [NodeId; 4], ElementId), MeshError> {
    let mut t = Tissue::new();
    let n = [
        t.add_node(DVec2::new(0.0, 0.0)),
        t.add_node(DVec2::new(1.0, 0.0)),
        t.add_node(DVec2::new(1.0, 1.0)),
        t.add_node(DVec2::new(0.0, 1.0)),
    ];
    let e = t.add_element(n[0], n[1])?;
    Ok((t, n, e))
}

/// Add a closed cell through `vertices`, which must wind anticlockwise.
pub fn polygon_cell(
    t: &mut Tissue,
    vertices: &[DVec2],
) -> Result<(Vec<NodeId>, Vec<ElementId>, CellId), MeshError> {
    let nodes: Vec<NodeId> = vertices.iter().map(|&v| t.add_node(v)).collect();
    let elements = (0..nodes.len())
        .map(|k| t.add_element(nodes[k], nodes[(k + 1) % nodes.len()]))
        .collect::<Result<Vec<_>, _>>()?;
    let cell = t.add_cell(&elements)?;
    Ok((nodes, elements, cell))
}

/// Shape of a [`random_scene`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneParams {
    /// Cells per row.
    pub columns: usize,
    /// Rows of cells.
    pub rows: usize,
    /// Vertices per cell, at least 3.
    pub sides: usize,
    /// Distance between neighbouring cell centres.
    pub pitch: f64,
    /// Lattice position of the first cell's centre.
    pub origin: DVec2,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 4,
            sides: 8,
            pitch: 1.2,
            origin: DVec2::new(-2.0, -2.0),
        }
    }
}

/// A lattice of irregular convex-ish polygon cells that never overlap.
///
/// Each cell sits in its own square of side `pitch`. The centre is jittered
/// by up to 5% of the pitch, and every vertex lies at a radius between 30%
/// and 40% of the pitch, so neighbouring cells are always separated by a
/// gap. The same seed always produces the same scene.
pub fn random_scene(seed: u64, params: SceneParams) -> Result<Tissue, MeshError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut t = Tissue::new();
    let sides = params.sides.max(3);
    let jitter = 0.05 * params.pitch;
    for row in 0..params.rows {
        for col in 0..params.columns {
            let centre = params.origin
                + DVec2::new(col as f64, row as f64) * params.pitch
                + DVec2::new(
                    rng.random_range(-jitter..=jitter),
                    rng.random_range(-jitter..=jitter),
                );
            let phase = rng.random_range(0.0..TAU);
            let vertices: Vec<DVec2> = (0..sides)
                .map(|k| {
                    let angle = phase + TAU * k as f64 / sides as f64;
                    let radius = params.pitch * rng.random_range(0.3..=0.4);
                    centre + DVec2::from_angle(angle) * radius
                })
                .collect();
            polygon_cell(&mut t, &vertices)?;
        }
    }
    Ok(t)
}

/// A random displacement no longer than `max_step`.
pub fn random_step(rng: &mut ChaCha8Rng, max_step: f64) -> DVec2 {
    let angle = rng.random_range(0.0..TAU);
    let length = rng.random_range(0.0..=max_step);
    DVec2::from_angle(angle) * length
}
