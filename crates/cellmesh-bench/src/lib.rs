//! Benchmark profiles for the cellmesh spatial partition.
//!
//! - [`reference_profile`]: 8x8 cells of 12 nodes (768 nodes)
//! - [`stress_profile`]: 32x32 cells of 12 nodes (~12K nodes)
//! - [`step_displacements`]: deterministic per-node moves for one step

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cellmesh_core::{MeshError, Tissue};
use cellmesh_test_utils::{random_scene, random_step, SceneParams};
use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Nodes per benchmark cell.
pub const SIDES: usize = 12;

/// Largest displacement of a node in one benchmark step. Small next to the
/// default 0.3 bucket, so most moves stay put and some cross a boundary.
pub const MAX_STEP: f64 = 0.05;

/// 8x8 cells on a 1.2 pitch.
pub fn reference_profile(seed: u64) -> Result<Tissue, MeshError> {
    random_scene(seed, params(8))
}

/// 32x32 cells on a 1.2 pitch.
pub fn stress_profile(seed: u64) -> Result<Tissue, MeshError> {
    random_scene(seed, params(32))
}

fn params(side: usize) -> SceneParams {
    SceneParams {
        columns: side,
        rows: side,
        sides: SIDES,
        pitch: 1.2,
        origin: DVec2::ZERO,
    }
}

/// `count` displacements of at most [`MAX_STEP`], reproducible from `seed`.
pub fn step_displacements(count: usize, seed: u64) -> Vec<DVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| random_step(&mut rng, MAX_STEP)).collect()
}
