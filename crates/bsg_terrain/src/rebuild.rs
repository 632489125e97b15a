//! Full chunk rebuild: reclassify every tile, then regenerate both meshes.
//!
//! This is the only place that turns grid state into geometry. Destruction
//! and spawning call it and nothing else, so an incremental strategy can
//! replace it without touching the grid or the classifier.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::depth::{ClassifyStats, DepthClassifier, NeighborResolver};
use crate::grid::ChunkGrid;
use crate::mesh::surface::SurfaceStats;
use crate::mesh::{ChunkMesh, ColliderMesher, SurfaceMesher};

/// What one rebuild did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebuildStats {
    /// Classification counters.
    pub classify: ClassifyStats,
    /// Render mesh counters.
    pub surface: SurfaceStats,
    /// Collider quads.
    pub collider_quads: usize,
    /// Wall time of the whole rebuild.
    pub elapsed: Duration,
}

/// Reclassifies `grid` and regenerates `render` and `collider` from scratch.
pub fn rebuild_full<N, R>(
    grid: &mut ChunkGrid,
    neighbors: &N,
    rng: &mut R,
    render: &mut ChunkMesh,
    collider: &mut ChunkMesh,
) -> RebuildStats
where
    N: NeighborResolver + ?Sized,
    R: Rng + ?Sized,
{
    let start = Instant::now();

    let classify = DepthClassifier::classify(grid, neighbors, rng);
    let surface = SurfaceMesher::build(grid, render);
    let collider_quads = ColliderMesher::build(grid, collider);

    RebuildStats {
        classify,
        surface,
        collider_quads,
        elapsed: start.elapsed(),
    }
}
