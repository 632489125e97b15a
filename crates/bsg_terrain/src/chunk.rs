//! # Chunk
//!
//! One generated slab of terrain: its grid, its world placement and the two
//! meshes built from it.
//!
//! ## Lifecycle
//!
//! ```text
//! new (all air) -> generate / apply_layout -> rebuild -> explode* -> dropped
//! ```
//!
//! Chunks are stacked downward: chunk `n` sits at `y = -n * chunk_height`.

use std::sync::Arc;

use bsg_shared::{ExplosionInstance, TileDestroyed, Vec3};
use rand::Rng;

use crate::depth::NeighborResolver;
use crate::destruction::{self, DestructionOutcome};
use crate::generator::TerrainGenerator;
use crate::grid::{ChunkGrid, ChunkView};
use crate::layout::ChunkLayout;
use crate::mesh::ChunkMesh;
use crate::rebuild::{rebuild_full, RebuildStats};
use crate::settings::ChunkSettings;

/// A chunk and its generated geometry.
#[derive(Clone, Debug)]
pub struct Chunk {
    index: usize,
    origin: Vec3,
    grid: ChunkGrid,
    render_mesh: ChunkMesh,
    collider_mesh: ChunkMesh,
    dirty: bool,
}

impl Chunk {
    /// Allocates chunk `index` (0 = shallowest), all air, no geometry.
    #[must_use]
    pub fn new(index: usize, settings: Arc<ChunkSettings>) -> Self {
        let origin = Vec3::new(0.0, -(index as f32) * settings.chunk_height(), 0.0);
        let submeshes = settings.submeshes().total();
        Self {
            index,
            origin,
            grid: ChunkGrid::new(settings),
            render_mesh: ChunkMesh::new(submeshes),
            collider_mesh: ChunkMesh::new(1),
            dirty: true,
        }
    }

    /// Fills the grid procedurally (border columns plus ground, or air if `empty`).
    pub fn generate(&mut self, generator: &TerrainGenerator, empty: bool) {
        generator.generate(&mut self.grid, self.origin.y, empty);
        self.dirty = true;
    }

    /// Replaces the interior with an authored layout. Border columns stay.
    pub fn apply_layout(&mut self, generator: &TerrainGenerator, layout: &ChunkLayout) {
        generator.generate(&mut self.grid, self.origin.y, true);
        layout.apply(&mut self.grid);
        self.dirty = true;
    }

    /// Reclassifies and remeshes the whole chunk.
    pub fn rebuild<N, R>(&mut self, neighbors: &N, rng: &mut R) -> RebuildStats
    where
        N: NeighborResolver + ?Sized,
        R: Rng + ?Sized,
    {
        let stats = rebuild_full(
            &mut self.grid,
            neighbors,
            rng,
            &mut self.render_mesh,
            &mut self.collider_mesh,
        );
        self.dirty = false;
        tracing::debug!(
            chunk = self.index,
            solid = stats.classify.solid,
            quads = stats.surface.quads,
            collider_quads = stats.collider_quads,
            elapsed_us = stats.elapsed.as_micros() as u64,
            "chunk rebuilt"
        );
        stats
    }

    /// Damages tiles without touching geometry. Marks the chunk dirty if
    /// anything was destroyed; call [`Chunk::rebuild`] afterwards.
    pub fn apply_explosion<F>(&mut self, explosion: &ExplosionInstance, on_destroyed: F) -> DestructionOutcome
    where
        F: FnMut(TileDestroyed),
    {
        let outcome = destruction::apply_explosion(&mut self.grid, self.origin, self.index, explosion, on_destroyed);
        self.dirty |= outcome.any();
        outcome
    }

    /// Applies an explosion and, if any tile was destroyed, rebuilds the chunk.
    /// Returns the number of destroyed tiles.
    pub fn explode<N, R, F>(&mut self, explosion: &ExplosionInstance, neighbors: &N, rng: &mut R, on_destroyed: F) -> usize
    where
        N: NeighborResolver + ?Sized,
        R: Rng + ?Sized,
        F: FnMut(TileDestroyed),
    {
        let outcome = self.apply_explosion(explosion, on_destroyed);
        if outcome.any() {
            self.rebuild(neighbors, rng);
        }
        outcome.destroyed
    }

    /// Position in the chunk sequence.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// World position of the chunk origin.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// World position of a tile center.
    #[inline]
    #[must_use]
    pub fn tile_world_position(&self, x: usize, y: usize, z: usize) -> Vec3 {
        self.origin + self.grid.settings().tile_local_position(x, y, z)
    }

    /// Tile storage.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    /// Mutable tile storage. Edits take effect on the next rebuild.
    #[inline]
    pub fn grid_mut(&mut self) -> &mut ChunkGrid {
        self.dirty = true;
        &mut self.grid
    }

    /// Read-only view for neighbor lookups.
    #[inline]
    #[must_use]
    pub fn view(&self) -> ChunkView<'_> {
        self.grid.view()
    }

    /// Render mesh (positions relative to [`Chunk::origin`]).
    #[inline]
    #[must_use]
    pub fn render_mesh(&self) -> &ChunkMesh {
        &self.render_mesh
    }

    /// Collider mesh of the playable layer.
    #[inline]
    #[must_use]
    pub fn collider_mesh(&self) -> &ChunkMesh {
        &self.collider_mesh
    }

    /// Material per render submesh.
    #[inline]
    #[must_use]
    pub fn materials(&self) -> &[String] {
        self.grid.settings().submeshes().materials()
    }

    /// Returns `true` if the grid changed since the last rebuild.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
