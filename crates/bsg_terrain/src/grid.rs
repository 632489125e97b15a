//! # Chunk Grid
//!
//! Packed tile storage for one chunk.
//!
//! ## Memory Layout
//!
//! Four parallel flat arrays, all `columns * rows * layers` long:
//!
//! | Array      | Type  | Meaning                                   |
//! |------------|-------|-------------------------------------------|
//! | `tiles`    | `u16` | tile id, 0 = air                          |
//! | `health`   | `f32` | remaining health                          |
//! | `tiers`    | `i8`  | -1 dirty, 0 non-solid, 1..=3 depth tier    |
//! | `variants` | `u16` | material variant within (tile, tier)      |
//!
//! `index = x + y * columns + z * columns * rows`.
//!
//! ## Bounds
//!
//! Reads outside the grid return air (tier 0, health 0). Writes outside the
//! grid are ignored. Edge handling never needs a special case.

use std::sync::Arc;

use tracing::warn;

use crate::catalog::{AIR, TIER_DIRTY, TIER_NON_SOLID};
use crate::settings::ChunkSettings;

/// Tile storage for one chunk.
#[derive(Clone, Debug)]
pub struct ChunkGrid {
    settings: Arc<ChunkSettings>,
    tiles: Vec<u16>,
    health: Vec<f32>,
    tiers: Vec<i8>,
    variants: Vec<u16>,
}

impl ChunkGrid {
    /// Allocates a grid full of air.
    #[must_use]
    pub fn new(settings: Arc<ChunkSettings>) -> Self {
        let count = settings.tile_count();
        Self {
            settings,
            tiles: vec![AIR; count],
            health: vec![0.0; count],
            tiers: vec![TIER_DIRTY; count],
            variants: vec![0; count],
        }
    }

    /// Shared settings.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ChunkSettings {
        &self.settings
    }

    /// Shared settings handle.
    #[inline]
    #[must_use]
    pub fn settings_arc(&self) -> &Arc<ChunkSettings> {
        &self.settings
    }

    /// Flat index of `(x, y, z)`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn index_of(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let (columns, rows, layers) = (self.settings.columns(), self.settings.rows(), self.settings.layers());
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= columns || y >= rows || z >= layers {
            return None;
        }
        Some(self.settings.index(x, y, z))
    }

    /// Tile id at `(x, y, z)`; air outside the grid.
    #[inline]
    #[must_use]
    pub fn get_tile(&self, x: i32, y: i32, z: i32) -> u16 {
        self.index_of(x, y, z).map_or(AIR, |i| self.tiles[i])
    }

    /// Places a tile: full health, tier marked dirty.
    ///
    /// Out-of-range coordinates and unknown tile ids are ignored (the latter
    /// with a warning).
    pub fn set_tile(&mut self, x: i32, y: i32, z: i32, tile_id: u16) {
        let Some(index) = self.index_of(x, y, z) else {
            return;
        };
        self.set_tile_at(index, tile_id);
    }

    /// [`ChunkGrid::set_tile`] by flat index. Out-of-range indices are ignored.
    pub fn set_tile_at(&mut self, index: usize, tile_id: u16) {
        if index >= self.tiles.len() {
            return;
        }
        let Some(def) = self.settings.catalog().get(tile_id) else {
            warn!(tile_id, index, "ignoring write of unknown tile id");
            return;
        };
        self.tiles[index] = tile_id;
        self.health[index] = def.max_health;
        self.tiers[index] = TIER_DIRTY;
    }

    /// Remaining health; 0 outside the grid.
    #[inline]
    #[must_use]
    pub fn health(&self, x: i32, y: i32, z: i32) -> f32 {
        self.index_of(x, y, z).map_or(0.0, |i| self.health[i])
    }

    /// Stored depth tier; 0 outside the grid.
    #[inline]
    #[must_use]
    pub fn depth_tier(&self, x: i32, y: i32, z: i32) -> i8 {
        self.index_of(x, y, z).map_or(TIER_NON_SOLID, |i| self.tiers[i])
    }

    /// Stored variant index; 0 outside the grid.
    #[inline]
    #[must_use]
    pub fn variant(&self, x: i32, y: i32, z: i32) -> u16 {
        self.index_of(x, y, z).map_or(0, |i| self.variants[i])
    }

    /// Collision flag of the tile at `(x, y, z)`; `false` outside the grid.
    #[inline]
    #[must_use]
    pub fn is_collision(&self, x: i32, y: i32, z: i32) -> bool {
        self.settings.catalog().is_collision(self.get_tile(x, y, z))
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Never true for a validated layout.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile ids.
    #[inline]
    #[must_use]
    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    /// Health values.
    #[inline]
    #[must_use]
    pub fn healths(&self) -> &[f32] {
        &self.health
    }

    /// Depth tiers.
    #[inline]
    #[must_use]
    pub fn tiers(&self) -> &[i8] {
        &self.tiers
    }

    /// Variant indices.
    #[inline]
    #[must_use]
    pub fn variants(&self) -> &[u16] {
        &self.variants
    }

    /// Number of non-air cells.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.tiles.iter().filter(|&&id| id != AIR).count()
    }

    /// Read-only view for neighbor lookups.
    #[inline]
    #[must_use]
    pub fn view(&self) -> ChunkView<'_> {
        ChunkView { grid: self }
    }

    /// Subtracts health and returns what is left.
    #[inline]
    pub(crate) fn damage_at(&mut self, index: usize, amount: f32) -> f32 {
        self.health[index] -= amount;
        self.health[index]
    }

    /// Stores a classification result.
    #[inline]
    pub(crate) fn classify_at(&mut self, index: usize, tier: i8, variant: u16) {
        self.tiers[index] = tier;
        self.variants[index] = variant;
    }
}

/// Read-only access to another chunk's tiles.
///
/// Handed out by the manager for cross-chunk depth lookups; it cannot mutate
/// the neighbor.
#[derive(Clone, Copy, Debug)]
pub struct ChunkView<'a> {
    grid: &'a ChunkGrid,
}

impl ChunkView<'_> {
    /// Tile id; air outside the grid.
    #[inline]
    #[must_use]
    pub fn get_tile(&self, x: i32, y: i32, z: i32) -> u16 {
        self.grid.get_tile(x, y, z)
    }

    /// Collision flag; `false` outside the grid.
    #[inline]
    #[must_use]
    pub fn is_collision(&self, x: i32, y: i32, z: i32) -> bool {
        self.grid.is_collision(x, y, z)
    }

    /// Rows of the viewed chunk.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.grid.settings().rows()
    }
}
