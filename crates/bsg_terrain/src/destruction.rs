//! # Destruction
//!
//! Applies one spherical explosion to a grid.
//!
//! ## Algorithm
//!
//! ```text
//! for every cell (y, x, z):
//!     skip air and indestructible tiles
//!     if |tile_center - blast| <= radius:
//!         health -= damage
//!         if health <= 0: notify, set to air
//! ```
//!
//! This pass only mutates tiles. Geometry is rebuilt afterwards by the caller
//! (see [`crate::rebuild`]), so a batch of explosions across several chunks
//! can be applied before anything is remeshed.

use bsg_shared::{ExplosionInstance, TileDestroyed, Vec3};

use crate::catalog::AIR;
use crate::grid::ChunkGrid;

/// Rows from a chunk edge within which destruction can change the depth
/// tiers of the adjacent chunk (ring 2 reaches two rows across).
pub const BOUNDARY_ROWS: usize = 2;

/// Result of one explosion on one grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DestructionOutcome {
    /// Tiles turned into air.
    pub destroyed: usize,
    /// A destroyed tile lies within [`BOUNDARY_ROWS`] of the top edge.
    pub touched_top: bool,
    /// A destroyed tile lies within [`BOUNDARY_ROWS`] of the bottom edge.
    pub touched_bottom: bool,
}

impl DestructionOutcome {
    /// Returns `true` if any tile was destroyed.
    #[inline]
    #[must_use]
    pub fn any(&self) -> bool {
        self.destroyed > 0
    }
}

/// Damages every destructible tile in range of `explosion`.
///
/// `origin` is the world position of the chunk; `on_destroyed` receives each
/// removed tile with its state from before removal.
pub fn apply_explosion<F>(
    grid: &mut ChunkGrid,
    origin: Vec3,
    chunk_index: usize,
    explosion: &ExplosionInstance,
    mut on_destroyed: F,
) -> DestructionOutcome
where
    F: FnMut(TileDestroyed),
{
    let mut outcome = DestructionOutcome::default();
    if !explosion.affects_terrain() {
        return outcome;
    }

    let settings = grid.settings_arc().clone();
    let catalog = settings.catalog();
    let rows = settings.rows();

    for y in 0..rows {
        for x in 0..settings.columns() {
            for z in 0..settings.layers() {
                let index = settings.index(x, y, z);
                let tile_id = grid.tiles()[index];
                if tile_id == AIR || catalog.def(tile_id).is_indestructible {
                    continue;
                }

                let world_position = origin + settings.tile_local_position(x, y, z);
                if !explosion.reaches(world_position) {
                    continue;
                }

                if grid.damage_at(index, explosion.damage) > 0.0 {
                    continue;
                }

                on_destroyed(TileDestroyed {
                    chunk_index,
                    world_position,
                    tile_id,
                    depth_tier: grid.tiers()[index],
                    variant: grid.variants()[index],
                    explosion: *explosion,
                });
                grid.set_tile_at(index, AIR);

                outcome.destroyed += 1;
                outcome.touched_top |= y < BOUNDARY_ROWS;
                outcome.touched_bottom |= y + BOUNDARY_ROWS >= rows;
            }
        }
    }
    outcome
}
