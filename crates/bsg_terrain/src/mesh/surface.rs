//! Render mesh extraction.
//!
//! Every non-air tile gets a front quad. Side quads are emitted where the
//! axis neighbor holds a different tile id (air and out-of-grid included), so
//! two touching tiles of the same type never produce the face between them.
//!
//! Quads go to the submesh of their (tile, tier, variant); see
//! [`SubmeshTable`](crate::settings::SubmeshTable).

use bsg_shared::Color;
use tracing::warn;

use super::{ChunkMesh, Face};
use crate::catalog::{DepthTier, AIR};
use crate::grid::ChunkGrid;
use crate::settings::ChunkSettings;

/// Counters from one render-mesh pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Quads written.
    pub quads: usize,
    /// Quads whose submesh slot was past the material array.
    pub clamped: usize,
    /// Quads dropped because no submesh exists at all.
    pub skipped: usize,
}

/// Builds the render mesh of a chunk.
#[derive(Clone, Copy, Debug, Default)]
pub struct SurfaceMesher;

impl SurfaceMesher {
    /// Rebuilds `mesh` from `grid`. Expects tiers to be classified.
    pub fn build(grid: &ChunkGrid, mesh: &mut ChunkMesh) -> SurfaceStats {
        let settings = grid.settings();
        let catalog = settings.catalog();
        let table = settings.submeshes();
        let tile_size = settings.tile_size();
        let total = table.total();

        mesh.reset(total);
        let mut stats = SurfaceStats::default();

        for y in 0..settings.rows() {
            for x in 0..settings.columns() {
                for z in 0..settings.layers() {
                    let index = settings.index(x, y, z);
                    let tile_id = grid.tiles()[index];
                    if tile_id == AIR {
                        continue;
                    }

                    // Non-solid tiles (tier 0) share the surface bucket.
                    let tier = DepthTier::from_raw(grid.tiers()[index]).unwrap_or(DepthTier::Surface);
                    let slot = table.slot(tile_id, tier, grid.variants()[index]);
                    let slot = if total == 0 {
                        stats.skipped += 1;
                        continue;
                    } else if slot >= total {
                        stats.clamped += 1;
                        total - 1
                    } else {
                        slot
                    };

                    let center = settings.tile_local_position(x, y, z);
                    let color = Self::tile_color(settings, catalog.def(tile_id).tint, z, tier);

                    mesh.add_quad(slot, Face::Front.quad(center, tile_size), Face::Front, color);
                    stats.quads += 1;

                    let (gx, gy, gz) = (x as i32, y as i32, z as i32);
                    for face in Face::SIDES {
                        let (dx, dy) = face.neighbor_offset();
                        if grid.get_tile(gx + dx, gy + dy, gz) != tile_id {
                            mesh.add_quad(slot, face.quad(center, tile_size), face, color);
                            stats.quads += 1;
                        }
                    }
                }
            }
        }

        if stats.clamped > 0 || stats.skipped > 0 {
            warn!(
                clamped = stats.clamped,
                skipped = stats.skipped,
                submeshes = total,
                "render mesh quads without a valid submesh"
            );
        }
        stats
    }

    /// Layer depth tint, tile tint and tier shading, multiplied.
    #[inline]
    #[must_use]
    pub fn tile_color(settings: &ChunkSettings, tint: Color, z: usize, tier: DepthTier) -> Color {
        settings.layer_tint(z) * tint * settings.shade_tint(tier)
    }
}
