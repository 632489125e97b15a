//! Collision mesh extraction.
//!
//! Only the playable layer is considered, and only the collision flag
//! matters: a collision tile gets a side quad wherever its axis neighbor does
//! not collide. Tile types, tiers and variants are ignored; everything lands in
//! submesh 0.

use bsg_shared::Color;

use super::{ChunkMesh, Face};
use crate::grid::ChunkGrid;

/// Builds the collider mesh of a chunk.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColliderMesher;

impl ColliderMesher {
    /// Rebuilds `mesh` from `grid`. Returns the number of quads.
    pub fn build(grid: &ChunkGrid, mesh: &mut ChunkMesh) -> usize {
        let settings = grid.settings();
        let tile_size = settings.tile_size();
        let z = settings.playable_layer();
        let gz = z as i32;

        mesh.reset(1);
        let mut quads = 0;

        for y in 0..settings.rows() {
            for x in 0..settings.columns() {
                let (gx, gy) = (x as i32, y as i32);
                if !grid.is_collision(gx, gy, gz) {
                    continue;
                }

                let center = settings.tile_local_position(x, y, z);
                for face in Face::SIDES {
                    let (dx, dy) = face.neighbor_offset();
                    if !grid.is_collision(gx + dx, gy + dy, gz) {
                        mesh.add_quad(0, face.quad(center, tile_size), face, Color::WHITE);
                        quads += 1;
                    }
                }
            }
        }
        quads
    }
}
