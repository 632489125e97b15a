//! # Depth Classification
//!
//! Decides how exposed each collision tile is, which picks its shading tier.
//!
//! ```text
//!   2 2 2 2 2        1 = ring 1 (8 cells)
//!   2 1 1 1 2        2 = ring 2 (16 cells)
//!   2 1 T 1 2
//!   2 1 1 1 2        any open cell in ring 1 -> Surface
//!   2 2 2 2 2        else any open in ring 2 -> NearSurface
//!                    else                     -> Buried
//! ```
//!
//! Rings are tested in the tile's own layer. Columns outside the chunk are
//! skipped. Rows outside the chunk are looked up in the chunk above or below
//! through a [`NeighborResolver`]; a chunk that does not exist yet means the
//! cell is skipped, not treated as open.
//!
//! Variants are cached: a new one is drawn only when the tile's tier differs
//! from the stored value (a freshly placed tile is stored as dirty, so it
//! always draws).

use rand::Rng;
use tracing::warn;

use crate::catalog::{DepthTier, AIR, TIER_NON_SOLID};
use crate::grid::{ChunkGrid, ChunkView};

/// Ring at Chebyshev distance 1.
const RING_1: [(i32, i32); 8] = [(0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1)];

/// Ring at Chebyshev distance 2.
const RING_2: [(i32, i32); 16] = [
    (-2, -2),
    (-1, -2),
    (0, -2),
    (1, -2),
    (2, -2),
    (2, -1),
    (2, 0),
    (2, 1),
    (2, 2),
    (1, 2),
    (0, 2),
    (-1, 2),
    (-2, 2),
    (-2, 1),
    (-2, 0),
    (-2, -1),
];

/// Read-only access to the chunks around the one being classified.
pub trait NeighborResolver {
    /// Chunk at `offset` from the current one: -1 is directly above,
    /// +1 directly below. `None` if it does not exist.
    fn neighbor(&self, offset: isize) -> Option<ChunkView<'_>>;
}

/// Resolver for a chunk with nothing around it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNeighbors;

impl NeighborResolver for NoNeighbors {
    fn neighbor(&self, _offset: isize) -> Option<ChunkView<'_>> {
        None
    }
}

/// Counters from one classification pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassifyStats {
    /// Collision tiles classified.
    pub solid: usize,
    /// Tiles whose tier changed (and drew a new variant).
    pub rerolled: usize,
    /// Tiles whose tier has no configured variants.
    pub missing_variants: usize,
}

/// Ring-based exposure classifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthClassifier;

impl DepthClassifier {
    /// Classifies every cell of `grid`.
    pub fn classify<N, R>(grid: &mut ChunkGrid, neighbors: &N, rng: &mut R) -> ClassifyStats
    where
        N: NeighborResolver + ?Sized,
        R: Rng + ?Sized,
    {
        let settings = grid.settings_arc().clone();
        let (columns, rows, layers) = (settings.columns(), settings.rows(), settings.layers());
        let catalog = settings.catalog();
        let mut stats = ClassifyStats::default();

        for y in 0..rows {
            for x in 0..columns {
                for z in 0..layers {
                    let index = settings.index(x, y, z);
                    let tile_id = grid.tiles()[index];
                    let def = catalog.def(tile_id);

                    let (tier, draw_from) = if def.is_collision {
                        stats.solid += 1;
                        let tier = Self::tier_of(grid, neighbors, x as i32, y as i32, z as i32);
                        (tier.raw(), tier)
                    } else {
                        (TIER_NON_SOLID, DepthTier::Surface)
                    };

                    let previous = grid.tiers()[index];
                    if previous == tier {
                        continue;
                    }

                    let mut variant = 0;
                    if tile_id != AIR {
                        stats.rerolled += 1;
                        let count = def.variant_count(draw_from);
                        if count == 0 {
                            stats.missing_variants += 1;
                        } else {
                            variant = rng.gen_range(0..count) as u16;
                        }
                    }
                    grid.classify_at(index, tier, variant);
                }
            }
        }

        if stats.missing_variants > 0 {
            warn!(
                tiles = stats.missing_variants,
                "tiles classified into a tier with no material variants"
            );
        }
        stats
    }

    /// Tier of the collision tile at `(x, y, z)`.
    #[must_use]
    pub fn tier_of<N>(grid: &ChunkGrid, neighbors: &N, x: i32, y: i32, z: i32) -> DepthTier
    where
        N: NeighborResolver + ?Sized,
    {
        if Self::ring_has_open(grid, neighbors, x, y, z, &RING_1) {
            DepthTier::Surface
        } else if Self::ring_has_open(grid, neighbors, x, y, z, &RING_2) {
            DepthTier::NearSurface
        } else {
            DepthTier::Buried
        }
    }

    fn ring_has_open<N>(grid: &ChunkGrid, neighbors: &N, x: i32, y: i32, z: i32, ring: &[(i32, i32)]) -> bool
    where
        N: NeighborResolver + ?Sized,
    {
        let columns = grid.settings().columns() as i32;
        let rows = grid.settings().rows() as i32;

        ring.iter().any(|&(dx, dy)| {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || nx >= columns {
                return false;
            }
            let collision = if ny < 0 {
                neighbors
                    .neighbor(-1)
                    .map(|above| above.is_collision(nx, above.rows() as i32 + ny, z))
            } else if ny >= rows {
                neighbors.neighbor(1).map(|below| below.is_collision(nx, ny - rows, z))
            } else {
                Some(grid.is_collision(nx, ny, z))
            };
            collision == Some(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::catalog::{TileCatalog, TileTypeDef};
    use crate::settings::{ChunkDimensions, ChunkSettings, TileRoles};

    fn settings(columns: usize, rows: usize) -> Arc<ChunkSettings> {
        let catalog = TileCatalog::new(vec![
            TileTypeDef::air(),
            TileTypeDef::solid("border", 1.0).indestructible(),
            TileTypeDef::solid("dirt", 10.0).with_materials(DepthTier::Buried, &["a", "b", "c", "d"]),
        ])
        .expect("catalog");
        let roles = TileRoles {
            border: 1,
            primary_ground: 2,
            secondary_ground: 2,
        };
        Arc::new(ChunkSettings::new(ChunkDimensions::new(columns as f32, columns, rows, 1), catalog, roles).expect("settings"))
    }

    fn filled(columns: usize, rows: usize) -> ChunkGrid {
        let mut grid = ChunkGrid::new(settings(columns, rows));
        for y in 0..rows as i32 {
            for x in 0..columns as i32 {
                grid.set_tile(x, y, 0, 2);
            }
        }
        grid
    }

    #[test]
    fn test_single_hole_rings() {
        let mut grid = filled(9, 9);
        grid.set_tile(4, 4, 0, AIR);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        DepthClassifier::classify(&mut grid, &NoNeighbors, &mut rng);

        assert_eq!(grid.depth_tier(4, 4, 0), TIER_NON_SOLID);
        assert_eq!(grid.depth_tier(3, 3, 0), 1);
        assert_eq!(grid.depth_tier(5, 4, 0), 1);
        assert_eq!(grid.depth_tier(2, 2, 0), 2);
        assert_eq!(grid.depth_tier(6, 5, 0), 2);
        assert_eq!(grid.depth_tier(1, 4, 0), 3);
        assert_eq!(grid.depth_tier(0, 0, 0), 3, "missing neighbors are not open");
    }

    #[test]
    fn test_reclassify_keeps_variants() {
        let mut grid = filled(7, 7);
        grid.set_tile(3, 3, 0, AIR);

        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let first = DepthClassifier::classify(&mut grid, &NoNeighbors, &mut rng);
        let tiers = grid.tiers().to_vec();
        let variants = grid.variants().to_vec();

        let second = DepthClassifier::classify(&mut grid, &NoNeighbors, &mut rng);

        assert_eq!(first.rerolled, 48);
        assert_eq!(second.rerolled, 0);
        assert_eq!(grid.tiers(), tiers.as_slice());
        assert_eq!(grid.variants(), variants.as_slice());
    }

    #[test]
    fn test_variant_drawn_within_tier_list() {
        let mut grid = filled(9, 9);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        DepthClassifier::classify(&mut grid, &NoNeighbors, &mut rng);

        for (&tier, &variant) in grid.tiers().iter().zip(grid.variants()) {
            if tier == DepthTier::Buried.raw() {
                assert!(variant < 4);
            } else {
                assert_eq!(variant, 0);
            }
        }
    }

    #[test]
    fn test_missing_variants_reported() {
        let catalog = TileCatalog::new(vec![
            TileTypeDef::air(),
            TileTypeDef::solid("bare", 5.0).with_materials(DepthTier::Surface, &[]),
        ])
        .expect("catalog");
        let roles = TileRoles {
            border: 1,
            primary_ground: 1,
            secondary_ground: 1,
        };
        let settings = Arc::new(ChunkSettings::new(ChunkDimensions::new(3.0, 3, 1, 1), catalog, roles).expect("settings"));
        let mut grid = ChunkGrid::new(settings);
        grid.set_tile(1, 0, 0, 1);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let stats = DepthClassifier::classify(&mut grid, &NoNeighbors, &mut rng);

        assert_eq!(stats.solid, 1);
        assert_eq!(stats.missing_variants, 1);
        assert_eq!(grid.depth_tier(1, 0, 0), 1);
        assert_eq!(grid.variant(1, 0, 0), 0);
    }

    #[test]
    fn test_missing_variants_counted_once_per_tier_change() {
        let catalog = TileCatalog::new(vec![
            TileTypeDef::air(),
            TileTypeDef::solid("bare", 5.0).with_materials(DepthTier::Surface, &[]),
        ])
        .expect("catalog");
        let roles = TileRoles {
            border: 1,
            primary_ground: 1,
            secondary_ground: 1,
        };
        let settings = Arc::new(ChunkSettings::new(ChunkDimensions::new(5.0, 5, 1, 1), catalog, roles).expect("settings"));
        let mut grid = ChunkGrid::new(settings);
        for x in [0, 2, 4] {
            grid.set_tile(x, 0, 0, 1);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let stats = DepthClassifier::classify(&mut grid, &NoNeighbors, &mut rng);
        assert_eq!(stats.missing_variants, 3);

        let stats = DepthClassifier::classify(&mut grid, &NoNeighbors, &mut rng);
        assert_eq!(stats.missing_variants, 0);
        assert_eq!(stats.rerolled, 0);
    }
}
