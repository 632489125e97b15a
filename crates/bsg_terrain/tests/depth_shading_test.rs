//! # Depth Shading Tests
//!
//! Tier assignment by exposure, inside one chunk and across chunk seams.

use std::sync::Arc;

use bsg_terrain::{
    ChunkDimensions, ChunkGrid, ChunkLayout, ChunkManager, ChunkSettings, DepthClassifier, DepthTier,
    GenerationParams, NoNeighbors, SpawnConfig, TerrainSeed, TileCatalog, TileRoles, TileTypeDef, AIR,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const PALETTE: [u16; 3] = [0, 1, 2];

fn catalog() -> TileCatalog {
    TileCatalog::new(vec![
        TileTypeDef::air(),
        TileTypeDef::solid("border", 1.0).indestructible(),
        TileTypeDef::solid("dirt", 10.0),
        TileTypeDef {
            is_collision: false,
            ..TileTypeDef::solid("moss", 1.0)
        },
    ])
    .expect("catalog")
}

fn settings(columns: usize, rows: usize, layers: usize) -> ChunkSettings {
    let roles = TileRoles {
        border: 1,
        primary_ground: 2,
        secondary_ground: 2,
    };
    ChunkSettings::new(ChunkDimensions::new(columns as f32, columns, rows, layers), catalog(), roles).expect("settings")
}

fn manager() -> ChunkManager {
    let spawn = SpawnConfig {
        lookahead: 0.0,
        first_chunk_empty: false,
        event_capacity: 256,
    };
    ChunkManager::new(settings(5, 4, 1), TerrainSeed::new(9), GenerationParams::new(8.0, 100.0), spawn)
}

fn layout(text: &str) -> ChunkLayout {
    ChunkLayout::parse(text, &PALETTE).expect("layout")
}

#[test]
fn test_solid_block_tiers_by_distance_to_air() {
    // 5x5 block of dirt at 2..=6 inside a 9x9 grid of air.
    let mut grid = ChunkGrid::new(Arc::new(settings(9, 9, 1)));
    for y in 2..=6 {
        for x in 2..=6 {
            grid.set_tile(x, y, 0, 2);
        }
    }

    let stats = DepthClassifier::classify(&mut grid, &NoNeighbors, &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(stats.solid, 25);

    for y in 2..=6_i32 {
        for x in 2..=6_i32 {
            let distance = (x - 4).abs().max((y - 4).abs());
            let expected = match distance {
                2 => DepthTier::Surface,
                1 => DepthTier::NearSurface,
                _ => DepthTier::Buried,
            };
            assert_eq!(grid.depth_tier(x, y, 0), expected.raw(), "tile ({x}, {y})");
        }
    }
    assert_eq!(grid.depth_tier(0, 0, 0), 0, "air is non-solid");
}

#[test]
fn test_non_collision_tile_counts_as_open() {
    let mut grid = ChunkGrid::new(Arc::new(settings(7, 7, 1)));
    for y in 0..7 {
        for x in 0..7 {
            grid.set_tile(x, y, 0, 2);
        }
    }
    grid.set_tile(3, 3, 0, 3);

    DepthClassifier::classify(&mut grid, &NoNeighbors, &mut ChaCha8Rng::seed_from_u64(2));

    assert_eq!(grid.depth_tier(3, 3, 0), 0);
    assert_eq!(grid.depth_tier(2, 2, 0), DepthTier::Surface.raw());
    assert_eq!(grid.depth_tier(5, 3, 0), DepthTier::NearSurface.raw());
    assert_eq!(grid.depth_tier(6, 6, 0), DepthTier::Buried.raw());
}

#[test]
fn test_layers_classified_independently() {
    let mut grid = ChunkGrid::new(Arc::new(settings(5, 5, 2)));
    for y in 0..5 {
        for x in 0..5 {
            grid.set_tile(x, y, 0, 2);
        }
    }

    DepthClassifier::classify(&mut grid, &NoNeighbors, &mut ChaCha8Rng::seed_from_u64(3));

    // Layer 1 is all air but never exposes layer 0.
    for y in 0..5 {
        for x in 0..5 {
            assert_eq!(grid.depth_tier(x, y, 0), DepthTier::Buried.raw());
            assert_eq!(grid.get_tile(x, y, 1), AIR);
        }
    }
}

#[test]
fn test_missing_chunk_below_is_not_open() {
    let mut terrain = manager();
    terrain.create_chunk_from_layout(&layout("22222\n22222\n22222\n22222"));

    let grid = terrain.get_chunk(0).expect("chunk 0").grid();
    assert_eq!(grid.depth_tier(2, 3, 0), DepthTier::Buried.raw());
    assert_eq!(grid.depth_tier(0, 3, 0), DepthTier::Buried.raw());
}

#[test]
fn test_chunk_below_exposes_last_rows() {
    let mut terrain = manager();
    terrain.create_chunk_from_layout(&layout("22222\n22222\n22222\n22222"));
    terrain.create_chunk_from_layout(&layout("20002\n22222\n22222\n22222"));

    // Spawning chunk 1 refreshed chunk 0 against it.
    let upper = terrain.get_chunk(0).expect("chunk 0").grid();
    assert_eq!(upper.depth_tier(2, 3, 0), DepthTier::Surface.raw());
    assert_eq!(upper.depth_tier(0, 3, 0), DepthTier::Surface.raw(), "border sees the gap diagonally");
    assert_eq!(upper.depth_tier(2, 2, 0), DepthTier::NearSurface.raw());
    assert_eq!(upper.depth_tier(2, 1, 0), DepthTier::Buried.raw());

    let lower = terrain.get_chunk(1).expect("chunk 1").grid();
    assert_eq!(lower.get_tile(2, 0, 0), AIR);
    assert_eq!(lower.depth_tier(2, 1, 0), DepthTier::Surface.raw());
    assert_eq!(lower.depth_tier(2, 3, 0), DepthTier::Buried.raw());
}

#[test]
fn test_chunk_above_exposes_first_rows() {
    let mut terrain = manager();
    terrain.create_chunk_from_layout(&layout("22222\n22222\n22222\n20002"));
    terrain.create_chunk_from_layout(&layout("22222\n22222\n22222\n22222"));

    let lower = terrain.get_chunk(1).expect("chunk 1").grid();
    assert_eq!(lower.depth_tier(2, 0, 0), DepthTier::Surface.raw());
    assert_eq!(lower.depth_tier(2, 1, 0), DepthTier::NearSurface.raw());
    assert_eq!(lower.depth_tier(2, 2, 0), DepthTier::Buried.raw());
}

#[test]
fn test_variant_kept_while_tier_unchanged() {
    let mut grid = ChunkGrid::new(Arc::new(settings(9, 9, 1)));
    for y in 0..9 {
        for x in 0..9 {
            grid.set_tile(x, y, 0, 2);
        }
    }
    grid.set_tile(0, 0, 0, AIR);

    let mut rng = ChaCha8Rng::seed_from_u64(4);
    DepthClassifier::classify(&mut grid, &NoNeighbors, &mut rng);
    let variants = grid.variants().to_vec();

    // Opening a far corner only changes tiers near it.
    grid.set_tile(8, 8, 0, AIR);
    let stats = DepthClassifier::classify(&mut grid, &NoNeighbors, &mut rng);

    // 3 ring-1 tiles become Surface, 5 ring-2 tiles become NearSurface.
    assert_eq!(stats.rerolled, 8);
    assert_eq!(grid.variant(1, 1, 0), variants[grid.index_of(1, 1, 0).expect("in range")]);
    assert_eq!(grid.variant(4, 4, 0), variants[grid.index_of(4, 4, 0).expect("in range")]);
}
