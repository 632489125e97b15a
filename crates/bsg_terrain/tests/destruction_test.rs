//! # Destruction Tests
//!
//! Explosions against hand-built chunks: what gets destroyed, what survives,
//! and what the rebuilt mesh looks like afterwards.

use std::sync::Arc;

use bsg_shared::{ExplosionInstance, TileDestroyed, Vec3};
use bsg_terrain::{
    Chunk, ChunkDimensions, ChunkMesh, ChunkSettings, GenerationParams, NoNeighbors, TerrainGenerator, TerrainSeed,
    TileCatalog, TileRoles, TileTypeDef, AIR,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Border id 1 (indestructible), everything inside id 2 with `health`.
fn walled_chunk(columns: usize, rows: usize, health: f32) -> Chunk {
    let catalog = TileCatalog::new(vec![
        TileTypeDef::air(),
        TileTypeDef::solid("border", 1.0).indestructible(),
        TileTypeDef::solid("dirt", health),
    ])
    .expect("catalog");
    let roles = TileRoles {
        border: 1,
        primary_ground: 2,
        secondary_ground: 2,
    };
    let dims = ChunkDimensions::new(columns as f32, columns, rows, 1);
    let settings = Arc::new(ChunkSettings::new(dims, catalog, roles).expect("settings"));

    let generator = TerrainGenerator::new(TerrainSeed::new(1), GenerationParams::new(8.0, 100.0));
    let mut chunk = Chunk::new(0, settings);
    chunk.generate(&generator, false);
    chunk.rebuild(&NoNeighbors, &mut ChaCha8Rng::seed_from_u64(1));
    chunk
}

/// Grid cell `(x, y)` whose center is at `point` (tile size 1, chunk 0).
fn cell_at(chunk: &Chunk, point: Vec3) -> (i32, i32) {
    let settings = chunk.grid().settings();
    let x = (point.x + settings.dims().width * 0.5 - 0.5).round() as i32;
    let y = (settings.chunk_height() - point.y - 0.5).round() as i32;
    (x, y)
}

/// Side quads as (centroid, normal).
fn side_quads(mesh: &ChunkMesh) -> Vec<(Vec3, Vec3)> {
    mesh.vertices
        .chunks(4)
        .filter(|quad| quad[0].normal[2] == 0.0)
        .map(|quad| {
            let sum = quad
                .iter()
                .fold(Vec3::ZERO, |acc, v| acc + Vec3::from_array(v.position));
            (sum * 0.25, Vec3::from_array(quad[0].normal))
        })
        .collect()
}

#[test]
fn test_three_by_three_scenario() {
    let mut chunk = walled_chunk(3, 3, 10.0);
    let quads_before = chunk.render_mesh().quad_count();
    let center = chunk.tile_world_position(1, 1, 0);

    let mut destroyed: Vec<TileDestroyed> = Vec::new();
    let count = chunk.explode(
        &ExplosionInstance::at(center, 0.4, 10.0),
        &NoNeighbors,
        &mut ChaCha8Rng::seed_from_u64(2),
        |tile| destroyed.push(tile),
    );

    assert_eq!(count, 1);
    assert_eq!(destroyed.len(), 1);
    assert_eq!(destroyed[0].tile_id, 2);
    assert_eq!(destroyed[0].world_position, center);

    let grid = chunk.grid();
    assert_eq!(grid.get_tile(1, 1, 0), AIR);
    for y in 0..3 {
        for x in 0..3 {
            if (x, y) == (1, 1) {
                continue;
            }
            let expected = if x == 1 { (2, 10.0) } else { (1, 1.0) };
            assert_eq!((grid.get_tile(x, y, 0), grid.health(x, y, 0)), expected, "tile ({x}, {y})");
        }
    }

    // 9 fronts + 24 sides before; one front fewer after.
    assert_eq!(quads_before, 33);
    assert_eq!(chunk.render_mesh().quad_count(), 32);

    // Exactly four side faces bound the vacated cell.
    let around_hole = side_quads(chunk.render_mesh())
        .into_iter()
        .filter(|(centroid, normal)| (*centroid + *normal * 0.5) == center)
        .count();
    assert_eq!(around_hole, 4);
}

#[test]
fn test_side_faces_only_between_different_tiles() {
    let mut chunk = walled_chunk(7, 6, 10.0);
    for target in [(2, 2), (3, 2), (4, 4), (5, 0)] {
        let position = chunk.tile_world_position(target.0, target.1, 0);
        chunk.explode(
            &ExplosionInstance::at(position, 0.4, 50.0),
            &NoNeighbors,
            &mut ChaCha8Rng::seed_from_u64(3),
            |_| {},
        );
    }

    let sides = side_quads(chunk.render_mesh());
    assert!(!sides.is_empty());

    for (centroid, normal) in sides {
        let (ox, oy) = cell_at(&chunk, centroid - normal * 0.5);
        let (nx, ny) = cell_at(&chunk, centroid + normal * 0.5);
        let grid = chunk.grid();
        assert_ne!(
            grid.get_tile(ox, oy, 0),
            grid.get_tile(nx, ny, 0),
            "face between ({ox}, {oy}) and ({nx}, {ny})"
        );
        assert_ne!(grid.get_tile(ox, oy, 0), AIR, "faces belong to solid tiles");
    }
}

#[test]
fn test_health_to_air_after_ceil_hits() {
    for (health, damage) in [(10.0_f32, 3.0_f32), (10.0, 10.0), (10.0, 2.5), (30.0, 7.0), (1.0, 0.3)] {
        let mut chunk = walled_chunk(3, 3, health);
        let center = chunk.tile_world_position(1, 1, 0);
        let blast = ExplosionInstance::at(center, 0.4, damage);
        let hits = (health / damage).ceil() as usize;
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        for hit in 1..hits {
            chunk.explode(&blast, &NoNeighbors, &mut rng, |_| {});
            assert_eq!(
                chunk.grid().get_tile(1, 1, 0),
                2,
                "H={health} d={damage}: destroyed early at hit {hit}"
            );
        }
        chunk.explode(&blast, &NoNeighbors, &mut rng, |_| {});
        assert_eq!(chunk.grid().get_tile(1, 1, 0), AIR, "H={health} d={damage}: survived {hits} hits");
        println!("H={health} d={damage}: air after {hits} hits");
    }
}

#[test]
fn test_friendly_flag_forwarded() {
    let mut chunk = walled_chunk(5, 5, 10.0);
    let center = chunk.tile_world_position(2, 2, 0);
    let blast = ExplosionInstance::new(center, 1.1, 20.0, 4.0, true);

    let mut destroyed = Vec::new();
    chunk.explode(&blast, &NoNeighbors, &mut ChaCha8Rng::seed_from_u64(5), |tile| {
        destroyed.push(tile);
    });

    // Center plus the four axis neighbors; diagonals sit at sqrt(2).
    assert_eq!(destroyed.len(), 5);
    assert!(destroyed.iter().all(|tile| tile.explosion.friendly));
    assert!(destroyed.iter().all(|tile| tile.explosion.knockback == 4.0));
}

#[test]
fn test_out_of_bounds_writes_leave_grid_unchanged() {
    let mut chunk = walled_chunk(4, 4, 10.0);
    let before = chunk.grid().tiles().to_vec();

    let grid = chunk.grid_mut();
    for (x, y, z) in [(-1, 0, 0), (4, 0, 0), (0, -1, 0), (0, 4, 0), (0, 0, -1), (0, 0, 1), (i32::MAX, 0, 0)] {
        grid.set_tile(x, y, z, AIR);
        assert_eq!(grid.get_tile(x, y, z), AIR);
    }

    assert_eq!(chunk.grid().tiles(), before.as_slice());
}
