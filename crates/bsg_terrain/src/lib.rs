//! # BSG Terrain
//!
//! Destructible chunk terrain for a vertically scrolling dig game.
//!
//! ## Design Principles
//!
//! 1. **Flat**: per-tile state lives in parallel arrays, never per-tile objects
//! 2. **Deterministic**: one seed drives noise and material variant draws
//! 3. **Buffers only**: meshes and material lists are produced, never drawn
//! 4. **Synchronous**: an explosion and its rebuild finish within one step
//!
//! ## Core Components
//!
//! - `TileCatalog`: tile types, their materials per depth tier, flags, health
//! - `ChunkGrid`: packed tile ids plus health/tier/variant arrays
//! - `TerrainGenerator`: border columns plus noise-and-ramp ground
//! - `DepthClassifier`: surface / near-surface / buried by neighbor rings
//! - `SurfaceMesher` / `ColliderMesher`: render and collision geometry
//! - `ChunkManager`: streaming, cross-chunk lookups, explosions, events
//!
//! ## Example
//!
//! ```rust,ignore
//! use bsg_shared::{ExplosionInstance, Vec3};
//! use bsg_terrain::{ChunkManager, TerrainConfig};
//!
//! let config = TerrainConfig::from_toml_file("data/schemas/terrain/terrain.toml")?;
//! let mut terrain = ChunkManager::from_config(&config)?;
//!
//! // Player reached 12 units down.
//! terrain.update_frontier(12.0);
//!
//! let report = terrain.explode(&ExplosionInstance::at(Vec3::new(0.0, -8.0, 0.0), 2.5, 20.0));
//! for event in terrain.events().drain() {
//!     // spawn debris, play sounds...
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod catalog;
pub mod chunk;
pub mod config;
pub mod depth;
pub mod destruction;
pub mod error;
pub mod generator;
pub mod grid;
pub mod layout;
pub mod manager;
pub mod mesh;
pub mod noise;
pub mod rebuild;
pub mod settings;

pub use catalog::{DepthTier, TileCatalog, TileTypeDef, AIR};
pub use chunk::Chunk;
pub use config::{SpawnConfig, TerrainConfig};
pub use depth::{DepthClassifier, NeighborResolver, NoNeighbors};
pub use destruction::DestructionOutcome;
pub use error::{TerrainError, TerrainResult};
pub use generator::{GenerationParams, TerrainGenerator};
pub use grid::{ChunkGrid, ChunkView};
pub use layout::ChunkLayout;
pub use manager::{ChunkManager, ExplosionReport};
pub use mesh::{ChunkMesh, ColliderMesher, Face, SurfaceMesher, TileVertex};
pub use noise::{PerlinNoise, TerrainSeed};
pub use rebuild::{rebuild_full, RebuildStats};
pub use settings::{ChunkDimensions, ChunkSettings, SubmeshTable, TileRoles};
