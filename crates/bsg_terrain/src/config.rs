//! # Terrain Configuration
//!
//! Data-driven setup loaded once at startup from
//! `data/schemas/terrain/terrain.toml`.
//!
//! ```toml
//! seed = 1337
//!
//! [chunk]
//! width = 20.0
//! columns = 20
//! rows = 10
//! layers = 3
//!
//! [generation]
//! noise_scale = 8.0
//! noise_amount = 100.0
//!
//! [[tiles]]
//! name = "air"
//! ```
//!
//! Tile ids are positions in the `[[tiles]]` list.

use std::path::Path;

use bsg_shared::Color;
use serde::{Deserialize, Serialize};

use crate::catalog::{TileCatalog, TileTypeDef};
use crate::error::{TerrainError, TerrainResult};
use crate::generator::GenerationParams;
use crate::noise::TerrainSeed;
use crate::settings::{ChunkDimensions, ChunkSettings, TileRoles};

/// `[chunk]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkSection {
    /// Chunk width in world units.
    pub width: f32,
    /// Tiles along X.
    pub columns: usize,
    /// Tiles along Y.
    pub rows: usize,
    /// Tiles along Z.
    pub layers: usize,
    /// Layer used for collider geometry (clamped).
    #[serde(default)]
    pub playable_layer: usize,
    /// Tint reached by the deepest layer.
    #[serde(default)]
    pub back_layer_tint: Color,
    /// Shading of surface tiles.
    #[serde(default)]
    pub light_tint: Color,
    /// Shading of buried tiles.
    #[serde(default)]
    pub shadow_tint: Color,
}

/// `[generation]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSection {
    /// Noise divisor; larger values give wider features.
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f32,
    /// Depth ramp strength (per 10 000 units).
    #[serde(default = "default_noise_amount")]
    pub noise_amount: f32,
    /// Border column tile id.
    #[serde(default = "default_border")]
    pub border_tile: u16,
    /// Ground below the threshold.
    #[serde(default = "default_primary")]
    pub primary_ground: u16,
    /// Ground at or above the threshold.
    #[serde(default = "default_secondary")]
    pub secondary_ground: u16,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            noise_scale: default_noise_scale(),
            noise_amount: default_noise_amount(),
            border_tile: default_border(),
            primary_ground: default_primary(),
            secondary_ground: default_secondary(),
        }
    }
}

fn default_noise_scale() -> f32 {
    8.0
}

fn default_noise_amount() -> f32 {
    100.0
}

fn default_border() -> u16 {
    TileRoles::default().border
}

fn default_primary() -> u16 {
    TileRoles::default().primary_ground
}

fn default_secondary() -> u16 {
    TileRoles::default().secondary_ground
}

/// `[spawn]` table: chunk streaming and event delivery.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// World units below the frontier that must already be generated.
    #[serde(default = "default_lookahead")]
    pub lookahead: f32,
    /// Leave the very first chunk empty (open starting area).
    #[serde(default = "default_first_chunk_empty")]
    pub first_chunk_empty: bool,
    /// Pending events kept before new ones are dropped.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            lookahead: default_lookahead(),
            first_chunk_empty: default_first_chunk_empty(),
            event_capacity: default_event_capacity(),
        }
    }
}

fn default_lookahead() -> f32 {
    10.0
}

fn default_first_chunk_empty() -> bool {
    true
}

fn default_event_capacity() -> usize {
    1024
}

/// Whole terrain config document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Master seed.
    #[serde(default)]
    pub seed: u64,
    /// Chunk layout.
    pub chunk: ChunkSection,
    /// Generator tuning.
    #[serde(default)]
    pub generation: GenerationSection,
    /// Streaming.
    #[serde(default)]
    pub spawn: SpawnConfig,
    /// Tile catalog, id = position.
    pub tiles: Vec<TileTypeDef>,
}

impl TerrainConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfig`] on syntax or schema errors.
    pub fn from_toml_str(text: &str) -> TerrainResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::Io`] if the file cannot be read, otherwise as
    /// [`TerrainConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| TerrainError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Master seed.
    #[must_use]
    pub fn seed(&self) -> TerrainSeed {
        TerrainSeed::new(self.seed)
    }

    /// Generator parameters.
    #[must_use]
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams::new(self.generation.noise_scale, self.generation.noise_amount)
    }

    /// Validates the catalog and chunk layout.
    ///
    /// # Errors
    ///
    /// See [`TileCatalog::new`] and [`ChunkSettings::new`].
    pub fn build_settings(&self) -> TerrainResult<ChunkSettings> {
        let catalog = TileCatalog::new(self.tiles.clone())?;
        let dims = ChunkDimensions::new(self.chunk.width, self.chunk.columns, self.chunk.rows, self.chunk.layers);
        let roles = TileRoles {
            border: self.generation.border_tile,
            primary_ground: self.generation.primary_ground,
            secondary_ground: self.generation.secondary_ground,
        };

        Ok(ChunkSettings::new(dims, catalog, roles)?
            .with_playable_layer(self.chunk.playable_layer)
            .with_back_layer_tint(self.chunk.back_layer_tint)
            .with_shading(self.chunk.light_tint, self.chunk.shadow_tint))
    }
}
