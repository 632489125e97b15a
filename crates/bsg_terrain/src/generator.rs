//! # Terrain Generator
//!
//! Fills a fresh grid: border columns, then ground chosen by a noise field
//! multiplied by a depth ramp.
//!
//! ```text
//! value = noise01(x / scale, depth / scale) * depth * max(amount / 10000, 1e-6)
//! tile  = value < 0.5 ? primary_ground : secondary_ground
//! ```
//!
//! `depth` grows downward, so deeper chunks drift toward the secondary ground.
//! Any parameter values are accepted; degenerate ones just bias the output.

use crate::catalog::AIR;
use crate::grid::ChunkGrid;
use crate::noise::{PerlinNoise, TerrainSeed};
use crate::settings::ChunkSettings;

/// Threshold between primary and secondary ground.
pub const GROUND_THRESHOLD: f32 = 0.5;

/// Lower bound of the ramp factor.
const MIN_RAMP: f32 = 0.000_001;

/// Runtime-tunable generation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    /// Noise divisor. Zero or non-finite samples the field at the origin.
    pub noise_scale: f32,
    /// Depth ramp strength.
    pub noise_amount: f32,
}

impl GenerationParams {
    /// Creates parameters.
    #[must_use]
    pub const fn new(noise_scale: f32, noise_amount: f32) -> Self {
        Self {
            noise_scale,
            noise_amount,
        }
    }
}

/// Procedural tile assignment.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    noise: PerlinNoise,
    params: GenerationParams,
}

impl TerrainGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(seed: TerrainSeed, params: GenerationParams) -> Self {
        Self {
            noise: PerlinNoise::new(seed),
            params,
        }
    }

    /// Current parameters.
    #[inline]
    #[must_use]
    pub fn params(&self) -> GenerationParams {
        self.params
    }

    /// Retunes the generator. Affects chunks generated afterwards.
    pub fn set_params(&mut self, params: GenerationParams) {
        self.params = params;
    }

    /// Ground tile for column `x`, row `y` of a chunk whose origin is at `world_y`.
    #[must_use]
    pub fn ground_tile(&self, settings: &ChunkSettings, x: usize, y: usize, world_y: f32) -> u16 {
        let depth = y as f32 - world_y;
        let scale = self.params.noise_scale;

        let perlin = if scale.is_finite() && scale != 0.0 {
            self.noise.sample01(f64::from(x as f32 / scale), f64::from(depth / scale)) as f32
        } else {
            self.noise.sample01(0.0, 0.0) as f32
        };
        let ramp = depth * (self.params.noise_amount / 10_000.0).max(MIN_RAMP);

        let roles = settings.roles();
        if perlin * ramp < GROUND_THRESHOLD {
            roles.primary_ground
        } else {
            roles.secondary_ground
        }
    }

    /// Populates every cell of `grid`. Border columns get the border tile,
    /// the rest is air when `empty`, ground otherwise.
    pub fn generate(&self, grid: &mut ChunkGrid, world_y: f32, empty: bool) {
        let settings = grid.settings_arc().clone();
        let (columns, rows, layers) = (settings.columns(), settings.rows(), settings.layers());
        let border = settings.roles().border;

        for y in 0..rows {
            for x in 0..columns {
                let tile = if x == 0 || x == columns - 1 {
                    border
                } else if empty {
                    AIR
                } else {
                    self.ground_tile(&settings, x, y, world_y)
                };
                for z in 0..layers {
                    grid.set_tile_at(settings.index(x, y, z), tile);
                }
            }
        }
    }
}
