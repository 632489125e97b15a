//! # Chunk Manager
//!
//! Owns the ordered chunk sequence and everything shared between chunks:
//! the generator, the variant RNG and the event bus.
//!
//! ## Streaming
//!
//! ```text
//!   y = 0        ┌──────────┐ chunk 0 (empty start area)
//!                │          │
//!   -height      ├──────────┤ chunk 1
//!                │    v     │ <- frontier (furthest depth reached)
//!   -2*height    ├──────────┤ chunk 2   } lookahead: must already exist
//!                │          │
//!   -3*height    └──────────┘
//! ```
//!
//! At most one chunk is spawned per frontier update. Chunks are only ever
//! appended; [`ChunkManager::reset`] drops them all at once.
//!
//! ## Cross-chunk consistency
//!
//! Depth tiers near a chunk edge depend on the adjacent chunk. Spawning a
//! chunk refreshes the one above it, and explosions rebuild the adjacent
//! chunk when destruction happens within [`BOUNDARY_ROWS`](crate::destruction::BOUNDARY_ROWS) of the shared edge.

use std::sync::Arc;

use bsg_shared::{EventBus, EventReceiver, EventSender, ExplosionInstance, TerrainEvent};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::chunk::Chunk;
use crate::config::{SpawnConfig, TerrainConfig};
use crate::depth::NeighborResolver;
use crate::error::TerrainResult;
use crate::generator::{GenerationParams, TerrainGenerator};
use crate::grid::ChunkView;
use crate::layout::ChunkLayout;
use crate::noise::{purpose, TerrainSeed};
use crate::settings::ChunkSettings;

/// Summary of one manager-level explosion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExplosionReport {
    /// Tiles destroyed across all chunks.
    pub tiles_destroyed: usize,
    /// Chunks rebuilt (damaged chunks plus refreshed neighbors).
    pub chunks_rebuilt: usize,
}

/// The chunks directly above and below the one being rebuilt.
struct AdjacentChunks<'a> {
    above: Option<&'a Chunk>,
    below: Option<&'a Chunk>,
}

impl NeighborResolver for AdjacentChunks<'_> {
    fn neighbor(&self, offset: isize) -> Option<ChunkView<'_>> {
        match offset {
            -1 => self.above.map(Chunk::view),
            1 => self.below.map(Chunk::view),
            _ => None,
        }
    }
}

/// Ordered chunk sequence with streaming and destruction.
pub struct ChunkManager {
    settings: Arc<ChunkSettings>,
    generator: TerrainGenerator,
    initial_params: GenerationParams,
    seed: TerrainSeed,
    rng: ChaCha8Rng,
    spawn: SpawnConfig,
    chunks: Vec<Chunk>,
    frontier: f32,
    bus: EventBus,
    events: EventSender,
}

impl ChunkManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new(settings: ChunkSettings, seed: TerrainSeed, params: GenerationParams, spawn: SpawnConfig) -> Self {
        let bus = EventBus::new(spawn.event_capacity);
        let events = bus.sender();
        Self {
            settings: Arc::new(settings),
            generator: TerrainGenerator::new(seed, params),
            initial_params: params,
            seed,
            rng: seed.rng(purpose::VARIANTS),
            spawn,
            chunks: Vec::new(),
            frontier: 0.0,
            bus,
            events,
        }
    }

    /// Builds a manager from a parsed config.
    ///
    /// # Errors
    ///
    /// Propagates settings validation errors.
    pub fn from_config(config: &TerrainConfig) -> TerrainResult<Self> {
        let settings = config.build_settings()?;
        Ok(Self::new(settings, config.seed(), config.generation_params(), config.spawn))
    }

    // =========================================================================
    // SPAWNING
    // =========================================================================

    /// Appends a generated chunk below the last one. Returns its index.
    pub fn create_chunk(&mut self, empty: bool) -> usize {
        let index = self.chunks.len();
        let mut chunk = Chunk::new(index, Arc::clone(&self.settings));
        chunk.generate(&self.generator, empty);
        self.push_chunk(chunk)
    }

    /// Appends a chunk stamped from an authored layout. Returns its index.
    pub fn create_chunk_from_layout(&mut self, layout: &ChunkLayout) -> usize {
        let index = self.chunks.len();
        let mut chunk = Chunk::new(index, Arc::clone(&self.settings));
        chunk.apply_layout(&self.generator, layout);
        self.push_chunk(chunk)
    }

    fn push_chunk(&mut self, chunk: Chunk) -> usize {
        let index = chunk.index();
        let world_y = chunk.origin().y;
        self.chunks.push(chunk);

        self.rebuild_chunk(index);
        if index > 0 {
            // Its last rows can now see the new chunk.
            self.rebuild_chunk(index - 1);
        }

        debug!(chunk = index, world_y, "chunk created");
        self.publish(TerrainEvent::ChunkCreated {
            chunk_index: index,
            world_y,
        });
        index
    }

    /// Records how deep play has progressed and spawns the next chunk once
    /// the frontier plus lookahead reaches the bottom of the last chunk.
    ///
    /// Returns the index of the spawned chunk, if any.
    pub fn update_frontier(&mut self, depth: f32) -> Option<usize> {
        self.frontier = self.frontier.max(depth);

        let generated = self.chunks.len() as f32 * self.settings.chunk_height();
        if self.frontier + self.spawn.lookahead < generated {
            return None;
        }

        let empty = self.chunks.is_empty() && self.spawn.first_chunk_empty;
        let index = self.create_chunk(empty);
        debug!(chunk = index, frontier = self.frontier, "frontier spawned chunk");
        Some(index)
    }

    // =========================================================================
    // DESTRUCTION
    // =========================================================================

    /// Applies an explosion to every chunk, then rebuilds what changed.
    ///
    /// Damage is applied everywhere first so rebuilt chunks see their
    /// neighbors' final state.
    pub fn explode(&mut self, explosion: &ExplosionInstance) -> ExplosionReport {
        let mut report = ExplosionReport::default();
        if !explosion.affects_terrain() {
            return report;
        }

        let count = self.chunks.len();
        let mut needs_rebuild = vec![false; count];
        let mut dropped = 0usize;

        let events = &self.events;
        for (index, chunk) in self.chunks.iter_mut().enumerate() {
            let outcome = chunk.apply_explosion(explosion, |tile| {
                if !events.send(TerrainEvent::TileDestroyed(tile)) {
                    dropped += 1;
                }
            });
            if !outcome.any() {
                continue;
            }

            report.tiles_destroyed += outcome.destroyed;
            needs_rebuild[index] = true;
            if outcome.touched_top && index > 0 {
                needs_rebuild[index - 1] = true;
            }
            if outcome.touched_bottom && index + 1 < count {
                needs_rebuild[index + 1] = true;
            }
        }

        if dropped > 0 {
            warn!(dropped, "event channel full, tile destroyed events dropped");
        }

        for (index, rebuild) in needs_rebuild.into_iter().enumerate() {
            if rebuild {
                self.rebuild_chunk(index);
                report.chunks_rebuilt += 1;
            }
        }
        report
    }

    /// Rebuilds one chunk against its current neighbors.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn rebuild_chunk(&mut self, index: usize) -> bool {
        if index >= self.chunks.len() {
            return false;
        }

        let (before, rest) = self.chunks.split_at_mut(index);
        let Some((chunk, after)) = rest.split_first_mut() else {
            return false;
        };
        let neighbors = AdjacentChunks {
            above: before.last(),
            below: after.first(),
        };
        chunk.rebuild(&neighbors, &mut self.rng);

        self.publish(TerrainEvent::ChunkRebuilt { chunk_index: index });
        true
    }

    // =========================================================================
    // TUNING / LIFECYCLE
    // =========================================================================

    /// Retunes noise for chunks generated from now on.
    pub fn set_generation_settings(&mut self, noise_scale: f32, noise_amount: f32) {
        self.generator.set_params(GenerationParams::new(noise_scale, noise_amount));
        debug!(noise_scale, noise_amount, "generation settings changed");
    }

    /// Drops every chunk and restores the initial seed state, so a new
    /// session replays identically.
    pub fn reset(&mut self) {
        self.chunks.clear();
        self.frontier = 0.0;
        self.rng = self.seed.rng(purpose::VARIANTS);
        self.generator.set_params(self.initial_params);
        let stale = self.bus.receiver().drain();
        debug!(stale_events = stale.len(), "chunk manager reset");
    }

    fn publish(&self, event: TerrainEvent) {
        if !self.events.send(event) {
            warn!("event channel full, terrain event dropped");
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Chunk by index; `None` if it was never spawned.
    #[inline]
    #[must_use]
    pub fn get_chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// All chunks, shallowest first.
    #[inline]
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of spawned chunks.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Furthest depth observed.
    #[inline]
    #[must_use]
    pub fn frontier(&self) -> f32 {
        self.frontier
    }

    /// Current generation parameters.
    #[inline]
    #[must_use]
    pub fn generation_params(&self) -> GenerationParams {
        self.generator.params()
    }

    /// Shared chunk settings.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ChunkSettings {
        &self.settings
    }

    /// Master seed.
    #[inline]
    #[must_use]
    pub fn seed(&self) -> TerrainSeed {
        self.seed
    }

    /// Receiver for terrain events.
    #[must_use]
    pub fn events(&self) -> EventReceiver {
        self.bus.receiver()
    }
}
