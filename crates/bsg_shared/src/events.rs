//! # Terrain Event Bus
//!
//! Notifications flowing OUT of the terrain engine.
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌──────────────┐
//! │   Terrain   │─────>│   Event     │─────>│ Debris / VFX │
//! │  (explode)  │      │   Channel   │      │  Audio, HUD  │
//! └─────────────┘      └─────────────┘      └──────────────┘
//! ```
//!
//! The terrain never waits on a consumer: sends are non-blocking and a full
//! channel drops the event.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::explosion::ExplosionInstance;
use crate::math::Vec3;

/// A tile removed by an explosion, captured before it turned into air.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileDestroyed {
    /// Index of the chunk the tile belonged to (0 = shallowest).
    pub chunk_index: usize,
    /// World position of the tile center.
    pub world_position: Vec3,
    /// Tile type id before destruction.
    pub tile_id: u16,
    /// Depth tier before destruction (1 surface .. 3 buried, 0 non-solid).
    pub depth_tier: i8,
    /// Material variant index before destruction.
    pub variant: u16,
    /// The explosion that destroyed it.
    pub explosion: ExplosionInstance,
}

/// Events published by the terrain.
#[derive(Clone, Debug, PartialEq)]
pub enum TerrainEvent {
    /// A tile's health reached zero.
    ///
    /// Consumed by: debris spawner, particles, score.
    TileDestroyed(TileDestroyed),

    /// A chunk was spawned and meshed.
    ChunkCreated {
        /// Chunk index.
        chunk_index: usize,
        /// World Y of the chunk origin.
        world_y: f32,
    },

    /// A chunk's render and collider meshes were regenerated.
    ///
    /// Consumed by: render/physics back ends (re-upload buffers).
    ChunkRebuilt {
        /// Chunk index.
        chunk_index: usize,
    },
}

/// Event channel (bounded, multi-producer multi-consumer).
pub struct EventBus {
    sender: Sender<TerrainEvent>,
    receiver: Receiver<TerrainEvent>,
}

impl EventBus {
    /// Creates a new event bus holding at most `capacity` pending events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<TerrainEvent>,
}

impl EventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the channel is full or every receiver is gone.
    #[inline]
    pub fn send(&self, event: TerrainEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<TerrainEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    #[must_use]
    pub fn drain(&self) -> Vec<TerrainEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<TerrainEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}
