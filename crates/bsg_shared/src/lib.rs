//! # BSG Shared
//!
//! Value types exchanged between the terrain engine and its collaborators.
//!
//! ## What lives here
//!
//! - `Vec3`, `Color`: plain `Pod` math used in mesh buffers and events
//! - `ExplosionInstance`: the only input the terrain consumes from the bomb code
//! - `TerrainEvent` + `EventBus`: notifications the terrain publishes
//!
//! Nothing in this crate knows about tiles, chunks or catalogs.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod events;
pub mod explosion;
pub mod math;

pub use events::{EventBus, EventReceiver, EventSender, TerrainEvent, TileDestroyed};
pub use explosion::ExplosionInstance;
pub use math::{Color, Vec3};
