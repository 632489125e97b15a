//! Explosion description consumed by the terrain.
//!
//! Spawning policy (which bomb, when, how big) lives with the bomb code.
//! The terrain only ever sees the resulting instance.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// One detonation in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplosionInstance {
    /// World-space center of the blast.
    pub position: Vec3,
    /// Blast radius in world units. Tiles whose center is within it take damage.
    pub radius: f32,
    /// Health removed from every tile in range.
    pub damage: f32,
    /// Impulse applied to physics objects. Ignored by the terrain.
    pub knockback: f32,
    /// Friendly blasts spare the player. The terrain is agnostic to this flag
    /// and only forwards it with destruction events.
    pub friendly: bool,
}

impl ExplosionInstance {
    /// Creates a new explosion.
    #[must_use]
    pub const fn new(position: Vec3, radius: f32, damage: f32, knockback: f32, friendly: bool) -> Self {
        Self {
            position,
            radius,
            damage,
            knockback,
            friendly,
        }
    }

    /// Creates a hostile explosion without knockback. Handy for tooling and tests.
    #[must_use]
    pub const fn at(position: Vec3, radius: f32, damage: f32) -> Self {
        Self::new(position, radius, damage, 0.0, false)
    }

    /// Returns `true` if this explosion can change terrain at all.
    ///
    /// Zero/negative radius or damage degenerate to a no-op.
    #[inline]
    #[must_use]
    pub fn affects_terrain(&self) -> bool {
        self.radius > 0.0 && self.damage > 0.0
    }

    /// Returns `true` if `point` lies inside the blast sphere (boundary included).
    #[inline]
    #[must_use]
    pub fn reaches(&self, point: Vec3) -> bool {
        self.position.distance(point) <= self.radius
    }
}
