//! # Tile Catalog
//!
//! Read-only tile type definitions, indexed by tile id.
//!
//! Id 0 is reserved for air. Every tile type carries one material list per
//! depth tier; the renderer binds one material per (type, tier, variant).

use bsg_shared::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{TerrainError, TerrainResult};

/// Tile id of air (empty space).
pub const AIR: u16 = 0;

/// Stored tier value meaning "needs recompute".
pub const TIER_DIRTY: i8 = -1;

/// Stored tier value for tiles that are not collision tiles (air included).
pub const TIER_NON_SOLID: i8 = 0;

/// How exposed a solid tile is to open space.
#[repr(i8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DepthTier {
    /// Touches open space (ring-1 neighbor is non-collision).
    Surface = 1,
    /// Open space two tiles away.
    NearSurface = 2,
    /// Nothing open within two tiles.
    Buried = 3,
}

impl DepthTier {
    /// All tiers in submesh order.
    pub const ALL: [Self; 3] = [Self::Surface, Self::NearSurface, Self::Buried];

    /// Converts a stored tier value. Returns `None` for dirty/non-solid values.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i8) -> Option<Self> {
        match raw {
            1 => Some(Self::Surface),
            2 => Some(Self::NearSurface),
            3 => Some(Self::Buried),
            _ => None,
        }
    }

    /// Stored tier value (1..=3).
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i8 {
        self as i8
    }

    /// Zero-based slot (0..3), used to index per-tier tables.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        self as usize - 1
    }

    /// Light-to-shadow interpolation factor: 0 at the surface, 1 when buried.
    #[inline]
    #[must_use]
    pub fn shade(self) -> f32 {
        f32::from(self.raw() - 1) / 2.0
    }
}

/// Definition of one tile type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileTypeDef {
    /// Display name (config/debug only).
    #[serde(default)]
    pub name: String,
    /// Material variants for surface tiles.
    #[serde(default)]
    pub surface_materials: Vec<String>,
    /// Material variants for near-surface tiles.
    #[serde(default)]
    pub near_surface_materials: Vec<String>,
    /// Material variants for buried tiles.
    #[serde(default)]
    pub buried_materials: Vec<String>,
    /// Base tint multiplied into every vertex color.
    #[serde(default)]
    pub tint: Color,
    /// Blocks movement, counts as "solid" for depth shading.
    #[serde(default)]
    pub is_collision: bool,
    /// Ignored by explosions.
    #[serde(default)]
    pub is_indestructible: bool,
    /// Health a freshly placed tile starts with.
    #[serde(default)]
    pub max_health: f32,
}

impl TileTypeDef {
    /// Air: no collision, no materials, no health.
    #[must_use]
    pub fn air() -> Self {
        Self {
            name: "air".to_owned(),
            surface_materials: Vec::new(),
            near_surface_materials: Vec::new(),
            buried_materials: Vec::new(),
            tint: Color::WHITE,
            is_collision: false,
            is_indestructible: false,
            max_health: 0.0,
        }
    }

    /// A destructible collision tile with one material per tier, named
    /// `{name}_1`, `{name}_2`, `{name}_3`.
    #[must_use]
    pub fn solid(name: &str, max_health: f32) -> Self {
        Self {
            name: name.to_owned(),
            surface_materials: vec![format!("{name}_1")],
            near_surface_materials: vec![format!("{name}_2")],
            buried_materials: vec![format!("{name}_3")],
            tint: Color::WHITE,
            is_collision: true,
            is_indestructible: false,
            max_health,
        }
    }

    /// Marks the tile as indestructible.
    #[must_use]
    pub fn indestructible(mut self) -> Self {
        self.is_indestructible = true;
        self
    }

    /// Replaces the material list of one tier.
    #[must_use]
    pub fn with_materials(mut self, tier: DepthTier, materials: &[&str]) -> Self {
        let list = materials.iter().map(|m| (*m).to_owned()).collect();
        match tier {
            DepthTier::Surface => self.surface_materials = list,
            DepthTier::NearSurface => self.near_surface_materials = list,
            DepthTier::Buried => self.buried_materials = list,
        }
        self
    }

    /// Sets the base tint.
    #[must_use]
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    /// Material variants of a tier.
    #[inline]
    #[must_use]
    pub fn materials(&self, tier: DepthTier) -> &[String] {
        match tier {
            DepthTier::Surface => &self.surface_materials,
            DepthTier::NearSurface => &self.near_surface_materials,
            DepthTier::Buried => &self.buried_materials,
        }
    }

    /// Number of variants configured for a tier.
    #[inline]
    #[must_use]
    pub fn variant_count(&self, tier: DepthTier) -> usize {
        self.materials(tier).len()
    }

    /// Variants across all three tiers.
    #[must_use]
    pub fn total_variants(&self) -> usize {
        DepthTier::ALL.iter().map(|&tier| self.variant_count(tier)).sum()
    }
}

/// All tile types, indexed by id.
#[derive(Clone, Debug, PartialEq)]
pub struct TileCatalog {
    tiles: Vec<TileTypeDef>,
}

impl TileCatalog {
    /// Creates a catalog. Position in `tiles` is the tile id.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::EmptyCatalog`] if `tiles` is empty and
    /// [`TerrainError::SolidAirTile`] if id 0 collides or is indestructible.
    /// Materials on id 0 are never rendered and only logged.
    pub fn new(tiles: Vec<TileTypeDef>) -> TerrainResult<Self> {
        let Some(air) = tiles.first() else {
            return Err(TerrainError::EmptyCatalog);
        };
        if air.is_collision || air.is_indestructible {
            return Err(TerrainError::SolidAirTile { name: air.name.clone() });
        }
        if air.total_variants() > 0 {
            warn!(name = %air.name, variants = air.total_variants(), "tile id 0 has materials that are never rendered");
        }
        Ok(Self { tiles })
    }

    /// Number of tile types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always `false`: a catalog holds at least id 0.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Returns `true` if `id` has a definition.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: u16) -> bool {
        usize::from(id) < self.tiles.len()
    }

    /// Looks up a definition.
    #[inline]
    #[must_use]
    pub fn get(&self, id: u16) -> Option<&TileTypeDef> {
        self.tiles.get(usize::from(id))
    }

    /// Looks up a definition, falling back to id 0 for unknown ids.
    ///
    /// Grids only ever store known ids, so the fallback is a safety net.
    #[inline]
    #[must_use]
    pub fn def(&self, id: u16) -> &TileTypeDef {
        self.get(id).unwrap_or(&self.tiles[0])
    }

    /// Collision flag of a tile id.
    #[inline]
    #[must_use]
    pub fn is_collision(&self, id: u16) -> bool {
        self.def(id).is_collision
    }

    /// Iterates `(id, definition)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &TileTypeDef)> {
        self.tiles.iter().enumerate().map(|(id, def)| (id as u16, def))
    }
}
