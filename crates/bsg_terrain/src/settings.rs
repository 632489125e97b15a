//! # Chunk Settings
//!
//! Immutable layout shared by every chunk of a session: dimensions, tile
//! catalog, tints, and the precomputed submesh table.
//!
//! ## Coordinate Convention
//!
//! ```text
//!        x = 0                      x = columns - 1
//!  y = 0   ┌───┬───┬───┬─── ... ───┐   <- chunk origin + chunk_height
//!          │ B │   │   │           │ B  (B = border column)
//!  y = 1   ├───┼───┼───┼─── ... ───┤
//!          ...
//!  y = rows-1                          <- chunk origin
//! ```
//!
//! Row 0 is the top of the chunk. Layers grow along +Z (away from the camera).

use bsg_shared::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::catalog::{DepthTier, TileCatalog};
use crate::error::{TerrainError, TerrainResult};

/// Grid dimensions of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkDimensions {
    /// Chunk width in world units.
    pub width: f32,
    /// Tiles along X.
    pub columns: usize,
    /// Tiles along Y.
    pub rows: usize,
    /// Tiles along Z.
    pub layers: usize,
}

impl ChunkDimensions {
    /// Creates dimensions.
    #[must_use]
    pub const fn new(width: f32, columns: usize, rows: usize, layers: usize) -> Self {
        Self {
            width,
            columns,
            rows,
            layers,
        }
    }
}

/// Tile ids with a fixed role in generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRoles {
    /// Indestructible tile placed in the first and last column.
    pub border: u16,
    /// Ground tile chosen below the noise threshold.
    pub primary_ground: u16,
    /// Ground tile chosen at or above the noise threshold.
    pub secondary_ground: u16,
}

impl Default for TileRoles {
    fn default() -> Self {
        Self {
            border: 1,
            primary_ground: 2,
            secondary_ground: 3,
        }
    }
}

/// Dense `(tile, tier, variant) -> submesh` mapping.
///
/// Submeshes are laid out by walking the catalog in id order, then tiers
/// 1..=3, then variants. The material array follows the same walk, so
/// `materials()[slot]` is the material bound to submesh `slot`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmeshTable {
    /// First submesh of each (tile, tier slot).
    offsets: Vec<[usize; 3]>,
    /// Material per submesh.
    materials: Vec<String>,
}

impl SubmeshTable {
    /// Walks the catalog once.
    #[must_use]
    pub fn build(catalog: &TileCatalog) -> Self {
        let mut offsets = Vec::with_capacity(catalog.len());
        let mut materials = Vec::new();

        for (_, def) in catalog.iter() {
            let mut tile_offsets = [0usize; 3];
            for tier in DepthTier::ALL {
                tile_offsets[tier.slot()] = materials.len();
                materials.extend(def.materials(tier).iter().cloned());
            }
            offsets.push(tile_offsets);
        }

        Self { offsets, materials }
    }

    /// Submesh index for a tile. May be out of range when `variant` exceeds
    /// the tier's configured variants; callers decide how to recover.
    #[inline]
    #[must_use]
    pub fn slot(&self, tile_id: u16, tier: DepthTier, variant: u16) -> usize {
        let base = self
            .offsets
            .get(usize::from(tile_id))
            .map_or(self.materials.len(), |offsets| offsets[tier.slot()]);
        base + usize::from(variant)
    }

    /// Total submeshes (= total variants across all tiles and tiers).
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.materials.len()
    }

    /// Material identifiers, one per submesh.
    #[inline]
    #[must_use]
    pub fn materials(&self) -> &[String] {
        &self.materials
    }
}

/// Everything a chunk needs to know about its shape and look.
#[derive(Clone, Debug)]
pub struct ChunkSettings {
    dims: ChunkDimensions,
    catalog: TileCatalog,
    roles: TileRoles,
    playable_layer: usize,
    back_layer_tint: Color,
    light_tint: Color,
    shadow_tint: Color,
    submeshes: SubmeshTable,
}

impl ChunkSettings {
    /// Validates and builds settings. Tints default to white, the playable
    /// layer to 0.
    ///
    /// # Errors
    ///
    /// - [`TerrainError::InvalidDimensions`] if any count is zero
    /// - [`TerrainError::UnknownTile`] if a role id is not in the catalog
    pub fn new(dims: ChunkDimensions, catalog: TileCatalog, roles: TileRoles) -> TerrainResult<Self> {
        if dims.columns == 0 || dims.rows == 0 || dims.layers == 0 {
            return Err(TerrainError::InvalidDimensions {
                columns: dims.columns,
                rows: dims.rows,
                layers: dims.layers,
            });
        }
        if !dims.width.is_finite() || dims.width <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "chunk width must be positive, got {}",
                dims.width
            )));
        }

        for (role, id) in [
            ("border", roles.border),
            ("primary ground", roles.primary_ground),
            ("secondary ground", roles.secondary_ground),
        ] {
            if !catalog.contains(id) {
                return Err(TerrainError::UnknownTile { role, id });
            }
        }

        let submeshes = SubmeshTable::build(&catalog);

        Ok(Self {
            dims,
            catalog,
            roles,
            playable_layer: 0,
            back_layer_tint: Color::WHITE,
            light_tint: Color::WHITE,
            shadow_tint: Color::WHITE,
            submeshes,
        })
    }

    /// Sets the collider layer (clamped on read).
    #[must_use]
    pub fn with_playable_layer(mut self, layer: usize) -> Self {
        self.playable_layer = layer;
        self
    }

    /// Sets the tint reached by the deepest layer.
    #[must_use]
    pub fn with_back_layer_tint(mut self, tint: Color) -> Self {
        self.back_layer_tint = tint;
        self
    }

    /// Sets the surface (tier 1) and buried (tier 3) shading tints.
    #[must_use]
    pub fn with_shading(mut self, light: Color, shadow: Color) -> Self {
        self.light_tint = light;
        self.shadow_tint = shadow;
        self
    }

    /// Grid dimensions.
    #[inline]
    #[must_use]
    pub fn dims(&self) -> ChunkDimensions {
        self.dims
    }

    /// Tiles along X.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> usize {
        self.dims.columns
    }

    /// Tiles along Y.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    /// Tiles along Z.
    #[inline]
    #[must_use]
    pub fn layers(&self) -> usize {
        self.dims.layers
    }

    /// Cells per chunk.
    #[inline]
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.dims.columns * self.dims.rows * self.dims.layers
    }

    /// Flat index of an in-range cell.
    #[inline]
    #[must_use]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.dims.columns + z * self.dims.columns * self.dims.rows
    }

    /// Edge length of one tile in world units.
    #[inline]
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.dims.width / self.dims.columns as f32
    }

    /// Height of one chunk in world units.
    #[inline]
    #[must_use]
    pub fn chunk_height(&self) -> f32 {
        self.dims.rows as f32 * self.tile_size()
    }

    /// Layer that produces collision geometry, clamped into `[0, layers)`.
    #[inline]
    #[must_use]
    pub fn playable_layer(&self) -> usize {
        self.playable_layer.min(self.dims.layers - 1)
    }

    /// Tile center relative to the chunk origin.
    ///
    /// X is centered on the origin, Y runs from `chunk_height` (row 0) down,
    /// Z starts at 0 for layer 0.
    #[must_use]
    pub fn tile_local_position(&self, x: usize, y: usize, z: usize) -> Vec3 {
        let ts = self.tile_size();
        let half = ts * 0.5;
        Vec3::new(
            -self.dims.width * 0.5 + x as f32 * ts + half,
            self.chunk_height() - y as f32 * ts - half,
            z as f32 * ts,
        )
    }

    /// White blended toward the back tint by normalized layer depth.
    #[must_use]
    pub fn layer_tint(&self, z: usize) -> Color {
        let t = if self.dims.layers > 1 {
            z as f32 / (self.dims.layers - 1) as f32
        } else {
            0.0
        };
        Color::WHITE.lerp(self.back_layer_tint, t)
    }

    /// Light/shadow blend for a tier.
    #[inline]
    #[must_use]
    pub fn shade_tint(&self, tier: DepthTier) -> Color {
        self.light_tint.lerp(self.shadow_tint, tier.shade())
    }

    /// Tile catalog.
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Border and ground tile ids.
    #[inline]
    #[must_use]
    pub fn roles(&self) -> TileRoles {
        self.roles
    }

    /// Submesh layout and material array.
    #[inline]
    #[must_use]
    pub fn submeshes(&self) -> &SubmeshTable {
        &self.submeshes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TileTypeDef;

    fn catalog() -> TileCatalog {
        TileCatalog::new(vec![
            TileTypeDef::air(),
            TileTypeDef::solid("border", 1.0).indestructible(),
            TileTypeDef::solid("dirt", 10.0).with_materials(DepthTier::Surface, &["dirt_a", "dirt_b", "dirt_c"]),
            TileTypeDef::solid("rock", 30.0),
        ])
        .expect("catalog")
    }

    #[test]
    fn test_submesh_table_walk_order() {
        let table = SubmeshTable::build(&catalog());

        // air: 0, border: 3, dirt: 3 + 1 + 1, rock: 3
        assert_eq!(table.total(), 11);
        assert_eq!(table.slot(1, DepthTier::Surface, 0), 0);
        assert_eq!(table.slot(1, DepthTier::Buried, 0), 2);
        assert_eq!(table.slot(2, DepthTier::Surface, 2), 5);
        assert_eq!(table.slot(2, DepthTier::NearSurface, 0), 6);
        assert_eq!(table.slot(3, DepthTier::Buried, 0), 10);
        assert_eq!(table.materials()[5], "dirt_c");
        assert_eq!(table.materials()[10], "rock_3");
    }

    #[test]
    fn test_invalid_dimensions() {
        let result = ChunkSettings::new(ChunkDimensions::new(10.0, 0, 4, 1), catalog(), TileRoles::default());
        assert!(matches!(result, Err(TerrainError::InvalidDimensions { columns: 0, .. })));
    }

    #[test]
    fn test_unknown_role_tile() {
        let roles = TileRoles {
            secondary_ground: 9,
            ..TileRoles::default()
        };
        let result = ChunkSettings::new(ChunkDimensions::new(10.0, 10, 4, 1), catalog(), roles);
        assert_eq!(
            result.err(),
            Some(TerrainError::UnknownTile {
                role: "secondary ground",
                id: 9
            })
        );
    }

    #[test]
    fn test_tile_positions() {
        let settings = ChunkSettings::new(ChunkDimensions::new(3.0, 3, 3, 2), catalog(), TileRoles::default())
            .expect("settings");

        assert_eq!(settings.tile_size(), 1.0);
        assert_eq!(settings.chunk_height(), 3.0);
        assert_eq!(settings.tile_local_position(0, 0, 0), Vec3::new(-1.0, 2.5, 0.0));
        assert_eq!(settings.tile_local_position(1, 1, 1), Vec3::new(0.0, 1.5, 1.0));
        assert_eq!(settings.tile_local_position(2, 2, 0), Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(settings.index(2, 1, 1), 2 + 3 + 9);
    }

    #[test]
    fn test_playable_layer_clamped() {
        let settings = ChunkSettings::new(ChunkDimensions::new(4.0, 4, 4, 3), catalog(), TileRoles::default())
            .expect("settings")
            .with_playable_layer(12);
        assert_eq!(settings.playable_layer(), 2);
    }

    #[test]
    fn test_layer_and_shade_tints() {
        let back = Color::new(0.0, 0.0, 0.5, 1.0);
        let settings = ChunkSettings::new(ChunkDimensions::new(4.0, 4, 4, 3), catalog(), TileRoles::default())
            .expect("settings")
            .with_back_layer_tint(back)
            .with_shading(Color::WHITE, Color::BLACK);

        assert_eq!(settings.layer_tint(0), Color::WHITE);
        assert_eq!(settings.layer_tint(2), back);
        assert_eq!(settings.shade_tint(DepthTier::Surface), Color::WHITE);
        assert_eq!(settings.shade_tint(DepthTier::NearSurface), Color::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(settings.shade_tint(DepthTier::Buried), Color::BLACK);
    }
}
