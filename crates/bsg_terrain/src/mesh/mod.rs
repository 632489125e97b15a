//! # Chunk Meshing
//!
//! Turns a classified grid into GPU-ready buffers.
//!
//! - [`surface`]: render mesh, one submesh per (tile, tier, variant)
//! - [`collider`]: connectivity-only mesh of the playable layer
//!
//! Both emit one quad per visible face, never merged. A quad is four vertices
//! and two triangles `(0, 1, 2), (0, 2, 3)`.

pub mod collider;
pub mod surface;

use bsg_shared::{Color, Vec3};
use bytemuck::{Pod, Zeroable};

pub use collider::ColliderMesher;
pub use surface::SurfaceMesher;

// =============================================================================
// VERTEX FORMAT
// =============================================================================

/// One mesh vertex, uploadable as-is.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TileVertex {
    /// Position relative to the chunk origin.
    pub position: [f32; 3],
    /// Face normal.
    pub normal: [f32; 3],
    /// Atlas coordinates.
    pub uv: [f32; 2],
    /// Layer, tile and shading tint combined.
    pub color: [f32; 4],
}

// =============================================================================
// FACES
// =============================================================================

/// Atlas cells per side.
const ATLAS_CELLS: f32 = 3.0;

/// Base UVs of a quad, one per corner.
const BASE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// A face of a tile cube. The back face is never visible and never emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// Faces the camera (-Z). Always emitted for render geometry.
    Front,
    /// +X, toward column `x + 1`.
    Right,
    /// -X, toward column `x - 1`.
    Left,
    /// -Y, toward row `y + 1`.
    Bottom,
    /// +Y, toward row `y - 1`.
    Top,
}

impl Face {
    /// Faces that depend on a neighbor, in emission order.
    pub const SIDES: [Self; 4] = [Self::Right, Self::Left, Self::Bottom, Self::Top];

    /// Corner offsets in tile units from the tile's min corner.
    #[must_use]
    pub const fn corners(self) -> [[f32; 3]; 4] {
        match self {
            Self::Front => [[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
            Self::Right => [[1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
            Self::Left => [[0.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            Self::Bottom => [[1.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            Self::Top => [[1.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
        }
    }

    /// Outward normal.
    #[must_use]
    pub const fn normal(self) -> Vec3 {
        match self {
            Self::Front => Vec3::new(0.0, 0.0, -1.0),
            Self::Right => Vec3::new(1.0, 0.0, 0.0),
            Self::Left => Vec3::new(-1.0, 0.0, 0.0),
            Self::Bottom => Vec3::new(0.0, -1.0, 0.0),
            Self::Top => Vec3::new(0.0, 1.0, 0.0),
        }
    }

    /// Grid offset `(dx, dy)` of the neighbor this face borders.
    /// Row indices grow downward, so `Top` looks at `y - 1`.
    #[must_use]
    pub const fn neighbor_offset(self) -> (i32, i32) {
        match self {
            Self::Front => (0, 0),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::Bottom => (0, 1),
            Self::Top => (0, -1),
        }
    }

    /// Atlas cell `(column, row)` on the 3x3 layout.
    #[must_use]
    pub const fn atlas_cell(self) -> (u8, u8) {
        match self {
            Self::Front => (1, 1),
            Self::Right => (2, 1),
            Self::Left => (0, 1),
            Self::Top => (1, 0),
            Self::Bottom => (1, 2),
        }
    }

    /// Per-corner UVs inside this face's atlas cell.
    #[must_use]
    pub fn uvs(self) -> [[f32; 2]; 4] {
        let (column, row) = self.atlas_cell();
        BASE_UVS.map(|[u, v]| [(f32::from(column) + u) / ATLAS_CELLS, (f32::from(row) + v) / ATLAS_CELLS])
    }

    /// World-space corners of this face for a tile centered at `center`.
    #[must_use]
    pub fn quad(self, center: Vec3, tile_size: f32) -> [Vec3; 4] {
        let half = tile_size * 0.5;
        let min = center - Vec3::new(half, half, half);
        self.corners().map(|corner| min + Vec3::from_array(corner) * tile_size)
    }
}

// =============================================================================
// MESH OUTPUT
// =============================================================================

/// Vertex buffer plus one index list per submesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Vertex buffer.
    pub vertices: Vec<TileVertex>,
    /// Triangle indices, one list per submesh.
    pub submeshes: Vec<Vec<u32>>,
}

impl ChunkMesh {
    /// Empty mesh with `submesh_count` empty index lists.
    #[must_use]
    pub fn new(submesh_count: usize) -> Self {
        Self {
            vertices: Vec::new(),
            submeshes: vec![Vec::new(); submesh_count],
        }
    }

    /// Clears all geometry, keeping allocations, and resizes the submesh list.
    pub fn reset(&mut self, submesh_count: usize) {
        self.vertices.clear();
        self.submeshes.resize_with(submesh_count, Vec::new);
        for indices in &mut self.submeshes {
            indices.clear();
        }
    }

    /// Appends a quad to `submesh`. The caller guarantees the slot exists.
    pub fn add_quad(&mut self, submesh: usize, corners: [Vec3; 4], face: Face, color: Color) {
        let base = self.vertices.len() as u32;
        let normal = face.normal().to_array();
        let uvs = face.uvs();
        let color = color.to_array();

        for (corner, uv) in corners.iter().zip(uvs) {
            self.vertices.push(TileVertex {
                position: corner.to_array(),
                normal,
                uv,
                color,
            });
        }
        self.submeshes[submesh].extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Check if mesh is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex count
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Quad count
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Triangle count across all submeshes
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(Vec::len).sum::<usize>() / 3
    }

    /// Number of submeshes
    #[must_use]
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Indices of one submesh (empty if out of range)
    #[must_use]
    pub fn indices(&self, submesh: usize) -> &[u32] {
        self.submeshes.get(submesh).map(Vec::as_slice).unwrap_or_default()
    }

    /// Raw vertex bytes for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
