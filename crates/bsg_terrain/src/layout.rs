//! Hand-authored chunk layouts.
//!
//! A layout is plain text, one line per row (top row first), one digit per
//! column. Each digit indexes a palette of tile ids:
//!
//! ```text
//! 1000001      palette = [0, 1, 2]
//! 1022201      0 -> air, 1 -> border, 2 -> dirt
//! 1222221
//! ```
//!
//! Bad characters are logged and skipped, leaving the cell as air.

use tracing::warn;

use crate::error::{TerrainError, TerrainResult};
use crate::grid::ChunkGrid;

/// One placed cell of a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LayoutCell {
    column: usize,
    row: usize,
    tile_id: u16,
}

/// Parsed layout, ready to stamp onto a grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkLayout {
    cells: Vec<LayoutCell>,
    rows: usize,
    columns: usize,
}

impl ChunkLayout {
    /// Parses layout text through `palette`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::EmptyLayoutPalette`] if `palette` is empty.
    pub fn parse(text: &str, palette: &[u16]) -> TerrainResult<Self> {
        if palette.is_empty() {
            return Err(TerrainError::EmptyLayoutPalette);
        }

        let mut layout = Self::default();
        for (row, line) in text.split('\n').enumerate() {
            let mut column = 0;
            for ch in line.chars() {
                if ch == '\r' {
                    continue;
                }
                let position = column;
                column += 1;

                let Some(digit) = ch.to_digit(10) else {
                    warn!(%ch, column = position, row, "non-digit character in chunk layout");
                    continue;
                };
                let Some(&tile_id) = palette.get(digit as usize) else {
                    warn!(digit, palette = palette.len(), "chunk layout digit has no palette entry");
                    continue;
                };

                layout.cells.push(LayoutCell {
                    column: position,
                    row,
                    tile_id,
                });
            }
            layout.columns = layout.columns.max(column);
            layout.rows = row + 1;
        }
        Ok(layout)
    }

    /// Text lines.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Longest line, in characters.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells that map to a tile.
    #[inline]
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Tile placed at `(column, row)`, if the layout defines one.
    #[must_use]
    pub fn tile_at(&self, column: usize, row: usize) -> Option<u16> {
        self.cells
            .iter()
            .find(|cell| cell.column == column && cell.row == row)
            .map(|cell| cell.tile_id)
    }

    /// Stamps the layout onto every layer of `grid`.
    ///
    /// Border columns keep their border tile; cells outside the grid are ignored.
    pub fn apply(&self, grid: &mut ChunkGrid) {
        let settings = grid.settings_arc().clone();
        let last_column = settings.columns() - 1;

        for cell in &self.cells {
            if cell.column == 0 || cell.column >= last_column || cell.row >= settings.rows() {
                continue;
            }
            for z in 0..settings.layers() {
                grid.set_tile_at(settings.index(cell.column, cell.row, z), cell.tile_id);
            }
        }
    }
}
