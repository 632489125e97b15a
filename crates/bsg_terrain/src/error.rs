//! # Terrain Error Types
//!
//! Only construction can fail: parsing config, validating settings, parsing
//! authored layouts. Once a chunk exists, nothing it does returns an error.

use thiserror::Error;

/// Errors raised while building terrain settings or layouts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TerrainError {
    /// Config text could not be parsed or does not match the schema.
    #[error("invalid terrain configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read.
    #[error("failed to read {path}: {reason}")]
    Io {
        /// File that failed.
        path: String,
        /// OS error text.
        reason: String,
    },

    /// A chunk must have at least one column, row and layer.
    #[error("invalid chunk dimensions {columns}x{rows}x{layers}")]
    InvalidDimensions {
        /// Configured column count.
        columns: usize,
        /// Configured row count.
        rows: usize,
        /// Configured layer count.
        layers: usize,
    },

    /// The tile catalog has no entries (id 0 must exist).
    #[error("tile catalog is empty")]
    EmptyCatalog,

    /// Tile id 0 stands for empty space and must not collide or resist damage.
    #[error("tile id 0 ({name}) must be non-collision and destructible")]
    SolidAirTile {
        /// Name of the offending entry.
        name: String,
    },

    /// A tile id referenced by the settings is missing from the catalog.
    #[error("{role} tile id {id} is not in the catalog")]
    UnknownTile {
        /// What the id is used for ("border", "primary ground", ...).
        role: &'static str,
        /// The missing id.
        id: u16,
    },

    /// An authored layout has no palette to map digits through.
    #[error("chunk layout palette is empty")]
    EmptyLayoutPalette,
}

impl From<toml::de::Error> for TerrainError {
    fn from(err: toml::de::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

/// Result type for terrain construction.
pub type TerrainResult<T> = Result<T, TerrainError>;
