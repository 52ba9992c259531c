//! Tile catalog types for the tile forge engine.
//!
//! A catalog is the designer-declared vocabulary: every tile carries a
//! semantic [`Role`] and, for each of the eight compass [`Direction`]s, a
//! rule listing which tiles may or may not sit next to it.

use thiserror::Error;

#[cfg(feature = "serde")]
pub mod formats;
pub mod generator;
#[cfg(feature = "serde")]
pub mod loader;
pub mod types;

pub use types::{
    CatalogError, Direction, DirectionalRule, RelationKind, Role, TileCatalog, TileId, TileRecord,
};

/// Errors raised while reading a catalog document.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog format (RON/JSON): {0}")]
    ParseError(String),
    #[error("Invalid catalog data: {0}")]
    InvalidData(String),
    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}
