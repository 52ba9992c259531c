//! Core library for procedural tile-map generation.
//!
//! Every generator takes a read-only [`TileCatalog`] and a target size and
//! returns a fresh [`TileGrid`]; nothing is kept between calls.

use thiserror::Error;

/// Room, cave and city generators painted from catalog roles.
pub mod generators;
/// Generic 2D grid plus the tile and domain grids built on it.
pub mod grid;
/// Per-role tile sampling with fallbacks for sparse catalogs.
pub mod palette;

/// Minimum-entropy cell selection for WFC.
pub mod entropy;
/// Directional constraint propagation for WFC.
pub mod propagator;
/// Precomputed effective adjacency sets.
pub mod rules;
/// The WFC collapse loop.
pub mod runner;

/// Named strategies and presets.
pub mod strategy;

pub use crate::entropy::{CardinalityEntropy, EntropyCalculator};
pub use crate::generators::{
    AutomatonCarver, BlockLayout, BspParams, CaveParams, CityParams, MapGenerator, Room,
    RoomPartitioner,
};
pub use crate::grid::{Cell, DomainGrid, Grid, TileGrid};
pub use crate::palette::RolePalette;
pub use crate::propagator::{ConstraintPropagator, DirectionalPropagator};
pub use crate::rules::AdjacencyRules;
pub use crate::runner::{run, ConstraintSolver, WfcStats};
pub use crate::strategy::{
    generate, generate_with, preset, GenerationParams, Preset, Strategy, PRESETS,
};

pub use tile_rules::{Direction, Role, TileCatalog, TileId};

/// Errors that can occur before a generation call produces any output.
///
/// Degenerate situations met during generation (a WFC contradiction, a BSP
/// leaf too small for a room) are recovered locally and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Width or height was zero, or their product overflows.
    #[error("Invalid grid dimensions {width}x{height}: both must be positive and the cell count must fit in usize")]
    InvalidDimensions { width: usize, height: usize },
    /// The catalog has no tiles and the strategy has no fallback tile.
    #[error("Tile catalog is empty")]
    EmptyCatalog,
    /// No strategy or preset with this name.
    #[error("Unknown generation strategy: {0}")]
    UnknownStrategy(String),
    /// A strategy parameter is out of its valid range.
    #[error("Invalid generation parameter: {0}")]
    InvalidParameter(String),
}

/// Rejects zero-sized grids, and grids whose cell count does not fit in
/// `usize`, before any work begins.
pub fn validate_dimensions(width: usize, height: usize) -> Result<(), GenerationError> {
    if width == 0 || height == 0 || width.checked_mul(height).is_none() {
        return Err(GenerationError::InvalidDimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dimensions() {
        assert_eq!(validate_dimensions(3, 4), Ok(()));
        assert_eq!(
            validate_dimensions(0, 4),
            Err(GenerationError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            validate_dimensions(usize::MAX, 2),
            Err(GenerationError::InvalidDimensions {
                width: usize::MAX,
                height: 2
            })
        );
    }
}
