//! Role-driven map generators.

use rand::RngCore;
use tile_rules::TileCatalog;

use crate::grid::TileGrid;
use crate::GenerationError;

pub mod bsp;
pub mod cellular;
pub mod city;

pub use bsp::{BspParams, Room, RoomPartitioner};
pub use cellular::{AutomatonCarver, CaveParams};
pub use city::{BlockLayout, CityParams};

/// A strategy that turns a catalog and a size into a complete tile grid.
///
/// Implementations validate their inputs before touching the grid, so a call
/// either returns every cell assigned or fails without output.
pub trait MapGenerator {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn generate(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        rng: &mut dyn RngCore,
    ) -> Result<TileGrid, GenerationError>;
}
