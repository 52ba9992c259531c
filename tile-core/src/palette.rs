use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use tile_rules::{Role, TileCatalog, TileId};

use crate::grid::TileGrid;

/// The tiles a generator may paint for one role.
///
/// Each [`RolePalette::sample`] is an independent uniform draw, so a region
/// of one role gets per-cell variety rather than one repeated tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePalette {
    role: Role,
    tiles: Vec<TileId>,
}

impl RolePalette {
    /// Floor tiles; without any, the first non-wall tile; without that, tile 0.
    pub fn floor(catalog: &TileCatalog) -> Self {
        let mut tiles = catalog.tiles_with_role(&Role::Floor);
        if tiles.is_empty() {
            let fallback = catalog
                .tiles()
                .iter()
                .position(|t| t.role != Role::Wall)
                .map_or(TileId(0), TileId);
            warn!("Catalog declares no floor tiles, painting floor with tile {}", fallback.0);
            tiles.push(fallback);
        }
        Self {
            role: Role::Floor,
            tiles,
        }
    }

    /// Wall tiles; without any, tile 1 when the catalog has more than one
    /// tile, else tile 0.
    pub fn wall(catalog: &TileCatalog) -> Self {
        let mut tiles = catalog.tiles_with_role(&Role::Wall);
        if tiles.is_empty() {
            let fallback = if catalog.len() > 1 { TileId(1) } else { TileId(0) };
            warn!("Catalog declares no wall tiles, painting walls with tile {}", fallback.0);
            tiles.push(fallback);
        }
        Self {
            role: Role::Wall,
            tiles,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TileId {
        self.tiles.choose(rng).copied().unwrap_or(TileId(0))
    }

    /// Samples a tile and assigns it at `(x, y)`.
    pub fn paint<R: Rng + ?Sized>(
        &self,
        grid: &mut TileGrid,
        x: usize,
        y: usize,
        catalog: &TileCatalog,
        rng: &mut R,
    ) {
        let tile = self.sample(rng);
        grid.assign(x, y, tile, catalog, &self.role);
    }
}
