use bitvec::prelude::*;
use tile_rules::{Direction, TileCatalog, TileId};

/// Effective adjacency sets for every `(tile, direction)` pair.
///
/// Resolved once per call from the catalog's allowed/forbidden declarations
/// so the collapse loop only does lookups.
/// Indexing: `tile.0 * 8 + direction.index()`.
#[derive(Debug, Clone)]
pub struct AdjacencyRules {
    num_tiles: usize,
    allowed: Vec<BitVec>,
}

impl AdjacencyRules {
    pub fn from_catalog(catalog: &TileCatalog) -> Self {
        let num_tiles = catalog.len();
        let mut allowed = Vec::with_capacity(num_tiles * Direction::ALL.len());
        for tile in 0..num_tiles {
            for direction in Direction::ALL {
                allowed.push(catalog.effective_allowed(TileId(tile), direction));
            }
        }
        Self { num_tiles, allowed }
    }

    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    /// Tiles permitted next to `tile` towards `direction`.
    pub fn allowed(&self, tile: TileId, direction: Direction) -> Option<&BitSlice> {
        if tile.0 >= self.num_tiles {
            return None;
        }
        self.allowed
            .get(tile.0 * Direction::ALL.len() + direction.index())
            .map(BitVec::as_bitslice)
    }

    /// Checks if `neighbour` may sit next to `tile` towards `direction`.
    /// Out-of-range indices are treated as disallowed.
    #[inline]
    pub fn check(&self, tile: TileId, neighbour: TileId, direction: Direction) -> bool {
        self.allowed(tile, direction)
            .and_then(|set| set.get(neighbour.0).map(|bit| *bit))
            .unwrap_or(false)
    }
}
