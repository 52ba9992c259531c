use bitvec::prelude::*;
use tile_rules::{Role, TileCatalog, TileId};

use crate::{validate_dimensions, GenerationError};

/// Row-major 2D grid with dimensions fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a new grid with the given dimensions, initialized with default values.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }

    /// Creates a grid whose cells are all clones of `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Returns a new grid of the requested size. With `copy_overlap`, the
    /// top-left region shared by both sizes is copied over; every other cell
    /// starts at its default.
    pub fn resized(
        &self,
        width: usize,
        height: usize,
        copy_overlap: bool,
    ) -> Result<Self, GenerationError> {
        validate_dimensions(width, height)?;
        let mut resized = Self::new(width, height);
        if copy_overlap {
            for y in 0..height.min(self.height) {
                for x in 0..width.min(self.width) {
                    resized.data[y * width + x] = self.data[y * self.width + x].clone();
                }
            }
        }
        Ok(resized)
    }
}

impl<T> Grid<T> {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns an immutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).and_then(|idx| self.data.get(idx))
    }

    /// Returns a mutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.index(x, y).and_then(move |idx| self.data.get_mut(idx))
    }

    /// Row-major slices, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics; an empty grid simply has no rows.
        self.data.chunks(self.width.max(1))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[T] {
        &self.data
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }
}

/// One output cell: the assigned tile (if any) and the role copied from the
/// catalog when it was assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    tile: Option<TileId>,
    role: Role,
}

impl Cell {
    /// The assigned tile, `None` until the cell is painted.
    pub fn tile(&self) -> Option<TileId> {
        self.tile
    }

    /// Role of the assigned tile.
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Whether a tile has been placed here.
    pub fn is_assigned(&self) -> bool {
        self.tile.is_some()
    }

    /// Tile index as exported, `-1` when unassigned.
    pub fn index(&self) -> i64 {
        self.tile.map_or(-1, |t| t.0 as i64)
    }
}

/// The generated map.
pub type TileGrid = Grid<Cell>;

impl Grid<Cell> {
    /// Assigns `tile` at `(x, y)` and copies its role from `catalog`.
    ///
    /// `fallback_role` is used only when `tile` is not in the catalog, which
    /// happens when a generator degrades on an empty catalog. Returns `false`
    /// if the coordinates are out of bounds.
    pub fn assign(
        &mut self,
        x: usize,
        y: usize,
        tile: TileId,
        catalog: &TileCatalog,
        fallback_role: &Role,
    ) -> bool {
        let role = catalog.role(tile).unwrap_or(fallback_role).clone();
        match self.get_mut(x, y) {
            Some(cell) => {
                *cell = Cell {
                    tile: Some(tile),
                    role,
                };
                true
            }
            None => false,
        }
    }

    /// `true` once every cell holds a tile.
    pub fn is_fully_assigned(&self) -> bool {
        self.data.iter().all(Cell::is_assigned)
    }

    /// Number of cells whose role equals `role`.
    pub fn count_role(&self, role: &Role) -> usize {
        self.data.iter().filter(|c| &c.role == role).count()
    }

    /// Tile indices row by row, `-1` for unassigned cells.
    pub fn tile_rows(&self) -> Vec<Vec<i64>> {
        self.rows()
            .map(|row| row.iter().map(Cell::index).collect())
            .collect()
    }

    /// Role names row by row.
    pub fn role_rows(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|row| row.iter().map(|c| c.role.to_string()).collect())
            .collect()
    }

    /// `(tile index, role)` pairs row by row.
    pub fn pair_rows(&self) -> Vec<Vec<(i64, Role)>> {
        self.rows()
            .map(|row| row.iter().map(|c| (c.index(), c.role.clone())).collect())
            .collect()
    }
}

/// Candidate tile sets per cell during WFC.
pub type DomainGrid = Grid<BitVec>;

impl Grid<BitVec> {
    /// Every cell starts with the full tile range `0..num_tiles`.
    pub fn full(width: usize, height: usize, num_tiles: usize) -> Self {
        Self::filled(width, height, bitvec![1; num_tiles])
    }
}
