use log::debug;
use rand::{Rng, RngCore};
use tile_rules::TileCatalog;

use crate::generators::MapGenerator;
use crate::grid::{Grid, TileGrid};
use crate::palette::RolePalette;
use crate::{validate_dimensions, GenerationError};

/// A cell becomes wall when more than this many cells of its 3x3 block,
/// the cell itself included, are walls.
const WALL_THRESHOLD: usize = 4;

/// Parameters for cave carving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaveParams {
    /// Chance that an interior cell starts as wall.
    pub fill_chance: f64,
    /// Number of smoothing passes.
    pub iterations: usize,
}

impl Default for CaveParams {
    fn default() -> Self {
        Self {
            fill_chance: 0.45,
            iterations: 5,
        }
    }
}

impl CaveParams {
    /// Rejects a fill chance outside `[0, 1]`, NaN included.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !(0.0..=1.0).contains(&self.fill_chance) {
            return Err(GenerationError::InvalidParameter(format!(
                "fill_chance must be within [0, 1], got {}",
                self.fill_chance
            )));
        }
        Ok(())
    }
}

/// Cellular-automaton cave generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutomatonCarver {
    params: CaveParams,
}

impl AutomatonCarver {
    pub fn new(params: CaveParams) -> Self {
        Self { params }
    }

    pub fn carve<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        rng: &mut R,
    ) -> Result<TileGrid, GenerationError> {
        validate_dimensions(width, height)?;
        self.params.validate()?;

        let walls = self.wall_mask(width, height, rng);

        let floor = RolePalette::floor(catalog);
        let wall = RolePalette::wall(catalog);
        let mut grid = TileGrid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let palette = if walls.get(x, y).copied().unwrap_or(true) {
                    &wall
                } else {
                    &floor
                };
                palette.paint(&mut grid, x, y, catalog, rng);
            }
        }

        debug!(
            "Caves {width}x{height}: {} of {} cells open after {} passes",
            walls.cells().iter().filter(|w| !**w).count(),
            width * height,
            self.params.iterations
        );
        Ok(grid)
    }

    /// Seeds and smooths the wall layout; `true` marks a wall.
    ///
    /// Border cells start as walls and are never updated.
    pub fn wall_mask<R: Rng + ?Sized>(&self, width: usize, height: usize, rng: &mut R) -> Grid<bool> {
        let mut walls = Grid::filled(width, height, true);
        for y in 0..height {
            for x in 0..width {
                if is_border(x, y, width, height) {
                    continue;
                }
                let is_wall = rng.gen::<f64>() < self.params.fill_chance;
                if let Some(cell) = walls.get_mut(x, y) {
                    *cell = is_wall;
                }
            }
        }

        for _ in 0..self.params.iterations {
            walls = smooth(&walls);
        }
        walls
    }
}

fn is_border(x: usize, y: usize, width: usize, height: usize) -> bool {
    x == 0 || y == 0 || x + 1 == width || y + 1 == height
}

/// One synchronous pass: every interior cell is computed from `previous`.
///
/// The count covers the whole 3x3 block including the cell itself, not only
/// its eight neighbours.
fn smooth(previous: &Grid<bool>) -> Grid<bool> {
    let (width, height) = (previous.width(), previous.height());
    let mut next = previous.clone();
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let mut count = 0;
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    if previous.get(nx, ny).copied().unwrap_or(true) {
                        count += 1;
                    }
                }
            }
            if let Some(cell) = next.get_mut(x, y) {
                *cell = count > WALL_THRESHOLD;
            }
        }
    }
    next
}

impl MapGenerator for AutomatonCarver {
    fn name(&self) -> &'static str {
        "cellular"
    }

    fn generate(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        rng: &mut dyn RngCore,
    ) -> Result<TileGrid, GenerationError> {
        self.carve(width, height, catalog, rng)
    }
}
