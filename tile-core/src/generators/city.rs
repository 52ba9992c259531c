use log::debug;
use rand::{Rng, RngCore};
use tile_rules::TileCatalog;

use crate::generators::MapGenerator;
use crate::grid::TileGrid;
use crate::palette::RolePalette;
use crate::{validate_dimensions, GenerationError};

/// Parameters for the block city layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityParams {
    /// Largest building footprint per axis; footprints shrink by up to 2.
    pub block_size: usize,
    /// Gap between consecutive block origins beyond `block_size`.
    pub street_width: usize,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            block_size: 8,
            street_width: 2,
        }
    }
}

impl CityParams {
    /// Rejects footprints below 2 and block periods that overflow.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.block_size < 2 {
            return Err(GenerationError::InvalidParameter(format!(
                "block_size must be at least 2, got {}",
                self.block_size
            )));
        }
        if self.block_size.checked_add(self.street_width).is_none() {
            return Err(GenerationError::InvalidParameter(format!(
                "block_size {} plus street_width {} is too large",
                self.block_size, self.street_width
            )));
        }
        Ok(())
    }

    /// Distance between block origins along each axis.
    pub fn period(&self) -> usize {
        self.block_size.saturating_add(self.street_width)
    }
}

/// Grid city: streets everywhere, one building per block origin.
///
/// Block origins sit at multiples of [`CityParams::period`] on both axes.
/// Only the footprint sizes and the sampled tiles are random.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockLayout {
    params: CityParams,
}

impl BlockLayout {
    pub fn new(params: CityParams) -> Self {
        Self { params }
    }

    pub fn layout<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        rng: &mut R,
    ) -> Result<TileGrid, GenerationError> {
        validate_dimensions(width, height)?;
        self.params.validate()?;

        let street = RolePalette::floor(catalog);
        let building = RolePalette::wall(catalog);

        let mut grid = TileGrid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                street.paint(&mut grid, x, y, catalog, rng);
            }
        }

        let block = self.params.block_size;
        let period = self.params.period();
        let mut blocks = 0;
        for by in (0..height).step_by(period) {
            for bx in (0..width).step_by(period) {
                let bw = rng.gen_range(block - 2..=block);
                let bh = rng.gen_range(block - 2..=block);
                for y in by..by.saturating_add(bh).min(height) {
                    for x in bx..bx.saturating_add(bw).min(width) {
                        building.paint(&mut grid, x, y, catalog, rng);
                    }
                }
                blocks += 1;
            }
        }

        debug!("City {width}x{height}: {blocks} blocks with period {period}");
        Ok(grid)
    }
}

impl MapGenerator for BlockLayout {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn generate(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        rng: &mut dyn RngCore,
    ) -> Result<TileGrid, GenerationError> {
        self.layout(width, height, catalog, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tile_rules::Role;

    #[test]
    fn test_streets_between_blocks_stay_floor() {
        let catalog = TileCatalog::from_roles(["floor", "wall"]);
        let layout = BlockLayout::new(CityParams::default());
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = layout.layout(40, 30, &catalog, &mut rng).unwrap();
            // Footprints never exceed block_size, so offsets 8 and 9 within
            // each period are always street.
            for y in 0..30 {
                for x in 0..40 {
                    let cell = grid.get(x, y).unwrap();
                    if x % 10 >= 8 || y % 10 >= 8 {
                        assert_eq!(cell.role(), &Role::Floor, "({x},{y}) seed {seed}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_block_origins_are_buildings() {
        let catalog = TileCatalog::from_roles(["floor", "wall"]);
        let mut rng = StdRng::seed_from_u64(9);
        let grid = BlockLayout::default()
            .layout(25, 25, &catalog, &mut rng)
            .unwrap();
        // The minimum footprint is 6x6 from every origin.
        for (ox, oy) in [(0, 0), (10, 0), (20, 0), (0, 20), (20, 20)] {
            for y in oy..(oy + 6).min(25) {
                for x in ox..(ox + 6).min(25) {
                    assert_eq!(grid.get(x, y).unwrap().role(), &Role::Wall);
                }
            }
        }
    }

    #[test]
    fn test_overflowing_period_rejected_without_panic() {
        let catalog = TileCatalog::from_roles(["floor", "wall"]);
        let mut rng = StdRng::seed_from_u64(0);
        let layout = BlockLayout::new(CityParams {
            block_size: usize::MAX,
            street_width: 1,
        });
        assert!(matches!(
            layout.layout(10, 10, &catalog, &mut rng),
            Err(GenerationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_huge_block_covers_the_map() {
        let catalog = TileCatalog::from_roles(["floor", "wall"]);
        let mut rng = StdRng::seed_from_u64(0);
        let layout = BlockLayout::new(CityParams {
            block_size: usize::MAX,
            street_width: 0,
        });
        let grid = layout.layout(10, 10, &catalog, &mut rng).unwrap();
        assert_eq!(grid.count_role(&Role::Wall), 100);
    }

    #[test]
    fn test_block_size_below_two_rejected() {
        let catalog = TileCatalog::from_roles(["floor", "wall"]);
        let mut rng = StdRng::seed_from_u64(0);
        let layout = BlockLayout::new(CityParams {
            block_size: 1,
            street_width: 2,
        });
        assert!(matches!(
            layout.layout(10, 10, &catalog, &mut rng),
            Err(GenerationError::InvalidParameter(_))
        ));
    }
}
