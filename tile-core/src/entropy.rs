use bitvec::prelude::*;

use crate::grid::{DomainGrid, TileGrid};

/// Chooses which cell the collapse loop assigns next.
pub trait EntropyCalculator {
    /// Entropy score of one domain; lower is collapsed first.
    fn cell_entropy(&self, domain: &BitSlice) -> usize;

    /// Finds the unassigned cell with the lowest entropy.
    ///
    /// Cells are scanned row-major and only a strictly lower score replaces
    /// the current best, so ties go to the first cell encountered. Empty
    /// domains (contradictions) score lowest and are picked first. Returns
    /// `None` once every cell is assigned.
    fn find_lowest_entropy(&self, domains: &DomainGrid, grid: &TileGrid) -> Option<(usize, usize)> {
        let mut best: Option<(usize, (usize, usize))> = None;
        for y in 0..domains.height() {
            for x in 0..domains.width() {
                let assigned = grid.get(x, y).map_or(true, |c| c.is_assigned());
                if assigned {
                    continue;
                }
                let Some(domain) = domains.get(x, y) else {
                    continue;
                };
                let entropy = self.cell_entropy(domain);
                if best.map_or(true, |(lowest, _)| entropy < lowest) {
                    best = Some((entropy, (x, y)));
                }
            }
        }
        best.map(|(_, coords)| coords)
    }
}

/// Uses domain cardinality as entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardinalityEntropy;

impl CardinalityEntropy {
    pub fn new() -> Self {
        Self
    }
}

impl EntropyCalculator for CardinalityEntropy {
    fn cell_entropy(&self, domain: &BitSlice) -> usize {
        domain.count_ones()
    }
}
