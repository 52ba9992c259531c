use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tile_rules::{Role, TileCatalog, TileId};

use crate::entropy::{CardinalityEntropy, EntropyCalculator};
use crate::generators::MapGenerator;
use crate::grid::{DomainGrid, TileGrid};
use crate::propagator::{ConstraintPropagator, DirectionalPropagator};
use crate::rules::AdjacencyRules;
use crate::{validate_dimensions, GenerationError};

/// Counters from one collapse run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WfcStats {
    /// Collapse rounds executed.
    pub rounds: usize,
    /// Cells that were selected with an empty domain and filled at random.
    pub contradictions: usize,
    /// Cells left after the round budget and filled in the final sweep.
    pub swept_cells: usize,
}

/// Runs Wave Function Collapse over a `width` x `height` grid.
///
/// Each round picks the lowest-entropy unassigned cell, assigns a uniformly
/// random tile from its domain (or from the whole catalog if the domain is
/// empty), and propagates to its neighbours. There is no backtracking: a
/// contradiction is settled by that random fallback instead of undoing
/// earlier collapses, so every run terminates within `2 * width * height`
/// rounds at the cost of occasionally violating a constraint.
///
/// # Errors
///
/// `InvalidDimensions` for a zero-sized grid and `EmptyCatalog` when there is
/// no tile to place. Contradictions are never errors.
pub fn run<P, E, R>(
    width: usize,
    height: usize,
    catalog: &TileCatalog,
    propagator: &mut P,
    entropy_calculator: &E,
    rng: &mut R,
) -> Result<(TileGrid, WfcStats), GenerationError>
where
    P: ConstraintPropagator + ?Sized,
    E: EntropyCalculator + ?Sized,
    R: Rng + ?Sized,
{
    validate_dimensions(width, height)?;
    if catalog.is_empty() {
        return Err(GenerationError::EmptyCatalog);
    }

    let num_tiles = catalog.len();
    let rules = AdjacencyRules::from_catalog(catalog);
    let mut domains = DomainGrid::full(width, height, num_tiles);
    let mut grid = TileGrid::new(width, height);
    let mut stats = WfcStats::default();
    let max_rounds = round_budget(width, height);

    while stats.rounds < max_rounds {
        let Some((x, y)) = entropy_calculator.find_lowest_entropy(&domains, &grid) else {
            break;
        };
        stats.rounds += 1;

        let Some(domain) = domains.get_mut(x, y) else {
            break;
        };
        let candidates = domain.count_ones();
        let tile = if candidates == 0 {
            stats.contradictions += 1;
            let tile = TileId(rng.gen_range(0..num_tiles));
            trace!("Contradiction at ({x}, {y}), falling back to tile {}", tile.0);
            tile
        } else {
            let pick = rng.gen_range(0..candidates);
            TileId(domain.iter_ones().nth(pick).unwrap_or(0))
        };

        domain.fill(false);
        domain.set(tile.0, true);
        grid.assign(x, y, tile, catalog, &Role::Empty);
        trace!(
            "Round {}: collapsed ({x}, {y}) to tile {} from {candidates} candidates",
            stats.rounds,
            tile.0
        );

        let emptied = propagator.propagate(&mut domains, &grid, (x, y), tile, &rules);
        if !emptied.is_empty() {
            trace!("Propagation from ({x}, {y}) emptied {} domains", emptied.len());
        }
    }

    for y in 0..height {
        for x in 0..width {
            if grid.get(x, y).is_some_and(|c| !c.is_assigned()) {
                let tile = TileId(rng.gen_range(0..num_tiles));
                grid.assign(x, y, tile, catalog, &Role::Empty);
                stats.swept_cells += 1;
            }
        }
    }
    if stats.swept_cells > 0 {
        warn!(
            "WFC round budget of {max_rounds} exhausted, {} cells filled at random",
            stats.swept_cells
        );
    }

    debug!(
        "WFC {width}x{height} finished: {} rounds, {} contradictions, {} swept",
        stats.rounds, stats.contradictions, stats.swept_cells
    );
    Ok((grid, stats))
}

/// Round limit for one run: two rounds per cell, saturating on overflow.
pub fn round_budget(width: usize, height: usize) -> usize {
    width
        .checked_mul(height)
        .and_then(|cells| cells.checked_mul(2))
        .unwrap_or(usize::MAX)
}

/// Wave Function Collapse with cardinality entropy and single-step
/// directional propagation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintSolver;

impl ConstraintSolver {
    pub fn new() -> Self {
        Self
    }

    pub fn collapse<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        rng: &mut R,
    ) -> Result<TileGrid, GenerationError> {
        let mut propagator = DirectionalPropagator::new();
        let entropy = CardinalityEntropy::new();
        run(width, height, catalog, &mut propagator, &entropy, rng).map(|(grid, _)| grid)
    }

    /// Seeded convenience wrapper around [`ConstraintSolver::collapse`].
    pub fn collapse_seeded(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        seed: u64,
    ) -> Result<TileGrid, GenerationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.collapse(width, height, catalog, &mut rng)
    }
}

impl MapGenerator for ConstraintSolver {
    fn name(&self) -> &'static str {
        "wfc"
    }

    fn generate(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        rng: &mut dyn RngCore,
    ) -> Result<TileGrid, GenerationError> {
        self.collapse(width, height, catalog, rng)
    }
}
