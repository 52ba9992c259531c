//! Constraint propagation after a collapse.

use std::fmt::Debug;
use tile_rules::{Direction, TileId};

use crate::grid::{DomainGrid, TileGrid};
use crate::rules::AdjacencyRules;

/// Narrows neighbouring domains after a cell has been collapsed.
///
/// Implementors update `domains` in place. Domains only ever shrink. An
/// emptied domain is a contradiction, which is reported back but is not an
/// error: the collapse loop resolves it when that cell is selected.
pub trait ConstraintPropagator: Debug {
    /// Propagates from the cell at `origin`, which now holds `tile`.
    ///
    /// # Returns
    ///
    /// Coordinates of neighbours whose domain became empty during this call.
    fn propagate(
        &mut self,
        domains: &mut DomainGrid,
        grid: &TileGrid,
        origin: (usize, usize),
        tile: TileId,
        rules: &AdjacencyRules,
    ) -> Vec<(usize, usize)>;
}

/// Single-step propagator over the eight compass neighbours.
///
/// Each in-bounds, unassigned neighbour has its domain intersected with the
/// collapsed tile's effective allowed set for that direction. Changes do not
/// cascade further.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionalPropagator;

impl DirectionalPropagator {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintPropagator for DirectionalPropagator {
    fn propagate(
        &mut self,
        domains: &mut DomainGrid,
        grid: &TileGrid,
        origin: (usize, usize),
        tile: TileId,
        rules: &AdjacencyRules,
    ) -> Vec<(usize, usize)> {
        let (x, y) = origin;
        let (width, height) = (domains.width(), domains.height());
        let mut emptied = Vec::new();

        for direction in Direction::ALL {
            let Some((nx, ny)) = direction.step(x, y, width, height) else {
                continue;
            };
            if grid.get(nx, ny).map_or(true, |c| c.is_assigned()) {
                continue;
            }
            let Some(allowed) = rules.allowed(tile, direction) else {
                continue;
            };
            let Some(domain) = domains.get_mut(nx, ny) else {
                continue;
            };

            let was_empty = domain.not_any();
            for i in 0..domain.len() {
                if domain[i] && !allowed.get(i).map_or(false, |bit| *bit) {
                    domain.set(i, false);
                }
            }
            if !was_empty && domain.not_any() {
                emptied.push((nx, ny));
            }
        }

        emptied
    }
}
