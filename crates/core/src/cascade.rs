//! Cascade resolver - one full resolution cycle per committed swap
//!
//! ```text
//! Idle -> Swapped -> NoMatchRevert -> Idle
//!                 \-> Resolving (clear -> gravity -> refill -> rescan)* -> Idle
//! ```
//!
//! A swap that produces no match is reverted immediately and never cascades. A
//! swap that does match runs clear → gravity → refill → rescan until a scan comes
//! back empty. The loop is not interruptible; the resolver returns only once the
//! board is stable (or the iteration ceiling trips).

use serde::Serialize;

use crate::counts::ClearedCounts;
use crate::error::CascadeError;
use crate::grid::{Grid, GravityMove, Spawn};
use crate::types::{Coord, TileType, CASCADE_MIN_ITERATIONS, CASCADE_STEPS_PER_CELL};

/// Resolver lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResolverState {
    Idle,
    Swapped,
    NoMatchRevert,
    Resolving,
}

/// The last committed swap, held until it is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PendingSwap {
    pub from: Coord,
    pub to: Coord,
}

impl PendingSwap {
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.to, self.from)
    }
}

/// A tile removed by a clear, with the type it had.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ClearedTile {
    pub at: Coord,
    pub tile: TileType,
}

/// Everything one loop iteration did to the board, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeStep {
    pub cleared: Vec<ClearedTile>,
    pub gravity: Vec<GravityMove>,
    pub spawns: Vec<Spawn>,
}

/// Result of one resolution cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub swap: PendingSwap,
    /// True when the swap matched nothing and was undone.
    pub reverted: bool,
    pub steps: Vec<CascadeStep>,
    /// Cleared tiles per type across all steps.
    pub cleared_by_type: ClearedCounts,
}

impl CascadeReport {
    fn new(swap: PendingSwap, type_count: usize) -> Self {
        Self {
            swap,
            reverted: false,
            steps: Vec::new(),
            cleared_by_type: ClearedCounts::new(type_count),
        }
    }

    /// Swap changed the board (at least one match cleared)
    pub fn is_effective(&self) -> bool {
        !self.reverted
    }

    /// Number of clear steps, i.e. the chain length
    pub fn chain_len(&self) -> usize {
        self.steps.len()
    }
}

/// Runs resolution cycles against a [`Grid`].
#[derive(Debug, Clone)]
pub struct CascadeResolver {
    state: ResolverState,
    pending: Option<PendingSwap>,
    iteration_limit: usize,
}

impl CascadeResolver {
    pub fn new(iteration_limit: usize) -> Self {
        Self {
            state: ResolverState::Idle,
            pending: None,
            iteration_limit: iteration_limit.max(1),
        }
    }

    /// Resolver with a ceiling proportional to the board area.
    pub fn for_grid(grid: &Grid) -> Self {
        let limit = (grid.bounds().area() * CASCADE_STEPS_PER_CELL).max(CASCADE_MIN_ITERATIONS);
        Self::new(limit)
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    pub fn pending_swap(&self) -> Option<PendingSwap> {
        self.pending
    }

    pub fn iteration_limit(&self) -> usize {
        self.iteration_limit
    }

    /// Swap two cells and resolve the board to stability.
    ///
    /// Adjacency is the caller's responsibility.
    pub fn resolve_swap(
        &mut self,
        grid: &mut Grid,
        swap: PendingSwap,
    ) -> Result<CascadeReport, CascadeError> {
        let mut report = CascadeReport::new(swap, grid.type_count());

        grid.swap(swap.from, swap.to);
        self.pending = Some(swap);
        self.state = ResolverState::Swapped;

        let mut matches = grid.find_matches();
        if matches.is_empty() {
            self.state = ResolverState::NoMatchRevert;
            let back = swap.reversed();
            grid.swap(back.from, back.to);
            tracing::debug!(?swap, "swap produced no match, reverted");

            report.reverted = true;
            self.finish();
            return Ok(report);
        }

        self.state = ResolverState::Resolving;
        let mut iterations = 0usize;
        while !matches.is_empty() {
            if iterations >= self.iteration_limit {
                tracing::error!(
                    limit = self.iteration_limit,
                    type_count = grid.type_count(),
                    "cascade failed to settle"
                );
                self.finish();
                return Err(CascadeError::IterationLimit {
                    limit: self.iteration_limit,
                });
            }
            iterations += 1;

            // Types must be read before the clear wipes them.
            let cleared: Vec<ClearedTile> = matches
                .iter()
                .filter_map(|&at| grid.get(at).map(|tile| ClearedTile { at, tile }))
                .collect();
            for c in &cleared {
                report.cleared_by_type.add(c.tile, 1);
            }

            grid.clear(&matches);
            let gravity = grid.apply_gravity_with_moves();
            let spawns = grid.fill_empties_with_spawns();

            tracing::debug!(
                step = iterations,
                cleared = cleared.len(),
                moved = gravity.len(),
                spawned = spawns.len(),
                "cascade step"
            );
            report.steps.push(CascadeStep {
                cleared,
                gravity,
                spawns,
            });

            matches = grid.find_matches();
        }

        self.finish();
        Ok(report)
    }

    fn finish(&mut self) {
        self.pending = None;
        self.state = ResolverState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_resolver_is_idle() {
        let resolver = CascadeResolver::new(10);
        assert_eq!(resolver.state(), ResolverState::Idle);
        assert!(resolver.pending_swap().is_none());
    }

    #[test]
    fn test_limit_scales_with_area() {
        let small = Grid::new(2, 2, 4, 1);
        let big = Grid::new(20, 20, 4, 1);
        assert_eq!(
            CascadeResolver::for_grid(&small).iteration_limit(),
            CASCADE_MIN_ITERATIONS
        );
        assert_eq!(
            CascadeResolver::for_grid(&big).iteration_limit(),
            400 * CASCADE_STEPS_PER_CELL
        );
    }

    #[test]
    fn test_no_match_swap_reverts_and_returns_to_idle() {
        let mut grid = Grid::from_rows(&[vec![0, 1, 2], vec![1, 2, 0], vec![2, 0, 1]], 3, 1);
        let before = grid.to_rows();
        let mut resolver = CascadeResolver::for_grid(&grid);

        let report = resolver
            .resolve_swap(&mut grid, PendingSwap::new(Coord::new(0, 0), Coord::new(0, 1)))
            .unwrap();

        assert!(report.reverted);
        assert!(report.steps.is_empty());
        assert!(report.cleared_by_type.is_empty());
        assert_eq!(grid.to_rows(), before);
        assert_eq!(resolver.state(), ResolverState::Idle);
        assert!(resolver.pending_swap().is_none());
    }

    #[test]
    fn test_single_type_board_hits_iteration_limit() {
        let mut grid = Grid::new(3, 3, 1, 1);
        grid.fill_random(true);
        let mut resolver = CascadeResolver::new(5);

        let err = resolver
            .resolve_swap(&mut grid, PendingSwap::new(Coord::new(0, 0), Coord::new(1, 0)))
            .unwrap_err();

        assert_eq!(err, CascadeError::IterationLimit { limit: 5 });
        assert_eq!(resolver.state(), ResolverState::Idle);
    }
}
