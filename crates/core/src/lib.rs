//! Core battle logic - pure, deterministic, and testable
//!
//! This crate contains the simulation rules of the tile-matching battle. It has
//! **no dependencies** on rendering, input devices, or I/O beyond reading a config
//! file, which makes it:
//!
//! - **Deterministic**: the same seed and inputs replay an identical battle
//! - **Synchronous**: every operation runs to completion before returning
//! - **Testable**: each rule lives in a small module with its own tests
//!
//! # Module Structure
//!
//! - [`grid`]: the tile board: bounds-checked access, swap, weighted fill, match
//!   scan, clear, gravity, refill
//! - [`cascade`]: one resolution cycle per committed swap (revert or cascade)
//! - [`turn`]: player/opponent turn state and the per-turn move budget
//! - [`counts`]: cleared-tile ledger and element costs
//! - [`rng`]: seeded LCG and weighted spawn sampling
//! - [`config`]: battle configuration and repair of bad values
//! - [`error`]: configuration and cascade errors
//!
//! # Example
//!
//! ```
//! use match_battle_core::{CascadeResolver, Grid, PendingSwap};
//! use match_battle_core::types::Coord;
//!
//! let mut grid = Grid::from_rows(
//!     &[vec![0, 1, 2, 3], vec![1, 0, 1, 1], vec![2, 3, 0, 2]],
//!     4,
//!     7,
//! );
//! let mut resolver = CascadeResolver::for_grid(&grid);
//!
//! // Swapping the 1 at (0, 1) with the 0 beside it lines up three 1s.
//! let report = resolver
//!     .resolve_swap(&mut grid, PendingSwap::new(Coord::new(0, 1), Coord::new(1, 1)))
//!     .unwrap();
//! assert!(report.is_effective());
//! assert!(report.cleared_by_type.get(1) >= 3);
//! assert!(grid.is_full());
//! ```

pub mod cascade;
pub mod config;
pub mod counts;
pub mod error;
pub mod grid;
pub mod rng;
pub mod turn;

pub use match_battle_types as types;

// Re-export commonly used types for convenience
pub use cascade::{
    CascadeReport, CascadeResolver, CascadeStep, ClearedTile, PendingSwap, ResolverState,
};
pub use config::BattleConfig;
pub use counts::{ClearedCounts, ElementCost};
pub use error::{CascadeError, ConfigError};
pub use grid::{GravityMove, Grid, MatchSet, Spawn};
pub use rng::{SimpleRng, SpawnWeights};
pub use turn::{OpponentPhase, OpponentTimings, TurnEconomy, TurnEvent, TurnEvents, TurnPhase};
