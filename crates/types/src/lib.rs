//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the battle workspace.
//! All types are plain data with no required dependencies, making them usable in
//! any context (grid simulation, input handling, presentation, tests). Enable the
//! `serde` feature to derive `Serialize`/`Deserialize` for collaborators that ship
//! snapshots or events across a boundary.
//!
//! # Coordinates
//!
//! Cells are addressed as `(x, y)` where `x` grows to the right and `y` grows
//! downward (row 0 is the top of the board). Gravity pulls tiles toward the
//! high-index (bottom) end of each column.
//!
//! Coordinates are signed so that neighbour lookups such as `(x - 1, y)` can be
//! computed freely near the edges; the grid treats any off-board coordinate as a
//! silent no-op.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 4 | Board columns |
//! | `DEFAULT_HEIGHT` | 5 | Board rows |
//! | `DEFAULT_TYPE_COUNT` | 4 | Distinct tile kinds |
//! | `DEFAULT_MOVES_PER_TURN` | 5 | Swaps per player turn |
//! | `OPPONENT_TURN_DELAY_MS` | 300 | Pause before the opponent acts |
//! | `OPPONENT_ACTION_MS` | 800 | Fixed duration of the opponent action |
//! | `DEFAULT_DRAG_THRESHOLD` | 25.0 | Drag distance before a gesture counts |
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//!
//! # Examples
//!
//! ```
//! use match_battle_types::{Coord, Direction, Side};
//!
//! let origin = Coord::new(1, 1);
//! assert_eq!(origin.step(Direction::Left), Coord::new(0, 1));
//! assert!(origin.is_adjacent(Coord::new(1, 2)));
//! assert!(!origin.is_adjacent(Coord::new(2, 2)));
//!
//! assert_eq!(Side::from_str("player"), Some(Side::Player));
//! assert_eq!(Side::Opponent.other(), Side::Player);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const DEFAULT_WIDTH: usize = 4;

/// Default board height in cells
pub const DEFAULT_HEIGHT: usize = 5;

/// Default number of distinct tile kinds
pub const DEFAULT_TYPE_COUNT: usize = 4;

/// Default number of swaps a player may commit per turn
pub const DEFAULT_MOVES_PER_TURN: u32 = 5;

/// Delay between the opponent turn starting and the opponent acting (ms)
pub const OPPONENT_TURN_DELAY_MS: u32 = 300;

/// Fixed duration of the opponent action (ms)
pub const OPPONENT_ACTION_MS: u32 = 800;

/// Minimum drag distance before a gesture becomes a real drag
pub const DEFAULT_DRAG_THRESHOLD: f32 = 25.0;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Minimum run length that counts as a match
pub const MIN_RUN: usize = 3;

/// Weighted draws attempted per cell before falling back to a linear scan
pub const SPAWN_MAX_TRIES: usize = 20;

/// Cascade iterations allowed per board cell before the resolver gives up
pub const CASCADE_STEPS_PER_CELL: usize = 4;

/// Lower bound for the cascade iteration ceiling on tiny boards
pub const CASCADE_MIN_ITERATIONS: usize = 64;

/// Tile kind identifier in `[0, type_count)`
pub type TileType = u8;

/// A cell on the game board
///
/// - `None`: EMPTY
/// - `Some(TileType)`: occupied by a tile of that kind
pub type Cell = Option<TileType>;

/// A board position. Signed so neighbour arithmetic never underflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring coordinate one cell in `dir` (may be off-board).
    ///
    /// Saturates at the `i32` limits, where the step is a no-op.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// True when `other` shares an edge with `self` (4-directional).
    pub fn is_adjacent(self, other: Coord) -> bool {
        matches!(
            (self.x.abs_diff(other.x), self.y.abs_diff(other.y)),
            (0, 1) | (1, 0)
        )
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Board dimensions, used wherever only bounds (not contents) are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardBounds {
    pub width: usize,
    pub height: usize,
}

impl BoardBounds {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, at: Coord) -> bool {
        at.x >= 0 && at.y >= 0 && (at.x as usize) < self.width && (at.y as usize) < self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// The four swap directions.
///
/// `Up` moves toward row 0, `Down` toward the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in scan order
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// `(dx, dy)` offset for one step in this direction
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    /// Parse side from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match_battle_types::Side;
    ///
    /// assert_eq!(Side::from_str("Player"), Some(Side::Player));
    /// assert_eq!(Side::from_str("enemy"), Some(Side::Opponent));
    /// assert_eq!(Side::from_str("nobody"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "player" => Some(Side::Player),
            "opponent" | "enemy" => Some(Side::Opponent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Opponent => "opponent",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_WIDTH, 4);
        assert_eq!(DEFAULT_HEIGHT, 5);
        assert_eq!(DEFAULT_TYPE_COUNT, 4);
        assert_eq!(DEFAULT_MOVES_PER_TURN, 5);
        assert_eq!(OPPONENT_TURN_DELAY_MS, 300);
        assert_eq!(OPPONENT_ACTION_MS, 800);
        assert_eq!(MIN_RUN, 3);
    }

    #[test]
    fn test_direction_offsets_are_opposite() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_extreme_coords_do_not_overflow() {
        let max = Coord::new(i32::MAX, i32::MAX);
        let min = Coord::new(i32::MIN, i32::MIN);
        assert_eq!(max.step(Direction::Right), max);
        assert_eq!(min.step(Direction::Up), min);
        assert_eq!(max.step(Direction::Left), Coord::new(i32::MAX - 1, i32::MAX));

        assert!(!max.is_adjacent(min));
        assert!(!min.is_adjacent(Coord::new(i32::MAX, i32::MIN)));
        assert!(max.is_adjacent(Coord::new(i32::MAX, i32::MAX - 1)));
        assert!(!max.is_adjacent(max));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = BoardBounds::new(4, 5);
        assert!(bounds.contains(Coord::new(0, 0)));
        assert!(bounds.contains(Coord::new(3, 4)));
        assert!(!bounds.contains(Coord::new(4, 0)));
        assert!(!bounds.contains(Coord::new(0, 5)));
        assert!(!bounds.contains(Coord::new(-1, 2)));
        assert_eq!(bounds.area(), 20);
    }

    #[test]
    fn test_adjacency_excludes_self_and_diagonals() {
        let c = Coord::new(2, 2);
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coord::new(3, 3)));
        assert!(c.is_adjacent(Coord::new(2, 1)));
        assert!(c.is_adjacent(Coord::new(1, 2)));
    }
}
