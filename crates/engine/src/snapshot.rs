use serde::Serialize;

use crate::core::ClearedCounts;
use crate::types::{Coord, Side};

/// Read-only view of a battle for collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleSnapshot {
    pub width: usize,
    pub height: usize,
    /// `rows[y][x]`, `-1` for EMPTY
    pub rows: Vec<Vec<i32>>,
    pub side: Side,
    pub remaining_moves: u32,
    pub locked: bool,
    pub selected: Option<Coord>,
    pub preview: Option<Coord>,
    pub cleared: ClearedCounts,
    pub faulted: bool,
}

impl BattleSnapshot {
    /// Whether a swap could start right now
    pub fn playable(&self) -> bool {
        !self.faulted && !self.locked && self.side == Side::Player && self.remaining_moves > 0
    }

    pub fn tile_at(&self, at: Coord) -> Option<i32> {
        if at.x < 0 || at.y < 0 {
            return None;
        }
        self.rows
            .get(at.y as usize)
            .and_then(|row| row.get(at.x as usize))
            .copied()
            .filter(|&t| t >= 0)
    }
}
