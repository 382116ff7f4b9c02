//! Outbound signals for presentation, scoring and opponent collaborators.
//!
//! Every grid mutation is reported after it has happened; a renderer animates
//! these facts, it never negotiates them.

use serde::Serialize;

use crate::core::{ClearedCounts, ClearedTile, GravityMove, Spawn};
use crate::input::GateEvent;
use crate::types::{Coord, Side};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BattleEvent {
    Selected { cell: Coord },
    PreviewShown { from: Coord, to: Coord },
    PreviewCancelled { from: Coord, to: Coord },
    SelectionCleared { cell: Coord },
    /// Lock window opened; no new swap until `Unlocked`.
    Locked,
    Unlocked,
    MoveConsumed { remaining: u32 },
    Swapped { from: Coord, to: Coord },
    /// The swap matched nothing and has been undone.
    SwapReverted { from: Coord, to: Coord },
    Cleared { tiles: Vec<ClearedTile> },
    Gravity { moves: Vec<GravityMove> },
    Spawned { spawns: Vec<Spawn> },
    /// Cleared tiles per type for the cascade that just finished.
    ClearedCountsDelta { counts: ClearedCounts },
    ResolutionComplete { effective: bool, chain: usize },
    TurnChanged { side: Side, moves: u32 },
    OpponentActNow,
}

impl From<GateEvent> for BattleEvent {
    fn from(value: GateEvent) -> Self {
        match value {
            GateEvent::Selected { cell } => BattleEvent::Selected { cell },
            GateEvent::PreviewShown { from, to } => BattleEvent::PreviewShown { from, to },
            GateEvent::PreviewCancelled { from, to } => BattleEvent::PreviewCancelled { from, to },
        }
    }
}
