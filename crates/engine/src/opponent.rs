//! Opponent collaborator seam.
//!
//! The opponent's decision logic lives outside this crate. The session calls
//! [`OpponentAgent::act`] once per opponent turn, when the pre-action delay ends.

use crate::snapshot::BattleSnapshot;

/// What the agent reports back from `act`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentOutcome {
    /// Keep the turn until the fixed action time elapses
    /// (or until `BattleSession::finish_opponent_action`).
    InProgress,
    /// Done; hand the board back to the player now.
    Finished,
}

pub trait OpponentAgent {
    fn act(&mut self, battle: &BattleSnapshot) -> OpponentOutcome;
}

/// Placeholder opponent that simply lets its fixed action time run out.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleOpponent;

impl OpponentAgent for IdleOpponent {
    fn act(&mut self, battle: &BattleSnapshot) -> OpponentOutcome {
        tracing::debug!(cleared = battle.cleared.total(), "opponent acting (idle)");
        OpponentOutcome::InProgress
    }
}

impl<F> OpponentAgent for F
where
    F: FnMut(&BattleSnapshot) -> OpponentOutcome,
{
    fn act(&mut self, battle: &BattleSnapshot) -> OpponentOutcome {
        self(battle)
    }
}
