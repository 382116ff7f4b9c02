//! Turn economy - whose turn it is and how many swaps remain
//!
//! ```text
//! PlayerTurn(n) --try_consume_move--> PlayerTurn(n-1)
//! PlayerTurn(0) --on_resolution_complete--> OpponentTurn(Delay)
//! OpponentTurn(Delay) --tick--> OpponentTurn(Acting)   [emits OpponentActNow]
//! OpponentTurn(Acting) --tick / finish_opponent_action--> PlayerTurn(budget)
//! ```
//!
//! The opponent turn runs on the same fixed timestep as the rest of the battle;
//! the core never sleeps. Board input is refused for the whole opponent turn.
//!
//! A tick stops as soon as it emits `OpponentActNow`, so the caller can run the
//! opponent while the phase is still `Acting`. Unspent time from that tick is held
//! and spent first by the next call.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::types::Side;

/// Fixed timings of the opponent turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OpponentTimings {
    pub delay_ms: u32,
    pub action_ms: u32,
}

/// Progress through the opponent turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OpponentPhase {
    /// Waiting before the opponent acts
    Delay { remaining_ms: u32 },
    /// Opponent action in progress
    Acting { remaining_ms: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TurnPhase {
    PlayerTurn { remaining_moves: u32 },
    OpponentTurn(OpponentPhase),
}

/// Transitions reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TurnEvent {
    PlayerTurnStarted { moves: u32 },
    OpponentTurnStarted,
    /// The opponent collaborator should act now.
    OpponentActNow,
    OpponentTurnEnded,
}

/// Events from a single call.
pub type TurnEvents = ArrayVec<TurnEvent, 4>;

#[derive(Debug, Clone)]
pub struct TurnEconomy {
    phase: TurnPhase,
    moves_per_turn: u32,
    timings: OpponentTimings,
    /// Time left over from the tick that entered `Acting`.
    carried_ms: u32,
}

impl TurnEconomy {
    /// Starts in the player's turn with a full budget (minimum 1).
    pub fn new(moves_per_turn: u32, timings: OpponentTimings) -> Self {
        let moves_per_turn = moves_per_turn.max(1);
        Self {
            phase: TurnPhase::PlayerTurn {
                remaining_moves: moves_per_turn,
            },
            moves_per_turn,
            timings,
            carried_ms: 0,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn side(&self) -> Side {
        match self.phase {
            TurnPhase::PlayerTurn { .. } => Side::Player,
            TurnPhase::OpponentTurn(_) => Side::Opponent,
        }
    }

    pub fn is_player_turn(&self) -> bool {
        self.side() == Side::Player
    }

    /// Moves left this turn (0 during the opponent's turn).
    pub fn remaining_moves(&self) -> u32 {
        match self.phase {
            TurnPhase::PlayerTurn { remaining_moves } => remaining_moves,
            TurnPhase::OpponentTurn(_) => 0,
        }
    }

    pub fn moves_per_turn(&self) -> u32 {
        self.moves_per_turn
    }

    pub fn timings(&self) -> OpponentTimings {
        self.timings
    }

    /// Elapsed time not yet applied to the opponent clock.
    pub fn carried_ms(&self) -> u32 {
        self.carried_ms
    }

    /// Whether the board should accept a new swap attempt.
    pub fn accepts_input(&self) -> bool {
        self.remaining_moves() > 0
    }

    /// Reset the budget and hand the board to the player.
    pub fn start_player_turn(&mut self) -> TurnEvent {
        self.phase = TurnPhase::PlayerTurn {
            remaining_moves: self.moves_per_turn,
        };
        tracing::info!(moves = self.moves_per_turn, "player turn start");
        TurnEvent::PlayerTurnStarted {
            moves: self.moves_per_turn,
        }
    }

    /// Spend one move. Fails outside the player turn or with an empty budget.
    pub fn try_consume_move(&mut self) -> bool {
        match &mut self.phase {
            TurnPhase::PlayerTurn { remaining_moves } if *remaining_moves > 0 => {
                *remaining_moves -= 1;
                tracing::debug!(remaining = *remaining_moves, "player used 1 move");
                true
            }
            _ => false,
        }
    }

    /// Called once a resolution cycle has fully finished.
    pub fn on_resolution_complete(&mut self) -> Option<TurnEvent> {
        match self.phase {
            TurnPhase::PlayerTurn { remaining_moves: 0 } => self.start_opponent_turn(),
            _ => None,
        }
    }

    /// External trigger ending the player's turn early (e.g. a pass).
    pub fn end_player_turn(&mut self) -> Option<TurnEvent> {
        self.start_opponent_turn()
    }

    fn start_opponent_turn(&mut self) -> Option<TurnEvent> {
        if !self.is_player_turn() {
            return None;
        }
        self.phase = TurnPhase::OpponentTurn(OpponentPhase::Delay {
            remaining_ms: self.timings.delay_ms,
        });
        tracing::info!("opponent turn start");
        Some(TurnEvent::OpponentTurnStarted)
    }

    /// Advance the opponent turn clock. No-op during the player turn.
    ///
    /// Returns right after `OpponentActNow`; call again (with `0` if no new time
    /// has passed) to spend what was carried over.
    pub fn tick(&mut self, elapsed_ms: u32) -> TurnEvents {
        let mut events = TurnEvents::new();
        let budget = elapsed_ms.saturating_add(std::mem::take(&mut self.carried_ms));

        let TurnPhase::OpponentTurn(phase) = self.phase else {
            return events;
        };
        match phase {
            OpponentPhase::Delay { remaining_ms } if budget < remaining_ms => {
                self.phase = TurnPhase::OpponentTurn(OpponentPhase::Delay {
                    remaining_ms: remaining_ms - budget,
                });
            }
            OpponentPhase::Delay { remaining_ms } => {
                self.phase = TurnPhase::OpponentTurn(OpponentPhase::Acting {
                    remaining_ms: self.timings.action_ms,
                });
                self.carried_ms = budget - remaining_ms;
                tracing::debug!(carried = self.carried_ms, "opponent acting");
                events.push(TurnEvent::OpponentActNow);
            }
            OpponentPhase::Acting { remaining_ms } if budget < remaining_ms => {
                self.phase = TurnPhase::OpponentTurn(OpponentPhase::Acting {
                    remaining_ms: remaining_ms - budget,
                });
            }
            OpponentPhase::Acting { .. } => events.extend(self.end_opponent_turn()),
        }

        events
    }

    /// The opponent reports its action finished before the fixed time ran out.
    ///
    /// Only valid while acting; during the delay or the player turn nothing happens.
    pub fn finish_opponent_action(&mut self) -> TurnEvents {
        match self.phase {
            TurnPhase::OpponentTurn(OpponentPhase::Acting { .. }) => self.end_opponent_turn(),
            _ => TurnEvents::new(),
        }
    }

    fn end_opponent_turn(&mut self) -> TurnEvents {
        let mut events = TurnEvents::new();
        self.carried_ms = 0;
        tracing::info!("opponent turn end");
        events.push(TurnEvent::OpponentTurnEnded);
        events.push(self.start_player_turn());
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timings() -> OpponentTimings {
        OpponentTimings {
            delay_ms: 300,
            action_ms: 800,
        }
    }

    #[test]
    fn test_budget_minimum_is_one() {
        let turns = TurnEconomy::new(0, timings());
        assert_eq!(turns.remaining_moves(), 1);
        assert_eq!(turns.moves_per_turn(), 1);
    }

    #[test]
    fn test_tick_is_noop_in_player_turn() {
        let mut turns = TurnEconomy::new(3, timings());
        assert!(turns.tick(10_000).is_empty());
        assert_eq!(turns.remaining_moves(), 3);
    }

    #[test]
    fn test_resolution_with_moves_left_keeps_turn() {
        let mut turns = TurnEconomy::new(2, timings());
        assert!(turns.try_consume_move());
        assert_eq!(turns.on_resolution_complete(), None);
        assert!(turns.is_player_turn());
    }

    #[test]
    fn test_opponent_phases_advance_with_carry_over() {
        let mut turns = TurnEconomy::new(1, timings());
        turns.end_player_turn();

        assert!(turns.tick(299).is_empty());
        let events = turns.tick(1);
        assert_eq!(events.as_slice(), &[TurnEvent::OpponentActNow]);

        let events = turns.tick(900);
        assert_eq!(
            events.as_slice(),
            &[
                TurnEvent::OpponentTurnEnded,
                TurnEvent::PlayerTurnStarted { moves: 1 }
            ]
        );
        assert!(turns.is_player_turn());
    }

    #[test]
    fn test_long_tick_stops_at_act_now_and_carries_rest() {
        let mut turns = TurnEconomy::new(2, timings());
        turns.end_player_turn();

        let events = turns.tick(5_000);
        assert_eq!(events.as_slice(), &[TurnEvent::OpponentActNow]);
        assert_eq!(
            turns.phase(),
            TurnPhase::OpponentTurn(OpponentPhase::Acting { remaining_ms: 800 })
        );
        assert_eq!(turns.carried_ms(), 4_700);

        let events = turns.tick(0);
        assert_eq!(
            events.as_slice(),
            &[
                TurnEvent::OpponentTurnEnded,
                TurnEvent::PlayerTurnStarted { moves: 2 }
            ]
        );
        assert_eq!(turns.carried_ms(), 0);
    }

    #[test]
    fn test_early_finish_drops_carried_time() {
        let mut turns = TurnEconomy::new(1, timings());
        turns.end_player_turn();
        turns.tick(1_000);
        assert_eq!(turns.carried_ms(), 700);

        assert_eq!(turns.finish_opponent_action().len(), 2);
        assert_eq!(turns.carried_ms(), 0);
        assert!(turns.tick(16).is_empty());
        assert!(turns.is_player_turn());
    }

    #[test]
    fn test_finish_opponent_action_only_while_acting() {
        let mut turns = TurnEconomy::new(1, timings());
        turns.end_player_turn();
        assert!(turns.finish_opponent_action().is_empty());

        turns.tick(300);
        let events = turns.finish_opponent_action();
        assert_eq!(events.len(), 2);
        assert!(turns.is_player_turn());
    }

    #[test]
    fn test_end_player_turn_twice_is_ignored() {
        let mut turns = TurnEconomy::new(1, timings());
        assert_eq!(turns.end_player_turn(), Some(TurnEvent::OpponentTurnStarted));
        assert_eq!(turns.end_player_turn(), None);
    }
}
