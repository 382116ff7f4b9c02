//! Battle session - one board, one turn economy, one interaction gate
//!
//! The session is the only place where the four rule modules meet. A committed
//! swap runs synchronously to completion inside [`BattleSession::commit_swap`]:
//! the gate is locked, the move is spent, the cascade resolves, the ledger and
//! turn economy are updated, and the gate is unlocked again before the call
//! returns. Everything that happened is queued as [`BattleEvent`]s.

use std::collections::VecDeque;

use crate::core::{
    BattleConfig, CascadeReport, CascadeResolver, ClearedCounts, ElementCost, Grid, PendingSwap,
    TurnEconomy, TurnEvent,
};
use crate::error::{BattleError, SwapRejected};
use crate::events::BattleEvent;
use crate::input::{DragDelta, DragGesture, InteractionGate, ReleaseOutcome};
use crate::opponent::{IdleOpponent, OpponentAgent, OpponentOutcome};
use crate::snapshot::BattleSnapshot;
use crate::types::{Coord, Side};

pub struct BattleSession<O = IdleOpponent> {
    config: BattleConfig,
    grid: Grid,
    resolver: CascadeResolver,
    turns: TurnEconomy,
    gate: InteractionGate,
    gesture: DragGesture,
    /// Cleared tiles per type since the last reset (the element pool).
    cleared: ClearedCounts,
    events: VecDeque<BattleEvent>,
    opponent: O,
    /// Set after a cascade failure; the board stays locked from then on.
    faulted: bool,
    last_report: Option<CascadeReport>,
}

impl BattleSession<IdleOpponent> {
    pub fn new(config: BattleConfig) -> Self {
        Self::with_opponent(config, IdleOpponent)
    }
}

impl<O: OpponentAgent> BattleSession<O> {
    /// Build a session with a freshly generated board (no initial matches).
    pub fn with_opponent(config: BattleConfig, opponent: O) -> Self {
        let config = config.sanitized();
        let mut grid = Grid::new(config.width, config.height, config.type_count, config.seed)
            .with_weights(&config.spawn_weights);
        grid.fill_random(true);
        Self::assemble(config, grid, opponent)
    }

    /// Build a session around a prepared board. The board is used as-is.
    pub fn with_grid(config: BattleConfig, grid: Grid, opponent: O) -> Self {
        Self::assemble(config.sanitized(), grid, opponent)
    }

    fn assemble(config: BattleConfig, grid: Grid, opponent: O) -> Self {
        let turns = TurnEconomy::new(config.moves_per_turn, config.opponent_timings());
        let mut events = VecDeque::new();
        events.push_back(BattleEvent::TurnChanged {
            side: Side::Player,
            moves: turns.remaining_moves(),
        });
        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            types = grid.type_count(),
            moves = turns.moves_per_turn(),
            "battle session ready"
        );

        Self {
            resolver: CascadeResolver::for_grid(&grid),
            gesture: DragGesture::new(config.drag_threshold),
            cleared: ClearedCounts::new(grid.type_count()),
            gate: InteractionGate::new(),
            turns,
            events,
            opponent,
            faulted: false,
            last_report: None,
            config,
            grid,
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn turns(&self) -> &TurnEconomy {
        &self.turns
    }

    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    pub fn side(&self) -> Side {
        self.turns.side()
    }

    pub fn remaining_moves(&self) -> u32 {
        self.turns.remaining_moves()
    }

    pub fn cleared_counts(&self) -> &ClearedCounts {
        &self.cleared
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn last_report(&self) -> Option<&CascadeReport> {
        self.last_report.as_ref()
    }

    pub fn opponent(&self) -> &O {
        &self.opponent
    }

    /// Pointer pressed on `cell`. Refused while locked, faulted, or outside
    /// the player's turn.
    pub fn pointer_down(&mut self, cell: Coord) -> bool {
        if self.faulted || !self.turns.accepts_input() || !self.grid.in_bounds(cell) {
            return false;
        }
        self.gesture.pointer_down(&self.gate, cell)
    }

    pub fn pointer_drag(&mut self, delta: DragDelta) {
        if !self.turns.accepts_input() {
            return;
        }
        let bounds = self.grid.bounds();
        for event in self.gesture.drag(&mut self.gate, delta, bounds) {
            self.events.push_back(event.into());
        }
    }

    /// Pointer released. Commits the previewed swap, if any.
    pub fn pointer_up(&mut self) -> Result<Option<CascadeReport>, BattleError> {
        match self.gesture.release(&mut self.gate) {
            ReleaseOutcome::Commit { from, to } => {
                self.events
                    .push_back(BattleEvent::PreviewCancelled { from, to });
                self.commit_swap(from, to).map(Some)
            }
            ReleaseOutcome::SnapBack { from } => {
                self.events
                    .push_back(BattleEvent::SelectionCleared { cell: from });
                Ok(None)
            }
            ReleaseOutcome::Ignored => Ok(None),
        }
    }

    /// Run one full resolution cycle for a swap of `from` and `to`.
    ///
    /// Rejections leave the grid, the budget and the gate untouched (apart from
    /// dropping a stale selection). A cascade failure faults the session.
    pub fn commit_swap(&mut self, from: Coord, to: Coord) -> Result<CascadeReport, BattleError> {
        if let Err(reason) = self.check_swap(from, to) {
            tracing::debug!(?from, ?to, %reason, "swap rejected");
            if !self.gate.is_locked() {
                self.drop_selection();
            }
            return Err(reason.into());
        }

        self.gesture.cancel();
        if let Some(cell) = self.gate.lock() {
            self.events.push_back(BattleEvent::SelectionCleared { cell });
        }
        self.events.push_back(BattleEvent::Locked);
        self.events.push_back(BattleEvent::MoveConsumed {
            remaining: self.turns.remaining_moves(),
        });
        self.events.push_back(BattleEvent::Swapped { from, to });

        let report = match self
            .resolver
            .resolve_swap(&mut self.grid, PendingSwap::new(from, to))
        {
            Ok(report) => report,
            Err(err) => {
                tracing::error!(%err, "cascade failed, battle faulted");
                self.faulted = true;
                return Err(err.into());
            }
        };

        self.publish_report(&report);
        self.cleared.merge(&report.cleared_by_type);

        if let Some(event) = self.turns.on_resolution_complete() {
            self.apply_turn_event(event);
        }

        self.gate.unlock();
        self.events.push_back(BattleEvent::Unlocked);
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Validate a swap and spend the move. Only the final step mutates.
    fn check_swap(&mut self, from: Coord, to: Coord) -> Result<(), SwapRejected> {
        if self.faulted {
            return Err(SwapRejected::Faulted);
        }
        if self.gate.is_locked() {
            return Err(SwapRejected::Locked);
        }
        if !self.grid.in_bounds(from) || !self.grid.in_bounds(to) {
            return Err(SwapRejected::OutOfBounds);
        }
        if !from.is_adjacent(to) {
            return Err(SwapRejected::NotAdjacent);
        }
        if !self.turns.is_player_turn() {
            return Err(SwapRejected::NotPlayerTurn);
        }
        if !self.turns.try_consume_move() {
            return Err(SwapRejected::NoMovesLeft);
        }
        Ok(())
    }

    fn publish_report(&mut self, report: &CascadeReport) {
        if report.reverted {
            self.events.push_back(BattleEvent::SwapReverted {
                from: report.swap.from,
                to: report.swap.to,
            });
        }
        for step in &report.steps {
            self.events.push_back(BattleEvent::Cleared {
                tiles: step.cleared.clone(),
            });
            self.events.push_back(BattleEvent::Gravity {
                moves: step.gravity.clone(),
            });
            self.events.push_back(BattleEvent::Spawned {
                spawns: step.spawns.clone(),
            });
        }
        if !report.cleared_by_type.is_empty() {
            self.events.push_back(BattleEvent::ClearedCountsDelta {
                counts: report.cleared_by_type.clone(),
            });
        }
        self.events.push_back(BattleEvent::ResolutionComplete {
            effective: report.is_effective(),
            chain: report.chain_len(),
        });
    }

    fn drop_selection(&mut self) {
        self.gesture.cancel();
        if let Some(cell) = self.gate.clear_selection() {
            self.events.push_back(BattleEvent::SelectionCleared { cell });
        }
    }

    fn apply_turn_event(&mut self, event: TurnEvent) {
        match event {
            TurnEvent::PlayerTurnStarted { moves } => {
                self.events.push_back(BattleEvent::TurnChanged {
                    side: Side::Player,
                    moves,
                });
            }
            TurnEvent::OpponentTurnStarted => {
                self.drop_selection();
                self.events.push_back(BattleEvent::TurnChanged {
                    side: Side::Opponent,
                    moves: 0,
                });
            }
            TurnEvent::OpponentActNow => {
                self.events.push_back(BattleEvent::OpponentActNow);
                let snapshot = self.snapshot();
                if self.opponent.act(&snapshot) == OpponentOutcome::Finished {
                    self.finish_opponent_action();
                }
            }
            TurnEvent::OpponentTurnEnded => {}
        }
    }

    /// Advance the opponent turn clock by `elapsed_ms`.
    ///
    /// The opponent acts while its turn is still current; time left over after
    /// it acts keeps running the action clock within this call.
    pub fn tick(&mut self, elapsed_ms: u32) {
        let mut elapsed = elapsed_ms;
        loop {
            let events = self.turns.tick(elapsed);
            elapsed = 0;
            if events.is_empty() {
                break;
            }
            for event in events {
                self.apply_turn_event(event);
            }
            if self.turns.carried_ms() == 0 {
                break;
            }
        }
    }

    /// The opponent's action finished early; hand the board back.
    pub fn finish_opponent_action(&mut self) {
        for event in self.turns.finish_opponent_action() {
            self.apply_turn_event(event);
        }
    }

    /// End the player's turn before the budget runs out. Refused mid-resolution.
    pub fn end_player_turn(&mut self) -> bool {
        if self.gate.is_locked() {
            return false;
        }
        match self.turns.end_player_turn() {
            Some(event) => {
                self.apply_turn_event(event);
                true
            }
            None => false,
        }
    }

    /// Spend elements from the cleared-tile pool, all or nothing.
    pub fn try_spend_elements(&mut self, costs: &[ElementCost]) -> bool {
        let spent = self.cleared.try_spend(costs);
        tracing::debug!(spent, remaining = self.cleared.total(), "element spend");
        spent
    }

    pub fn reset_cleared_counts(&mut self) {
        self.cleared.reset();
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            rows: self.grid.to_rows(),
            side: self.turns.side(),
            remaining_moves: self.turns.remaining_moves(),
            locked: self.gate.is_locked(),
            selected: self.gate.selected(),
            preview: self.gate.preview(),
            cleared: self.cleared.clone(),
            faulted: self.faulted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Grid {
        Grid::from_rows(
            &[
                vec![0, 1, 2, 3],
                vec![1, 0, 1, 1],
                vec![2, 3, 0, 2],
                vec![3, 2, 3, 0],
                vec![0, 1, 2, 3],
            ],
            4,
            11,
        )
    }

    fn session(moves: u32) -> BattleSession {
        let config = BattleConfig {
            moves_per_turn: moves,
            ..BattleConfig::default()
        };
        BattleSession::with_grid(config, board(), IdleOpponent)
    }

    #[test]
    fn test_new_session_board_has_no_matches() {
        let session = BattleSession::new(BattleConfig::default());
        assert!(session.grid().is_full());
        assert!(session.grid().find_matches().is_empty());
        assert_eq!(session.side(), Side::Player);
        assert_eq!(session.remaining_moves(), 5);
    }

    #[test]
    fn test_effective_swap_updates_ledger_and_unlocks() {
        let mut session = session(3);
        session.drain_events();

        let report = session
            .commit_swap(Coord::new(0, 1), Coord::new(1, 1))
            .unwrap();
        assert!(report.is_effective());
        assert!(session.cleared_counts().get(1) >= 3);
        assert!(!session.gate().is_locked());
        assert_eq!(session.remaining_moves(), 2);

        let events = session.drain_events();
        assert_eq!(events.first(), Some(&BattleEvent::Locked));
        assert_eq!(events.last(), Some(&BattleEvent::Unlocked));
        assert!(events
            .iter()
            .any(|e| matches!(e, BattleEvent::ClearedCountsDelta { .. })));
    }

    #[test]
    fn test_reverted_swap_still_spends_move() {
        let mut session = session(3);
        let before = session.grid().to_rows();

        let report = session
            .commit_swap(Coord::new(0, 0), Coord::new(0, 1))
            .unwrap();
        assert!(report.reverted);
        assert_eq!(session.grid().to_rows(), before);
        assert_eq!(session.remaining_moves(), 2);
        assert!(session.cleared_counts().is_empty());
    }

    #[test]
    fn test_rejections_do_not_mutate() {
        let mut session = session(1);
        let before = session.grid().to_rows();

        assert_eq!(
            session.commit_swap(Coord::new(0, 0), Coord::new(2, 0)),
            Err(BattleError::Rejected(SwapRejected::NotAdjacent))
        );
        assert_eq!(
            session.commit_swap(Coord::new(3, 0), Coord::new(4, 0)),
            Err(BattleError::Rejected(SwapRejected::OutOfBounds))
        );
        assert_eq!(session.remaining_moves(), 1);
        assert_eq!(session.grid().to_rows(), before);
    }

    #[test]
    fn test_last_move_hands_turn_to_opponent() {
        let mut session = session(1);
        session
            .commit_swap(Coord::new(0, 0), Coord::new(0, 1))
            .unwrap();
        assert_eq!(session.side(), Side::Opponent);
        assert!(!session.pointer_down(Coord::new(1, 1)));
        assert_eq!(
            session.commit_swap(Coord::new(0, 0), Coord::new(0, 1)),
            Err(BattleError::Rejected(SwapRejected::NotPlayerTurn))
        );

        session.tick(300);
        assert!(session
            .drain_events()
            .contains(&BattleEvent::OpponentActNow));
        session.tick(800);
        assert_eq!(session.side(), Side::Player);
        assert_eq!(session.remaining_moves(), 1);
    }

    #[test]
    fn test_finished_opponent_returns_turn_immediately() {
        let config = BattleConfig {
            moves_per_turn: 1,
            ..BattleConfig::default()
        };
        let mut calls = 0u32;
        let mut session = BattleSession::with_grid(config, board(), |_: &BattleSnapshot| {
            calls += 1;
            OpponentOutcome::Finished
        });
        assert!(session.end_player_turn());
        session.tick(300);
        assert_eq!(session.side(), Side::Player);
        drop(session);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_drag_commits_through_gate() {
        let mut session = session(2);
        assert!(session.pointer_down(Coord::new(0, 1)));
        session.pointer_drag(DragDelta::new(30.0, 0.0));
        assert_eq!(session.gate().preview(), Some(Coord::new(1, 1)));

        let report = session.pointer_up().unwrap().unwrap();
        assert!(report.is_effective());
        assert_eq!(session.gate().selected(), None);
        assert_eq!(session.gate().preview(), None);
    }

    #[test]
    fn test_spend_elements_all_or_nothing() {
        let mut session = session(2);
        session
            .commit_swap(Coord::new(0, 1), Coord::new(1, 1))
            .unwrap();
        let ones = session.cleared_counts().get(1);

        assert!(!session.try_spend_elements(&[
            ElementCost::new(1, 1),
            ElementCost::new(0, 10_000)
        ]));
        assert_eq!(session.cleared_counts().get(1), ones);
        assert!(session.try_spend_elements(&[ElementCost::new(1, 3)]));
        assert_eq!(session.cleared_counts().get(1), ones - 3);
    }

    #[test]
    fn test_cascade_failure_faults_session() {
        let config = BattleConfig {
            type_count: 1,
            ..BattleConfig::default()
        };
        let grid = Grid::from_rows(&[vec![0, 0, 0], vec![0, 0, 0], vec![0, 0, 0]], 1, 3);
        let mut session = BattleSession::with_grid(config, grid, IdleOpponent);

        let err = session
            .commit_swap(Coord::new(0, 0), Coord::new(1, 0))
            .unwrap_err();
        assert!(matches!(err, BattleError::Cascade(_)));
        assert!(session.is_faulted());
        assert!(session.gate().is_locked());
        assert_eq!(
            session.commit_swap(Coord::new(0, 0), Coord::new(1, 0)),
            Err(BattleError::Rejected(SwapRejected::Faulted))
        );
    }
}
