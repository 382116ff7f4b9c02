//! Battle engine: wires the grid, cascade resolver, turn economy and interaction
//! gate into a single [`BattleSession`].
//!
//! Collaborators (renderers, scoring, the opponent) never touch the rule modules
//! directly. They feed pointer input and time into the session and read back
//! [`BattleEvent`]s and [`BattleSnapshot`]s.

pub mod error;
pub mod events;
pub mod opponent;
pub mod session;
pub mod snapshot;

pub use match_battle_core as core;
pub use match_battle_input as input;
pub use match_battle_types as types;

pub use error::{BattleError, SwapRejected};
pub use events::BattleEvent;
pub use opponent::{IdleOpponent, OpponentAgent, OpponentOutcome};
pub use session::BattleSession;
pub use snapshot::BattleSnapshot;
