//! Match battle (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof:
//! `match_battle::{core,engine,input,types}`.

pub use match_battle_core as core;
pub use match_battle_engine as engine;
pub use match_battle_input as input;
pub use match_battle_types as types;
