//! Board input module (engine-facing).
//!
//! This module is independent of any UI framework. It turns pointer gestures into
//! logical swap requests and arbitrates when a new swap may begin:
//!
//! - [`gate`]: the interaction gate (lock window, selection, preview)
//! - [`drag`]: pointer delta → adjacent target, and the per-gesture tracker

pub mod drag;
pub mod gate;

pub use match_battle_types as types;

pub use drag::{
    direction_from_delta, target_from_delta, DragDelta, DragGesture, GateEvent, GateEvents,
    ReleaseOutcome,
};
pub use gate::InteractionGate;
