//! Drag mapping and per-gesture tracking.
//!
//! Pointer deltas are in pointer space: `dx > 0` is rightward and `dy > 0` is
//! upward on screen. Board rows grow downward, so an upward drag targets `y - 1`.
//!
//! A gesture only becomes a real drag once its delta reaches the threshold. A tap,
//! or a wiggle that never crosses it, selects nothing and commits nothing.

use arrayvec::ArrayVec;

use crate::gate::InteractionGate;
use crate::types::{BoardBounds, Coord, Direction};

/// Pointer displacement since pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragDelta {
    pub dx: f32,
    pub dy: f32,
}

impl DragDelta {
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub fn magnitude(&self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

/// Dominant direction of a drag, or `None` below the threshold.
///
/// Ties between the axes resolve to the vertical axis. A zero delta never has a
/// direction, whatever the threshold.
pub fn direction_from_delta(delta: DragDelta, threshold: f32) -> Option<Direction> {
    let magnitude = delta.magnitude();
    if magnitude == 0.0 || magnitude < threshold {
        return None;
    }
    let dir = if delta.dx.abs() > delta.dy.abs() {
        if delta.dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta.dy > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };
    Some(dir)
}

/// Adjacent cell the drag points at, or `origin` for "no movement".
///
/// Off-board targets also resolve to `origin`.
pub fn target_from_delta(
    origin: Coord,
    delta: DragDelta,
    threshold: f32,
    bounds: BoardBounds,
) -> Coord {
    match direction_from_delta(delta, threshold) {
        Some(dir) => {
            let to = origin.step(dir);
            if bounds.contains(to) {
                to
            } else {
                origin
            }
        }
        None => origin,
    }
}

/// Logical signals for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    Selected { cell: Coord },
    PreviewShown { from: Coord, to: Coord },
    PreviewCancelled { from: Coord, to: Coord },
}

pub type GateEvents = ArrayVec<GateEvent, 3>;

/// How a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Commit this swap.
    Commit { from: Coord, to: Coord },
    /// The dragged tile goes back where it was; nothing changes.
    SnapBack { from: Coord },
    /// No gesture was in progress, or it never became a drag.
    Ignored,
}

/// Tracks one pointer gesture from down to release.
#[derive(Debug, Clone)]
pub struct DragGesture {
    threshold: f32,
    origin: Option<Coord>,
    dragging: bool,
}

impl DragGesture {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            origin: None,
            dragging: false,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn origin(&self) -> Option<Coord> {
        self.origin
    }

    /// True once the threshold has been crossed.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Begin a gesture on `cell`. Does not select yet.
    pub fn pointer_down(&mut self, gate: &InteractionGate, cell: Coord) -> bool {
        if !gate.can_start_selection(cell) {
            return false;
        }
        self.origin = Some(cell);
        self.dragging = false;
        true
    }

    /// Update with the pointer's displacement since pointer-down.
    pub fn drag(
        &mut self,
        gate: &mut InteractionGate,
        delta: DragDelta,
        bounds: BoardBounds,
    ) -> GateEvents {
        let mut events = GateEvents::new();
        let Some(from) = self.origin else {
            return events;
        };
        if !gate.can_start_selection(from) {
            return events;
        }

        let magnitude = delta.magnitude();
        if !self.dragging && magnitude > 0.0 && magnitude >= self.threshold {
            if !gate.select(from) {
                return events;
            }
            self.dragging = true;
            events.push(GateEvent::Selected { cell: from });
        }
        if !self.dragging {
            return events;
        }

        let to = target_from_delta(from, delta, self.threshold, bounds);
        let current = gate.preview();

        if to == from {
            if let Some(prev) = gate.clear_preview() {
                events.push(GateEvent::PreviewCancelled { from, to: prev });
            }
            return events;
        }

        if current != Some(to) {
            if let Some(prev) = current {
                events.push(GateEvent::PreviewCancelled { from, to: prev });
            }
            if gate.set_preview(to) {
                events.push(GateEvent::PreviewShown { from, to });
            }
        }
        events
    }

    /// Finish the gesture.
    pub fn release(&mut self, gate: &mut InteractionGate) -> ReleaseOutcome {
        let dragging = std::mem::take(&mut self.dragging);
        let Some(from) = self.origin.take() else {
            return ReleaseOutcome::Ignored;
        };

        if !dragging {
            if !gate.is_locked() {
                gate.clear_selection();
            }
            return ReleaseOutcome::Ignored;
        }

        match gate.release() {
            Some((from, to)) => ReleaseOutcome::Commit { from, to },
            None => ReleaseOutcome::SnapBack { from },
        }
    }

    /// Abandon the gesture without touching the gate.
    pub fn cancel(&mut self) {
        self.origin = None;
        self.dragging = false;
    }
}
