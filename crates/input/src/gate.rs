//! Interaction gate - who may start a swap, and when.
//!
//! The gate holds the logical selection and preview for the board. While locked
//! (from swap commit until the cascade finishes) it holds neither: locking
//! force-clears both, and nothing can be selected again until unlock.

use crate::types::Coord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionGate {
    locked: bool,
    selected: Option<Coord>,
    /// Always adjacent to `selected` when set.
    preview: Option<Coord>,
}

impl InteractionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    pub fn preview(&self) -> Option<Coord> {
        self.preview
    }

    /// False while locked, or when a different tile is already selected.
    pub fn can_start_selection(&self, cell: Coord) -> bool {
        if self.locked {
            return false;
        }
        self.selected.map_or(true, |s| s == cell)
    }

    pub fn select(&mut self, cell: Coord) -> bool {
        if !self.can_start_selection(cell) {
            return false;
        }
        self.selected = Some(cell);
        true
    }

    /// Set the preview target. Rejected unless it is 4-adjacent to the selection.
    pub fn set_preview(&mut self, target: Coord) -> bool {
        match self.selected {
            Some(from) if !self.locked && from.is_adjacent(target) => {
                self.preview = Some(target);
                true
            }
            _ => false,
        }
    }

    pub fn clear_preview(&mut self) -> Option<Coord> {
        self.preview.take()
    }

    /// Drop selection and preview; returns the selection that was held.
    pub fn clear_selection(&mut self) -> Option<Coord> {
        self.preview = None;
        self.selected.take()
    }

    /// Enter the lock window. Returns the selection that was force-cleared.
    pub fn lock(&mut self) -> Option<Coord> {
        self.locked = true;
        self.clear_selection()
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// End the gesture, yielding `(from, to)` if a swap should be committed.
    ///
    /// Selection and preview are cleared either way.
    pub fn release(&mut self) -> Option<(Coord, Coord)> {
        let preview = self.preview.take();
        let selected = self.selected.take();
        if self.locked {
            return None;
        }
        match (selected, preview) {
            (Some(from), Some(to)) if from != to => Some((from, to)),
            _ => None,
        }
    }
}
