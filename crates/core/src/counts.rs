//! Cleared-tile ledger
//!
//! Per-type tallies of cleared tiles. A cascade reports its own delta; the battle
//! keeps a running ledger that skills can spend from.

use serde::{Deserialize, Serialize};

use crate::types::TileType;

/// Amount of one tile type required by a cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementCost {
    pub tile: TileType,
    pub amount: u32,
}

impl ElementCost {
    pub const fn new(tile: TileType, amount: u32) -> Self {
        Self { tile, amount }
    }
}

/// Cleared counts indexed by tile type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClearedCounts {
    counts: Vec<u32>,
}

impl ClearedCounts {
    pub fn new(type_count: usize) -> Self {
        Self {
            counts: vec![0; type_count],
        }
    }

    /// Add `amount` for `tile`. Unknown types are ignored.
    pub fn add(&mut self, tile: TileType, amount: u32) {
        if let Some(slot) = self.counts.get_mut(tile as usize) {
            *slot = slot.saturating_add(amount);
        }
    }

    /// Count for `tile`, 0 when unknown
    pub fn get(&self, tile: TileType) -> u32 {
        self.counts.get(tile as usize).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn reset(&mut self) {
        self.counts.fill(0);
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    /// `(tile, count)` pairs with a non-zero count
    pub fn iter(&self) -> impl Iterator<Item = (TileType, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n > 0)
            .map(|(t, &n)| (t as TileType, n))
    }

    /// Fold another ledger into this one.
    pub fn merge(&mut self, other: &ClearedCounts) {
        if self.counts.len() < other.counts.len() {
            self.counts.resize(other.counts.len(), 0);
        }
        for (slot, &n) in self.counts.iter_mut().zip(&other.counts) {
            *slot = slot.saturating_add(n);
        }
    }

    pub fn can_afford(&self, costs: &[ElementCost]) -> bool {
        // Costs may name the same tile twice, so sum per type first.
        let mut needed = vec![0u64; self.counts.len()];
        for cost in costs {
            match needed.get_mut(cost.tile as usize) {
                Some(slot) => *slot += u64::from(cost.amount),
                None if cost.amount > 0 => return false,
                None => {}
            }
        }
        needed
            .iter()
            .zip(&self.counts)
            .all(|(&need, &have)| need <= u64::from(have))
    }

    /// Deduct every cost, or nothing if any cannot be paid.
    pub fn try_spend(&mut self, costs: &[ElementCost]) -> bool {
        if !self.can_afford(costs) {
            return false;
        }
        for cost in costs {
            if let Some(slot) = self.counts.get_mut(cost.tile as usize) {
                *slot -= cost.amount;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let mut counts = ClearedCounts::new(4);
        counts.add(1, 3);
        counts.add(1, 2);
        counts.add(9, 5);
        assert_eq!(counts.get(1), 5);
        assert_eq!(counts.get(9), 0);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_merge_and_reset() {
        let mut a = ClearedCounts::new(3);
        let mut b = ClearedCounts::new(3);
        a.add(0, 1);
        b.add(0, 2);
        b.add(2, 4);
        a.merge(&b);
        assert_eq!(a.as_slice(), &[3, 0, 4]);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![(0, 3), (2, 4)]);
        a.reset();
        assert!(a.is_empty());
    }

    #[test]
    fn test_try_spend_is_all_or_nothing() {
        let mut counts = ClearedCounts::new(4);
        counts.add(0, 3);
        counts.add(2, 1);

        let too_much = [ElementCost::new(0, 2), ElementCost::new(2, 2)];
        assert!(!counts.try_spend(&too_much));
        assert_eq!(counts.as_slice(), &[3, 0, 1, 0]);

        let ok = [ElementCost::new(0, 2), ElementCost::new(2, 1)];
        assert!(counts.try_spend(&ok));
        assert_eq!(counts.as_slice(), &[1, 0, 0, 0]);
    }

    #[test]
    fn test_duplicate_cost_entries_are_summed() {
        let mut counts = ClearedCounts::new(2);
        counts.add(1, 3);
        let costs = [ElementCost::new(1, 2), ElementCost::new(1, 2)];
        assert!(!counts.can_afford(&costs));
    }

    #[test]
    fn test_unknown_type_cost() {
        let counts = ClearedCounts::new(2);
        assert!(!counts.can_afford(&[ElementCost::new(7, 1)]));
        assert!(counts.can_afford(&[ElementCost::new(7, 0)]));
    }
}
