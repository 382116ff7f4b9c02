//! RNG module - seeded draws and weighted tile sampling
//!
//! Every random decision in a battle (initial fill, refills) goes through one
//! `SimpleRng`, so a seed reproduces a whole session.
//!
//! `SpawnWeights` holds the per-type weight vector. Degenerate vectors (all zero,
//! wrong length, negative or non-finite entries) are repaired to uniform weights.

use crate::types::TileType;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 8) % max
    }

    /// Generate a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Current generator state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Per-type spawn weights, always of length `type_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnWeights {
    weights: Vec<f32>,
    total: f32,
}

impl SpawnWeights {
    /// Uniform weights over `type_count` kinds
    pub fn uniform(type_count: usize) -> Self {
        let type_count = type_count.max(1);
        Self {
            weights: vec![1.0; type_count],
            total: type_count as f32,
        }
    }

    /// Build from a configured vector, repairing anything degenerate.
    ///
    /// An empty vector silently means uniform. A length mismatch, a negative or
    /// non-finite entry, or an all-zero vector falls back to uniform with a warning.
    pub fn from_weights(type_count: usize, weights: &[f32]) -> Self {
        let type_count = type_count.max(1);
        if weights.is_empty() {
            return Self::uniform(type_count);
        }
        if weights.len() != type_count {
            tracing::warn!(
                expected = type_count,
                actual = weights.len(),
                "spawn weight length mismatch, using uniform weights"
            );
            return Self::uniform(type_count);
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            tracing::warn!(?weights, "negative or non-finite spawn weight, using uniform weights");
            return Self::uniform(type_count);
        }
        let total: f32 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            tracing::warn!(?weights, "spawn weights sum to zero, using uniform weights");
            return Self::uniform(type_count);
        }
        Self {
            weights: weights.to_vec(),
            total,
        }
    }

    pub fn type_count(&self) -> usize {
        self.weights.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }

    pub fn is_uniform(&self) -> bool {
        self.weights.windows(2).all(|w| w[0] == w[1])
    }

    /// Draw one tile type.
    ///
    /// Draws `u` in `[0, total)` and returns the first positive-weight type whose
    /// cumulative weight reaches `u`.
    pub fn sample(&self, rng: &mut SimpleRng) -> TileType {
        let draw = rng.next_f32() * self.total;
        let mut cumulative = 0.0f32;
        let mut last_positive = 0usize;
        for (i, &w) in self.weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            cumulative += w;
            last_positive = i;
            if cumulative >= draw {
                return i as TileType;
            }
        }
        // Float rounding can leave `draw` a hair above the final sum.
        last_positive as TileType
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_restart_from_seed_continues_sequence() {
        let mut rng = SimpleRng::new(77);
        assert_eq!(rng.seed(), 77);
        let last = rng.next_u32();
        assert_eq!(rng.seed(), last);

        let mut resumed = SimpleRng::new(rng.seed());
        for _ in 0..10 {
            assert_eq!(rng.next_u32(), resumed.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_next_f32_in_unit_range() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v), "{} out of range", v);
        }
    }

    #[test]
    fn test_next_range_zero_max() {
        let mut rng = SimpleRng::new(7);
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_single_positive_weight_always_wins() {
        let weights = SpawnWeights::from_weights(4, &[0.0, 0.0, 1.0, 0.0]);
        let mut rng = SimpleRng::new(42);
        for _ in 0..1000 {
            assert_eq!(weights.sample(&mut rng), 2);
        }
    }

    #[test]
    fn test_degenerate_weights_fall_back_to_uniform() {
        assert!(SpawnWeights::from_weights(4, &[0.0; 4]).is_uniform());
        assert!(SpawnWeights::from_weights(4, &[1.0, 2.0]).is_uniform());
        assert!(SpawnWeights::from_weights(3, &[1.0, -1.0, 1.0]).is_uniform());
        assert!(SpawnWeights::from_weights(2, &[f32::NAN, 1.0]).is_uniform());
        assert_eq!(SpawnWeights::from_weights(5, &[]).type_count(), 5);
    }

    #[test]
    fn test_uniform_covers_every_type() {
        let weights = SpawnWeights::uniform(4);
        let mut rng = SimpleRng::new(2024);
        let mut seen = [false; 4];
        for _ in 0..500 {
            seen[weights.sample(&mut rng) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_heavy_weight_dominates() {
        let weights = SpawnWeights::from_weights(2, &[9.0, 1.0]);
        let mut rng = SimpleRng::new(5);
        let zeros = (0..2000).filter(|_| weights.sample(&mut rng) == 0).count();
        assert!(zeros > 1500, "expected ~90% zeros, got {}", zeros);
    }
}
