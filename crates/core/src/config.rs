//! Battle configuration, read once at construction.
//!
//! Every field has a default, so `{}` is a valid config. Bad values are repaired
//! rather than rejected; see [`BattleConfig::sanitized`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::turn::OpponentTimings;
use crate::types::{
    DEFAULT_DRAG_THRESHOLD, DEFAULT_HEIGHT, DEFAULT_MOVES_PER_TURN, DEFAULT_TYPE_COUNT,
    DEFAULT_WIDTH, OPPONENT_ACTION_MS, OPPONENT_TURN_DELAY_MS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub width: usize,
    pub height: usize,
    pub type_count: usize,
    /// Per-type spawn weights; empty means uniform.
    pub spawn_weights: Vec<f32>,
    pub moves_per_turn: u32,
    pub opponent_delay_ms: u32,
    pub opponent_action_ms: u32,
    pub drag_threshold: f32,
    pub seed: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            type_count: DEFAULT_TYPE_COUNT,
            spawn_weights: Vec::new(),
            moves_per_turn: DEFAULT_MOVES_PER_TURN,
            opponent_delay_ms: OPPONENT_TURN_DELAY_MS,
            opponent_action_ms: OPPONENT_ACTION_MS,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            seed: 1,
        }
    }
}

impl BattleConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Repair values that would make the battle unplayable.
    ///
    /// Zero dimensions, type count and budget become 1; a weight vector of the wrong
    /// length is dropped (uniform); a drag threshold that is not a positive finite
    /// number becomes the default.
    pub fn sanitized(mut self) -> Self {
        if self.width == 0 || self.height == 0 {
            tracing::warn!(
                width = self.width,
                height = self.height,
                "non-positive board size, clamping to 1"
            );
            self.width = self.width.max(1);
            self.height = self.height.max(1);
        }
        if self.type_count == 0 {
            tracing::warn!("type_count is 0, clamping to 1");
            self.type_count = 1;
        }
        if !self.spawn_weights.is_empty() && self.spawn_weights.len() != self.type_count {
            tracing::warn!(
                expected = self.type_count,
                actual = self.spawn_weights.len(),
                "spawn weight length mismatch, using uniform weights"
            );
            self.spawn_weights.clear();
        }
        if self.moves_per_turn == 0 {
            tracing::warn!("moves_per_turn is 0, clamping to 1");
            self.moves_per_turn = 1;
        }
        if !self.drag_threshold.is_finite() || self.drag_threshold <= 0.0 {
            tracing::warn!(
                threshold = self.drag_threshold,
                "invalid drag threshold, using default"
            );
            self.drag_threshold = DEFAULT_DRAG_THRESHOLD;
        }
        self
    }

    pub fn opponent_timings(&self) -> OpponentTimings {
        OpponentTimings {
            delay_ms: self.opponent_delay_ms,
            action_ms: self.opponent_action_ms,
        }
    }
}
