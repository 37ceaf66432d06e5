//! Game state and presentation snapshot
//!
//! `GameState` is the small block of run state the presentation layer reads
//! every frame. The game state machine is its only writer.

use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyState;
use super::effects::ScreenFeedback;
use super::letters::Letter;
use crate::consts::MAX_HEALTH;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start, or after a stop
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Lightspeed interlude between levels; letters are frozen
    LevelTransition,
    /// Shield depleted
    GameOver,
}

/// Per-run scoreboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Shield strength in [0, MAX_HEALTH]
    pub health: u32,
    pub score: u64,
    /// Starts at 1
    pub level: u32,
    /// Consecutive hits since the last miss
    pub combo_streak: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh state for a run that has not started
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Idle,
            health: MAX_HEALTH,
            score: 0,
            level: 1,
            combo_streak: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Lower health, clamped at zero. Returns the new value.
    pub(crate) fn damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount).min(MAX_HEALTH);
        self.health
    }
}

/// Live effect counts for HUDs and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectCounts {
    pub bursts: usize,
    pub fragments: usize,
    pub pending_hits: usize,
}

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub state: GameState,
    pub difficulty: DifficultyState,
    pub letters: Vec<Letter>,
    pub effects: EffectCounts,
    pub feedback: ScreenFeedback,
    /// Milliseconds left in the lightspeed interlude
    pub transition_remaining_ms: Option<f64>,
    /// Run generation, bumped on every start
    pub generation: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.health, 100);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.combo_streak, 0);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut state = GameState::new();
        assert_eq!(state.damage(8), 92);
        assert_eq!(state.damage(500), 0);
        assert_eq!(state.damage(8), 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = GameSnapshot {
            state: GameState::new(),
            difficulty: DifficultyState {
                falling_speed: 0.02,
                spawn_interval_ms: 3000.0,
                combo_multiplier: 1.0,
            },
            letters: Vec::new(),
            effects: EffectCounts::default(),
            feedback: ScreenFeedback::default(),
            transition_remaining_ms: None,
            generation: 0,
        };
        let json = serde_json::to_string(&snapshot).expect("serialize");
        assert!(json.contains("\"phase\":\"Idle\""));
        let back: GameSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.state, snapshot.state);
    }
}
