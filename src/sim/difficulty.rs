//! Difficulty and combo controller
//!
//! Hits ratchet difficulty up (faster letters, shorter spawn interval) and grow
//! the combo multiplier. Misses only reset the multiplier; difficulty never
//! relaxes within a run.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current pacing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    /// Depth units per tick given to newly spawned letters
    pub falling_speed: f64,
    pub spawn_interval_ms: f64,
    /// Score multiplier in [1, max]
    pub combo_multiplier: f64,
}

/// Result of scoring a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitScore {
    pub points: u64,
    /// Streak reached a milestone boundary
    pub milestone: bool,
}

/// Sole writer of [`DifficultyState`]
#[derive(Debug, Clone)]
pub struct DifficultyController {
    state: DifficultyState,
    initial: DifficultyState,
    speed_step: f64,
    min_spawn_interval_ms: f64,
    spawn_interval_decay: f64,
    combo_step: f64,
    max_combo_multiplier: f64,
    base_hit_points: u32,
    milestone_step: u32,
}

impl DifficultyController {
    pub fn new(tuning: &Tuning) -> Self {
        let initial = DifficultyState {
            falling_speed: tuning.initial_falling_speed,
            spawn_interval_ms: tuning.initial_spawn_interval_ms,
            combo_multiplier: 1.0,
        };
        Self {
            state: initial,
            initial,
            speed_step: tuning.speed_step,
            min_spawn_interval_ms: tuning.min_spawn_interval_ms,
            spawn_interval_decay: tuning.spawn_interval_decay,
            combo_step: tuning.combo_step,
            max_combo_multiplier: tuning.max_combo_multiplier,
            base_hit_points: tuning.base_hit_points,
            milestone_step: tuning.combo_milestone_step.max(1),
        }
    }

    pub fn state(&self) -> &DifficultyState {
        &self.state
    }

    /// Multiplier earned by a streak of `streak` consecutive hits
    pub fn multiplier_for(&self, streak: u32) -> f64 {
        (1.0 + f64::from(streak) * self.combo_step).min(self.max_combo_multiplier)
    }

    /// Apply a hit that extended the streak to `streak`
    pub fn on_hit(&mut self, streak: u32) -> HitScore {
        self.state.combo_multiplier = self.multiplier_for(streak);
        self.state.falling_speed += self.speed_step;
        self.state.spawn_interval_ms = (self.state.spawn_interval_ms * self.spawn_interval_decay)
            .max(self.min_spawn_interval_ms);

        let points = (f64::from(self.base_hit_points) * self.state.combo_multiplier).round() as u64;
        HitScore {
            points,
            milestone: streak > 0 && streak % self.milestone_step == 0,
        }
    }

    /// A mistyped key or an expired letter: the combo is lost, difficulty stays
    pub fn on_miss(&mut self) {
        self.state.combo_multiplier = 1.0;
    }

    /// Back to the opening pace for a new run
    pub fn reset(&mut self) {
        self.state = self.initial;
    }
}
