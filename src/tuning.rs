//! Data-driven game balance
//!
//! Every gameplay constant a designer may want to tweak lives here. Loaded from
//! JSON; missing fields fall back to the shipped defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems found while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Difficulty ===
    /// Depth units per tick for freshly spawned letters at the start of a run
    pub initial_falling_speed: f64,
    /// Falling speed added on every hit
    pub speed_step: f64,
    /// Delay between spawn batches at the start of a run
    pub initial_spawn_interval_ms: f64,
    /// Floor for the spawn interval
    pub min_spawn_interval_ms: f64,
    /// Spawn interval multiplier applied on every hit
    pub spawn_interval_decay: f64,

    // === Combo & score ===
    /// Multiplier gained per consecutive hit
    pub combo_step: f64,
    pub max_combo_multiplier: f64,
    /// Points for a hit before the multiplier
    pub base_hit_points: u32,
    /// Streak interval at which a milestone is announced
    pub combo_milestone_step: u32,

    // === Shield ===
    /// Health lost per letter that reaches the camera
    pub miss_damage: u32,
    /// Health at or below which the shield warning fires
    pub critical_health: u32,

    // === Levels ===
    /// Score needed to reach level 2, 3, ...
    pub level_thresholds: Vec<u64>,
    /// Length of the lightspeed interlude
    pub level_transition_ms: f64,

    // === Word feed ===
    /// Queue length below which more words are requested
    pub word_low_water: usize,
    /// Back-off after a failed word request
    pub word_retry_ms: f64,

    // === Effects ===
    /// Laser travel time before a hit explodes
    pub hit_effect_delay_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_falling_speed: 0.02,
            speed_step: 0.004,
            initial_spawn_interval_ms: 3000.0,
            min_spawn_interval_ms: 600.0,
            spawn_interval_decay: 0.95,

            combo_step: 0.1,
            max_combo_multiplier: 3.0,
            base_hit_points: 10,
            combo_milestone_step: 5,

            miss_damage: 8,
            critical_health: 29,

            level_thresholds: vec![2000, 3000],
            level_transition_ms: 10_000.0,

            word_low_water: 8,
            word_retry_ms: 5000.0,

            hit_effect_delay_ms: 100.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.initial_falling_speed > 0.0) {
            return invalid("initial_falling_speed", "must be positive");
        }
        if self.speed_step < 0.0 {
            return invalid("speed_step", "must not be negative");
        }
        if !(self.min_spawn_interval_ms > 0.0) {
            return invalid("min_spawn_interval_ms", "must be positive");
        }
        if self.initial_spawn_interval_ms < self.min_spawn_interval_ms {
            return invalid("initial_spawn_interval_ms", "must not be below the minimum");
        }
        if !(self.spawn_interval_decay > 0.0 && self.spawn_interval_decay <= 1.0) {
            return invalid("spawn_interval_decay", "must be in (0, 1]");
        }
        if self.max_combo_multiplier < 1.0 {
            return invalid("max_combo_multiplier", "must be at least 1.0");
        }
        if self.combo_step < 0.0 {
            return invalid("combo_step", "must not be negative");
        }
        if self.combo_milestone_step == 0 {
            return invalid("combo_milestone_step", "must be at least 1");
        }
        if self.level_thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return invalid("level_thresholds", "must be strictly ascending");
        }
        if self.level_transition_ms < 0.0
            || self.word_retry_ms < 0.0
            || self.hit_effect_delay_ms < 0.0
        {
            return invalid("timers", "durations must not be negative");
        }
        Ok(())
    }

    /// Score needed to leave `level`, if there is a next level
    pub fn threshold_for(&self, level: u32) -> Option<u64> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.level_thresholds.get(index).copied()
    }
}
