//! Typing Nebula - A deep-space typing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (letters, matching, combo, effects, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use sim::{Game, GameEvent, GamePhase, GameSink, GameSnapshot, GameState, MatchResult};
pub use tuning::{Tuning, TuningError};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Length of one simulation tick (one rendered frame)
    pub const TICK_MS: f32 = 16.0;
    /// Effect lifetime consumed per tick (seconds)
    pub const LIFETIME_PER_TICK: f32 = 0.016;

    /// Depth at which letters appear
    pub const SPAWN_DEPTH: f32 = -50.0;
    /// Lateral spawn area (letters spawn within ±SPAWN_SPREAD/2 on x and y)
    pub const SPAWN_SPREAD: f32 = 20.0;
    /// Camera depth; a letter past this plane is a miss
    pub const CAMERA_DEPTH: f32 = 10.0;
    pub const MISS_DEPTH: f32 = CAMERA_DEPTH;
    /// Letter scale growth per unit of depth travelled
    pub const SCALE_PER_DEPTH: f32 = 0.05;

    /// Shield (health) bounds
    pub const MAX_HEALTH: u32 = 100;

    /// Explosion burst defaults
    pub const BURST_PARTICLES: usize = 200;
    pub const BURST_LIFETIME: f32 = 1.5;
    pub const BURST_SPEED: f32 = 0.4;
    /// Downward acceleration applied to burst particles every tick
    pub const PARTICLE_GRAVITY: f32 = 0.002;

    /// Letter debris defaults
    pub const FRAGMENT_COUNT: usize = 6;
    pub const FRAGMENT_LIFETIME: f32 = 1.0;
    pub const FRAGMENT_SPEED: f32 = 0.5;
    pub const FRAGMENT_SPIN: f32 = 0.1;

    /// Camera shake on a hit (seconds, amplitude)
    pub const HIT_SHAKE: (f32, f32) = (0.2, 0.2);
    /// Camera shake on a missed letter (seconds, amplitude)
    pub const MISS_SHAKE: (f32, f32) = (0.5, 0.5);
    /// Red damage flash on a missed letter (seconds)
    pub const MISS_FLASH: f32 = 0.1;
    pub const MISS_FLASH_OPACITY: f32 = 0.5;
}

/// Linear RGB color, each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert HSL (all components in [0, 1]) to RGB
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        if s <= 0.0 {
            return Self::new(l, l, l);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }
}

#[inline]
fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
