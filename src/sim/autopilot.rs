//! Demo mode: a simulated typist that plays the game
//!
//! Targets the most dangerous letter (closest to the camera), waits a human-ish
//! reaction time, then types it. Sometimes fumbles and hits a random key.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::letters::LetterRegistry;

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    /// Chance of typing the right key, in [0, 1]
    accuracy: f32,
    /// Ticks between keystrokes
    reaction_ticks: f32,
    cooldown: f32,
}

impl Autopilot {
    pub fn new(seed: u64, accuracy: f32, reaction_ticks: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            accuracy: accuracy.clamp(0.0, 1.0),
            reaction_ticks: reaction_ticks.max(0.0),
            cooldown: reaction_ticks.max(0.0),
        }
    }

    /// Key to press this tick, if any
    pub fn next_key(&mut self, letters: &LetterRegistry, delta_ticks: f32) -> Option<char> {
        self.cooldown -= delta_ticks;
        if self.cooldown > 0.0 {
            return None;
        }

        // Most dangerous letter: deepest, oldest first on ties
        let target = letters
            .iter()
            .reduce(|best, l| if l.depth() > best.depth() { l } else { best })?;

        self.cooldown = self.reaction_ticks;
        if self.rng.random::<f32>() < self.accuracy {
            Some(target.character)
        } else {
            Some(char::from(b'A' + self.rng.random_range(0..26u8)))
        }
    }
}
