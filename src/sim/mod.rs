//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-driven time only
//! - Seeded RNG only
//! - Stable iteration order (letters by spawn id)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod difficulty;
pub mod effects;
pub mod game;
pub mod letters;
pub mod matcher;
pub mod sink;
pub mod spawner;
pub mod state;
pub mod words;

pub use autopilot::Autopilot;
pub use difficulty::{DifficultyController, DifficultyState, HitScore};
pub use effects::{EffectsScheduler, Particle, ParticleBurst, ScreenFeedback, TextFragment};
pub use game::Game;
pub use letters::{Letter, LetterId, LetterRegistry};
pub use matcher::{HitEvent, MatchResult, normalize_key, try_match};
pub use sink::{GameEvent, GameSink, RecordingSink};
pub use spawner::{SpawnPlan, SpawnTimer, Spawner};
pub use state::{EffectCounts, GamePhase, GameSnapshot, GameState};
pub use words::{
    NoWords, StaticWords, ThreadedWords, WordBatch, WordSource, WordSourceError, WordTicket,
};
