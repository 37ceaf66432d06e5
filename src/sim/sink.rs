//! Presentation hooks
//!
//! The simulation pushes notifications out through [`GameSink`] and never reads
//! rendering or audio state back.

use serde::{Deserialize, Serialize};

use super::letters::{Letter, LetterId};
use super::matcher::HitEvent;

/// Render/audio layer driven by the simulation. Every hook defaults to a no-op.
pub trait GameSink {
    fn on_spawn(&mut self, _letter: &Letter) {}
    fn on_remove(&mut self, _id: LetterId) {}
    fn on_hit(&mut self, _hit: &HitEvent) {}
    /// A mistyped key or a letter that reached the camera
    fn on_miss(&mut self) {}
    fn on_health_changed(&mut self, _health: u32) {}
    fn on_score_changed(&mut self, _score: u64) {}
    fn on_combo_milestone(&mut self, _streak: u32) {}
    fn on_shield_critical(&mut self, _health: u32) {}
    fn on_level_transition_start(&mut self, _next_level: u32) {}
    fn on_level_transition_end(&mut self, _level: u32) {}
    fn on_game_over(&mut self, _final_score: u64) {}
}

/// Sink that ignores everything
impl GameSink for () {}

/// Notification emitted by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: LetterId, character: char },
    Removed { id: LetterId },
    Hit(HitEvent),
    Miss,
    HealthChanged(u32),
    ScoreChanged(u64),
    ComboMilestone(u32),
    ShieldCritical(u32),
    LevelTransitionStart(u32),
    LevelTransitionEnd(u32),
    GameOver(u64),
}

/// Records every notification, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<GameEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded events, leaving the sink empty
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl GameSink for RecordingSink {
    fn on_spawn(&mut self, letter: &Letter) {
        self.events.push(GameEvent::Spawned {
            id: letter.id,
            character: letter.character,
        });
    }

    fn on_remove(&mut self, id: LetterId) {
        self.events.push(GameEvent::Removed { id });
    }

    fn on_hit(&mut self, hit: &HitEvent) {
        self.events.push(GameEvent::Hit(*hit));
    }

    fn on_miss(&mut self) {
        self.events.push(GameEvent::Miss);
    }

    fn on_health_changed(&mut self, health: u32) {
        self.events.push(GameEvent::HealthChanged(health));
    }

    fn on_score_changed(&mut self, score: u64) {
        self.events.push(GameEvent::ScoreChanged(score));
    }

    fn on_combo_milestone(&mut self, streak: u32) {
        self.events.push(GameEvent::ComboMilestone(streak));
    }

    fn on_shield_critical(&mut self, health: u32) {
        self.events.push(GameEvent::ShieldCritical(health));
    }

    fn on_level_transition_start(&mut self, next_level: u32) {
        self.events.push(GameEvent::LevelTransitionStart(next_level));
    }

    fn on_level_transition_end(&mut self, level: u32) {
        self.events.push(GameEvent::LevelTransitionEnd(level));
    }

    fn on_game_over(&mut self, final_score: u64) {
        self.events.push(GameEvent::GameOver(final_score));
    }
}
