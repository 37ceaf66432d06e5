//! Game state machine
//!
//! Drives one run: `Idle -> Running <-> LevelTransition -> GameOver`, and back
//! to `Idle`/`Running` only through [`Game::stop`] or [`Game::restart`].
//! The machine is the only writer of health, score, level and phase. It ticks
//! once per rendered frame and never blocks.

use super::difficulty::{DifficultyController, DifficultyState};
use super::effects::{EffectsScheduler, ScreenFeedback};
use super::letters::{Letter, LetterRegistry};
use super::matcher::{self, MatchResult};
use super::sink::GameSink;
use super::spawner::Spawner;
use super::state::{EffectCounts, GamePhase, GameSnapshot, GameState};
use super::words::WordSource;
use crate::Rgb;
use crate::consts::*;
use crate::tuning::Tuning;

/// Running lightspeed interlude
#[derive(Debug, Clone, Copy, PartialEq)]
struct LevelTransition {
    /// Generation that started the interlude. `reset` clears the timer, so a
    /// mismatch only happens if a host carries a transition across a reset.
    epoch: u64,
    remaining_ms: f64,
    next_level: u32,
}

/// One player's game
pub struct Game {
    tuning: Tuning,
    seed: u64,
    state: GameState,
    difficulty: DifficultyController,
    letters: LetterRegistry,
    spawner: Spawner,
    effects: EffectsScheduler,
    feedback: ScreenFeedback,
    transition: Option<LevelTransition>,
    /// Bumped on every start, restart and stop
    generation: u64,
    source: Box<dyn WordSource>,
    /// Time spent in `Running` this run
    clock_ms: f64,
}

impl Game {
    pub fn new(tuning: Tuning, seed: u64, source: impl WordSource + 'static) -> Self {
        let spawner = Spawner::new(seed, &tuning);
        let difficulty = DifficultyController::new(&tuning);
        Self {
            tuning,
            seed,
            state: GameState::new(),
            difficulty,
            letters: LetterRegistry::new(),
            spawner,
            effects: EffectsScheduler::new(seed ^ 0x9e37_79b9_7f4a_7c15),
            feedback: ScreenFeedback::default(),
            transition: None,
            generation: 0,
            source: Box::new(source),
            clock_ms: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn difficulty(&self) -> &DifficultyState {
        self.difficulty.state()
    }

    pub fn letters(&self) -> &LetterRegistry {
        &self.letters
    }

    pub fn effects(&self) -> &EffectsScheduler {
        &self.effects
    }

    pub fn feedback(&self) -> &ScreenFeedback {
        &self.feedback
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Milliseconds of active play this run
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn transition_remaining_ms(&self) -> Option<f64> {
        self.transition.map(|t| t.remaining_ms)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            difficulty: *self.difficulty.state(),
            letters: self.letters.iter().cloned().collect(),
            effects: EffectCounts {
                bursts: self.effects.bursts().len(),
                fragments: self.effects.fragments().len(),
                pending_hits: self.effects.pending_hits(),
            },
            feedback: self.feedback,
            transition_remaining_ms: self.transition_remaining_ms(),
            generation: self.generation,
        }
    }

    /// Begin a run from `Idle`. Returns false if a run is already under way.
    pub fn start(&mut self, sink: &mut dyn GameSink) -> bool {
        if self.state.phase != GamePhase::Idle {
            log::warn!("Start ignored in {:?}; use restart", self.state.phase);
            return false;
        }
        self.reset(sink);
        self.launch(sink);
        true
    }

    /// Throw away the current run, whatever its phase, and begin a new one
    pub fn restart(&mut self, sink: &mut dyn GameSink) {
        self.reset(sink);
        self.launch(sink);
    }

    /// Abandon the current run and return to `Idle`
    pub fn stop(&mut self, sink: &mut dyn GameSink) {
        self.reset(sink);
        log::info!("Run stopped");
    }

    fn reset(&mut self, sink: &mut dyn GameSink) {
        let ids: Vec<_> = self.letters.iter().map(|l| l.id).collect();
        self.letters.clear();
        for id in ids {
            sink.on_remove(id);
        }

        // Invalidates pending word requests and interlude timers
        self.generation += 1;
        self.state = GameState::new();
        self.difficulty.reset();
        self.spawner
            .reset(self.generation, self.seed.wrapping_add(self.generation));
        self.effects.clear();
        self.feedback.clear();
        self.transition = None;
        self.clock_ms = 0.0;
    }

    fn launch(&mut self, sink: &mut dyn GameSink) {
        self.state.phase = GamePhase::Running;
        // First batch spawns on the next tick
        self.spawner.timer_mut().arm(0.0);
        log::info!("Run {} started", self.generation);
        sink.on_health_changed(self.state.health);
        sink.on_score_changed(self.state.score);
    }

    /// Route one keystroke (keyboard or on-screen text field)
    pub fn on_key(&mut self, input: &str, sink: &mut dyn GameSink) -> MatchResult {
        if self.state.phase != GamePhase::Running {
            log::debug!("Key {input:?} ignored in {:?}", self.state.phase);
            return MatchResult::Ignored;
        }

        let result = matcher::try_match(&mut self.letters, input);
        match result {
            MatchResult::Hit(hit) => {
                sink.on_remove(hit.id);
                sink.on_hit(&hit);

                self.state.combo_streak += 1;
                let scored = self.difficulty.on_hit(self.state.combo_streak);
                self.state.score = self.state.score.saturating_add(scored.points);
                sink.on_score_changed(self.state.score);
                if scored.milestone {
                    log::debug!("Combo x{}", self.state.combo_streak);
                    sink.on_combo_milestone(self.state.combo_streak);
                }

                self.feedback.shake(HIT_SHAKE);
                self.effects
                    .schedule_hit(hit, self.tuning.hit_effect_delay_ms);
                self.maybe_begin_transition(sink);
            }
            MatchResult::Miss => {
                self.break_combo();
                sink.on_miss();
            }
            MatchResult::Ignored => {}
        }
        result
    }

    /// Advance the simulation by `delta_ticks` frames
    pub fn tick(&mut self, delta_ticks: f32, sink: &mut dyn GameSink) {
        let delta_ticks = delta_ticks.max(0.0);
        let elapsed_ms = f64::from(delta_ticks * TICK_MS);

        self.spawner.poll_words();
        self.spawner.advance(elapsed_ms);

        match self.state.phase {
            GamePhase::Running => {
                self.clock_ms += elapsed_ms;
                self.advance_letters(delta_ticks, sink);
                if self.state.is_running() {
                    self.run_spawn_timer(elapsed_ms, sink);
                }
            }
            GamePhase::LevelTransition => self.advance_transition(elapsed_ms, sink),
            GamePhase::Idle | GamePhase::GameOver => {}
        }

        // Effects outlive the moment that created them
        self.effects.advance(delta_ticks);
        self.feedback.advance(delta_ticks);
    }

    fn advance_letters(&mut self, delta_ticks: f32, sink: &mut dyn GameSink) {
        for letter in self.letters.advance(delta_ticks) {
            sink.on_remove(letter.id);
            if self.state.is_running() {
                self.letter_escaped(&letter, sink);
            }
        }
    }

    fn letter_escaped(&mut self, letter: &Letter, sink: &mut dyn GameSink) {
        self.break_combo();
        let health = self.state.damage(self.tuning.miss_damage);
        log::debug!("Letter {} escaped, shield at {health}", letter.character);

        self.effects.spawn_burst(letter.pos, Rgb::RED);
        self.feedback.shake(MISS_SHAKE);
        self.feedback.flash(MISS_FLASH);

        sink.on_miss();
        sink.on_health_changed(health);
        if health > 0 && health <= self.tuning.critical_health {
            sink.on_shield_critical(health);
        }
        if health == 0 {
            self.game_over(sink);
        }
    }

    fn break_combo(&mut self) {
        self.state.combo_streak = 0;
        self.difficulty.on_miss();
    }

    fn game_over(&mut self, sink: &mut dyn GameSink) {
        self.state.phase = GamePhase::GameOver;
        self.spawner.timer_mut().cancel();
        self.transition = None;
        log::info!(
            "Game over: score {} at level {}",
            self.state.score,
            self.state.level
        );
        sink.on_game_over(self.state.score);
    }

    fn run_spawn_timer(&mut self, elapsed_ms: f64, sink: &mut dyn GameSink) {
        if !self.spawner.timer_mut().advance(elapsed_ms) {
            return;
        }

        let speed = self.difficulty.state().falling_speed as f32;
        for _ in 0..Spawner::spawn_count(self.state.level) {
            let plan = self.spawner.plan(self.source.as_mut());
            let id = self.letters.insert(plan.character, plan.pos, speed, plan.color);
            if let Some(letter) = self.letters.get(id) {
                log::debug!("Spawned {} as #{}", letter.character, letter.id);
                sink.on_spawn(letter);
            }
        }

        // Re-arm from the current difficulty so a faster pace applies right away
        let interval = self.difficulty.state().spawn_interval_ms;
        self.spawner.timer_mut().arm(interval);
    }

    fn maybe_begin_transition(&mut self, sink: &mut dyn GameSink) {
        if !self.state.is_running() || self.transition.is_some() {
            return;
        }
        let Some(threshold) = self.tuning.threshold_for(self.state.level) else {
            return;
        };
        if self.state.score < threshold {
            return;
        }

        let next_level = self.state.level + 1;
        self.transition = Some(LevelTransition {
            epoch: self.generation,
            remaining_ms: self.tuning.level_transition_ms,
            next_level,
        });
        self.state.phase = GamePhase::LevelTransition;
        log::info!("Lightspeed: entering level {next_level}");
        sink.on_level_transition_start(next_level);
    }

    fn advance_transition(&mut self, elapsed_ms: f64, sink: &mut dyn GameSink) {
        let generation = self.generation;
        let Some(transition) = self.transition.as_mut() else {
            log::warn!("Level transition phase without a timer; resuming");
            self.state.phase = GamePhase::Running;
            return;
        };
        if transition.epoch != generation {
            log::warn!("Dropping interlude from run {}", transition.epoch);
            self.transition = None;
            self.state.phase = GamePhase::Running;
            return;
        }

        transition.remaining_ms -= elapsed_ms;
        if transition.remaining_ms > 0.0 {
            return;
        }

        self.state.level = transition.next_level;
        self.transition = None;
        self.state.phase = GamePhase::Running;
        log::info!("Level {} begins", self.state.level);
        sink.on_level_transition_end(self.state.level);
        self.maybe_begin_transition(sink);
    }
}
