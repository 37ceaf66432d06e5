//! Letter spawning: what to spawn next and when
//!
//! Characters come from a prefetch queue fed by a [`WordSource`]. The queue is
//! topped up asynchronously; when it runs dry the spawner falls back to a
//! random letter rather than waiting.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::words::{WordBatch, WordSource, WordSourceError, WordTicket, letters_from_words};
use crate::Rgb;
use crate::consts::*;
use crate::tuning::Tuning;

/// Where and how a new letter should appear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub character: char,
    pub pos: Vec3,
    pub color: Rgb,
}

/// One-shot countdown that the owner re-arms after each firing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnTimer {
    remaining_ms: Option<f64>,
}

impl SpawnTimer {
    pub fn arm(&mut self, delay_ms: f64) {
        self.remaining_ms = Some(delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining_ms.is_some()
    }

    pub fn remaining_ms(&self) -> Option<f64> {
        self.remaining_ms
    }

    /// Count down; returns true (and disarms) when the timer fires
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        let Some(remaining) = self.remaining_ms.as_mut() else {
            return false;
        };
        *remaining -= elapsed_ms;
        if *remaining <= 0.0 {
            self.remaining_ms = None;
            true
        } else {
            false
        }
    }
}

/// Decides the next character and paces spawn batches
#[derive(Debug)]
pub struct Spawner {
    queue: VecDeque<char>,
    rng: Pcg32,
    timer: SpawnTimer,
    /// Run generation; batches from older generations are discarded
    generation: u64,
    request_in_flight: bool,
    /// Back-off after a failed request
    retry_ms: f64,
    low_water: usize,
    retry_delay_ms: f64,
    inbox_tx: Sender<WordBatch>,
    inbox_rx: Receiver<WordBatch>,
}

impl Spawner {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::channel();
        Self {
            queue: VecDeque::new(),
            rng: Pcg32::seed_from_u64(seed),
            timer: SpawnTimer::default(),
            generation: 0,
            request_in_flight: false,
            retry_ms: 0.0,
            low_water: tuning.word_low_water,
            retry_delay_ms: tuning.word_retry_ms,
            inbox_tx,
            inbox_rx,
        }
    }

    /// Forget queued characters and pending timers, and start a new generation
    pub fn reset(&mut self, generation: u64, seed: u64) {
        self.queue.clear();
        self.rng = Pcg32::seed_from_u64(seed);
        self.timer.cancel();
        self.generation = generation;
        self.request_in_flight = false;
        self.retry_ms = 0.0;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn timer(&self) -> &SpawnTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut SpawnTimer {
        &mut self.timer
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Letters spawned per batch: level N spawns N letters
    pub fn spawn_count(level: u32) -> u32 {
        level.max(1)
    }

    /// Count down the word-source back-off
    pub fn advance(&mut self, elapsed_ms: f64) {
        if self.retry_ms > 0.0 {
            self.retry_ms = (self.retry_ms - elapsed_ms).max(0.0);
        }
    }

    /// Drain answered word requests into the queue without blocking
    pub fn poll_words(&mut self) {
        while let Ok(batch) = self.inbox_rx.try_recv() {
            self.accept(batch);
        }
    }

    fn accept(&mut self, batch: WordBatch) {
        if batch.generation != self.generation {
            log::debug!(
                "Discarding word batch from generation {} (current {})",
                batch.generation,
                self.generation
            );
            return;
        }
        self.request_in_flight = false;
        let result = batch.result.and_then(|words| {
            let before = self.queue.len();
            self.queue.extend(letters_from_words(&words));
            match self.queue.len() - before {
                0 => Err(WordSourceError::Empty),
                added => Ok((added, words.len())),
            }
        });
        match result {
            Ok((added, words)) => log::debug!("Queued {added} letters from {words} words"),
            Err(err) => {
                log::warn!("Word source failed, using random letters: {err}");
                self.retry_ms = self.retry_delay_ms;
            }
        }
    }

    /// Ask for more words if the queue is low and nothing is pending
    fn maybe_request(&mut self, source: &mut dyn WordSource) {
        if self.request_in_flight || self.retry_ms > 0.0 || self.queue.len() >= self.low_water {
            return;
        }
        self.request_in_flight = true;
        source.request_words(WordTicket::new(self.generation, self.inbox_tx.clone()));
        // Synchronous sources answer immediately
        self.poll_words();
    }

    /// Next character to spawn. Never blocks on the word source.
    pub fn next_character(&mut self, source: &mut dyn WordSource) -> char {
        self.poll_words();
        self.maybe_request(source);
        let character = self.queue.pop_front().unwrap_or_else(|| self.random_letter());
        // Keep the queue primed for the following spawn
        self.maybe_request(source);
        character
    }

    fn random_letter(&mut self) -> char {
        char::from(b'A' + self.rng.random_range(0..26u8))
    }

    /// Pick character, position and colour for a new letter
    pub fn plan(&mut self, source: &mut dyn WordSource) -> SpawnPlan {
        let character = self.next_character(source);
        let half = SPAWN_SPREAD / 2.0;
        let pos = Vec3::new(
            self.rng.random_range(-half..half),
            self.rng.random_range(-half..half),
            SPAWN_DEPTH,
        );
        let color = Rgb::from_hsl(self.rng.random::<f32>(), 1.0, 0.7);
        SpawnPlan {
            character,
            pos,
            color,
        }
    }
}
