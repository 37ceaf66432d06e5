//! Falling letter entities and their registry
//!
//! Letters are stored in spawn order. Ids are handed out sequentially by the
//! registry, so a letter's slot is `id - base` and removal never shifts other
//! letters. Emptied slots are dropped once they reach the front.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::Rgb;
use crate::consts::*;

/// Stable letter identifier, increasing in spawn order
pub type LetterId = u32;

/// A falling letter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Letter {
    pub id: LetterId,
    /// Upper-case 'A'..='Z'
    pub character: char,
    /// x, y lateral; z is depth (increases toward the camera)
    pub pos: Vec3,
    /// Depth units per tick
    pub speed: f32,
    pub color: Rgb,
    /// Render hint: unit vector from the letter toward the camera
    pub facing: Vec3,
    /// Render hint: uniform scale, grows as the letter approaches
    pub scale: f32,
}

impl Letter {
    pub fn depth(&self) -> f32 {
        self.pos.z
    }

    pub fn lateral(&self) -> Vec2 {
        self.pos.truncate()
    }

    fn refresh_view_hints(&mut self) {
        self.facing = (Vec3::new(0.0, 0.0, CAMERA_DEPTH) - self.pos).normalize_or_zero();
        self.scale = 1.0 + (self.pos.z - SPAWN_DEPTH) * SCALE_PER_DEPTH;
    }
}

/// Owns every live letter
#[derive(Debug, Clone)]
pub struct LetterRegistry {
    /// Slot `i` holds the letter with id `base + i`, if it is still alive
    slots: VecDeque<Option<Letter>>,
    base: LetterId,
    live: usize,
}

impl Default for LetterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LetterRegistry {
    pub fn new() -> Self {
        Self {
            slots: VecDeque::new(),
            base: 1,
            live: 0,
        }
    }

    /// Id the next inserted letter will receive
    pub fn next_id(&self) -> LetterId {
        self.base + self.slots.len() as LetterId
    }

    /// Add a new letter at `pos` and return its id
    pub fn insert(&mut self, character: char, pos: Vec3, speed: f32, color: Rgb) -> LetterId {
        let id = self.next_id();
        let mut letter = Letter {
            id,
            character,
            pos,
            speed,
            color,
            facing: Vec3::Z,
            scale: 1.0,
        };
        letter.refresh_view_hints();
        self.slots.push_back(Some(letter));
        self.live += 1;
        id
    }

    /// Remove a letter by id. Removing an unknown or already removed id is a no-op.
    pub fn remove(&mut self, id: LetterId) -> Option<Letter> {
        let index = self.slot_index(id)?;
        let letter = self.slots.get_mut(index)?.take()?;
        self.live -= 1;
        self.compact();
        Some(letter)
    }

    pub fn get(&self, id: LetterId) -> Option<&Letter> {
        self.slots.get(self.slot_index(id)?)?.as_ref()
    }

    /// Live letters in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &Letter> {
        self.slots.iter().flatten()
    }

    /// Oldest live letter showing `character`
    pub fn first_with(&self, character: char) -> Option<&Letter> {
        self.iter().find(|l| l.character == character)
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every letter. Ids keep counting up.
    pub fn clear(&mut self) {
        self.base = self.next_id();
        self.slots.clear();
        self.live = 0;
    }

    /// Move every letter toward the camera.
    ///
    /// Letters that pass the miss plane are removed and returned in spawn order.
    pub fn advance(&mut self, delta_ticks: f32) -> Vec<Letter> {
        let mut crossed = Vec::new();
        for letter in self.slots.iter_mut().flatten() {
            letter.pos.z += letter.speed * delta_ticks;
            letter.refresh_view_hints();
            if letter.pos.z > MISS_DEPTH {
                crossed.push(letter.id);
            }
        }

        crossed.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    fn slot_index(&self, id: LetterId) -> Option<usize> {
        let offset = id.checked_sub(self.base)?;
        let index = offset as usize;
        (index < self.slots.len()).then_some(index)
    }

    fn compact(&mut self) {
        while matches!(self.slots.front(), Some(None)) {
            self.slots.pop_front();
            self.base += 1;
        }
    }
}
