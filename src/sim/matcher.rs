//! Keystroke to letter matching
//!
//! Keyboard and on-screen text inputs both funnel through [`normalize_key`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::letters::{LetterId, LetterRegistry};
use crate::Rgb;

/// A letter shot down by the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    pub id: LetterId,
    pub position: Vec3,
    pub color: Rgb,
    pub character: char,
}

/// Outcome of a single keystroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult {
    /// Not a single A-Z letter, or the game is not accepting input
    Ignored,
    /// The oldest letter showing the key was destroyed
    Hit(HitEvent),
    /// No live letter shows the key
    Miss,
}

impl MatchResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, MatchResult::Hit(_))
    }
}

/// Upper-case `input` and accept it only if it is exactly one letter A-Z
pub fn normalize_key(input: &str) -> Option<char> {
    let mut chars = input.chars().flat_map(char::to_uppercase);
    let key = chars.next()?;
    if chars.next().is_some() || !key.is_ascii_uppercase() {
        return None;
    }
    Some(key)
}

/// Resolve a keystroke against the live letters.
///
/// When several letters share the character the earliest spawned one is hit.
pub fn try_match(letters: &mut LetterRegistry, input: &str) -> MatchResult {
    let Some(key) = normalize_key(input) else {
        return MatchResult::Ignored;
    };

    let Some(id) = letters.first_with(key).map(|l| l.id) else {
        return MatchResult::Miss;
    };

    match letters.remove(id) {
        Some(letter) => MatchResult::Hit(HitEvent {
            id: letter.id,
            position: letter.pos,
            color: letter.color,
            character: letter.character,
        }),
        None => MatchResult::Miss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SPAWN_DEPTH;

    fn registry_with(chars: &str) -> (LetterRegistry, Vec<LetterId>) {
        let mut registry = LetterRegistry::new();
        let ids = chars
            .chars()
            .enumerate()
            .map(|(i, c)| registry.insert(c, Vec3::new(i as f32, 0.0, SPAWN_DEPTH), 0.1, Rgb::RED))
            .collect();
        (registry, ids)
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("a"), Some('A'));
        assert_eq!(normalize_key("Q"), Some('Q'));
        assert_eq!(normalize_key(""), None);
        assert_eq!(normalize_key("ab"), None);
        assert_eq!(normalize_key("7"), None);
        assert_eq!(normalize_key(" "), None);
        assert_eq!(normalize_key("é"), None);
        // Upper-cases to two letters
        assert_eq!(normalize_key("ß"), None);
        assert_eq!(normalize_key("Enter"), None);
    }

    #[test]
    fn test_hit_removes_oldest_duplicate() {
        let (mut registry, ids) = registry_with("ABA");
        let result = try_match(&mut registry, "a");
        match result {
            MatchResult::Hit(hit) => {
                assert_eq!(hit.id, ids[0]);
                assert_eq!(hit.character, 'A');
                assert_eq!(hit.position.x, 0.0);
            }
            other => panic!("expected hit, got {other:?}"),
        }
        assert!(registry.get(ids[0]).is_none());
        assert!(registry.get(ids[2]).is_some());

        assert!(try_match(&mut registry, "A").is_hit());
        assert_eq!(try_match(&mut registry, "A"), MatchResult::Miss);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_input_is_ignored() {
        let (mut registry, _) = registry_with("A");
        assert_eq!(try_match(&mut registry, "1"), MatchResult::Ignored);
        assert_eq!(try_match(&mut registry, "AA"), MatchResult::Ignored);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_registry_misses() {
        let mut registry = LetterRegistry::new();
        assert_eq!(try_match(&mut registry, "k"), MatchResult::Miss);
    }
}
