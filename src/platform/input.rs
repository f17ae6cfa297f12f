//! Keyboard state
//!
//! Key identifiers are DOM `KeyboardEvent.key` strings. The host records
//! presses and releases as they arrive; the loop samples once per tick.

use std::collections::HashMap;

use crate::sim::TickInput;

const LEFT: &[&str] = &["ArrowLeft", "a"];
const RIGHT: &[&str] = &["ArrowRight", "d"];
const UP: &[&str] = &["ArrowUp", "w"];
const DOWN: &[&str] = &["ArrowDown", "s"];
const BOOST: &[&str] = &[" "];

/// Held/released state per key
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashMap<String, bool>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keydown (`true`) or keyup (`false`)
    pub fn set(&mut self, key: &str, pressed: bool) {
        self.held.insert(key.to_owned(), pressed);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.get(key).copied().unwrap_or(false)
    }

    fn any_held(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.is_held(k))
    }

    /// Release everything (e.g. when the page loses focus)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Controls for the next tick
    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            left: self.any_held(LEFT),
            right: self.any_held(RIGHT),
            up: self.any_held(UP),
            down: self.any_held(DOWN),
            boost: self.any_held(BOOST),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_letter_keys_map_together() {
        let mut keys = KeyState::new();
        keys.set("a", true);
        keys.set("ArrowUp", true);
        let input = keys.to_tick_input();
        assert!(input.left && input.up);
        assert!(!input.right && !input.down && !input.boost);
    }

    #[test]
    fn test_release_and_boost() {
        let mut keys = KeyState::new();
        keys.set(" ", true);
        keys.set("d", true);
        keys.set("d", false);
        let input = keys.to_tick_input();
        assert!(input.boost);
        assert!(!input.right);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut keys = KeyState::new();
        keys.set("A", true);
        assert!(!keys.to_tick_input().left);
    }

    #[test]
    fn test_clear() {
        let mut keys = KeyState::new();
        keys.set("s", true);
        keys.clear();
        assert_eq!(keys.to_tick_input(), TickInput::default());
    }
}
