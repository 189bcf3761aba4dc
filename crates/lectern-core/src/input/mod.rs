//! Input abstraction layer.

mod mock;

pub use mock::{MockInput, ScriptedInput};

use heapless::Vec;
use log::warn;

pub const MAX_TRACKED_KEYS: usize = 8;

/// Logical keys a paragraph can wait on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum KeyCode {
    Confirm,
    Cancel,
    Space,
    Char(char),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    Pressed(KeyCode),
    Released(KeyCode),
}

/// Polled input provider. Must never block: `Ok(None)` means nothing is
/// pending at `now_ms`.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self, now_ms: u64) -> Result<Option<InputEvent>, Self::Error>;
}

/// Per-tick edge detector. A key counts as newly pressed only on the tick its
/// press arrives while it was not already held; repeats are ignored.
#[derive(Clone, Debug, Default)]
pub struct KeyEdges {
    held: Vec<KeyCode, MAX_TRACKED_KEYS>,
    pressed: Vec<KeyCode, MAX_TRACKED_KEYS>,
}

impl KeyEdges {
    pub const fn new() -> Self {
        Self {
            held: Vec::new(),
            pressed: Vec::new(),
        }
    }

    pub fn begin_tick(&mut self) {
        self.pressed.clear();
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(key) => {
                if self.held.contains(&key) {
                    return;
                }
                if self.held.push(key).is_err() {
                    warn!("input: too many held keys, ignoring press of {:?}", key);
                    return;
                }
                if !self.pressed.contains(&key) {
                    let _ = self.pressed.push(key);
                }
            }
            InputEvent::Released(key) => self.held.retain(|held| *held != key),
        }
    }

    pub fn newly_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_press_without_release_is_not_an_edge() {
        let mut edges = KeyEdges::new();
        edges.begin_tick();
        edges.apply(InputEvent::Pressed(KeyCode::Char('z')));
        assert!(edges.newly_pressed(KeyCode::Char('z')));

        edges.begin_tick();
        edges.apply(InputEvent::Pressed(KeyCode::Char('z')));
        assert!(!edges.newly_pressed(KeyCode::Char('z')));
        assert!(edges.is_held(KeyCode::Char('z')));

        edges.apply(InputEvent::Released(KeyCode::Char('z')));
        edges.begin_tick();
        edges.apply(InputEvent::Pressed(KeyCode::Char('z')));
        assert!(edges.newly_pressed(KeyCode::Char('z')));
    }

    #[test]
    fn press_beyond_held_capacity_is_ignored() {
        let mut edges = KeyEdges::new();
        edges.begin_tick();
        for ch in ('a'..='z').take(MAX_TRACKED_KEYS) {
            edges.apply(InputEvent::Pressed(KeyCode::Char(ch)));
        }
        edges.begin_tick();

        edges.apply(InputEvent::Pressed(KeyCode::Confirm));
        assert!(!edges.newly_pressed(KeyCode::Confirm));
        edges.begin_tick();
        edges.apply(InputEvent::Pressed(KeyCode::Confirm));
        assert!(!edges.newly_pressed(KeyCode::Confirm));

        edges.apply(InputEvent::Released(KeyCode::Char('a')));
        edges.apply(InputEvent::Pressed(KeyCode::Confirm));
        assert!(edges.newly_pressed(KeyCode::Confirm));
        assert!(edges.is_held(KeyCode::Confirm));
    }

    #[test]
    fn tap_within_one_tick_still_registers() {
        let mut edges = KeyEdges::new();
        edges.begin_tick();
        edges.apply(InputEvent::Pressed(KeyCode::Confirm));
        edges.apply(InputEvent::Released(KeyCode::Confirm));
        assert!(edges.newly_pressed(KeyCode::Confirm));
        assert!(!edges.is_held(KeyCode::Confirm));
    }
}
