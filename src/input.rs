//! Keyboard state as seen by the simulation.
//!
//! The simulation only ever asks "is this key down right now?"; how a front
//! end learns that (key events, hold windows, a test script) is its business.

use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// Fire; also restarts after game over.
    Space,
    /// Pause toggle.
    Escape,
}

/// Boolean-per-key pressed state.
pub trait InputSource {
    fn is_pressed(&self, key: Key) -> bool;

    fn up(&self) -> bool {
        self.is_pressed(Key::W) || self.is_pressed(Key::ArrowUp)
    }

    fn down(&self) -> bool {
        self.is_pressed(Key::S) || self.is_pressed(Key::ArrowDown)
    }

    fn left(&self) -> bool {
        self.is_pressed(Key::A) || self.is_pressed(Key::ArrowLeft)
    }

    fn right(&self) -> bool {
        self.is_pressed(Key::D) || self.is_pressed(Key::ArrowRight)
    }

    fn fire(&self) -> bool {
        self.is_pressed(Key::Space)
    }
}

/// Plain set of currently held keys.
#[derive(Clone, Debug, Default)]
pub struct KeyState {
    held: HashSet<Key>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl InputSource for KeyState {
    fn is_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

impl<const N: usize> From<[Key; N]> for KeyState {
    fn from(keys: [Key; N]) -> Self {
        KeyState {
            held: keys.into_iter().collect(),
        }
    }
}

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Covers terminals that never send key-release events: OS
/// key-repeat keeps refreshing the entry while the key is down.
pub const HOLD_WINDOW: u64 = 4;

/// Held keys reconstructed from a stream of press/repeat/release events.
#[derive(Clone, Debug, Default)]
pub struct HeldKeys {
    key_frame: HashMap<Key, u64>,
    frame: u64,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start of a new frame; stale keys fall out of the hold window.
    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }

    /// Press or OS repeat: the key is held as of this frame.
    pub fn press(&mut self, key: Key) {
        self.key_frame.insert(key, self.frame);
    }

    pub fn release(&mut self, key: Key) {
        self.key_frame.remove(&key);
    }
}

impl InputSource for HeldKeys {
    fn is_pressed(&self, key: Key) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }
}
