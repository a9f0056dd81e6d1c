//! Keyboard state as seen by the game logic.
//!
//! Movement reads *held* keys; firing and quitting react to *presses*.
//! Terminals differ in what they report: keyboard-enhancement capable ones
//! (kitty protocol) send `Press` / `Repeat` / `Release`, classic ones only
//! send repeated `Press` events while a key is down.  [`KeyTracker`] copes
//! with both by expiring keys that have been silent for `hold_window` frames.

use std::collections::HashMap;

/// The keys the game cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Space,
    Escape,
    Enter,
}

/// "Is key K currently held?"
pub trait KeyboardState {
    fn is_held(&self, key: Key) -> bool;
}

/// Input snapshot for one round tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Fire was pressed this frame.
    pub fire: bool,
    /// Escape was pressed or the terminal asked us to close.
    pub quit: bool,
}

impl KeyboardState for TickInput {
    fn is_held(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Space => self.fire,
            Key::Escape => self.quit,
            Key::Enter => false,
        }
    }
}

/// Default hold window: covers OS key-repeat intervals at 60 FPS.
pub const DEFAULT_HOLD_WINDOW: u64 = 8;

/// Folds raw key events into held / pressed state, one frame at a time.
#[derive(Clone, Debug)]
pub struct KeyTracker {
    /// Frame in which each held key was last seen (press or repeat).
    last_seen: HashMap<Key, u64>,
    /// Keys pressed during the current frame.
    pressed: Vec<Key>,
    closed: bool,
    frame: u64,
    hold_window: u64,
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_WINDOW)
    }
}

impl KeyTracker {
    pub fn new(hold_window: u64) -> Self {
        Self {
            last_seen: HashMap::new(),
            pressed: Vec::new(),
            closed: false,
            frame: 0,
            hold_window,
        }
    }

    /// Start a new frame: edge-triggered presses from the previous frame
    /// are forgotten, held keys stay until they expire or are released.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.pressed.clear();
    }

    pub fn press(&mut self, key: Key) {
        self.last_seen.insert(key, self.frame);
        self.pressed.push(key);
    }

    pub fn repeat(&mut self, key: Key) {
        self.last_seen.insert(key, self.frame);
    }

    pub fn release(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    /// The terminal (or Ctrl-C) asked to close.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Clears everything, e.g. between a modal screen and a new round.
    pub fn reset(&mut self) {
        self.last_seen.clear();
        self.pressed.clear();
        self.closed = false;
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            fire: self.was_pressed(Key::Space),
            quit: self.closed || self.was_pressed(Key::Escape),
        }
    }
}

impl KeyboardState for KeyTracker {
    fn is_held(&self, key: Key) -> bool {
        self.last_seen
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= self.hold_window)
            .unwrap_or(false)
    }
}
