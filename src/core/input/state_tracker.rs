//=========================================================================
// State Tracker
//=========================================================================
//
// Keyboard state with per-tick transitions.
//
// Architecture:
//   InputEvent → process_events() → keys held + presses this tick → query
//
// Tick lifecycle: begin_tick() → process_events() → query
//
// Key repeat from the platform arrives as further `KeyDown` events for a
// key that is already held; those are not counted as new presses.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers};

//=== StateTracker ========================================================

#[derive(Debug, Default)]
pub struct StateTracker {
    //--- Persistent State -------------------------------------------------
    keys_down: HashSet<KeyCode>,
    modifiers: Modifiers,

    //--- Tick Deltas ------------------------------------------------------
    pressed: Vec<(KeyCode, Modifiers)>,
    released: HashSet<KeyCode>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Tick Processing --------------------------------------------------

    /// Forgets the previous tick's transitions.
    pub fn begin_tick(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    pub fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = modifiers;
                if self.keys_down.insert(key) {
                    self.pressed.push((key, modifiers));
                }
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = modifiers;
                if self.keys_down.remove(&key) {
                    self.released.insert(key);
                }
            }
            InputEvent::FocusLost => {
                self.released.extend(self.keys_down.drain());
                self.modifiers = Modifiers::NONE;
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Key went down this tick.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.iter().any(|&(k, _)| k == key)
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Key went up this tick.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }

    /// Presses of this tick, in arrival order, with the modifiers held at
    /// the time of each press.
    pub fn presses(&self) -> &[(KeyCode, Modifiers)] {
        &self.pressed
    }

    /// Most recently reported modifier state.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
