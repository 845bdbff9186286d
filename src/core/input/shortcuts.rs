//=========================================================================
// Debug Shortcuts
//=========================================================================
//
// Keyboard shortcuts that trigger persistence operations by hand.
//
// Architecture:
//   (key, modifiers) → HashMap → DebugCommand
//
// Defaults:
//   Ctrl+Shift+S → Save
//   Ctrl+Shift+L → Load (full)
//
// Shortcuts resolve only while enabled, which mirrors the configuration's
// debug flag.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::event::{KeyCode, Modifiers};
use super::state_tracker::StateTracker;

//=== DebugCommand ========================================================

/// Persistence operation requested from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugCommand {
    Save,
    Load { full: bool },
}

//=== DebugShortcuts ======================================================

#[derive(Debug, Clone)]
pub struct DebugShortcuts {
    bindings: HashMap<(KeyCode, Modifiers), DebugCommand>,
    enabled: bool,
}

impl DebugShortcuts {
    /// Creates an empty, disabled set.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            enabled: false,
        }
    }

    /// The default bindings, enabled or not.
    pub fn with_defaults(enabled: bool) -> Self {
        let mut shortcuts = Self::new();
        shortcuts.bind(KeyCode::KeyS, Modifiers::SHIFT_CTRL, DebugCommand::Save);
        shortcuts.bind(KeyCode::KeyL, Modifiers::SHIFT_CTRL, DebugCommand::Load { full: true });
        shortcuts.enabled = enabled;
        shortcuts
    }

    //--- Binding API ------------------------------------------------------

    /// Binds a key combination (exact modifier match).
    pub fn bind(&mut self, key: KeyCode, modifiers: Modifiers, command: DebugCommand) {
        self.bindings.insert((key, modifiers), command);
    }

    pub fn unbind(&mut self, key: KeyCode, modifiers: Modifiers) {
        self.bindings.remove(&(key, modifiers));
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    //--- Resolution -------------------------------------------------------

    pub fn map_key(&self, key: KeyCode, modifiers: Modifiers) -> Option<DebugCommand> {
        if !self.enabled {
            return None;
        }
        self.bindings.get(&(key, modifiers)).copied()
    }

    /// Commands triggered by this tick's key presses, in press order.
    pub fn resolve(&self, state: &StateTracker) -> Vec<DebugCommand> {
        let commands: Vec<DebugCommand> = state
            .presses()
            .iter()
            .filter_map(|&(key, modifiers)| self.map_key(key, modifiers))
            .collect();

        if !commands.is_empty() {
            debug!(target: "lifecycle", "Debug shortcuts triggered: {:?}", commands);
        }
        commands
    }
}

impl Default for DebugShortcuts {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
