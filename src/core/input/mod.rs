//=========================================================================
// Input System
//
// Keyboard handling for the runtime's debug shortcuts.
//
// Responsibilities:
// - Digest the input batches collected from the host channel each tick
// - Keep per-tick key transitions in a `StateTracker`
// - Resolve presses into `DebugCommand`s through `DebugShortcuts`
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod shortcuts;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers};
pub use shortcuts::{DebugCommand, DebugShortcuts};
pub use state_tracker::StateTracker;

//=== External Crates =====================================================

use log::trace;

//=== InputSystem =========================================================

/// Owns the keyboard state and the shortcut table.
#[derive(Debug, Default)]
pub struct InputSystem {
    state: StateTracker,
    shortcuts: DebugShortcuts,
}

impl InputSystem {
    pub fn new(shortcuts: DebugShortcuts) -> Self {
        Self {
            state: StateTracker::new(),
            shortcuts,
        }
    }

    /// Consumes this tick's input batches and returns the triggered
    /// commands.
    pub fn update(&mut self, batches: &mut Vec<Vec<InputEvent>>) -> Vec<DebugCommand> {
        self.state.begin_tick();
        for batch in batches.drain(..) {
            trace!(target: "host", "Digesting {} input events", batch.len());
            self.state.process_events(&batch);
        }
        self.shortcuts.resolve(&self.state)
    }

    pub fn state(&self) -> &StateTracker {
        &self.state
    }

    pub fn shortcuts(&self) -> &DebugShortcuts {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut DebugShortcuts {
        &mut self.shortcuts
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_drains_batches_and_resolves_commands() {
        let mut input = InputSystem::new(DebugShortcuts::with_defaults(true));
        let mut batches = vec![
            vec![InputEvent::key_down(KeyCode::KeyS, Modifiers::SHIFT_CTRL)],
            vec![InputEvent::key_up(KeyCode::KeyS, Modifiers::SHIFT_CTRL)],
        ];

        let commands = input.update(&mut batches);

        assert!(batches.is_empty());
        assert_eq!(commands, vec![DebugCommand::Save]);
        assert!(input.state().is_key_released(KeyCode::KeyS));
    }

    #[test]
    fn held_combination_fires_once() {
        let mut input = InputSystem::new(DebugShortcuts::with_defaults(true));
        let press = InputEvent::key_down(KeyCode::KeyL, Modifiers::SHIFT_CTRL);

        assert_eq!(input.update(&mut vec![vec![press]]).len(), 1);
        assert!(input.update(&mut vec![vec![press]]).is_empty());
        assert!(input.update(&mut Vec::new()).is_empty());
    }
}
