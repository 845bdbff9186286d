//=========================================================================
// Input Event Types
//=========================================================================
//
// Portable keyboard input as seen by the runtime.
//
// The platform layer (winit) converts its own key codes and modifier
// state into these types before anything crosses the host channel, so
// the core never depends on a windowing backend.
//
// Event Flow:
// ```text
// winit WindowEvent
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (per-tick transitions)
//         ↓
//    DebugShortcuts → DebugCommand
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical key identifier.
///
/// Names the key's location, not the character it produces, so `KeyS`
/// is the same key on QWERTY and AZERTY layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Any key the platform layer does not map.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state.
///
/// Left and right variants are not distinguished. Shortcuts match
/// modifiers exactly: a `Ctrl+Shift+S` binding does not fire on
/// `Ctrl+Shift+Alt+S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl, or Command on macOS.
    pub ctrl: bool,
    /// Alt, or Option on macOS.
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };
    pub const SHIFT_CTRL: Self = Self { shift: true, ctrl: true, alt: false };
    pub const ALL: Self = Self { shift: true, ctrl: true, alt: true };
}

//=== InputEvent ==========================================================

/// Keyboard event carrying the modifier state at the time it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    KeyDown { key: KeyCode, modifiers: Modifiers },
    KeyUp { key: KeyCode, modifiers: Modifiers },

    /// The window lost keyboard focus; every held key counts as released.
    FocusLost,
}

impl InputEvent {
    pub fn key_down(key: KeyCode, modifiers: Modifiers) -> Self {
        Self::KeyDown { key, modifiers }
    }

    pub fn key_up(key: KeyCode, modifiers: Modifiers) -> Self {
        Self::KeyUp { key, modifiers }
    }

    /// Modifier state carried by the event, if any.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::KeyDown { modifiers, .. } | Self::KeyUp { modifiers, .. } => Some(*modifiers),
            Self::FocusLost => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
