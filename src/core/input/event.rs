//=========================================================================
// Input Event Types
//=========================================================================
//
// Portable keyboard events produced by the platform layer and consumed by
// the input system.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (keys held, pressed/released this frame)
//         ↓
//    KeyBindings → MovementInput + WorldAction
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced, so
/// `KeyW` stays "forward" on AZERTY layouts too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Any key the platform reports that is not listed above.
    Unidentified,
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),

    /// Unrecognized or unsupported event, ignored by the input system.
    Unidentified,
}

impl InputEvent {
    /// Key carried by the event, if any.
    pub fn key(&self) -> Option<KeyCode> {
        match self {
            Self::KeyDown(key) | Self::KeyUp(key) => Some(*key),
            Self::Unidentified => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_is_extracted_from_key_events() {
        assert_eq!(InputEvent::KeyDown(KeyCode::KeyW).key(), Some(KeyCode::KeyW));
        assert_eq!(InputEvent::KeyUp(KeyCode::Escape).key(), Some(KeyCode::Escape));
        assert_eq!(InputEvent::Unidentified.key(), None);
    }

    #[test]
    fn down_and_up_are_distinct() {
        let mut set = HashSet::new();
        set.insert(InputEvent::KeyDown(KeyCode::KeyA));
        set.insert(InputEvent::KeyUp(KeyCode::KeyA));
        set.insert(InputEvent::KeyDown(KeyCode::KeyA));

        assert_eq!(set.len(), 2);
    }
}
