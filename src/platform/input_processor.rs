//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit keyboard events into world InputEvents.
//
// Architecture:
//   KeyEvent → physical key → KeyCode → InputEvent → InputBuffer
//
// Keys are identified by physical location. OS auto-repeat is dropped:
// the world samples held keys itself, so a repeat carries no information.
// Keys without a world mapping (F-keys, numpad, media keys) are filtered.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode};

//=== Event Processing ====================================================

/// Converts a Winit key event, or `None` if it should not reach the world.
pub(crate) fn process_key_event(key_event: &KeyEvent) -> Option<InputEvent> {
    translate_key(key_event.physical_key, key_event.state, key_event.repeat)
}

fn translate_key(physical: PhysicalKey, state: ElementState, repeat: bool) -> Option<InputEvent> {
    if repeat {
        return None;
    }

    let key = match physical {
        PhysicalKey::Code(code) => KeyCode::from(code),
        PhysicalKey::Unidentified(_) => return None,
    };
    if key == KeyCode::Unidentified {
        return None;
    }

    Some(match state {
        ElementState::Pressed => InputEvent::KeyDown(key),
        ElementState::Released => InputEvent::KeyUp(key),
    })
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Maps digits, letters, arrows and the common special keys. Everything
/// else becomes `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            //--- Digits ---------------------------------------------------
            W::Digit0 => Self::Digit0,
            W::Digit1 => Self::Digit1,
            W::Digit2 => Self::Digit2,
            W::Digit3 => Self::Digit3,
            W::Digit4 => Self::Digit4,
            W::Digit5 => Self::Digit5,
            W::Digit6 => Self::Digit6,
            W::Digit7 => Self::Digit7,
            W::Digit8 => Self::Digit8,
            W::Digit9 => Self::Digit9,

            //--- Letters --------------------------------------------------
            W::KeyA => Self::KeyA,
            W::KeyB => Self::KeyB,
            W::KeyC => Self::KeyC,
            W::KeyD => Self::KeyD,
            W::KeyE => Self::KeyE,
            W::KeyF => Self::KeyF,
            W::KeyG => Self::KeyG,
            W::KeyH => Self::KeyH,
            W::KeyI => Self::KeyI,
            W::KeyJ => Self::KeyJ,
            W::KeyK => Self::KeyK,
            W::KeyL => Self::KeyL,
            W::KeyM => Self::KeyM,
            W::KeyN => Self::KeyN,
            W::KeyO => Self::KeyO,
            W::KeyP => Self::KeyP,
            W::KeyQ => Self::KeyQ,
            W::KeyR => Self::KeyR,
            W::KeyS => Self::KeyS,
            W::KeyT => Self::KeyT,
            W::KeyU => Self::KeyU,
            W::KeyV => Self::KeyV,
            W::KeyW => Self::KeyW,
            W::KeyX => Self::KeyX,
            W::KeyY => Self::KeyY,
            W::KeyZ => Self::KeyZ,

            //--- Arrows ---------------------------------------------------
            W::ArrowUp => Self::ArrowUp,
            W::ArrowDown => Self::ArrowDown,
            W::ArrowLeft => Self::ArrowLeft,
            W::ArrowRight => Self::ArrowRight,

            //--- Special --------------------------------------------------
            W::Space => Self::Space,
            W::Enter => Self::Enter,
            W::Escape => Self::Escape,
            W::Tab => Self::Tab,
            W::Backspace => Self::Backspace,
            W::Delete => Self::Delete,

            _ => Self::Unidentified,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn code(key: WinitKeyCode) -> PhysicalKey {
        PhysicalKey::Code(key)
    }

    #[test]
    fn press_and_release_map_to_key_events() {
        assert_eq!(
            translate_key(code(WinitKeyCode::KeyW), ElementState::Pressed, false),
            Some(InputEvent::KeyDown(KeyCode::KeyW))
        );
        assert_eq!(
            translate_key(code(WinitKeyCode::Escape), ElementState::Released, false),
            Some(InputEvent::KeyUp(KeyCode::Escape))
        );
    }

    #[test]
    fn auto_repeat_is_dropped() {
        assert_eq!(
            translate_key(code(WinitKeyCode::KeyW), ElementState::Pressed, true),
            None
        );
    }

    #[test]
    fn unmapped_keys_are_filtered() {
        assert_eq!(
            translate_key(code(WinitKeyCode::F13), ElementState::Pressed, false),
            None
        );
        assert_eq!(KeyCode::from(WinitKeyCode::NumpadEnter), KeyCode::Unidentified);
    }

    #[test]
    fn movement_keys_convert() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyS), KeyCode::KeyS);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyD), KeyCode::KeyD);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyE), KeyCode::KeyE);
    }
}
