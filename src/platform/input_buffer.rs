//=========================================================================
// Input Buffer
//=========================================================================
//
// Holds the key events received between two frame boundaries.
//
// The platform pushes every translated event here and drains the buffer
// once per redraw, sending the whole batch to the world in one message.
// Identical consecutive events are collapsed.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

#[derive(Debug)]
pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 32;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    /// Appends `event` unless it repeats the last one.
    pub(crate) fn push(&mut self, event: InputEvent) {
        if self.events.last() != Some(&event) {
            self.events.push(event);
        }
    }

    /// Takes the frame's events, or `None` if nothing arrived.
    pub(crate) fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.events.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.events))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;

    #[test]
    fn consecutive_duplicates_collapse() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::KeyDown(KeyCode::KeyW));
        buffer.push(InputEvent::KeyDown(KeyCode::KeyW));
        buffer.push(InputEvent::KeyDown(KeyCode::KeyA));
        buffer.push(InputEvent::KeyDown(KeyCode::KeyW));

        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn drain_empties_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::KeyDown(KeyCode::KeyE));
        buffer.push(InputEvent::KeyUp(KeyCode::KeyE));

        assert_eq!(
            buffer.drain(),
            Some(vec![InputEvent::KeyDown(KeyCode::KeyE), InputEvent::KeyUp(KeyCode::KeyE)])
        );
        assert_eq!(buffer.drain(), None);
    }

    #[test]
    fn empty_buffer_drains_to_none() {
        let mut buffer = InputBuffer::new();

        assert_eq!(buffer.drain(), None);
    }
}
