//=========================================================================
// Input System
//=========================================================================
//
// Turns batches of raw key events into one sampled `FrameInput` per frame.
//
// Architecture:
//   Vec<Vec<InputEvent>> → StateTracker → KeyBindings → FrameInput
//
// Simulation code never sees raw events: it reads the four movement flags
// and the discrete actions of the frame, nothing else.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod bindings;
pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use bindings::{Binding, Direction, KeyBindings, MovementInput, WorldAction};
pub use event::{InputEvent, KeyCode};
pub use state_tracker::StateTracker;

//=== External Dependencies ===============================================

use log::trace;

//=== FrameInput ==========================================================

/// Input sampled for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub movement: MovementInput,
    pub actions: Vec<WorldAction>,
}

//=== InputSystem =========================================================

/// Owns the key tracker and the binding table.
#[derive(Debug, Default)]
pub struct InputSystem {
    tracker: StateTracker,
    bindings: KeyBindings,
}

impl InputSystem {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            tracker: StateTracker::new(),
            bindings,
        }
    }

    /// Digests every batch received this frame and samples the result.
    pub fn process_frame(&mut self, batches: &[Vec<InputEvent>]) -> FrameInput {
        self.tracker.begin_frame();
        for batch in batches {
            self.tracker.apply(batch);
        }

        let frame = FrameInput {
            movement: self.bindings.movement(&self.tracker),
            actions: self.bindings.actions(&self.tracker),
        };

        if !frame.actions.is_empty() {
            trace!("Frame actions: {:?}", frame.actions);
        }
        frame
    }

    /// Drops every held key, e.g. after a mode switch.
    pub fn reset(&mut self) {
        self.tracker.release_all();
    }

    /// Movement flags from the keys held right now.
    pub fn movement(&self) -> MovementInput {
        self.bindings.movement(&self.tracker)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
