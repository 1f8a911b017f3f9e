//=========================================================================
// State Tracker
//=========================================================================
//
// Which keys are held, and which went down or up during this frame.
//
//   begin_frame() → apply(batch)… → queries
//
// Held keys persist across frames. Edges are recorded in arrival order and
// dropped at the next `begin_frame`, so a tap that starts and ends inside
// one frame still reports both its press and its release.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode};

//=== Edge ================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Pressed,
    Released,
}

//=== StateTracker ========================================================

#[derive(Debug, Default)]
pub struct StateTracker {
    held: HashSet<KeyCode>,
    edges: Vec<(KeyCode, Edge)>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Drops the previous frame's edges. Held keys stay held.
    pub(super) fn begin_frame(&mut self) {
        self.edges.clear();
    }

    pub(super) fn apply(&mut self, events: &[InputEvent]) {
        for event in events {
            match *event {
                // Repeated KeyDown for a held key is not a new press
                InputEvent::KeyDown(key) if self.held.insert(key) => {
                    self.edges.push((key, Edge::Pressed));
                }
                InputEvent::KeyUp(key) if self.held.remove(&key) => {
                    self.edges.push((key, Edge::Released));
                }
                _ => {}
            }
        }
    }

    /// Releases every held key, e.g. when a mode change invalidates them.
    pub(super) fn release_all(&mut self) {
        let released = self.held.drain().map(|key| (key, Edge::Released));
        self.edges.extend(released);
    }

    //--- Queries ----------------------------------------------------------

    /// Went down this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.edges.contains(&(key, Edge::Pressed))
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Went up this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.edges.contains(&(key, Edge::Released))
    }

    pub fn held_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.held.iter().copied()
    }

    /// Keys pressed this frame, in the order they went down.
    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.edges
            .iter()
            .filter(|(_, edge)| *edge == Edge::Pressed)
            .map(|(key, _)| *key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
