//=========================================================================
// Key Bindings
//=========================================================================
//
// Maps physical keys to movement directions and discrete world actions.
//
// Architecture:
//   KeyCode → HashMap → Binding::{Move(Direction), Action(WorldAction)}
//
// Movement bindings are level-triggered (sampled while held); action
// bindings are edge-triggered (fire on the press frame only).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::event::KeyCode;
use super::state_tracker::StateTracker;

//=== Binding Targets =====================================================

/// One of the four movement flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

/// Discrete, edge-triggered world action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorldAction {
    /// Land on the currently looked-at body.
    Activate,
    /// Return to space.
    Back,
}

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Move(Direction),
    Action(WorldAction),
}

//=== MovementInput =======================================================

/// Four independent movement flags, sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementInput {
    /// True when either thrust direction is held.
    pub fn thrusting(&self) -> bool {
        self.forward || self.backward
    }

    fn set(&mut self, direction: Direction) {
        match direction {
            Direction::Forward => self.forward = true,
            Direction::Backward => self.backward = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }
}

//=== KeyBindings =========================================================

/// Key → binding table. Several keys may share one binding.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, Binding>,
}

impl KeyBindings {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    //--- Binding API ------------------------------------------------------

    /// Binds `key`, replacing any previous binding for it.
    pub fn bind(&mut self, key: KeyCode, binding: Binding) -> &mut Self {
        if let Some(previous) = self.bindings.insert(key, binding) {
            debug!("Rebound {:?}: {:?} -> {:?}", key, previous, binding);
        }
        self
    }

    pub fn unbind(&mut self, key: KeyCode) -> Option<Binding> {
        self.bindings.remove(&key)
    }

    pub fn binding(&self, key: KeyCode) -> Option<Binding> {
        self.bindings.get(&key).copied()
    }

    //--- Resolution -------------------------------------------------------

    /// Movement flags for the keys currently held.
    pub(super) fn movement(&self, tracker: &StateTracker) -> MovementInput {
        let mut movement = MovementInput::default();
        for key in tracker.held_keys() {
            if let Some(Binding::Move(direction)) = self.bindings.get(&key) {
                movement.set(*direction);
            }
        }
        movement
    }

    /// Actions whose key was pressed this frame, deduplicated.
    pub(super) fn actions(&self, tracker: &StateTracker) -> Vec<WorldAction> {
        let mut actions = Vec::new();
        for key in tracker.pressed_keys() {
            if let Some(Binding::Action(action)) = self.bindings.get(&key) {
                if !actions.contains(action) {
                    actions.push(*action);
                }
            }
        }
        // Back resolves first when both keys land in the same frame
        actions.sort_by_key(|action| match action {
            WorldAction::Back => 0,
            WorldAction::Activate => 1,
        });
        actions
    }
}

impl Default for KeyBindings {
    /// W/S/A/D move, E activates, Escape goes back.
    fn default() -> Self {
        let mut table = Self::empty();
        table
            .bind(KeyCode::KeyW, Binding::Move(Direction::Forward))
            .bind(KeyCode::KeyS, Binding::Move(Direction::Backward))
            .bind(KeyCode::KeyA, Binding::Move(Direction::Left))
            .bind(KeyCode::KeyD, Binding::Move(Direction::Right))
            .bind(KeyCode::KeyE, Binding::Action(WorldAction::Activate))
            .bind(KeyCode::Escape, Binding::Action(WorldAction::Back));
        table
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
