//=========================================================================
// State Machine Substrate
//=========================================================================
//
// Generic finite-state machine shared by the application layer (Space /
// Planet modes) and the entity layer (idle / fly behavior).
//
// Architecture:
//   StateMachine<F>
//     ├─ factories: HashMap<F::Key, StateFactory<F>>
//     └─ current:   Option<Box<dyn State<F>>>
//
// Flow:
//   transition(key) → current.exit() → factory(params) → next.enter(prev)
//   update(dt)      → current.update() → [requested key] → transition()
//
// A `StateFamily` bundles the types a machine is parametrized by, so the
// two machines in the world are independent instantiations of one type.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

//=== Module Declarations =================================================

mod state_machine;

//=== Public API ==========================================================

pub use state_machine::{StateFactory, StateMachine, TransitionOutcome};

//=== State Key Trait =====================================================

/// Marker trait for state identifiers.
///
/// State keys uniquely identify states in the machine's factory table.
/// Typically implemented by small enums.
pub trait StateKey: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== State Family ========================================================

/// Bundles the types a [`StateMachine`] is parametrized by.
///
/// - `Key`: names the states
/// - `Context`: mutable capability handed to every lifecycle hook
/// - `Input`: read-only per-update sample
/// - `Params`: payload handed to a state's factory at transition time
pub trait StateFamily: 'static {
    type Key: StateKey;
    type Context: ?Sized;
    type Input: ?Sized;
    type Params;
}

//=== State Trait =========================================================

/// Behavior of one state with lifecycle hooks and update logic.
///
/// States are constructed by their factory when the machine transitions to
/// them and dropped once they stop being current.
pub trait State<F: StateFamily> {
    /// Key this state is registered under.
    fn key(&self) -> F::Key;

    /// Called once after the previous state has exited.
    ///
    /// `previous` is the state that was just exited, or `None` on the first
    /// transition of the machine. Returning an error aborts the transition.
    fn enter(
        &mut self,
        _previous: Option<&dyn State<F>>,
        _context: &mut F::Context,
    ) -> Result<(), FsmError> {
        Ok(())
    }

    /// Called when the state stops being current.
    ///
    /// Must tolerate being called more than once.
    fn exit(&mut self, _context: &mut F::Context) {}

    /// Called on every update while the state is current.
    ///
    /// Returning `Some(key)` requests a transition, applied by the machine
    /// right after this call returns.
    fn update(
        &mut self,
        dt: f32,
        input: &F::Input,
        context: &mut F::Context,
    ) -> Result<Option<F::Key>, FsmError>;
}

//=== FsmError ============================================================

/// Fatal configuration errors raised by the state-machine layer.
///
/// Any of these aborts the transition that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FsmError {
    #[error("state {0} is already registered")]
    DuplicateState(String),

    #[error("state {0} is not registered")]
    UnknownState(String),

    #[error("state {state} rejected its parameters: {reason}")]
    InvalidParams { state: String, reason: String },

    #[error("state {state} requires animation clip {clip:?}, which is not loaded")]
    MissingAnimation { state: String, clip: String },

    #[error("state {state} failed to enter: {reason}")]
    EnterFailed { state: String, reason: String },
}
