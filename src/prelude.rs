//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stellar_folio::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Configuration
pub use crate::core::config::{BodyDescriptor, ConfigError, ContentConfig, WorldSettings};

// Modes and world
pub use crate::core::apps::{AppKey, WorldAppManager};
pub use crate::core::world::{World, WorldError};

// State machine
pub use crate::core::fsm::{FsmError, State, StateFamily, StateKey, StateMachine};

// Input
pub use crate::core::input::{Binding, Direction, KeyBindings, KeyCode, MovementInput, WorldAction};

// Collaborators
pub use crate::core::overlay::{LogOverlay, Overlay};
pub use crate::core::render::{RenderBackend, SceneRenderer};
