//=========================================================================
// Application Modes
//=========================================================================
//
// Top-level state machine switching between free flight in space and the
// landed content view.
//
// Architecture:
//   WorldAppManager
//     └─ StateMachine<AppStates>
//          ├─ Space  → SpaceApp  (sun, orbital bodies, ship, camera, picker)
//          └─ Planet → PlanetApp (ground, fixed camera, content panel)
//
// Every mode builds its whole scene on enter and disposes it on exit, so
// nothing outlives the mode that created it. Modes share one
// `WorldServices` context: the render backend, the overlay, the frame loop
// and the current pick result.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::config::{BodyDescriptor, PlanetContent, SunDescriptor, WorldSettings};
use crate::core::fsm::{FsmError, State, StateFamily, StateKey, StateMachine, TransitionOutcome};
use crate::core::input::MovementInput;
use crate::core::overlay::Overlay;
use crate::core::picker::PickResult;
use crate::core::render::{RenderBackend, RenderError};
use crate::core::sim_loop::SimulationLoop;

//=== Module Declarations =================================================

mod planet;
mod space;

//=== Public API ==========================================================

pub use planet::PlanetApp;
pub use space::SpaceApp;

//=== AppKey ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppKey {
    Space,
    Planet,
}

impl StateKey for AppKey {}

//=== AppPayload ==========================================================

/// Parameters handed to a mode when switching to it.
#[derive(Debug, Clone, PartialEq)]
pub enum AppPayload {
    /// Every body of the system, in configuration order.
    Space {
        bodies: Arc<[BodyDescriptor]>,
        sun: SunDescriptor,
    },

    /// The body being landed on.
    Planet(PlanetContent),
}

//=== WorldServices =======================================================

/// Aspect of the default 1280x720 window, used until the host reports one.
pub const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

/// Capabilities shared by every mode.
pub struct WorldServices {
    pub backend: Box<dyn RenderBackend>,
    pub overlay: Box<dyn Overlay>,
    pub frame_loop: SimulationLoop,
    /// Body under the gaze ray this frame, maintained by space mode.
    pub looked_at: Option<PickResult>,
    /// Viewport width over height, kept current by the host.
    pub aspect: f32,
}

impl WorldServices {
    pub fn new(backend: Box<dyn RenderBackend>, overlay: Box<dyn Overlay>) -> Self {
        Self {
            backend,
            overlay,
            frame_loop: SimulationLoop::new(),
            looked_at: None,
            aspect: DEFAULT_ASPECT,
        }
    }
}

//=== AppStates ===========================================================

/// Type family of the mode machine.
pub struct AppStates;

impl StateFamily for AppStates {
    type Key = AppKey;
    type Context = WorldServices;
    type Input = MovementInput;
    type Params = AppPayload;
}

/// Maps a render failure during mode construction to a failed enter.
pub(crate) fn enter_failed(mode: AppKey, error: RenderError) -> FsmError {
    FsmError::EnterFailed {
        state: format!("{:?}", mode),
        reason: error.to_string(),
    }
}

//=== WorldAppManager =====================================================

/// Owns the mode machine.
pub struct WorldAppManager {
    machine: StateMachine<AppStates>,
}

impl WorldAppManager {
    /// Manager with no modes registered.
    pub fn new() -> Self {
        Self {
            machine: StateMachine::new(),
        }
    }

    /// Manager with space and landed modes registered.
    pub fn with_default_apps(settings: Arc<WorldSettings>) -> Result<Self, FsmError> {
        let mut manager = Self::new();

        let space_settings = Arc::clone(&settings);
        manager.add_app(AppKey::Space, move |payload| match payload {
            AppPayload::Space { bodies, sun } => Ok(Box::new(SpaceApp::new(
                bodies,
                sun,
                Arc::clone(&space_settings),
            )) as Box<dyn State<AppStates>>),
            AppPayload::Planet(_) => Err(FsmError::InvalidParams {
                state: "Space".to_string(),
                reason: "expected body descriptors".to_string(),
            }),
        })?;

        let planet_settings = settings;
        manager.add_app(AppKey::Planet, move |payload| match payload {
            AppPayload::Planet(content) => Ok(Box::new(PlanetApp::new(
                content,
                Arc::clone(&planet_settings),
            )) as Box<dyn State<AppStates>>),
            AppPayload::Space { .. } => Err(FsmError::InvalidParams {
                state: "Planet".to_string(),
                reason: "expected planet content".to_string(),
            }),
        })?;

        Ok(manager)
    }

    //--- Registration -----------------------------------------------------

    pub fn add_app<T>(&mut self, key: AppKey, factory: T) -> Result<(), FsmError>
    where
        T: Fn(AppPayload) -> Result<Box<dyn State<AppStates>>, FsmError> + 'static,
    {
        self.machine.register(key, factory)
    }

    //--- Switching --------------------------------------------------------

    /// Exits the current mode and enters `key` built from `payload`.
    ///
    /// Switching to the current mode does nothing.
    pub fn switch_app(
        &mut self,
        key: AppKey,
        payload: AppPayload,
        services: &mut WorldServices,
    ) -> Result<TransitionOutcome, FsmError> {
        let outcome = self.machine.transition(key, payload, services)?;
        if outcome == TransitionOutcome::Entered {
            info!("Switched to {:?} mode", key);
        }
        Ok(outcome)
    }

    pub fn current_app(&self) -> Option<AppKey> {
        self.machine.current_key()
    }

    pub fn current(&self) -> Option<&dyn State<AppStates>> {
        self.machine.current()
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates the current mode.
    pub fn update(
        &mut self,
        dt: f32,
        input: &MovementInput,
        services: &mut WorldServices,
    ) -> Result<(), FsmError> {
        // Mode switches carry payloads, so they only happen through switch_app
        if let Some(requested) = self.machine.dispatch(dt, input, services)? {
            warn!("Mode {:?} requested a switch to {:?} without a payload", self.current_app(), requested);
        }
        Ok(())
    }

    /// Exits the current mode, if any. Idempotent.
    pub fn shutdown(&mut self, services: &mut WorldServices) {
        self.machine.shutdown(services);
    }
}

impl Default for WorldAppManager {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
