//=========================================================================
// Flight Behavior States
//=========================================================================
//
// Idle / fly machine embedded in every flight controller.
//
// Transitions:
//   idle ──(forward or backward held)──► fly
//   fly  ──(neither held)──────────────► idle
//
// Entering a state cross-fades the animation of the state being left into
// its own clip. The first state ever entered just starts playing.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::animation::AnimationMixer;
use crate::core::fsm::{FsmError, State, StateFamily, StateKey, StateMachine};
use crate::core::input::MovementInput;

//=== Constants ===========================================================

/// Duration of the blend between behavior animations, in seconds.
pub const CROSS_FADE_SECONDS: f32 = 0.5;

//=== FlightMode ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightMode {
    Idle,
    Fly,
}

impl StateKey for FlightMode {}

impl FlightMode {
    /// Animation clip played while in this mode.
    pub fn clip(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fly => "fly",
        }
    }
}

//=== FlightStates ========================================================

/// Type family of the behavior machine.
pub struct FlightStates;

impl StateFamily for FlightStates {
    type Key = FlightMode;
    type Context = AnimationMixer;
    type Input = MovementInput;
    type Params = ();
}

//--- Shared Enter ---------------------------------------------------------

fn blend_into(
    mode: FlightMode,
    previous: Option<&dyn State<FlightStates>>,
    mixer: &mut AnimationMixer,
) -> Result<(), FsmError> {
    let clip = mode.clip();
    if !mixer.has_clip(clip) {
        return Err(FsmError::MissingAnimation {
            state: format!("{:?}", mode),
            clip: clip.to_string(),
        });
    }

    match previous {
        Some(previous) => {
            mixer.cross_fade(previous.key().clip(), clip, CROSS_FADE_SECONDS);
        }
        None => {
            mixer.play(clip);
        }
    }
    Ok(())
}

//=== IdleState ===========================================================

#[derive(Debug, Default)]
pub struct IdleState;

impl State<FlightStates> for IdleState {
    fn key(&self) -> FlightMode {
        FlightMode::Idle
    }

    fn enter(
        &mut self,
        previous: Option<&dyn State<FlightStates>>,
        mixer: &mut AnimationMixer,
    ) -> Result<(), FsmError> {
        blend_into(FlightMode::Idle, previous, mixer)
    }

    fn update(
        &mut self,
        _dt: f32,
        input: &MovementInput,
        _mixer: &mut AnimationMixer,
    ) -> Result<Option<FlightMode>, FsmError> {
        if input.thrusting() {
            trace!("Thrust engaged");
            return Ok(Some(FlightMode::Fly));
        }
        Ok(None)
    }
}

//=== FlyState ============================================================

#[derive(Debug, Default)]
pub struct FlyState;

impl State<FlightStates> for FlyState {
    fn key(&self) -> FlightMode {
        FlightMode::Fly
    }

    fn enter(
        &mut self,
        previous: Option<&dyn State<FlightStates>>,
        mixer: &mut AnimationMixer,
    ) -> Result<(), FsmError> {
        blend_into(FlightMode::Fly, previous, mixer)
    }

    fn update(
        &mut self,
        _dt: f32,
        input: &MovementInput,
        _mixer: &mut AnimationMixer,
    ) -> Result<Option<FlightMode>, FsmError> {
        if !input.thrusting() {
            trace!("Thrust released");
            return Ok(Some(FlightMode::Idle));
        }
        Ok(None)
    }
}

//=== Construction ========================================================

/// Behavior machine with both states registered and none current.
pub fn flight_machine() -> Result<StateMachine<FlightStates>, FsmError> {
    let mut machine = StateMachine::new();
    machine.register(FlightMode::Idle, |()| Ok(Box::new(IdleState) as Box<dyn State<_>>))?;
    machine.register(FlightMode::Fly, |()| Ok(Box::new(FlyState) as Box<dyn State<_>>))?;
    Ok(machine)
}

//=========================================================================
// Unit Tests
//=========================================================================
