//=========================================================================
// Flight Controller
//=========================================================================
//
// Integrates sampled movement input into the ship's pose and drives its
// idle/fly behavior machine.
//
// Per update:
//   behavior machine (may cross-fade) → mixer.update(dt) → integrate(dt)
//
// Integration:
//   decay      = velocity ⊙ deceleration · dt   (z clamped to |velocity.z|)
//   velocity  += decay ± acceleration.z · dt    (forward / backward)
//   rotation  *= yaw(±4π · dt · acceleration.y) (left / right)
//   position  += forward · velocity.z · dt + sideways · velocity.x · dt
//
// Nothing moves until the ship model has loaded: the behavior machine has
// no state before its animation clips exist.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::PI;

use glam::{Affine3A, Quat, Vec3};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::flight_states::{flight_machine, FlightMode, FlightStates};
use crate::core::animation::{AnimationMixer, ClipWeight};
use crate::core::config::FlightTuning;
use crate::core::fsm::{FsmError, StateMachine};
use crate::core::input::MovementInput;

//=== FlightController ====================================================

pub struct FlightController {
    position: Vec3,
    velocity: Vec3,
    rotation: Quat,
    scale: f32,
    acceleration: Vec3,
    deceleration: Vec3,
    machine: StateMachine<FlightStates>,
    mixer: Option<AnimationMixer>,
}

impl FlightController {
    //--- Construction -----------------------------------------------------

    pub fn new(tuning: &FlightTuning) -> Result<Self, FsmError> {
        Ok(Self {
            position: tuning.spawn,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: tuning.model_scale,
            acceleration: tuning.acceleration,
            deceleration: tuning.deceleration,
            machine: flight_machine()?,
            mixer: None,
        })
    }

    /// Wires the loaded animation clips and enters `Idle`.
    ///
    /// Later notifications are ignored.
    ///
    /// # Errors
    ///
    /// [`FsmError::MissingAnimation`] if the model has no idle clip.
    pub fn on_model_loaded(&mut self, clips: &[String]) -> Result<(), FsmError> {
        if self.mixer.is_some() {
            warn!("Ship model reported loaded twice, ignoring");
            return Ok(());
        }

        debug!("Ship model loaded with clips {:?}", clips);
        let mixer = self.mixer.insert(AnimationMixer::from_clips(clips.iter().cloned()));
        self.machine.transition(FlightMode::Idle, (), mixer)?;
        Ok(())
    }

    //--- Simulation -------------------------------------------------------

    pub fn update(&mut self, dt: f32, input: &MovementInput) -> Result<(), FsmError> {
        let Some(mixer) = self.mixer.as_mut() else {
            return Ok(());
        };

        self.machine.update(dt, input, mixer)?;
        mixer.update(dt);

        self.integrate(dt, input);
        Ok(())
    }

    fn integrate(&mut self, dt: f32, input: &MovementInput) {
        let mut decay = self.velocity * self.deceleration * dt;
        // Damping may stop the ship, never reverse it
        decay.z = decay.z.abs().min(self.velocity.z.abs()).copysign(decay.z);
        self.velocity += decay;

        if input.forward {
            self.velocity.z += self.acceleration.z * dt;
        }
        if input.backward {
            self.velocity.z -= self.acceleration.z * dt;
        }

        let yaw = 4.0 * PI * dt * self.acceleration.y;
        if input.left {
            self.rotation *= Quat::from_rotation_y(yaw);
        }
        if input.right {
            self.rotation *= Quat::from_rotation_y(-yaw);
        }
        self.rotation = self.rotation.normalize();

        let forward = self.rotation * Vec3::Z;
        let sideways = self.rotation * Vec3::X;
        self.position += forward * (self.velocity.z * dt) + sideways * (self.velocity.x * dt);
    }

    //--- Queries ----------------------------------------------------------

    /// True once the model has loaded and the behavior machine runs.
    pub fn is_ready(&self) -> bool {
        self.mixer.is_some()
    }

    pub fn mode(&self) -> Option<FlightMode> {
        self.machine.current_key()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn transform(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.position,
        )
    }

    pub fn animation_weights(&self) -> Vec<ClipWeight> {
        self.mixer
            .as_ref()
            .map(AnimationMixer::weights)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
