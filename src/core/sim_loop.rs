//=========================================================================
// Simulation Loop
//=========================================================================
//
// Cooperative frame scheduler state.
//
// The host calls the world once per frame callback. The loop decides
// whether that callback does anything and how much time it covers:
//
//   advance(now) ─► stopped?  → None (no work, no next frame)
//                └► running   → Some(dt), dt = 0 on the first frame
//
// Modes start the loop on enter and stop it on exit.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use log::debug;

//=== FrameControl ========================================================

/// Whether the host should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Halt,
}

//=== SimulationLoop ======================================================

#[derive(Debug, Default)]
pub struct SimulationLoop {
    running: bool,
    previous: Option<Instant>,
}

impl SimulationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the loop. The next frame is a zero-length baseline.
    pub fn start(&mut self) {
        debug!("Simulation loop started");
        self.running = true;
        self.previous = None;
    }

    /// Sets the stop flag. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            debug!("Simulation loop stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds elapsed since the previous frame, or `None` once stopped.
    pub fn advance(&mut self, now: Instant) -> Option<f32> {
        if !self.running {
            return None;
        }

        let dt = self
            .previous
            .map_or(0.0, |previous| now.saturating_duration_since(previous).as_secs_f32());
        self.previous = Some(now);
        Some(dt)
    }

    pub fn control(&self) -> FrameControl {
        if self.running {
            FrameControl::Continue
        } else {
            FrameControl::Halt
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
