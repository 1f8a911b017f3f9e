//=========================================================================
// Event Collector
//=========================================================================
//
// World-side end of the platform channel.
//
//   Receiver<PlatformEvent> ──collect_frame()──► input batches of the frame
//                                            └─► TickControl::Exit on close
//
// Runs inside the frame callback, so it never waits: whatever is queued
// when the frame starts is taken (up to a per-frame cap) and the rest is
// left for the next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== Constants ===========================================================

/// Channel messages taken per frame at most.
const MAX_MESSAGES_PER_FRAME: usize = 100;

//=== TickControl =========================================================

/// Whether the platform is still there after draining the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

pub struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    frame_batches: Vec<Vec<InputEvent>>,
}

impl EventCollector {
    pub fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            frame_batches: Vec::new(),
        }
    }

    /// Replaces the previous frame's batches with what is queued now.
    ///
    /// Returns [`TickControl::Exit`] once the window has closed or the
    /// sending side is gone.
    pub fn collect_frame(&mut self) -> TickControl {
        self.frame_batches.clear();

        for _ in 0..MAX_MESSAGES_PER_FRAME {
            let message = match self.receiver.try_recv() {
                Ok(message) => message,
                Err(TryRecvError::Empty) => return TickControl::Continue,
                Err(TryRecvError::Disconnected) => {
                    debug!("Platform channel disconnected");
                    return TickControl::Exit;
                }
            };

            match message {
                PlatformEvent::Inputs(batch) if batch.is_empty() => {}
                PlatformEvent::Inputs(batch) => self.frame_batches.push(batch),
                PlatformEvent::WindowClosed => return TickControl::Exit,
            }
        }

        if !self.receiver.is_empty() {
            warn!(
                "{} platform messages left for the next frame",
                self.receiver.len()
            );
        }
        TickControl::Continue
    }

    /// Input batches of the current frame, oldest first.
    pub fn batches(&self) -> &[Vec<InputEvent>] {
        &self.frame_batches
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
