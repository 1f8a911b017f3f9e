//=========================================================================
// Platform Subsystem
//
// Hosts the world inside the Winit event loop.
//
// Architecture:
// ```text
//  Winit Event Loop (main thread)
//   │
//   ├─ KeyboardInput ──► input_processor ──► InputBuffer
//   │
//   ├─ Resized ──► world.resize (camera aspect)
//   │
//   ├─ RedrawRequested (frame boundary)
//   │    1. flush InputBuffer ──► channel ──► PlatformEvent::Inputs
//   │    2. world.frame(now)
//   │    3. Continue → request_redraw()   Halt → exit event loop
//   │
//   └─ CloseRequested ──► PlatformEvent::WindowClosed ──► last frame, exit
// ```
//
// The redraw callback is the only place the world runs, so frames never
// overlap and the next frame is only scheduled once the current one has
// finished. Input still crosses a channel: the world reads it through the
// same `EventCollector` it uses under test.
//
//=========================================================================

//=== Module Declarations =================================================

mod input_buffer;
mod input_processor;

//=== External Dependencies ===============================================

use std::time::Instant;

use crossbeam_channel::{Sender, TrySendError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::sim_loop::FrameControl;
use crate::core::world::World;
use input_buffer::InputBuffer;

//=== Constants ===========================================================

const WINDOW_TITLE: &str = "Stellar Folio";
const WINDOW_SIZE: (u32, u32) = (1280, 720);

//=== Platform ============================================================

/// Window owner and frame driver.
///
/// Must stay on the main thread (Winit requirement on macOS/iOS).
pub(crate) struct Platform {
    /// Created lazily in `resumed()`.
    window: Option<Window>,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    world: World,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// `world` must read from the receiving end of `event_sender`.
    pub fn new(event_sender: Sender<PlatformEvent>, world: World) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            buffer: InputBuffer::new(),
            event_sender,
            world,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes or the world halts.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        let result = event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution);

        self.world.shutdown();
        result
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends the input buffered since the last frame. Empty frames send
    /// nothing.
    fn flush_input_buffer(&mut self) {
        let Some(events) = self.buffer.drain() else {
            return;
        };
        let count = events.len();
        trace!(target: "platform::input", "Flushing {} input events", count);

        match self.event_sender.try_send(PlatformEvent::Inputs(events)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(target: "platform::input", "Channel full, dropping {} events", count);
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(target: "platform::input", "Channel disconnected, dropping {} events", count);
            }
        }
    }

    /// Runs one world frame and schedules the next one if it asks for it.
    fn run_frame(&mut self, event_loop: &ActiveEventLoop) {
        self.flush_input_buffer();

        match self.world.frame(Instant::now()) {
            FrameControl::Continue => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            FrameControl::Halt => {
                info!(target: "platform", "World halted, closing window");
                event_loop.exit();
            }
        }
    }

    /// Lets the world observe the close, then exits.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if self.event_sender.try_send(PlatformEvent::WindowClosed).is_ok() {
            self.world.frame(Instant::now());
        }
        self.world.shutdown();
        event_loop.exit();
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Resume after suspend keeps the existing window
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => window,
            Err(e) => {
                error!(target: "platform", "Cannot open window: {}", e);
                self.close(event_loop);
                return;
            }
        };

        let size = window.inner_size();
        info!(target: "platform", "Window open at {}x{} (scale {})", size.width, size.height, window.scale_factor());
        self.world.resize(size.width, size.height);

        // First frame
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match input_processor::process_key_event(key_event) {
                    Some(event) => self.buffer.push(event),
                    None => trace!(target: "platform::input", "Key event ignored"),
                }
            }

            WindowEvent::Resized(size) => self.world.resize(size.width, size.height),

            WindowEvent::RedrawRequested => self.run_frame(event_loop),

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
