//=========================================================================
// Stellar Folio Engine
//
// Main entry point: configures the world and hands it to the platform.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(content)──>  Engine  ──run()──>  [Event Loop]
//         │                                 │
//         ├─ with_settings()                ├─ enters Space mode
//         ├─ with_bindings()                └─ runs platform on this thread
//         ├─ with_backend()                    until the window closes
//         ├─ with_overlay()
//         └─ with_channel_capacity()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::info;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::apps::WorldServices;
use crate::core::config::{ContentConfig, WorldSettings};
use crate::core::input::KeyBindings;
use crate::core::overlay::{LogOverlay, Overlay};
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::render::headless::HeadlessBackend;
use crate::core::render::RenderBackend;
use crate::core::world::{World, WorldError};
use crate::platform::Platform;

//=== EngineError =========================================================

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Settings**: [`WorldSettings::default`]
/// - **Bindings**: W/S/A/D move, E lands, Escape returns to space
/// - **Backend**: headless scene graph
/// - **Overlay**: [`LogOverlay`]
/// - **Channel capacity**: 128 events
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use stellar_folio::EngineBuilder;
/// use stellar_folio::core::config::ContentConfig;
///
/// let content = ContentConfig::load(Path::new("content.json"))?;
/// EngineBuilder::new()
///     .with_channel_capacity(256)
///     .build(content)?
///     .run()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EngineBuilder {
    settings: WorldSettings,
    bindings: KeyBindings,
    channel_capacity: usize,
    backend: Option<Box<dyn RenderBackend>>,
    overlay: Option<Box<dyn Overlay>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            settings: WorldSettings::default(),
            bindings: KeyBindings::default(),
            channel_capacity: 128,
            backend: None,
            overlay: None,
        }
    }

    pub fn with_settings(mut self, settings: WorldSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Sets the channel capacity for platform → world communication.
    ///
    /// One message is sent per frame at most, so small values suffice.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Renderer the modes build their scenes with.
    pub fn with_backend(mut self, backend: Box<dyn RenderBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// UI surface for hints and content panels.
    pub fn with_overlay(mut self, overlay: Box<dyn Overlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Validates `content` and builds the world. No mode is entered until
    /// [`Engine::run`].
    pub fn build(self, content: ContentConfig) -> Result<Engine, EngineError> {
        info!(
            "Building engine ({} bodies, channel: {})",
            content.planets.len(),
            self.channel_capacity
        );

        let (sender, receiver): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        let backend = self
            .backend
            .unwrap_or_else(|| Box::new(HeadlessBackend::new()));
        let overlay = self.overlay.unwrap_or_else(|| Box::new(LogOverlay::new()));

        let world = World::new(
            content,
            Arc::new(self.settings),
            self.bindings,
            WorldServices::new(backend, overlay),
            receiver,
        )?;

        Ok(Engine { world, sender })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Stellar Folio runtime. Create via [`EngineBuilder`].
pub struct Engine {
    world: World,
    sender: Sender<PlatformEvent>,
}

impl Engine {
    /// Enters Space mode and runs the event loop on the calling thread
    /// until the window closes or the world halts.
    ///
    /// # Errors
    ///
    /// Fails if Space mode cannot be entered or the event loop cannot be
    /// created.
    pub fn run(mut self) -> Result<(), EngineError> {
        self.world.start()?;

        info!("Platform initialized, entering event loop");
        Platform::new(self.sender, self.world).run()?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
