//=========================================================================
// World
//=========================================================================
//
// Per-frame driver tying platform events, input, and the mode machine
// together.
//
// Frame:
//   1. Drain platform events      (window closed → shutdown, Halt)
//   2. Sample input               (movement flags + discrete actions)
//   3. Apply actions              (Activate: land on the looked-at body,
//                                  Back: return to space; a switch drops
//                                  held movement)
//   4. Advance the frame loop     (stopped → Halt)
//   5. Update the current mode    (error → shutdown, Halt)
//
// Actions resolve against the pick result of the previous frame: that is
// what the overlay showed when the key went down.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Receiver;
use log::{debug, error, info, trace, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::apps::{AppKey, AppPayload, WorldAppManager, WorldServices};
use crate::core::config::{BodyDescriptor, ConfigError, ContentConfig, SunDescriptor, WorldSettings};
use crate::core::fsm::FsmError;
use crate::core::input::{InputSystem, KeyBindings, WorldAction};
use crate::core::platform_bridge::{EventCollector, PlatformEvent, TickControl};
use crate::core::sim_loop::FrameControl;

//=== WorldError ==========================================================

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("invalid content: {0}")]
    Config(#[from] ConfigError),

    #[error("mode machine failure: {0}")]
    Fsm(#[from] FsmError),
}

//=== World ===============================================================

pub struct World {
    collector: EventCollector,
    input: InputSystem,
    manager: WorldAppManager,
    services: WorldServices,
    content: ContentConfig,
    bodies: Arc<[BodyDescriptor]>,
}

impl World {
    /// Builds a world after validating `content` and `settings`. No mode is
    /// entered yet.
    pub fn new(
        content: ContentConfig,
        settings: Arc<WorldSettings>,
        bindings: KeyBindings,
        services: WorldServices,
        receiver: Receiver<PlatformEvent>,
    ) -> Result<Self, WorldError> {
        content.validate()?;
        settings.validate()?;
        let manager = WorldAppManager::with_default_apps(settings)?;
        let bodies: Arc<[BodyDescriptor]> = content.planets.clone().into();

        Ok(Self {
            collector: EventCollector::new(receiver),
            input: InputSystem::new(bindings),
            manager,
            services,
            content,
            bodies,
        })
    }

    //--- Lifecycle --------------------------------------------------------

    /// Enters space mode.
    pub fn start(&mut self) -> Result<(), WorldError> {
        info!("Starting world with {} bodies", self.bodies.len());
        self.manager
            .switch_app(AppKey::Space, self.space_payload(), &mut self.services)?;
        Ok(())
    }

    /// Exits the current mode. Idempotent.
    pub fn shutdown(&mut self) {
        self.manager.shutdown(&mut self.services);
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one frame at `now` and tells the host whether to schedule the
    /// next one.
    pub fn frame(&mut self, now: Instant) -> FrameControl {
        if self.collector.collect_frame() == TickControl::Exit {
            info!("Platform closed, shutting down world");
            self.shutdown();
            return FrameControl::Halt;
        }

        let mut frame = self.input.process_frame(self.collector.batches());

        let mut switched = false;
        for action in &frame.actions {
            match self.apply(*action) {
                Ok(applied) => switched |= applied,
                Err(e) => {
                    error!("Mode switch failed: {}", e);
                    self.shutdown();
                    return FrameControl::Halt;
                }
            }
        }
        // Keys held across a switch belong to the mode that was left
        if switched {
            frame.movement = self.input.movement();
        }

        let Some(dt) = self.services.frame_loop.advance(now) else {
            debug!("Frame loop stopped, no further frames");
            return FrameControl::Halt;
        };

        if let Err(e) = self.manager.update(dt, &frame.movement, &mut self.services) {
            error!("World update failed: {}", e);
            self.shutdown();
            return FrameControl::Halt;
        }

        self.services.frame_loop.control()
    }

    /// Returns whether the action switched modes.
    fn apply(&mut self, action: WorldAction) -> Result<bool, FsmError> {
        match (action, self.manager.current_app()) {
            (WorldAction::Activate, Some(AppKey::Space)) => {
                let Some(pick) = self.services.looked_at.clone() else {
                    debug!("Activate with nothing looked at");
                    return Ok(false);
                };
                let Some(content) = self.content.planet_content(&pick.label) else {
                    warn!("No content for {}", pick.label);
                    return Ok(false);
                };
                self.manager
                    .switch_app(AppKey::Planet, AppPayload::Planet(content), &mut self.services)?;
                self.input.reset();
                Ok(true)
            }
            (WorldAction::Back, Some(AppKey::Planet)) => {
                self.manager
                    .switch_app(AppKey::Space, self.space_payload(), &mut self.services)?;
                self.input.reset();
                Ok(true)
            }
            (action, mode) => {
                trace!("{:?} ignored in {:?}", action, mode);
                Ok(false)
            }
        }
    }

    fn space_payload(&self) -> AppPayload {
        AppPayload::Space {
            bodies: Arc::clone(&self.bodies),
            sun: self.sun().clone(),
        }
    }

    /// Records the viewport size in physical pixels. A zero dimension
    /// (minimized window) keeps the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            trace!("Ignoring degenerate viewport {}x{}", width, height);
            return;
        }
        self.services.aspect = width as f32 / height as f32;
        debug!("Viewport {}x{}, aspect {:.3}", width, height, self.services.aspect);
    }

    //--- Queries ----------------------------------------------------------

    pub fn current_app(&self) -> Option<AppKey> {
        self.manager.current_app()
    }

    /// Title of the body under the gaze ray, if any.
    pub fn looked_at(&self) -> Option<&str> {
        self.services.looked_at.as_ref().map(|pick| pick.label.as_str())
    }

    pub fn sun(&self) -> &SunDescriptor {
        &self.content.sun
    }

    pub fn is_running(&self) -> bool {
        self.services.frame_loop.is_running()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::apps::DEFAULT_ASPECT;
    use crate::core::config::{ContentSection, TextureRef};
    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::overlay::testing::{OverlayCall, RecordingOverlay};
    use crate::core::render::headless::{HeadlessBackend, SceneEvent, SceneJournal};
    use crossbeam_channel::{bounded, Sender};
    use std::time::Duration;

    //--- Test Helpers -----------------------------------------------------

    /// "Projects" sits on the gaze ray of the spawn camera.
    fn content() -> ContentConfig {
        ContentConfig {
            sun: SunDescriptor::default(),
            planets: vec![
                BodyDescriptor {
                    title: "Projects".into(),
                    texture: TextureRef::new("rock"),
                    size_factor: 0.4,
                    position_factor: 3.08,
                    revolution_speed_factor: 0.0,
                    rotation_speed_factor: 0.0005,
                    content_sections: vec![ContentSection {
                        section_title: "Engines".into(),
                        description: String::new(),
                        items: vec!["aetheric".into()],
                    }],
                },
                BodyDescriptor {
                    title: "About".into(),
                    texture: TextureRef::new("ice"),
                    size_factor: 0.25,
                    position_factor: 6.0,
                    revolution_speed_factor: 0.0,
                    rotation_speed_factor: 0.0005,
                    content_sections: vec![],
                },
            ],
        }
    }

    struct Harness {
        world: World,
        sender: Sender<PlatformEvent>,
        journal: SceneJournal,
        overlay: RecordingOverlay,
        clock: Instant,
    }

    impl Harness {
        fn new(backend: HeadlessBackend) -> Self {
            let journal = backend.journal();
            let overlay = RecordingOverlay::default();
            let services = WorldServices::new(Box::new(backend), Box::new(overlay.clone()));
            let (sender, receiver) = bounded(16);
            let mut world = World::new(
                content(),
                Arc::new(WorldSettings::default()),
                KeyBindings::default(),
                services,
                receiver,
            )
            .unwrap();
            world.start().unwrap();

            Self {
                world,
                sender,
                journal,
                overlay,
                clock: Instant::now(),
            }
        }

        fn send(&self, events: Vec<InputEvent>) {
            self.sender.send(PlatformEvent::Inputs(events)).unwrap();
        }

        fn tick(&mut self) -> FrameControl {
            self.clock += Duration::from_millis(16);
            self.world.frame(self.clock)
        }
    }

    /// Times the ship exhaust was switched on after journal entry `from`.
    fn exhaust_shown_since(harness: &Harness, from: usize) -> usize {
        let shown = SceneEvent::VisibilityChanged {
            scene: "space".into(),
            kind: "exhaust",
            visible: true,
        };
        harness.journal.borrow()[from..]
            .iter()
            .filter(|event| **event == shown)
            .count()
    }

    //=====================================================================
    // Mode Switching
    //=====================================================================

    #[test]
    fn starts_in_space() {
        let mut harness = Harness::new(HeadlessBackend::new());

        assert_eq!(harness.world.current_app(), Some(AppKey::Space));
        assert_eq!(harness.tick(), FrameControl::Continue);
        assert_eq!(harness.world.looked_at(), Some("Projects"));
    }

    #[test]
    fn activate_lands_on_looked_at_body() {
        let mut harness = Harness::new(HeadlessBackend::new());
        harness.tick();

        harness.send(vec![InputEvent::KeyDown(KeyCode::KeyE)]);
        assert_eq!(harness.tick(), FrameControl::Continue);

        assert_eq!(harness.world.current_app(), Some(AppKey::Planet));
        assert!(harness
            .overlay
            .calls
            .borrow()
            .contains(&OverlayCall::ShowContent("Projects".into())));
    }

    #[test]
    fn activate_with_nothing_looked_at_stays_in_space() {
        let mut harness = Harness::new(HeadlessBackend::new());

        // No frame has run yet, so nothing has been picked
        harness.send(vec![InputEvent::KeyDown(KeyCode::KeyE)]);
        harness.tick();

        assert_eq!(harness.world.current_app(), Some(AppKey::Space));
    }

    #[test]
    fn back_returns_to_space() {
        let mut harness = Harness::new(HeadlessBackend::new());
        harness.tick();
        harness.send(vec![InputEvent::KeyDown(KeyCode::KeyE)]);
        harness.tick();

        harness.send(vec![
            InputEvent::KeyUp(KeyCode::KeyE),
            InputEvent::KeyDown(KeyCode::Escape),
        ]);
        assert_eq!(harness.tick(), FrameControl::Continue);

        assert_eq!(harness.world.current_app(), Some(AppKey::Space));
        let spaces = harness
            .journal
            .borrow()
            .iter()
            .filter(|event| **event == SceneEvent::SceneCreated("space".into()))
            .count();
        assert_eq!(spaces, 2);
        assert!(harness.journal.borrow().contains(&SceneEvent::SceneDisposed("planet".into())));
    }

    #[test]
    fn back_in_space_is_ignored() {
        let mut harness = Harness::new(HeadlessBackend::new());
        harness.tick();
        let journal_len = harness.journal.borrow().len();

        harness.send(vec![InputEvent::KeyDown(KeyCode::Escape)]);
        harness.tick();

        assert_eq!(harness.world.current_app(), Some(AppKey::Space));
        let created_since = harness.journal.borrow()[journal_len..]
            .iter()
            .filter(|event| matches!(event, SceneEvent::SceneCreated(_)))
            .count();
        assert_eq!(created_since, 0);
    }

    #[test]
    fn movement_held_through_back_does_not_reach_space() {
        let mut harness = Harness::new(HeadlessBackend::new());
        harness.tick();
        harness.send(vec![InputEvent::KeyDown(KeyCode::KeyE)]);
        harness.tick();
        let landed_at = harness.journal.borrow().len();

        harness.send(vec![
            InputEvent::KeyUp(KeyCode::KeyE),
            InputEvent::KeyDown(KeyCode::KeyW),
            InputEvent::KeyDown(KeyCode::Escape),
        ]);
        harness.tick();
        harness.tick();

        assert_eq!(harness.world.current_app(), Some(AppKey::Space));
        assert_eq!(exhaust_shown_since(&harness, landed_at), 0);

        // A fresh press in space thrusts
        harness.send(vec![InputEvent::KeyDown(KeyCode::KeyW)]);
        harness.tick();
        assert_eq!(exhaust_shown_since(&harness, landed_at), 1);
    }

    #[test]
    fn resize_updates_aspect_and_ignores_minimize() {
        let mut harness = Harness::new(HeadlessBackend::new());
        assert_eq!(harness.world.services.aspect, DEFAULT_ASPECT);

        harness.world.resize(800, 400);
        assert_eq!(harness.world.services.aspect, 2.0);

        harness.world.resize(800, 0);
        assert_eq!(harness.world.services.aspect, 2.0);
    }

    //=====================================================================
    // Halting
    //=====================================================================

    #[test]
    fn window_close_halts_and_tears_down() {
        let mut harness = Harness::new(HeadlessBackend::new());
        harness.tick();

        harness.sender.send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(harness.tick(), FrameControl::Halt);
        assert_eq!(harness.world.current_app(), None);
        assert!(!harness.world.is_running());
        assert!(harness.journal.borrow().contains(&SceneEvent::SceneDisposed("space".into())));
    }

    #[test]
    fn dropped_sender_halts() {
        let Harness { mut world, sender, clock, .. } = Harness::new(HeadlessBackend::new());
        drop(sender);

        assert_eq!(world.frame(clock), FrameControl::Halt);
        assert_eq!(world.current_app(), None);
    }

    #[test]
    fn missing_animation_clip_is_fatal() {
        let mut harness = Harness::new(HeadlessBackend::new().with_model_clips(Vec::<String>::new()));

        assert_eq!(harness.tick(), FrameControl::Halt);
        assert_eq!(harness.world.current_app(), None);
        assert!(!harness.world.is_running());
    }

    #[test]
    fn invalid_content_is_rejected() {
        let mut broken = content();
        broken.planets[1].title = "Projects".into();
        let services = WorldServices::new(
            Box::new(HeadlessBackend::new()),
            Box::new(RecordingOverlay::default()),
        );
        let (_sender, receiver) = bounded(1);

        let result = World::new(
            broken,
            Arc::new(WorldSettings::default()),
            KeyBindings::default(),
            services,
            receiver,
        );

        assert!(matches!(result, Err(WorldError::Config(ConfigError::DuplicateTitle(_)))));
    }
}
