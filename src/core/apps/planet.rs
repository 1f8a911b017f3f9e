//=========================================================================
// Planet Mode
//=========================================================================
//
// Landed view of one body: a displaced ground plane under a fixed tilted
// camera, with the body's content shown by the overlay.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use glam::{Affine3A, Quat, Vec3};
use log::{info, warn};

//=== Internal Dependencies ===============================================

use super::{enter_failed, AppKey, AppStates, WorldServices};
use crate::core::config::{PlanetContent, WorldSettings};
use crate::core::fsm::{FsmError, State};
use crate::core::input::MovementInput;
use crate::core::render::{AssetEvent, CameraView, RenderError, RenderableDesc, SceneRenderer};

//=== PlanetApp ===========================================================

pub struct PlanetApp {
    content: PlanetContent,
    settings: Arc<WorldSettings>,
    scene: Option<Box<dyn SceneRenderer>>,
}

impl PlanetApp {
    pub fn new(content: PlanetContent, settings: Arc<WorldSettings>) -> Self {
        Self {
            content,
            settings,
            scene: None,
        }
    }

    /// Fixed camera: default forward (-Z) pitched by the configured tilt.
    fn camera(&self, aspect: f32) -> CameraView {
        let landed = &self.settings.landed;
        let forward = Quat::from_rotation_x(landed.camera_tilt) * Vec3::NEG_Z;
        CameraView {
            position: landed.camera_position,
            target: landed.camera_position + forward,
            fov_degrees: landed.fov_degrees,
            aspect,
            near: landed.near,
            far: landed.far,
        }
    }

    fn populate(&self, scene: &mut dyn SceneRenderer) -> Result<(), RenderError> {
        let landed = &self.settings.landed;

        let ambient = scene.create_body(RenderableDesc::AmbientLight {
            intensity: landed.ambient_intensity,
        })?;
        scene.add_to_scene(ambient)?;

        let ground = scene.create_body(RenderableDesc::Ground {
            size: landed.ground_size,
            segments: landed.ground_segments,
            displacement: landed.ground_displacement,
            texture: self.content.texture.clone(),
        })?;
        scene.add_to_scene(ground)?;
        scene.set_transform(ground, Affine3A::IDENTITY);
        Ok(())
    }
}

//=== State Implementation ================================================

impl State<AppStates> for PlanetApp {
    fn key(&self) -> AppKey {
        AppKey::Planet
    }

    fn enter(
        &mut self,
        _previous: Option<&dyn State<AppStates>>,
        services: &mut WorldServices,
    ) -> Result<(), FsmError> {
        info!("Landing on {}", self.content.title);

        let mut scene = services
            .backend
            .create_scene("planet")
            .map_err(|e| enter_failed(AppKey::Planet, e))?;

        if let Err(e) = self.populate(scene.as_mut()) {
            scene.dispose();
            return Err(enter_failed(AppKey::Planet, e));
        }
        self.scene = Some(scene);

        services.overlay.show_content(&self.content);
        services.overlay.set_back_hint(true);
        services.frame_loop.start();
        Ok(())
    }

    fn exit(&mut self, services: &mut WorldServices) {
        let Some(mut scene) = self.scene.take() else {
            return;
        };

        services.frame_loop.stop();
        scene.remove_all();
        scene.dispose();

        services.overlay.hide_content();
        services.overlay.set_back_hint(false);
        info!("Left {}", self.content.title);
    }

    fn update(
        &mut self,
        _dt: f32,
        _input: &MovementInput,
        services: &mut WorldServices,
    ) -> Result<Option<AppKey>, FsmError> {
        let camera = self.camera(services.aspect);
        let Some(scene) = self.scene.as_mut() else {
            return Ok(None);
        };

        for event in scene.poll_assets() {
            if let AssetEvent::LoadFailed { handle, reason } = event {
                warn!("Asset {:?} failed to load: {}", handle, reason);
            }
        }

        if let Err(e) = scene.submit_frame(&camera) {
            warn!("Planet frame dropped: {}", e);
        }
        Ok(None)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
