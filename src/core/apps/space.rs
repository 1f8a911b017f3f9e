//=========================================================================
// Space Mode
//=========================================================================
//
// Free flight among the orbiting bodies.
//
// Enter:  scene ← ambient, sun (+ light, label), bodies (+ labels), ship
//         (+ hidden exhaust)
//         picker ← one entry per body
//         overlay ← controls hint; frame loop started
//
// Update: assets → ship (+ exhaust while thrusting) → camera → sun →
//         bodies → picker → submit frame
//
// Exit:   frame loop stopped, picker cleared, scene cleared and disposed,
//         overlay hints hidden. Safe to call repeatedly.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use glam::{Affine3A, Vec3};
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::{enter_failed, AppKey, AppStates, WorldServices};
use crate::core::config::{BodyDescriptor, SunDescriptor, WorldSettings};
use crate::core::entities::{
    label_transform, BodyId, FlightController, FollowCamera, OrbitalBody, Sun,
};
use crate::core::fsm::{FsmError, State};
use crate::core::input::MovementInput;
use crate::core::picker::InteractionPicker;
use crate::core::render::{AssetEvent, RenderError, RenderHandle, RenderableDesc, SceneRenderer};

//=== Constants ===========================================================

/// Label height above a body, in body radii.
const LABEL_HEIGHT: f32 = 1.5;

/// Label text size, in body radii.
const LABEL_SIZE: f32 = 0.25;

const SUN_LIGHT_INTENSITY: f32 = 5.0;
const SUN_LIGHT_RANGE: f32 = 500.0;

/// Exhaust emitter position behind the engines, in ship space.
const EXHAUST_OFFSET: Vec3 = Vec3::new(1.0, 0.0, -2.5);
const EXHAUST_PARTICLES: u32 = 500;

//=== Scene Graph =========================================================

struct PlacedBody {
    body: OrbitalBody,
    handle: RenderHandle,
    label: RenderHandle,
}

struct PlacedSun {
    sun: Sun,
    handle: RenderHandle,
    label: RenderHandle,
}

/// Everything space mode owns besides the scene itself.
struct SpaceGraph {
    sun: PlacedSun,
    bodies: Vec<PlacedBody>,
    ship: FlightController,
    ship_handle: RenderHandle,
    exhaust: RenderHandle,
    camera: FollowCamera,
    picker: InteractionPicker,
}

//=== SpaceApp ============================================================

pub struct SpaceApp {
    descriptors: Arc<[BodyDescriptor]>,
    sun: SunDescriptor,
    settings: Arc<WorldSettings>,
    scene: Option<Box<dyn SceneRenderer>>,
    graph: Option<SpaceGraph>,
}

impl SpaceApp {
    pub fn new(
        descriptors: Arc<[BodyDescriptor]>,
        sun: SunDescriptor,
        settings: Arc<WorldSettings>,
    ) -> Self {
        Self {
            descriptors,
            sun,
            settings,
            scene: None,
            graph: None,
        }
    }

    /// Number of bodies the picker can resolve.
    pub fn registered_bodies(&self) -> usize {
        self.graph.as_ref().map_or(0, |graph| graph.picker.len())
    }

    pub fn ship(&self) -> Option<&FlightController> {
        self.graph.as_ref().map(|graph| &graph.ship)
    }

    //--- Construction -----------------------------------------------------

    fn spawn(
        scene: &mut dyn SceneRenderer,
        desc: RenderableDesc,
    ) -> Result<RenderHandle, RenderError> {
        let handle = scene.create_body(desc)?;
        scene.add_to_scene(handle)?;
        Ok(handle)
    }

    fn populate(&self, scene: &mut dyn SceneRenderer) -> Result<SpaceGraph, FsmError> {
        let settings = &*self.settings;
        let unit = settings.sun_radius;
        let failed = |e: RenderError| enter_failed(AppKey::Space, e);

        Self::spawn(
            scene,
            RenderableDesc::AmbientLight {
                intensity: settings.ambient_intensity,
            },
        )
        .map_err(failed)?;

        //--- Sun ----------------------------------------------------------

        let sun = Sun::new(self.sun.title.clone(), unit, settings.sun_spin);
        let sun_handle = Self::spawn(
            scene,
            RenderableDesc::Sphere {
                radius: unit,
                texture: self.sun.texture.clone(),
                emissive: true,
            },
        )
        .map_err(failed)?;
        Self::spawn(
            scene,
            RenderableDesc::PointLight {
                intensity: SUN_LIGHT_INTENSITY,
                range: SUN_LIGHT_RANGE,
            },
        )
        .map_err(failed)?;
        let sun_label = Self::spawn(
            scene,
            RenderableDesc::Label {
                text: sun.title().to_string(),
                size: unit * LABEL_SIZE,
            },
        )
        .map_err(failed)?;

        //--- Bodies -------------------------------------------------------

        let mut picker = InteractionPicker::new();
        let mut bodies = Vec::with_capacity(self.descriptors.len());

        for (index, desc) in self.descriptors.iter().enumerate() {
            let body = OrbitalBody::from_descriptor(BodyId(index as u32), desc, unit);

            let handle = Self::spawn(
                scene,
                RenderableDesc::Sphere {
                    radius: body.radius(),
                    texture: desc.texture.clone(),
                    emissive: false,
                },
            )
            .map_err(failed)?;
            scene.set_transform(handle, body.world_transform());

            let label = Self::spawn(
                scene,
                RenderableDesc::Label {
                    text: desc.title.clone(),
                    size: body.radius() * LABEL_SIZE,
                },
            )
            .map_err(failed)?;

            if !picker.register(handle, body.id(), desc.title.clone()) {
                return Err(FsmError::EnterFailed {
                    state: "Space".to_string(),
                    reason: format!("renderer reused handle {:?}", handle),
                });
            }

            bodies.push(PlacedBody { body, handle, label });
        }

        //--- Ship ---------------------------------------------------------

        let ship = FlightController::new(&settings.flight)?;
        let ship_handle = Self::spawn(
            scene,
            RenderableDesc::Model {
                source: settings.flight.model_source.clone(),
                scale: settings.flight.model_scale,
            },
        )
        .map_err(failed)?;
        scene.set_transform(ship_handle, ship.transform());

        let exhaust = Self::spawn(
            scene,
            RenderableDesc::Exhaust {
                particles: EXHAUST_PARTICLES,
            },
        )
        .map_err(failed)?;
        scene.set_visible(exhaust, false);

        Ok(SpaceGraph {
            sun: PlacedSun {
                sun,
                handle: sun_handle,
                label: sun_label,
            },
            bodies,
            ship,
            ship_handle,
            exhaust,
            camera: FollowCamera::new(settings.camera.clone()),
            picker,
        })
    }
}

//=== State Implementation ================================================

impl State<AppStates> for SpaceApp {
    fn key(&self) -> AppKey {
        AppKey::Space
    }

    fn enter(
        &mut self,
        previous: Option<&dyn State<AppStates>>,
        services: &mut WorldServices,
    ) -> Result<(), FsmError> {
        info!(
            "Entering space with {} bodies (from {:?})",
            self.descriptors.len(),
            previous.map(|state| state.key())
        );

        let mut scene = services
            .backend
            .create_scene("space")
            .map_err(|e| enter_failed(AppKey::Space, e))?;

        let graph = match self.populate(scene.as_mut()) {
            Ok(graph) => graph,
            Err(e) => {
                scene.dispose();
                return Err(e);
            }
        };

        debug!("Space scene populated, {} bodies pickable", graph.picker.len());
        self.scene = Some(scene);
        self.graph = Some(graph);

        services.overlay.set_controls_hint(true);
        services.frame_loop.start();
        Ok(())
    }

    fn exit(&mut self, services: &mut WorldServices) {
        let Some(mut scene) = self.scene.take() else {
            return;
        };

        services.frame_loop.stop();
        if let Some(mut graph) = self.graph.take() {
            graph.picker.clear();
        }
        scene.remove_all();
        scene.dispose();

        services.looked_at = None;
        services.overlay.set_looked_at(None);
        services.overlay.set_controls_hint(false);
        info!("Left space");
    }

    fn update(
        &mut self,
        dt: f32,
        input: &MovementInput,
        services: &mut WorldServices,
    ) -> Result<Option<AppKey>, FsmError> {
        let (Some(scene), Some(graph)) = (self.scene.as_mut(), self.graph.as_mut()) else {
            return Ok(None);
        };

        //--- Assets -------------------------------------------------------

        for event in scene.poll_assets() {
            match event {
                AssetEvent::ModelLoaded { handle, clips } if handle == graph.ship_handle => {
                    graph.ship.on_model_loaded(&clips)?;
                }
                AssetEvent::ModelLoaded { handle, .. } => {
                    trace!("Ignoring load of unrelated model {:?}", handle);
                }
                AssetEvent::LoadFailed { handle, reason } => {
                    warn!("Asset {:?} failed to load: {}", handle, reason);
                }
            }
        }

        //--- Ship & Camera ------------------------------------------------

        graph.ship.update(dt, input)?;
        scene.set_transform(graph.ship_handle, graph.ship.transform());
        scene.set_animation(graph.ship_handle, &graph.ship.animation_weights());

        // Engines fire only once the ship exists and thrust is held
        scene.set_transform(
            graph.exhaust,
            graph.ship.transform() * Affine3A::from_translation(EXHAUST_OFFSET),
        );
        scene.set_visible(graph.exhaust, graph.ship.is_ready() && input.thrusting());

        let ship_position = graph.ship.position();
        graph.camera.update(dt, ship_position, graph.ship.rotation());

        //--- Sun & Bodies -------------------------------------------------

        let placed_sun = &mut graph.sun;
        placed_sun.sun.update();
        scene.set_transform(placed_sun.handle, placed_sun.sun.world_transform());
        scene.set_transform(
            placed_sun.label,
            label_transform(
                placed_sun.sun.position(),
                placed_sun.sun.radius() * LABEL_HEIGHT,
                ship_position,
            ),
        );

        for placed in &mut graph.bodies {
            placed.body.update();
            scene.set_transform(placed.handle, placed.body.world_transform());
            scene.set_transform(
                placed.label,
                label_transform(
                    placed.body.world_position(),
                    placed.body.radius() * LABEL_HEIGHT,
                    ship_position,
                ),
            );
        }

        //--- Picking ------------------------------------------------------

        let pick = graph.picker.pick(&**scene, &graph.camera.ray());
        let changed = pick.as_ref().map(|p| p.body) != services.looked_at.as_ref().map(|p| p.body);
        if changed {
            services
                .overlay
                .set_looked_at(pick.as_ref().map(|p| p.label.as_str()));
        }
        services.looked_at = pick;

        //--- Render -------------------------------------------------------

        if let Err(e) = scene.submit_frame(&graph.camera.view(services.aspect)) {
            warn!("Space frame dropped: {}", e);
        }

        Ok(None)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
