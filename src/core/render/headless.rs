//=========================================================================
// Headless Renderer
//=========================================================================
//
// Deterministic in-memory rendering collaborator.
//
// Used as the default backend when no GPU backend is plugged in, and by
// tests that need fixed geometry and observable scene lifecycles.
//
// Architecture:
//   HeadlessBackend ─ create_scene() ─► HeadlessScene
//          │                                │
//          └──── Rc<RefCell<Vec<SceneEvent>>> (shared journal)
//
// Picking intersects the gaze ray with the bounding sphere of every
// visible in-scene sphere. Model loads complete on the first
// `poll_assets` after creation.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Affine3A;
use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::{
    AssetEvent, CameraView, Ray, RenderBackend, RenderError, RenderHandle, RenderableDesc,
    SceneRenderer,
};
use crate::core::animation::ClipWeight;

//=== SceneEvent ==========================================================

/// Lifecycle event recorded in the shared journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    SceneCreated(String),
    BodyCreated { scene: String, kind: &'static str },
    VisibilityChanged {
        scene: String,
        kind: &'static str,
        visible: bool,
    },
    FrameSubmitted(String),
    SceneCleared(String),
    SceneDisposed(String),
}

/// Journal shared between a backend and every scene it created.
pub type SceneJournal = Rc<RefCell<Vec<SceneEvent>>>;

//=== HeadlessBackend =====================================================

/// Creates [`HeadlessScene`]s that all report into one journal.
pub struct HeadlessBackend {
    journal: SceneJournal,
    model_clips: Result<Vec<String>, String>,
}

impl HeadlessBackend {
    /// Models load with `idle` and `fly` clips.
    pub fn new() -> Self {
        Self {
            journal: Rc::new(RefCell::new(Vec::new())),
            model_clips: Ok(vec!["idle".to_string(), "fly".to_string()]),
        }
    }

    /// Models load with the given clips instead.
    pub fn with_model_clips<I, S>(mut self, clips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model_clips = Ok(clips.into_iter().map(Into::into).collect());
        self
    }

    /// Every model load fails with `reason`.
    pub fn with_failing_models(mut self, reason: impl Into<String>) -> Self {
        self.model_clips = Err(reason.into());
        self
    }

    /// Handle on the shared journal.
    pub fn journal(&self) -> SceneJournal {
        Rc::clone(&self.journal)
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_scene(&mut self, label: &str) -> Result<Box<dyn SceneRenderer>, RenderError> {
        debug!("Creating headless scene {:?}", label);
        self.journal
            .borrow_mut()
            .push(SceneEvent::SceneCreated(label.to_string()));

        Ok(Box::new(HeadlessScene {
            label: label.to_string(),
            nodes: HashMap::new(),
            next_handle: 1,
            pending: Vec::new(),
            model_clips: self.model_clips.clone(),
            journal: Rc::clone(&self.journal),
            disposed: false,
        }))
    }
}

//=== HeadlessScene =======================================================

#[derive(Debug)]
struct Node {
    desc: RenderableDesc,
    transform: Affine3A,
    visible: bool,
    in_scene: bool,
}

/// In-memory scene.
pub struct HeadlessScene {
    label: String,
    nodes: HashMap<RenderHandle, Node>,
    next_handle: u64,
    pending: Vec<AssetEvent>,
    model_clips: Result<Vec<String>, String>,
    journal: SceneJournal,
    disposed: bool,
}

impl HeadlessScene {
    fn ensure_live(&self) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed(self.label.clone()));
        }
        Ok(())
    }

    fn record(&self, event: SceneEvent) {
        self.journal.borrow_mut().push(event);
    }

    /// Distance along `ray` to the sphere of `radius` centred at `center`.
    fn intersect_sphere(ray: &Ray, center: glam::Vec3, radius: f32) -> Option<f32> {
        let oc = ray.origin - center;
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        // Origin inside the sphere
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }
}

impl SceneRenderer for HeadlessScene {
    fn create_body(&mut self, desc: RenderableDesc) -> Result<RenderHandle, RenderError> {
        self.ensure_live()?;

        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;

        if matches!(desc, RenderableDesc::Model { .. }) {
            let event = match &self.model_clips {
                Ok(clips) => AssetEvent::ModelLoaded {
                    handle,
                    clips: clips.clone(),
                },
                Err(reason) => AssetEvent::LoadFailed {
                    handle,
                    reason: reason.clone(),
                },
            };
            self.pending.push(event);
        }

        self.record(SceneEvent::BodyCreated {
            scene: self.label.clone(),
            kind: desc.kind(),
        });

        self.nodes.insert(
            handle,
            Node {
                desc,
                transform: Affine3A::IDENTITY,
                visible: true,
                in_scene: false,
            },
        );
        Ok(handle)
    }

    fn add_to_scene(&mut self, handle: RenderHandle) -> Result<(), RenderError> {
        self.ensure_live()?;
        let node = self
            .nodes
            .get_mut(&handle)
            .ok_or(RenderError::UnknownHandle(handle))?;
        node.in_scene = true;
        Ok(())
    }

    fn set_transform(&mut self, handle: RenderHandle, transform: Affine3A) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.transform = transform;
        }
    }

    fn set_visible(&mut self, handle: RenderHandle, visible: bool) {
        let Some(node) = self.nodes.get_mut(&handle) else {
            return;
        };
        if node.visible == visible {
            return;
        }
        node.visible = visible;
        let kind = node.desc.kind();
        self.record(SceneEvent::VisibilityChanged {
            scene: self.label.clone(),
            kind,
            visible,
        });
    }

    fn set_animation(&mut self, handle: RenderHandle, weights: &[ClipWeight]) {
        if self.nodes.contains_key(&handle) {
            trace!("Scene {:?} animates {:?}: {:?}", self.label, handle, weights);
        }
    }

    fn poll_assets(&mut self) -> Vec<AssetEvent> {
        std::mem::take(&mut self.pending)
    }

    fn pick(&self, ray: &Ray) -> Option<RenderHandle> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.in_scene && node.visible)
            .filter_map(|(handle, node)| match node.desc {
                RenderableDesc::Sphere { radius, .. } => {
                    let center = node.transform.transform_point3(glam::Vec3::ZERO);
                    Self::intersect_sphere(ray, center, radius).map(|t| (t, *handle))
                }
                _ => None,
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, handle)| handle)
    }

    fn submit_frame(&mut self, camera: &CameraView) -> Result<(), RenderError> {
        self.ensure_live()?;
        trace!(
            "Scene {:?} frame from {:?} looking at {:?} (aspect {})",
            self.label,
            camera.position,
            camera.target,
            camera.aspect
        );
        self.record(SceneEvent::FrameSubmitted(self.label.clone()));
        Ok(())
    }

    fn remove_all(&mut self) {
        if self.disposed {
            return;
        }
        for node in self.nodes.values_mut() {
            node.in_scene = false;
        }
        self.record(SceneEvent::SceneCleared(self.label.clone()));
    }

    fn dispose(&mut self) {
        if self.disposed {
            warn!("Scene {:?} disposed twice, ignoring", self.label);
            return;
        }
        debug!(
            "Disposing scene {:?} ({} renderables)",
            self.label,
            self.nodes.len()
        );
        self.nodes.clear();
        self.pending.clear();
        self.disposed = true;
        self.record(SceneEvent::SceneDisposed(self.label.clone()));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TextureRef;
    use glam::Vec3;

    fn sphere(radius: f32) -> RenderableDesc {
        RenderableDesc::Sphere {
            radius,
            texture: TextureRef::new("test"),
            emissive: false,
        }
    }

    fn placed_sphere(scene: &mut dyn SceneRenderer, at: Vec3, radius: f32) -> RenderHandle {
        let handle = scene.create_body(sphere(radius)).unwrap();
        scene.add_to_scene(handle).unwrap();
        scene.set_transform(handle, Affine3A::from_translation(at));
        handle
    }

    //=====================================================================
    // Picking
    //=====================================================================

    #[test]
    fn pick_returns_nearest_hit() {
        let mut backend = HeadlessBackend::new();
        let mut scene = backend.create_scene("test").unwrap();

        let far = placed_sphere(scene.as_mut(), Vec3::new(0.0, 0.0, 50.0), 2.0);
        let near = placed_sphere(scene.as_mut(), Vec3::new(0.0, 0.0, 20.0), 2.0);

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(scene.pick(&ray), Some(near));

        scene.set_visible(near, false);
        assert_eq!(scene.pick(&ray), Some(far));
    }

    #[test]
    fn pick_ignores_spheres_behind_and_off_axis() {
        let mut backend = HeadlessBackend::new();
        let mut scene = backend.create_scene("test").unwrap();

        placed_sphere(scene.as_mut(), Vec3::new(0.0, 0.0, -20.0), 2.0);
        placed_sphere(scene.as_mut(), Vec3::new(10.0, 0.0, 20.0), 2.0);

        assert_eq!(scene.pick(&Ray::new(Vec3::ZERO, Vec3::Z)), None);
    }

    #[test]
    fn pick_ignores_bodies_not_in_scene() {
        let mut backend = HeadlessBackend::new();
        let mut scene = backend.create_scene("test").unwrap();

        let handle = scene.create_body(sphere(5.0)).unwrap();
        scene.set_transform(handle, Affine3A::from_translation(Vec3::new(0.0, 0.0, 10.0)));

        assert_eq!(scene.pick(&Ray::new(Vec3::ZERO, Vec3::Z)), None);
    }

    #[test]
    fn visibility_changes_are_journaled_once() {
        let mut backend = HeadlessBackend::new();
        let journal = backend.journal();
        let mut scene = backend.create_scene("space").unwrap();
        let exhaust = scene.create_body(RenderableDesc::Exhaust { particles: 8 }).unwrap();

        scene.set_visible(exhaust, true);
        scene.set_visible(exhaust, false);
        scene.set_visible(exhaust, false);
        scene.set_visible(RenderHandle(99), true);

        let changes: Vec<_> = journal
            .borrow()
            .iter()
            .filter(|event| matches!(event, SceneEvent::VisibilityChanged { .. }))
            .cloned()
            .collect();
        assert_eq!(
            changes,
            vec![SceneEvent::VisibilityChanged {
                scene: "space".into(),
                kind: "exhaust",
                visible: false,
            }]
        );
    }

    //=====================================================================
    // Assets
    //=====================================================================

    #[test]
    fn model_load_completes_on_next_poll() {
        let mut backend = HeadlessBackend::new().with_model_clips(["hover"]);
        let mut scene = backend.create_scene("test").unwrap();

        let handle = scene
            .create_body(RenderableDesc::Model { source: "ship.glb".into(), scale: 1.0 })
            .unwrap();

        assert_eq!(
            scene.poll_assets(),
            vec![AssetEvent::ModelLoaded { handle, clips: vec!["hover".into()] }]
        );
        assert!(scene.poll_assets().is_empty());
    }

    #[test]
    fn failing_models_report_load_failure() {
        let mut backend = HeadlessBackend::new().with_failing_models("missing file");
        let mut scene = backend.create_scene("test").unwrap();

        scene
            .create_body(RenderableDesc::Model { source: "ship.glb".into(), scale: 1.0 })
            .unwrap();

        assert!(matches!(
            scene.poll_assets().as_slice(),
            [AssetEvent::LoadFailed { reason, .. }] if reason == "missing file"
        ));
    }

    //=====================================================================
    // Lifecycle
    //=====================================================================

    #[test]
    fn dispose_is_idempotent_and_journaled_once() {
        let mut backend = HeadlessBackend::new();
        let journal = backend.journal();
        let mut scene = backend.create_scene("space").unwrap();

        scene.remove_all();
        scene.dispose();
        scene.dispose();
        scene.remove_all();

        assert_eq!(
            *journal.borrow(),
            vec![
                SceneEvent::SceneCreated("space".into()),
                SceneEvent::SceneCleared("space".into()),
                SceneEvent::SceneDisposed("space".into()),
            ]
        );
    }

    #[test]
    fn disposed_scene_rejects_work() {
        let mut backend = HeadlessBackend::new();
        let mut scene = backend.create_scene("space").unwrap();
        scene.dispose();

        assert!(matches!(scene.create_body(sphere(1.0)), Err(RenderError::Disposed(_))));

        let camera = CameraView {
            position: Vec3::ZERO,
            target: Vec3::Z,
            fov_degrees: 60.0,
            aspect: 1.0,
            near: 1.0,
            far: 100.0,
        };
        assert!(scene.submit_frame(&camera).is_err());
    }

    #[test]
    fn add_unknown_handle_fails() {
        let mut backend = HeadlessBackend::new();
        let mut scene = backend.create_scene("space").unwrap();

        assert_eq!(
            scene.add_to_scene(RenderHandle(99)),
            Err(RenderError::UnknownHandle(RenderHandle(99)))
        );
    }
}
