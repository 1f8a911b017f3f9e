//=========================================================================
// Rendering Collaborator Contract
//=========================================================================
//
// The only surface through which the world touches graphics resources.
//
// Architecture:
//   RenderBackend::create_scene() → Box<dyn SceneRenderer>
//     ├─ create_body(desc) → RenderHandle
//     ├─ add_to_scene / set_transform / set_visible / set_animation
//     ├─ poll_assets()     → AssetEvent (asynchronous load completion)
//     ├─ pick(ray)         → nearest RenderHandle
//     ├─ submit_frame(camera)
//     └─ remove_all() / dispose()
//
// A mode owns exactly one scene for its lifetime and disposes it on exit.
// Meshes, materials, textures and fonts never leave the backend.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Affine3A, Vec3};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::animation::ClipWeight;
use crate::core::config::TextureRef;

//=== Module Declarations =================================================

pub mod headless;

//=== RenderHandle ========================================================

/// Opaque identity of one renderable inside a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(pub u64);

//=== RenderableDesc ======================================================

/// What the backend should build for a `create_body` call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderableDesc {
    /// Textured sphere. Emissive spheres ignore scene lighting.
    Sphere {
        radius: f32,
        texture: TextureRef,
        emissive: bool,
    },

    /// Flat 3D text.
    Label { text: String, size: f32 },

    /// Square plane with random vertex displacement.
    Ground {
        size: f32,
        segments: u32,
        displacement: f32,
        texture: TextureRef,
    },

    /// Animated model loaded asynchronously. Completion is reported
    /// through [`SceneRenderer::poll_assets`].
    Model { source: String, scale: f32 },

    /// Engine exhaust particles. The backend animates the particles; the
    /// world only places the emitter and toggles it.
    Exhaust { particles: u32 },

    PointLight { intensity: f32, range: f32 },

    AmbientLight { intensity: f32 },
}

impl RenderableDesc {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Label { .. } => "label",
            Self::Ground { .. } => "ground",
            Self::Model { .. } => "model",
            Self::Exhaust { .. } => "exhaust",
            Self::PointLight { .. } => "point-light",
            Self::AmbientLight { .. } => "ambient-light",
        }
    }
}

//=== Ray =================================================================

/// Half-line used for gaze picking. `direction` is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Builds a ray, normalizing `direction`. A zero direction falls back
    /// to +Z.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::Z),
        }
    }

    /// Ray from `origin` through `target`.
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }
}

//=== CameraView ==========================================================

/// Perspective camera pose for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    /// Viewport width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

//=== AssetEvent ==========================================================

/// Completion notice for an asynchronously loaded asset.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetEvent {
    ModelLoaded {
        handle: RenderHandle,
        clips: Vec<String>,
    },
    LoadFailed {
        handle: RenderHandle,
        reason: String,
    },
}

//=== RenderError =========================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("scene {0:?} has been disposed")]
    Disposed(String),

    #[error("unknown render handle {0:?}")]
    UnknownHandle(RenderHandle),

    #[error("render backend failure: {0}")]
    Backend(String),
}

//=== SceneRenderer =======================================================

/// One scene owned by one mode.
pub trait SceneRenderer {
    /// Builds a renderable. It is not visible until added to the scene.
    fn create_body(&mut self, desc: RenderableDesc) -> Result<RenderHandle, RenderError>;

    fn add_to_scene(&mut self, handle: RenderHandle) -> Result<(), RenderError>;

    /// Sets the world transform. Unknown handles are ignored.
    fn set_transform(&mut self, handle: RenderHandle, transform: Affine3A);

    fn set_visible(&mut self, handle: RenderHandle, visible: bool);

    /// Pushes clip weights to an animated model.
    fn set_animation(&mut self, handle: RenderHandle, weights: &[ClipWeight]);

    /// Drains asset completions that happened since the last call.
    fn poll_assets(&mut self) -> Vec<AssetEvent>;

    /// Nearest in-scene renderable hit by `ray`.
    fn pick(&self, ray: &Ray) -> Option<RenderHandle>;

    fn submit_frame(&mut self, camera: &CameraView) -> Result<(), RenderError>;

    /// Detaches every renderable from the scene.
    fn remove_all(&mut self);

    /// Releases every resource owned by the scene. Idempotent.
    fn dispose(&mut self);
}

//=== RenderBackend =======================================================

/// Creates scenes on demand.
pub trait RenderBackend {
    fn create_scene(&mut self, label: &str) -> Result<Box<dyn SceneRenderer>, RenderError>;
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(ray.direction, Vec3::Z);
    }

    #[test]
    fn degenerate_ray_points_forward() {
        let ray = Ray::towards(Vec3::ONE, Vec3::ONE);
        assert_eq!(ray.direction, Vec3::Z);
    }
}
