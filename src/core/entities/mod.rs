//=========================================================================
// Entities
//=========================================================================
//
// Motion models owned by the modes: orbiting bodies, the sun, the flying
// ship with its idle/fly behavior machine, and the camera chasing it.
//
// Entities never talk to the renderer themselves. Modes read their
// transforms after `update` and push them to the scene.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod flight_controller;
pub mod flight_states;
pub mod follow_camera;
pub mod orbital_body;
pub mod sun;

//=== Public API ==========================================================

pub use flight_controller::FlightController;
pub use flight_states::{flight_machine, FlightMode, FlightStates, CROSS_FADE_SECONDS};
pub use follow_camera::FollowCamera;
pub use orbital_body::{wrap_angle, BodyId, OrbitalBody};
pub use sun::Sun;

//=== External Dependencies ===============================================

use glam::{Affine3A, Quat, Vec3};

//=== Label Placement =====================================================

/// Yaw about +Y that turns a +Z-facing label at `origin` towards `viewer`,
/// in `[0, 2π)`.
pub fn facing_yaw(viewer: Vec3, origin: Vec3) -> f32 {
    let dx = origin.x - viewer.x;
    let dz = origin.z - viewer.z;
    wrap_angle((-dx).atan2(-dz))
}

/// Transform of a title label floating `height` above `anchor`, turned
/// towards `viewer`.
pub fn label_transform(anchor: Vec3, height: f32, viewer: Vec3) -> Affine3A {
    let position = anchor + Vec3::Y * height;
    let yaw = facing_yaw(viewer, position);
    Affine3A::from_rotation_translation(Quat::from_rotation_y(yaw), position)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-5;

    #[test]
    fn label_faces_viewer_on_each_side() {
        let origin = Vec3::ZERO;

        assert!(facing_yaw(Vec3::new(0.0, 0.0, 10.0), origin).abs() < EPSILON);
        assert!((facing_yaw(Vec3::new(10.0, 0.0, 0.0), origin) - FRAC_PI_2).abs() < EPSILON);
        assert!((facing_yaw(Vec3::new(0.0, 0.0, -10.0), origin) - PI).abs() < EPSILON);
        assert!(
            (facing_yaw(Vec3::new(-10.0, 0.0, 0.0), origin) - 3.0 * FRAC_PI_2).abs() < EPSILON
        );
    }

    #[test]
    fn label_front_points_at_viewer() {
        let viewer = Vec3::new(30.0, 5.0, -40.0);
        let transform = label_transform(Vec3::new(10.0, 0.0, 10.0), 3.0, viewer);

        let position = transform.transform_point3(Vec3::ZERO);
        assert!((position - Vec3::new(10.0, 3.0, 10.0)).length() < EPSILON);

        let front = transform.transform_vector3(Vec3::Z);
        let to_viewer = (viewer - position) * Vec3::new(1.0, 0.0, 1.0);
        assert!(front.dot(to_viewer.normalize()) > 1.0 - EPSILON);
    }
}
