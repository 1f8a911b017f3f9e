//=========================================================================
// Follow Camera
//=========================================================================
//
// Third-person camera chasing the ship.
//
// The ideal pose sits at `offset` behind the ship and looks at
// `look_ahead` in front of it, both in ship space. Each update moves the
// camera a frame-rate independent fraction `1 - smoothing^dt` of the way
// there. The first update snaps.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::config::CameraTuning;
use crate::core::render::{CameraView, Ray};

//=== FollowCamera ========================================================

#[derive(Debug, Clone)]
pub struct FollowCamera {
    tuning: CameraTuning,
    position: Vec3,
    target: Vec3,
    placed: bool,
}

impl FollowCamera {
    pub fn new(tuning: CameraTuning) -> Self {
        Self {
            tuning,
            position: Vec3::ZERO,
            target: Vec3::Z,
            placed: false,
        }
    }

    pub fn update(&mut self, dt: f32, ship_position: Vec3, ship_rotation: Quat) {
        let ideal_position = ship_rotation * self.tuning.offset + ship_position;
        let ideal_target = ship_rotation * self.tuning.look_ahead + ship_position;

        if !self.placed {
            self.position = ideal_position;
            self.target = ideal_target;
            self.placed = true;
            return;
        }

        let t = 1.0 - self.tuning.smoothing.powf(dt);
        self.position = self.position.lerp(ideal_position, t);
        self.target = self.target.lerp(ideal_target, t);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Gaze ray through the centre of the view.
    pub fn ray(&self) -> Ray {
        Ray::towards(self.position, self.target)
    }

    pub fn view(&self, aspect: f32) -> CameraView {
        CameraView {
            position: self.position,
            target: self.target,
            fov_degrees: self.tuning.fov_degrees,
            aspect,
            near: self.tuning.near,
            far: self.tuning.far,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn first_update_snaps_to_ideal_pose() {
        let mut camera = FollowCamera::new(CameraTuning::default());
        let ship = Vec3::new(56.0, 0.0, -80.0);

        camera.update(0.0, ship, Quat::IDENTITY);

        assert!((camera.position() - Vec3::new(41.0, 20.0, -110.0)).length() < EPSILON);
        assert!((camera.target() - Vec3::new(56.0, 10.0, -30.0)).length() < EPSILON);
    }

    #[test]
    fn later_updates_close_the_gap_partially() {
        let mut camera = FollowCamera::new(CameraTuning::default());
        camera.update(0.0, Vec3::ZERO, Quat::IDENTITY);
        let start = camera.position();

        camera.update(0.1, Vec3::new(0.0, 0.0, 100.0), Quat::IDENTITY);

        let ideal = Vec3::new(-15.0, 20.0, 70.0);
        let travelled = (camera.position() - start).length();
        let gap = (ideal - start).length();
        let expected = 1.0 - 0.001_f32.powf(0.1);
        assert!((travelled / gap - expected).abs() < EPSILON);
    }

    #[test]
    fn zero_dt_does_not_move_placed_camera() {
        let mut camera = FollowCamera::new(CameraTuning::default());
        camera.update(0.0, Vec3::ZERO, Quat::IDENTITY);
        let placed = camera.position();

        camera.update(0.0, Vec3::new(500.0, 0.0, 0.0), Quat::IDENTITY);

        assert_eq!(camera.position(), placed);
    }

    #[test]
    fn view_carries_pose_and_aspect() {
        let mut camera = FollowCamera::new(CameraTuning::default());
        camera.update(0.0, Vec3::ZERO, Quat::IDENTITY);

        let view = camera.view(2.0);

        assert_eq!(view.position, camera.position());
        assert_eq!(view.target, camera.target());
        assert_eq!(view.aspect, 2.0);
        assert_eq!(view.far, 100_000.0);
    }

    #[test]
    fn ray_points_from_camera_to_target() {
        let mut camera = FollowCamera::new(CameraTuning::default());
        camera.update(0.0, Vec3::ZERO, Quat::IDENTITY);

        let ray = camera.ray();
        assert_eq!(ray.origin, camera.position());
        let expected = (camera.target() - camera.position()).normalize();
        assert!((ray.direction - expected).length() < EPSILON);
    }
}
