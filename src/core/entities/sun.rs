//=========================================================================
// Sun
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Affine3A, Vec3};

//=== Internal Dependencies ===============================================

use super::wrap_angle;

//=== Sun =================================================================

/// Central star at the origin. Only spins.
#[derive(Debug, Clone, PartialEq)]
pub struct Sun {
    title: String,
    radius: f32,
    spin_speed: f32,
    spin_angle: f32,
}

impl Sun {
    pub fn new(title: impl Into<String>, radius: f32, spin_speed: f32) -> Self {
        Self {
            title: title.into(),
            radius,
            spin_speed,
            spin_angle: 0.0,
        }
    }

    /// Spins by one tick.
    pub fn update(&mut self) {
        self.spin_angle = wrap_angle(self.spin_angle + self.spin_speed);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    pub fn position(&self) -> Vec3 {
        Vec3::ZERO
    }

    pub fn world_transform(&self) -> Affine3A {
        Affine3A::from_rotation_y(self.spin_angle)
    }
}
