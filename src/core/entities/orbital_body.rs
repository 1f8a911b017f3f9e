//=========================================================================
// Orbital Body
//=========================================================================
//
// A body revolving around the origin while spinning on its own axis.
//
// Hierarchy:
//   anchor   (at origin, rotated by orbit_angle about world up)
//     └─ body (offset by distance along anchor X, rotated by spin_angle)
//
// Both angles are kept in [0, 2π) so they stay precise however long the
// world runs. Speeds are radians per tick, not per second.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::TAU;

use glam::{Affine3A, Vec2, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::config::BodyDescriptor;

//=== BodyId ==============================================================

/// Stable identity of a body within one space scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

//=== Angle Wrapping ======================================================

/// Wraps any finite angle into `[0, 2π)`, for any magnitude.
///
/// Non-finite input yields `0.0`.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative input
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

//=== OrbitalBody =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBody {
    id: BodyId,
    label: String,
    radius: f32,
    distance: f32,
    revolution_speed: f32,
    rotation_speed: f32,
    orbit_angle: f32,
    spin_angle: f32,
}

impl OrbitalBody {
    //--- Construction -----------------------------------------------------

    pub fn new(
        id: BodyId,
        label: impl Into<String>,
        radius: f32,
        distance: f32,
        revolution_speed: f32,
        rotation_speed: f32,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            radius,
            distance,
            revolution_speed,
            rotation_speed,
            orbit_angle: 0.0,
            spin_angle: 0.0,
        }
    }

    /// Scales every factor of `desc` by `unit` (the sun radius).
    pub fn from_descriptor(id: BodyId, desc: &BodyDescriptor, unit: f32) -> Self {
        Self::new(
            id,
            desc.title.clone(),
            desc.size_factor * unit,
            desc.position_factor * unit,
            desc.revolution_speed_factor * unit,
            desc.rotation_speed_factor * unit,
        )
    }

    //--- Simulation -------------------------------------------------------

    /// Advances self-spin and revolution by one tick.
    pub fn update(&mut self) {
        self.spin_angle = advance(self.spin_angle, self.rotation_speed);
        self.orbit_angle = advance(self.orbit_angle, self.revolution_speed);
    }

    //--- Queries ----------------------------------------------------------

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Revolution accumulator, always in `[0, 2π)`.
    pub fn orbit_angle(&self) -> f32 {
        self.orbit_angle
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    /// Instantaneous orbit coordinates on the XZ plane.
    pub fn orbit_position(&self) -> Vec2 {
        Vec2::new(
            self.distance * self.orbit_angle.cos(),
            -self.distance * self.orbit_angle.sin(),
        )
    }

    pub fn world_position(&self) -> Vec3 {
        let orbit = self.orbit_position();
        Vec3::new(orbit.x, 0.0, orbit.y)
    }

    /// Anchor rotation composed with the body offset and self-spin.
    pub fn world_transform(&self) -> Affine3A {
        Affine3A::from_rotation_y(self.orbit_angle)
            * Affine3A::from_translation(Vec3::X * self.distance)
            * Affine3A::from_rotation_y(self.spin_angle)
    }
}

/// Adds `delta` to `angle` and wraps. Non-finite steps are dropped.
fn advance(angle: f32, delta: f32) -> f32 {
    let next = angle + delta;
    if next.is_finite() {
        wrap_angle(next)
    } else {
        angle
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TextureRef;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-3;

    fn body(revolution_speed: f32) -> OrbitalBody {
        OrbitalBody::new(BodyId(0), "Test", 2.0, 60.0, revolution_speed, 0.01)
    }

    //=====================================================================
    // Accumulator
    //=====================================================================

    #[test]
    fn accumulator_stays_in_range_for_any_speed() {
        let speeds = [0.0, 1e-4, 0.5, TAU, -TAU, 7.0, -7.0, 1e6, -1e6, 1e30, -1e30];

        for speed in speeds {
            let mut body = body(speed);
            for _ in 0..1_000 {
                body.update();
                let angle = body.orbit_angle();
                assert!(
                    (0.0..TAU).contains(&angle),
                    "speed {} produced angle {}",
                    speed,
                    angle
                );
            }
        }
    }

    #[test]
    fn wrap_angle_handles_edges() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(TAU), 0.0);
        assert!((wrap_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-6);
        assert!(wrap_angle(-1e-9) < TAU);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
        assert_eq!(wrap_angle(f32::INFINITY), 0.0);
    }

    #[test]
    fn non_finite_speed_is_ignored() {
        let mut body = body(f32::NAN);
        body.update();
        assert_eq!(body.orbit_angle(), 0.0);
    }

    //=====================================================================
    // Geometry
    //=====================================================================

    #[test]
    fn orbit_position_matches_transform_hierarchy() {
        let mut body = body(0.3);
        for _ in 0..17 {
            body.update();
        }

        let from_transform = body.world_transform().transform_point3(Vec3::ZERO);
        assert!((from_transform - body.world_position()).length() < EPSILON);
    }

    #[test]
    fn quarter_orbit_moves_body_to_negative_z() {
        let mut body = body(FRAC_PI_2);
        body.update();

        let position = body.orbit_position();
        assert!(position.x.abs() < EPSILON);
        assert!((position.y + 60.0).abs() < EPSILON);
    }

    #[test]
    fn self_spin_does_not_move_body() {
        let mut spinning = OrbitalBody::new(BodyId(1), "Spin", 2.0, 60.0, 0.0, 1.0);
        spinning.update();

        let position = spinning.world_transform().transform_point3(Vec3::ZERO);
        assert!((position - Vec3::new(60.0, 0.0, 0.0)).length() < EPSILON);
        assert!((spinning.spin_angle() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn descriptor_factors_scale_by_unit() {
        let desc = BodyDescriptor {
            title: "Projects".into(),
            texture: TextureRef::new("t"),
            size_factor: 0.25,
            position_factor: 3.0,
            revolution_speed_factor: 0.001,
            rotation_speed_factor: 0.002,
            content_sections: vec![],
        };

        let body = OrbitalBody::from_descriptor(BodyId(7), &desc, 20.0);

        assert_eq!(body.id(), BodyId(7));
        assert_eq!(body.label(), "Projects");
        assert_eq!(body.radius(), 5.0);
        assert_eq!(body.distance(), 60.0);
        assert!((body.revolution_speed - 0.02).abs() < 1e-7);
        assert!((body.rotation_speed - 0.04).abs() < 1e-7);
    }
}
