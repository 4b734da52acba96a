//! Physics body seam and a minimal kinematic implementation.
//!
//! The controller never integrates motion itself. It writes velocity, drag and gravity to
//! whatever body the host hands it, and the host steps that body between fixed ticks.

use crate::sensing::types::{Point3, Quat, Vec3, world_up};

/// Gravity magnitude in meters per second squared (positive value).
pub const GRAVITY_MPS2: f32 = 9.81;

pub trait PhysicsBody {
    fn position(&self) -> Point3;
    fn set_position(&mut self, position: Point3);

    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);

    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);

    /// Instantaneous velocity change, independent of mass.
    fn apply_impulse(&mut self, delta_velocity: Vec3);

    fn set_drag(&mut self, drag: f32);
    fn set_gravity_enabled(&mut self, enabled: bool);
}

/// A point body with linear drag and optional gravity.
///
/// Good enough for hosts without a dynamics engine and for deterministic tests. It has no
/// collision response of its own; hosts that need contacts resolve them after `integrate`.
#[derive(Clone, Debug, PartialEq)]
pub struct KinematicBody {
    pub position: Point3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub drag: f32,
    pub gravity_enabled: bool,
}

impl KinematicBody {
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            rotation: Quat::identity(),
            velocity: Vec3::zeros(),
            drag: 0.0,
            gravity_enabled: true,
        }
    }

    /// Semi-implicit Euler step: gravity, then drag, then position.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        let dt = dt.max(0.0);
        if self.gravity_enabled {
            self.velocity -= world_up() * gravity * dt;
        }
        self.velocity *= (1.0 - self.drag * dt).clamp(0.0, 1.0);
        self.position += self.velocity * dt;
    }
}

impl PhysicsBody for KinematicBody {
    fn position(&self) -> Point3 {
        self.position
    }

    fn set_position(&mut self, position: Point3) {
        self.position = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, delta_velocity: Vec3) {
        self.velocity += delta_velocity;
    }

    fn set_drag(&mut self, drag: f32) {
        self.drag = drag;
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }
}
