//! Follow camera for the harness. Trails the character at a fixed offset and eases toward
//! it per axis, with separate decay rates for the horizontal plane and height.

use nalgebra as na;
use traversal::{CameraProvider, Point3, Vec3};

const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 2.5, -5.0);
const LOOK_HEIGHT: f32 = 1.5;

const HORIZONTAL_DECAY_RATE: f32 = 8.0;
const VERTICAL_DECAY_RATE: f32 = 3.0;

pub struct FollowCamera {
    pub position: Point3,
    forward: Vec3,
    right: Vec3,
}

impl FollowCamera {
    pub fn new(target: Point3) -> Self {
        let mut camera = Self {
            position: target + CAMERA_OFFSET,
            forward: Vec3::z(),
            right: Vec3::x(),
        };
        camera.aim(target);
        camera
    }

    /// Ease toward the offset position behind `target` and look at its head.
    pub fn follow(&mut self, dt: f32, target: Point3) {
        let desired = target + CAMERA_OFFSET;
        let horizontal = 1.0 - (-HORIZONTAL_DECAY_RATE * dt).exp();
        let vertical = 1.0 - (-VERTICAL_DECAY_RATE * dt).exp();

        self.position.x += (desired.x - self.position.x) * horizontal;
        self.position.z += (desired.z - self.position.z) * horizontal;
        self.position.y += (desired.y - self.position.y) * vertical;

        self.aim(target);
    }

    fn aim(&mut self, target: Point3) {
        let look_at = target + Vec3::y() * LOOK_HEIGHT;
        if let Some(forward) = (look_at - self.position).try_normalize(1.0e-6) {
            self.forward = forward;
        }
        let up = na::Vector3::y();
        if let Some(right) = up.cross(&self.forward).try_normalize(1.0e-6) {
            self.right = right;
        }
    }
}

impl CameraProvider for FollowCamera {
    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn right(&self) -> Vec3 {
        self.right
    }
}
