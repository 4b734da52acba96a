use crate::utils::{forward_of, look_rotation, right_of, slerp_clamped};

use super::ground::GroundSample;
use super::types::{Point3, Quat, Vec3, world_up};

/// Smoothed orientation + anchor describing "up" and the forward tangent at the feet.
///
/// Stick input is projected onto this frame, so walking uphill or downhill follows the
/// slope instead of the camera pitch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundFrame {
    pub anchor: Point3,
    pub rotation: Quat,
}

impl GroundFrame {
    #[inline]
    pub fn right(&self) -> Vec3 {
        right_of(&self.rotation)
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_of(&self.rotation)
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }

    /// World-space move vector for stick axes, vertical component removed.
    #[inline]
    pub fn project_stick(&self, horizontal: f32, vertical: f32) -> Vec3 {
        let v = self.right() * horizontal + self.forward() * vertical;
        Vec3::new(v.x, 0.0, v.z)
    }
}

/// Owns the [`GroundFrame`] and advances it once per fixed tick.
///
/// Notes
/// - Target orientation is `look_rotation(cross(camera_right, normal), normal)`.
/// - The actual orientation follows the target by spherical interpolation at `smooth_rate`,
///   which filters normal flips at geometry seams.
/// - The anchor rides the last valid ground point and freezes while no ground is sampled.
#[derive(Clone, Debug)]
pub struct GroundFrameTracker {
    frame: GroundFrame,
    smooth_rate: f32,
    initialized: bool,
}

impl GroundFrameTracker {
    pub fn new(smooth_rate: f32) -> Self {
        Self {
            frame: GroundFrame {
                anchor: Point3::origin(),
                rotation: Quat::identity(),
            },
            smooth_rate,
            initialized: false,
        }
    }

    #[inline]
    pub fn frame(&self) -> &GroundFrame {
        &self.frame
    }

    /// Jump straight to the target frame for `sample`, no smoothing.
    pub fn reset(&mut self, character_position: Point3, sample: &GroundSample, camera_right: Vec3) {
        self.frame.anchor = if sample.valid {
            sample.point
        } else {
            character_position
        };
        if let Some(target) = Self::target_rotation(sample.normal, camera_right) {
            self.frame.rotation = target;
        }
        self.initialized = true;
    }

    pub fn update(
        &mut self,
        dt: f32,
        character_position: Point3,
        sample: &GroundSample,
        camera_right: Vec3,
    ) {
        if !self.initialized {
            self.reset(character_position, sample, camera_right);
            return;
        }

        if sample.valid {
            self.frame.anchor = sample.point;
        }

        // A camera right parallel to the normal has no tangent; hold the current target.
        if let Some(target) = Self::target_rotation(sample.normal, camera_right) {
            self.frame.rotation =
                slerp_clamped(self.frame.rotation, target, dt * self.smooth_rate);
        }
    }

    fn target_rotation(normal: Vec3, camera_right: Vec3) -> Option<Quat> {
        let normal = normal.try_normalize(1.0e-6).unwrap_or_else(world_up);
        let tangent = camera_right.cross(&normal);
        look_rotation(tangent, normal)
    }
}
