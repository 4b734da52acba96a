//! Camera provider seam.

use crate::sensing::types::{Vec3, world_up};
use crate::utils::{flatten, normalize_or_zero};

pub trait CameraProvider {
    /// World-space view direction.
    fn forward(&self) -> Vec3;
    /// World-space right vector.
    fn right(&self) -> Vec3;

    /// View direction with the vertical component removed, normalized.
    fn flat_forward(&self) -> Vec3 {
        normalize_or_zero(flatten(self.forward()))
    }
}

/// A camera that never moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedCamera {
    pub forward: Vec3,
    pub right: Vec3,
}

impl FixedCamera {
    /// Camera looking along `forward`, right vector derived against world up.
    pub fn looking(forward: Vec3) -> Self {
        let forward = normalize_or_zero(forward);
        Self {
            forward,
            right: normalize_or_zero(world_up().cross(&forward)),
        }
    }
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self::looking(Vec3::z())
    }
}

impl CameraProvider for FixedCamera {
    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn right(&self) -> Vec3 {
        self.right
    }
}
