/*!
Core sensing types and math aliases shared by the sensing submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- the collision query seam (ray casts against whatever world the host owns)
- the ground sampler and step resolution
- the ground frame tracker
- the ledge scanner and the vault state machine

Conventions
- Units are meters and seconds.
- +Y is up, +Z is the local forward axis, +X is the local right axis.
*/

use nalgebra as na;

use crate::layers::LayerMask;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// World up (+Y).
#[inline]
pub fn world_up() -> Vec3 {
    Vec3::y()
}

/// A single ray-cast contact returned by a [`CollisionQuery`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space contact point.
    pub point: Point3,
    /// World-space unit surface normal at the contact.
    pub normal: Vec3,
    /// Distance travelled along the ray before the contact (meters).
    pub distance: f32,
}

/// Collision query seam.
///
/// The core never owns collision geometry; it only asks the host for ray casts.
/// A miss is a normal outcome, never an error.
pub trait CollisionQuery {
    /// Cast a ray from `origin` along `direction` up to `max_distance`, seeing only
    /// colliders whose layer is contained in `layers`.
    ///
    /// `direction` does not need to be normalized; a zero direction yields `None`.
    fn cast(&self, origin: Point3, direction: Vec3, max_distance: f32, layers: LayerMask)
        -> Option<RayHit>;
}

impl<T: CollisionQuery + ?Sized> CollisionQuery for &T {
    #[inline]
    fn cast(
        &self,
        origin: Point3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit> {
        (**self).cast(origin, direction, max_distance, layers)
    }
}

/// Convenience: cast straight down.
#[inline]
pub fn cast_down<Q: CollisionQuery + ?Sized>(
    query: &Q,
    origin: Point3,
    max_distance: f32,
    layers: LayerMask,
) -> Option<RayHit> {
    query.cast(origin, -world_up(), max_distance, layers)
}
