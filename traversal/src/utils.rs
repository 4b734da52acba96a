//! Small vector/rotation helpers shared by the sensing, locomotion and vault code.

use nalgebra as na;

use crate::constants::{DIR_EPS, FLAT_GROUND_FLATNESS};
use crate::sensing::types::{Point3, Quat, Vec3, world_up};

/// Drop the vertical component.
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Scale `v` down so its length is at most `max_len`.
#[inline]
pub fn clamp_magnitude(v: Vec3, max_len: f32) -> Vec3 {
    let len_sq = v.norm_squared();
    if len_sq > max_len * max_len && len_sq > 0.0 {
        v * (max_len / len_sq.sqrt())
    } else {
        v
    }
}

/// Normalize, or zero when the vector is too short to have a direction.
#[inline]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    v.try_normalize(DIR_EPS).unwrap_or_else(Vec3::zeros)
}

/// Rotation that maps local +Z onto `forward` and local +Y onto the orthogonalized `up`.
///
/// Returns `None` if `forward` is degenerate or parallel to `up`.
#[inline]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let f = forward.try_normalize(DIR_EPS)?;
    let u = up.try_normalize(DIR_EPS)?;
    if u.cross(&f).norm_squared() <= DIR_EPS {
        return None;
    }
    Some(na::UnitQuaternion::face_towards(&f, &u))
}

/// Spherical interpolation with the factor clamped to [0, 1].
///
/// Antipodal inputs have no well-defined arc; they snap to `to`.
#[inline]
pub fn slerp_clamped(from: Quat, to: Quat, t: f32) -> Quat {
    let t = t.clamp(0.0, 1.0);
    if t >= 1.0 {
        return to;
    }
    from.try_slerp(&to, t, 1.0e-6).unwrap_or(to)
}

/// Linear interpolation between points with the factor clamped to [0, 1].
#[inline]
pub fn lerp_point(from: Point3, to: Point3, t: f32) -> Point3 {
    let t = t.clamp(0.0, 1.0);
    from + (to - from) * t
}

/// Linear interpolation between scalars with the factor clamped to [0, 1].
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Unsigned angle between two vectors in degrees. Zero if either is degenerate.
#[inline]
pub fn angle_deg(a: Vec3, b: Vec3) -> f32 {
    match (a.try_normalize(DIR_EPS), b.try_normalize(DIR_EPS)) {
        (Some(a), Some(b)) => a.dot(&b).clamp(-1.0, 1.0).acos().to_degrees(),
        _ => 0.0,
    }
}

/// Dot product of a surface normal with world up: 1.0 = flat, 0.0 = vertical.
#[inline]
pub fn flatness(normal: Vec3) -> f32 {
    world_up().dot(&normal)
}

#[inline]
pub fn is_ground_flat(normal: Vec3) -> bool {
    flatness(normal) >= FLAT_GROUND_FLATNESS
}

/// Angle between a surface normal and world up, in degrees.
#[inline]
pub fn ground_angle(normal: Vec3) -> f32 {
    angle_deg(normal, world_up())
}

/// Angle between the surface tangent running "forward" from `right` and world up.
///
/// Flat ground gives 90 degrees; downhill faces go above 90, uphill faces below.
#[inline]
pub fn forward_angle(right: Vec3, normal: Vec3) -> f32 {
    angle_deg(right.cross(&normal), world_up())
}

/// Local +Z of `rotation` in world space.
#[inline]
pub fn forward_of(rotation: &Quat) -> Vec3 {
    rotation * Vec3::z()
}

/// Local +X of `rotation` in world space.
#[inline]
pub fn right_of(rotation: &Quat) -> Vec3 {
    rotation * Vec3::x()
}
