use crate::body::PhysicsBody;
use crate::config::ControllerConfig;
use crate::constants::STEP_SNAP_TOLERANCE;
use crate::layers::LayerMask;
use crate::utils::{flatness, lerp_point};

use super::types::{CollisionQuery, Point3, RayHit, Vec3, cast_down, world_up};

/// Classified ground beneath a point, refreshed every frame tick.
///
/// `normal` is world up whenever `valid` is false; callers read a miss as
/// "no correction available", never as an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundSample {
    pub point: Point3,
    pub normal: Vec3,
    pub valid: bool,
}

impl GroundSample {
    /// A miss at `position`.
    #[inline]
    pub fn miss(position: Point3) -> Self {
        Self {
            point: position,
            normal: world_up(),
            valid: false,
        }
    }

    #[inline]
    pub fn from_hit(hit: RayHit) -> Self {
        Self {
            point: hit.point,
            normal: hit.normal,
            valid: true,
        }
    }

    /// 1.0 on flat ground, 0.0 on a vertical face.
    #[inline]
    pub fn flatness(&self) -> f32 {
        flatness(self.normal)
    }
}

/// Wraps a single downward query into a [`GroundSample`].
#[derive(Clone, Copy, Debug)]
pub struct GroundSampler {
    /// Height above the sampled point the ray starts from.
    pub step_height: f32,
    /// Ray length.
    pub max_distance: f32,
    pub layers: LayerMask,
}

impl GroundSampler {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            step_height: config.step_height,
            max_distance: config.ground_sample_distance,
            layers: config.layers(),
        }
    }

    /// Sample the ground under `position`. No side effects; never fails.
    pub fn sample<Q: CollisionQuery + ?Sized>(&self, query: &Q, position: Point3) -> GroundSample {
        let origin = position + world_up() * self.step_height;
        match cast_down(query, origin, self.max_distance, self.layers) {
            Some(hit) => GroundSample::from_hit(hit),
            None => GroundSample::miss(position),
        }
    }
}

/// Outcome of one step-resolution pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grounding {
    pub grounded: bool,
    /// Cast length that was used this pass.
    pub cast_distance: f32,
    pub hit: Option<RayHit>,
}

/// Resolve grounding and small steps under the body.
///
/// Behavior
/// - Casts down from `step_height` above the feet. The cast reaches
///   `step_height + step_correct_height` normally and only `step_height - 0.02` while
///   `jumping`, so a fresh jump cannot re-ground on the floor it just left.
/// - On a hit the feet move onto the hit point: interpolated at `step_smoothing` when the
///   error exceeds a few centimeters (steps, stairs), snapped otherwise. Grounded bodies get
///   high drag and no gravity so they stick to the floor.
/// - On a miss the body gets zero drag and gravity, unless a jump already owns the body.
pub fn resolve_grounding<Q, B>(
    query: &Q,
    body: &mut B,
    config: &ControllerConfig,
    jumping: bool,
    dt: f32,
) -> Grounding
where
    Q: CollisionQuery + ?Sized,
    B: PhysicsBody + ?Sized,
{
    let position = body.position();
    let origin = position + world_up() * config.step_height;
    let cast_distance = config.grounding_cast_distance(jumping);

    let hit = cast_down(query, origin, cast_distance, config.layers());
    match hit {
        Some(hit) => {
            let error = (position - hit.point).norm();
            if error > STEP_SNAP_TOLERANCE {
                body.set_position(lerp_point(position, hit.point, dt * config.step_smoothing));
            } else {
                body.set_position(hit.point);
            }
            body.set_drag(config.grounded_drag);
            body.set_gravity_enabled(false);
        }
        None => {
            if !jumping {
                body.set_drag(0.0);
                body.set_gravity_enabled(true);
            }
        }
    }

    Grounding {
        grounded: hit.is_some(),
        cast_distance,
        hit,
    }
}
