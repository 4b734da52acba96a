use crate::body::PhysicsBody;
use crate::config::ControllerConfig;
use crate::constants::{DEGENERATE_FACING_LEN, FORWARD_HIT_DISTANCE};
use crate::utils::{flatten, forward_of, look_rotation};

use super::types::{CollisionQuery, Point3, RayHit, Vec3, world_up};

/// Short ray at step height along `direction`, falling back to `facing` when the direction
/// is too short to use. Finds the wall the character is walking or hanging against.
pub fn forward_hit<Q: CollisionQuery + ?Sized>(
    query: &Q,
    position: Point3,
    direction: Vec3,
    facing: Vec3,
    config: &ControllerConfig,
) -> Option<RayHit> {
    let flat = flatten(direction);
    let dir = if flat.norm() > DEGENERATE_FACING_LEN {
        flat
    } else {
        flatten(facing)
    };
    let origin = position + world_up() * config.step_height;
    query.cast(origin, dir, FORWARD_HIT_DISTANCE, config.layers())
}

/// Turn the body to face the wall in front of it. No-op when there is no wall or its normal
/// has no horizontal component. Returns whether a wall was faced.
pub fn face_wall<Q, B>(query: &Q, body: &mut B, direction: Vec3, config: &ControllerConfig) -> bool
where
    Q: CollisionQuery + ?Sized,
    B: PhysicsBody + ?Sized,
{
    let facing = forward_of(&body.rotation());
    let Some(hit) = forward_hit(query, body.position(), direction, facing, config) else {
        return false;
    };
    match look_rotation(-flatten(hit.normal), world_up()) {
        Some(rotation) => {
            body.set_rotation(rotation);
            true
        }
        None => false,
    }
}
