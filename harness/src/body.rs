//! Harness body: a [`KinematicBody`] with just enough contact handling to stand on the
//! course. Walls block horizontal motion at waist height and falling bodies land on the
//! first surface below them.

use traversal::utils::{flatten, normalize_or_zero};
use traversal::{
    CollisionQuery, GRAVITY_MPS2, KinematicBody, LayerMask, PhysicsBody, Point3, Quat, Vec3,
};

/// Height of the wall cast above the feet. Obstacles lower than this are left to the
/// controller's step and vault handling.
const WAIST_HEIGHT: f32 = 0.3;
const BODY_RADIUS: f32 = 0.3;
/// Landed feet rest this far below the surface so the grounding cast catches them.
const LANDING_SINK: f32 = 0.03;
/// Surfaces with a normal flatter than this block horizontal motion.
const WALL_MAX_UP: f32 = 0.7;

pub struct HarnessBody {
    inner: KinematicBody,
    layers: LayerMask,
}

impl HarnessBody {
    pub fn new(position: Point3, layers: LayerMask) -> Self {
        Self {
            inner: KinematicBody::new(position),
            layers,
        }
    }

    /// Integrate one physics step and resolve contacts against `world`.
    pub fn step<Q: CollisionQuery + ?Sized>(&mut self, dt: f32, world: &Q) {
        let start = self.inner.position;
        self.inner.integrate(dt, GRAVITY_MPS2);
        self.slide_along_walls(start, world);
        if self.inner.gravity_enabled {
            self.land(start, world);
        }
    }

    fn slide_along_walls<Q: CollisionQuery + ?Sized>(&mut self, start: Point3, world: &Q) {
        let displacement = flatten(self.inner.position - start);
        let travel = displacement.norm();
        if travel <= 1.0e-6 {
            return;
        }

        let origin = start + Vec3::y() * WAIST_HEIGHT;
        let Some(hit) = world.cast(origin, displacement, travel + BODY_RADIUS, self.layers) else {
            return;
        };
        if hit.normal.y >= WALL_MAX_UP {
            return;
        }
        let normal = normalize_or_zero(flatten(hit.normal));
        if normal == Vec3::zeros() {
            return;
        }

        let into = displacement.dot(&normal).min(0.0);
        let slid = displacement - normal * into;
        self.inner.position.x = start.x + slid.x;
        self.inner.position.z = start.z + slid.z;

        let v_into = self.inner.velocity.dot(&normal).min(0.0);
        self.inner.velocity -= normal * v_into;
        log::trace!("wall contact at {:?}, slid to {:?}", hit.point, self.inner.position);
    }

    fn land<Q: CollisionQuery + ?Sized>(&mut self, start: Point3, world: &Q) {
        if self.inner.velocity.y > 0.0 {
            return;
        }
        let feet = self.inner.position;
        let drop = (start.y - feet.y).max(0.0);
        let origin = Point3::new(feet.x, start.y + WAIST_HEIGHT, feet.z);
        let reach = WAIST_HEIGHT + drop + LANDING_SINK;
        let Some(hit) = world.cast(origin, -Vec3::y(), reach, self.layers) else {
            return;
        };

        let rest = hit.point.y - LANDING_SINK;
        if feet.y < rest {
            self.inner.position.y = rest;
            self.inner.velocity.y = 0.0;
            log::debug!("landed at {:?}", hit.point);
        }
    }
}

impl PhysicsBody for HarnessBody {
    fn position(&self) -> Point3 {
        self.inner.position()
    }

    fn set_position(&mut self, position: Point3) {
        self.inner.set_position(position);
    }

    fn rotation(&self) -> Quat {
        self.inner.rotation()
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.inner.set_rotation(rotation);
    }

    fn velocity(&self) -> Vec3 {
        self.inner.velocity()
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.inner.set_velocity(velocity);
    }

    fn apply_impulse(&mut self, delta_velocity: Vec3) {
        self.inner.apply_impulse(delta_velocity);
    }

    fn set_drag(&mut self, drag: f32) {
        self.inner.set_drag(drag);
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.inner.set_gravity_enabled(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traversal::{CollisionLayer, RapierQueryWorld, StaticColliderDef, environment_mask};

    const DT: f32 = 1.0 / 60.0;

    /// Floor plus a wall whose near face is at z = 2.5.
    fn world() -> RapierQueryWorld {
        RapierQueryWorld::build([
            StaticColliderDef::ground_plane(0, 0.0),
            StaticColliderDef::cuboid(
                1,
                Vec3::new(0.0, 0.6, 3.0),
                Vec3::new(2.0, 0.6, 0.5),
                CollisionLayer::Climbable,
            ),
        ])
    }

    #[test]
    fn wall_stops_motion_into_it_and_keeps_the_slide() {
        let world = world();
        let mut body = HarnessBody::new(Point3::new(0.0, 0.0, 2.0), environment_mask());
        body.set_gravity_enabled(false);
        body.set_velocity(Vec3::new(1.0, 0.0, 3.0));

        for _ in 0..60 {
            body.step(DT, &world);
        }

        let position = body.position();
        assert!(position.z < 2.5 - 0.2, "went into the wall: {position:?}");
        assert!(body.velocity().z.abs() < 1.0e-5);
        assert!(position.x > 0.5, "slide along the wall was lost: {position:?}");
        assert_eq!(position.y, 0.0);
    }

    #[test]
    fn falling_body_lands_just_below_the_floor_and_stays() {
        let world = world();
        let mut body = HarnessBody::new(Point3::new(0.0, 1.0, 0.0), environment_mask());

        for _ in 0..120 {
            body.step(DT, &world);
        }

        assert!((body.position().y + LANDING_SINK).abs() < 1.0e-4);
        assert_eq!(body.velocity().y, 0.0);
    }

    #[test]
    fn weightless_body_is_left_where_it_is() {
        let world = world();
        let mut body = HarnessBody::new(Point3::new(0.0, 1.0, 0.0), environment_mask());
        body.set_gravity_enabled(false);

        for _ in 0..30 {
            body.step(DT, &world);
        }

        assert_eq!(body.position(), Point3::new(0.0, 1.0, 0.0));
    }
}
