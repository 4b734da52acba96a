//! Analytic collision world for unit tests: one floor plane, an optional ramp through the
//! origin, and axis-aligned boxes.
//!
//! Rays that start inside a box ignore that box, matching how engine ray casts treat the
//! collider they originate in.

use crate::layers::{CollisionLayer, FlagBitmask, LayerMask};
use crate::sensing::types::{CollisionQuery, Point3, RayHit, Vec3};

#[derive(Clone, Debug)]
pub struct TestBox {
    pub min: Point3,
    pub max: Point3,
    /// Reported instead of +Y when a ray enters through the top face.
    pub top_normal: Option<Vec3>,
    pub layer: CollisionLayer,
}

#[derive(Clone, Debug, Default)]
pub struct TestWorld {
    pub floor: Option<f32>,
    /// Unit normal of a plane through the origin.
    pub ramp: Option<Vec3>,
    pub boxes: Vec<TestBox>,
}

impl TestWorld {
    pub fn flat(floor_y: f32) -> Self {
        Self {
            floor: Some(floor_y),
            ..Self::default()
        }
    }

    /// Walkable ramp through the origin rising along +Z at `angle_deg`.
    pub fn ramp(angle_deg: f32) -> Self {
        let a = angle_deg.to_radians();
        Self {
            ramp: Some(Vec3::new(0.0, a.cos(), -a.sin())),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_box(mut self, min: Point3, max: Point3) -> Self {
        self.boxes.push(TestBox {
            min,
            max,
            top_normal: None,
            layer: CollisionLayer::Terrain,
        });
        self
    }

    pub fn with_sloped_box(mut self, min: Point3, max: Point3, top_normal: Vec3) -> Self {
        self.boxes.push(TestBox {
            min,
            max,
            top_normal: Some(top_normal.normalize()),
            layer: CollisionLayer::Terrain,
        });
        self
    }

    pub fn with_layered_box(mut self, min: Point3, max: Point3, layer: CollisionLayer) -> Self {
        self.boxes.push(TestBox {
            min,
            max,
            top_normal: None,
            layer,
        });
        self
    }
}

fn cast_box(b: &TestBox, origin: Point3, dir: Vec3) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec3::zeros();

    for axis in 0..3 {
        let d = dir[axis];
        let o = origin[axis];
        if d.abs() < 1.0e-9 {
            if o < b.min[axis] || o > b.max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t1 = (b.min[axis] - o) * inv;
        let mut t2 = (b.max[axis] - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        if t1 > t_enter {
            t_enter = t1;
            let mut n = Vec3::zeros();
            n[axis] = -d.signum();
            normal = n;
        }
        t_exit = t_exit.min(t2);
        if t_enter > t_exit {
            return None;
        }
    }

    // Behind the ray, or the ray starts inside.
    if t_enter < 0.0 {
        return None;
    }

    if normal.y > 0.5 {
        if let Some(top) = b.top_normal {
            normal = top;
        }
    }
    Some((t_enter, normal))
}

impl CollisionQuery for TestWorld {
    fn cast(
        &self,
        origin: Point3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize(1.0e-9)?;
        let mut best: Option<(f32, Vec3)> = None;

        if let Some(floor_y) = self.floor {
            if dir.y < 0.0 && origin.y >= floor_y && layers.has(CollisionLayer::Terrain) {
                let t = (origin.y - floor_y) / -dir.y;
                best = Some((t, Vec3::y()));
            }
        }

        if let Some(normal) = self.ramp {
            let approach = dir.dot(&normal);
            let above = origin.coords.dot(&normal);
            if approach < 0.0 && above >= 0.0 && layers.has(CollisionLayer::Terrain) {
                let t = above / -approach;
                if best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, normal));
                }
            }
        }

        for b in &self.boxes {
            if (layers.bits & b.layer.mask()) == 0 {
                continue;
            }
            if let Some((t, n)) = cast_box(b, origin, dir) {
                if best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, n));
                }
            }
        }

        best.filter(|(t, _)| *t <= max_distance)
            .map(|(t, normal)| RayHit {
                point: origin + dir * t,
                normal,
                distance: t,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::environment_mask;

    #[test]
    fn down_cast_hits_box_top_before_floor() {
        let world = TestWorld::flat(0.0).with_box(
            Point3::new(-1.0, 0.0, 1.0),
            Point3::new(1.0, 0.5, 2.0),
        );
        let hit = world
            .cast(Point3::new(0.0, 2.0, 1.5), -Vec3::y(), 10.0, environment_mask())
            .expect("hit");
        assert!((hit.point.y - 0.5).abs() < 1.0e-5);
        assert_eq!(hit.normal, Vec3::y());

        let miss_short = world.cast(Point3::new(0.0, 2.0, 1.5), -Vec3::y(), 1.0, environment_mask());
        assert!(miss_short.is_none());
    }

    #[test]
    fn forward_cast_reports_face_normal() {
        let world = TestWorld::empty().with_box(
            Point3::new(-1.0, 0.0, 1.0),
            Point3::new(1.0, 2.0, 2.0),
        );
        let hit = world
            .cast(Point3::new(0.0, 0.5, 0.0), Vec3::z(), 5.0, environment_mask())
            .expect("hit");
        assert_eq!(hit.normal, -Vec3::z());
        assert!((hit.distance - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn ramp_is_hit_from_above_and_ahead() {
        let world = TestWorld::ramp(20.0);
        let down = world
            .cast(Point3::new(0.0, 2.0, 1.0), -Vec3::y(), 5.0, environment_mask())
            .expect("ramp below");
        assert!((down.point.y - 20.0_f32.to_radians().tan()).abs() < 1.0e-4);

        let ahead = world
            .cast(Point3::new(0.0, 0.1, 0.0), Vec3::z(), 5.0, environment_mask())
            .expect("ramp ahead");
        assert!((ahead.normal.y - 20.0_f32.to_radians().cos()).abs() < 1.0e-5);
    }

    #[test]
    fn masked_layers_are_invisible() {
        let world = TestWorld::empty().with_layered_box(
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, 0.0, 1.0),
            CollisionLayer::Character,
        );
        assert!(world
            .cast(Point3::new(0.0, 1.0, 0.0), -Vec3::y(), 5.0, environment_mask())
            .is_none());
    }
}
