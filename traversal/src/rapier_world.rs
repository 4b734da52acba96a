//! Rapier-backed static collision world implementing [`CollisionQuery`].
//!
//! Colliders are plain parentless colliders placed at their world pose, registered with a
//! BVH broad phase once at build time and queried through a borrowed query pipeline. Each
//! collider carries its [`CollisionLayer`] bit in `user_data`.

use rapier3d::parry::query::PointQuery;
use rapier3d::prelude::*;

use crate::layers::{CollisionLayer, FlagBitmask, LayerMask};
use crate::sensing::{CollisionQuery, Point3, Quat, RayHit, Vec3};

/// Canonical, schema-agnostic definition of an immutable world collider.
#[derive(Clone, Debug)]
pub struct StaticColliderDef {
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation.
    pub rotation: Quat,
    pub shape: ColliderShapeDef,
    pub layer: CollisionLayer,
}

impl StaticColliderDef {
    /// Axis-aligned box given by its center and half extents.
    pub fn cuboid(id: u32, center: Vec3, half_extents: Vec3, layer: CollisionLayer) -> Self {
        Self {
            id,
            translation: center,
            rotation: Quat::identity(),
            shape: ColliderShapeDef::Cuboid { half_extents },
            layer,
        }
    }

    /// Horizontal ground plane at height `y`.
    pub fn ground_plane(id: u32, y: f32) -> Self {
        Self {
            id,
            translation: Vec3::new(0.0, y, 0.0),
            rotation: Quat::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
            layer: CollisionLayer::Terrain,
        }
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space). The normal is `rotation * +Y`; the plane passes through
    /// the translation, shifted by `offset_along_normal`.
    Plane { offset_along_normal: f32 },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },

    /// Y-aligned cone (meters).
    ConeY { radius: f32, half_height: f32 },

    /// Rounded cuboid; `border_radius` rounds all edges/corners.
    RoundCuboid {
        half_extents: Vec3,
        border_radius: f32,
    },

    /// Y-aligned rounded cylinder (meters).
    RoundCylinderY {
        radius: f32,
        half_height: f32,
        border_radius: f32,
    },
}

#[inline]
fn to_rapier_vector(v: &Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
fn to_rapier_rotation(q: &Quat) -> Rotation<Real> {
    let q = q.quaternion();
    Rotation::new_normalize(rapier3d::na::Quaternion::new(q.w, q.i, q.j, q.k))
}

/// Build a Rapier collider at its world pose from a [`StaticColliderDef`].
pub fn collider_from_def(def: &StaticColliderDef) -> Collider {
    let builder = match &def.shape {
        ColliderShapeDef::Plane { .. } => ColliderBuilder::halfspace(Vector::y_axis()),
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),
        ColliderShapeDef::ConeY {
            radius,
            half_height,
        } => ColliderBuilder::cone(*half_height, *radius),
        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
            *border_radius,
        ),
        ColliderShapeDef::RoundCylinderY {
            radius,
            half_height,
            border_radius,
        } => ColliderBuilder::round_cylinder(*half_height, *radius, *border_radius),
    };

    // Planes slide along their own normal by the offset.
    let mut translation = def.translation;
    if let ColliderShapeDef::Plane {
        offset_along_normal,
    } = def.shape
    {
        translation += (def.rotation * Vec3::y()) * offset_along_normal;
    }

    let mut collider = builder.user_data(u128::from(def.layer.mask())).build();
    collider.set_position(Isometry::from_parts(
        to_rapier_vector(&translation).into(),
        to_rapier_rotation(&def.rotation),
    ));
    collider
}

/// Immutable collision world for ray queries.
pub struct RapierQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build the world. Colliders are inserted in ascending `id` order so handles are stable
    /// for a given set of definitions.
    pub fn build(defs: impl IntoIterator<Item = StaticColliderDef>) -> Self {
        let mut defs: Vec<_> = defs.into_iter().collect();
        defs.sort_by_key(|def| def.id);

        let bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut modified_colliders = Vec::with_capacity(defs.len());
        for def in &defs {
            modified_colliders.push(colliders.insert(collider_from_def(def)));
        }

        let mut broad_phase = BroadPhaseBvh::new();
        let mut events = Vec::new();
        broad_phase.update(
            &IntegrationParameters::default(),
            &colliders,
            &bodies,
            &modified_colliders,
            &[],
            &mut events,
        );

        log::info!("built static query world with {} colliders", colliders.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase: NarrowPhase::default(),
        }
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    fn as_query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }
}

impl CollisionQuery for RapierQueryWorld {
    fn cast(
        &self,
        origin: Point3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize(1.0e-9)?;
        let ray_origin = point![origin.x, origin.y, origin.z];
        let ray = Ray::new(ray_origin, vector![dir.x, dir.y, dir.z]);

        // Colliders the ray starts inside of are invisible to it.
        let predicate = |_handle: ColliderHandle, co: &Collider| {
            (co.user_data as u32) & layers.bits != 0
                && !co.shape().contains_point(co.position(), &ray_origin)
        };
        let filter = QueryFilter::default().predicate(&predicate);

        let (_, hit) = self
            .as_query_pipeline(filter)
            .cast_ray_and_get_normal(&ray, max_distance, true)?;

        let t = hit.time_of_impact;
        Some(RayHit {
            point: origin + dir * t,
            normal: Vec3::new(hit.normal.x, hit.normal.y, hit.normal.z),
            distance: t,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::environment_mask;

    fn course() -> RapierQueryWorld {
        RapierQueryWorld::build([
            StaticColliderDef::cuboid(
                2,
                Vec3::new(0.0, 0.25, 2.0),
                Vec3::new(1.0, 0.25, 1.0),
                CollisionLayer::Climbable,
            ),
            StaticColliderDef::ground_plane(1, 0.0),
            StaticColliderDef::cuboid(
                3,
                Vec3::new(5.0, 1.0, 0.0),
                Vec3::new(0.5, 1.0, 0.5),
                CollisionLayer::Character,
            ),
        ])
    }

    #[test]
    fn down_ray_hits_crate_top_then_floor() {
        let world = course();
        assert_eq!(world.collider_count(), 3);

        let hit = world
            .cast(Point3::new(0.0, 2.0, 2.0), -Vec3::y(), 10.0, environment_mask())
            .expect("crate top");
        assert!((hit.point.y - 0.5).abs() < 1.0e-4);
        assert!((hit.normal - Vec3::y()).norm() < 1.0e-4);
        assert!((hit.distance - 1.5).abs() < 1.0e-4);

        let floor = world
            .cast(Point3::new(0.0, 2.0, -2.0), -Vec3::y(), 10.0, environment_mask())
            .expect("floor");
        assert!(floor.point.y.abs() < 1.0e-4);
    }

    #[test]
    fn excluded_layers_and_range_limit_misses() {
        let world = course();
        let terrain_only = LayerMask::empty().with(CollisionLayer::Terrain);
        let hit = world
            .cast(Point3::new(0.0, 2.0, 2.0), -Vec3::y(), 10.0, terrain_only)
            .expect("floor through the crate");
        assert!(hit.point.y.abs() < 1.0e-4);

        // Character colliders are not part of the environment mask.
        let hit = world
            .cast(Point3::new(5.0, 3.0, 0.0), -Vec3::y(), 10.0, environment_mask())
            .expect("floor under the character box");
        assert!(hit.point.y.abs() < 1.0e-4);

        assert!(world
            .cast(Point3::new(0.0, 2.0, -2.0), -Vec3::y(), 1.0, environment_mask())
            .is_none());
    }

    #[test]
    fn ray_starting_inside_a_crate_ignores_it() {
        let world = course();
        let hit = world
            .cast(Point3::new(0.0, 0.3, 2.0), -Vec3::y(), 1.0, environment_mask())
            .expect("floor below");
        assert!(hit.point.y.abs() < 1.0e-4);
    }
}
