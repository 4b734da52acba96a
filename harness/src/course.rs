//! Obstacle course the harness runs on, laid out along +Z from the spawn point.
//!
//! The terrace sits past where the jump off the crate lands, so the character walks up to
//! its face and has to hang from it.

use traversal::{CollisionLayer, Point3, StaticColliderDef, Vec3};

pub fn spawn() -> Point3 {
    Point3::origin()
}

/// Below this height the character has fallen off the course.
pub const KILL_PLANE_Y: f32 = -10.0;

pub const CRATE_TOP: f32 = 0.5;
pub const TERRACE_TOP: f32 = 1.2;
/// Near face of the terrace along +Z.
pub const TERRACE_FACE_Z: f32 = 18.0;

/// Floor, a curb lower than the step cast, a mount-height crate and a terrace to hang from.
pub fn obstacles() -> Vec<StaticColliderDef> {
    vec![
        StaticColliderDef::ground_plane(0, 0.0),
        // Curb: walked over by step resolution.
        StaticColliderDef::cuboid(
            1,
            Vec3::new(0.0, 0.04, 3.0),
            Vec3::new(4.0, 0.04, 0.5),
            CollisionLayer::Terrain,
        ),
        // Crate: mounted with a vault, left with an automatic jump off its far edge.
        StaticColliderDef::cuboid(
            2,
            Vec3::new(0.0, CRATE_TOP * 0.5, 7.0),
            Vec3::new(4.0, CRATE_TOP * 0.5, 1.0),
            CollisionLayer::Climbable,
        ),
        // Terrace: leapt at, hung from and pulled up onto.
        StaticColliderDef::cuboid(
            3,
            Vec3::new(0.0, TERRACE_TOP * 0.5, TERRACE_FACE_Z + 11.0),
            Vec3::new(4.0, TERRACE_TOP * 0.5, 11.0),
            CollisionLayer::Climbable,
        ),
    ]
}
