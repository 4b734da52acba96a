pub mod animation;
pub mod body;
pub mod camera;
pub mod config;
pub mod constants;
pub mod controller;
pub mod input;
pub mod layers;
pub mod locomotion;
pub mod rapier_world;
pub mod sensing;
pub mod utils;
pub mod vault;

#[cfg(test)]
mod test_support;

pub use animation::{AnimationSink, Clip, RecordingAnimator, clips, params};
pub use body::{GRAVITY_MPS2, KinematicBody, PhysicsBody};
pub use camera::{CameraProvider, FixedCamera};
pub use config::{ConfigError, ControllerConfig};
pub use controller::{CharacterController, IkTargets};
pub use input::{InputFrame, InputProvider, VirtualInput};
pub use layers::{BitmaskFlags, CollisionLayer, FlagBitmask, LayerMask, environment_mask};
pub use locomotion::{LocomotionState, LocomotionStep};
pub use rapier_world::{ColliderShapeDef, RapierQueryWorld, StaticColliderDef, collider_from_def};
pub use sensing::{
    CollisionQuery, GroundFrame, GroundSample, LedgeSample, LedgeTier, Point3, Quat, RayHit, Vec3,
};
pub use vault::{ActionState, VaultTimers};
