/*!
Sensing root module.

Everything the controller learns about the world comes through ray casts against a
host-provided [`CollisionQuery`]. The code is split for clarity:

- types:  math aliases, ray hits and the collision query seam
- ground: ground sampling and step resolution (grounding)
- frame:  the smoothed ground-aligned reference frame used for input
- ledge:  ledge detection and height-tier classification
- wall:   short forward cast used to face walls while vaulting and hanging
*/

pub mod frame;
pub mod ground;
pub mod ledge;
pub mod types;
pub mod wall;

// Re-export commonly used types and functions.
pub use frame::{GroundFrame, GroundFrameTracker};
pub use ground::{GroundSample, GroundSampler, Grounding, resolve_grounding};
pub use ledge::{LedgeSample, LedgeScanner, LedgeTier, classify_tier};
pub use wall::{face_wall, forward_hit};
pub use types::{CollisionQuery, Point3, Quat, RayHit, Vec3, cast_down, world_up};
