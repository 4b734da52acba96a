/*!
Fixed constants of the controller.

Everything a designer is expected to tune lives in [`crate::ControllerConfig`]. The values
here are structural: tolerances and cast lengths the algorithms rely on.

Notes
- Distances are in meters, time in seconds, angles in degrees.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Minimum vector length treated as a usable direction.
pub const DIR_EPS: f32 = 1.0e-6;

/// Facing vectors at or below this length skip rotation for the tick.
pub const DEGENERATE_FACING_LEN: f32 = 0.01;

/// Flatness (dot with up) at or above which ground counts as flat.
pub const FLAT_GROUND_FLATNESS: f32 = 0.95;

/// Vertical error above which grounding interpolates instead of snapping (meters).
pub const STEP_SNAP_TOLERANCE: f32 = 0.05;

/// How much shorter than `step_height` the ground cast is while jumping (meters).
/// Keeps a fresh jump from re-grounding on the floor it just left.
pub const JUMP_CAST_SHRINK: f32 = 0.02;

/// Forward lead of the forward-ground cast, as a fraction of the movement vector.
pub const FORWARD_GROUND_CAST_LEAD: f32 = 0.02;

/// Max distance of the forward-ground cast (meters).
pub const FORWARD_GROUND_CAST_DISTANCE: f32 = 100.0;

/// Stick magnitude above which a drop ahead raises an automatic jump.
pub const AUTO_JUMP_MIN_INPUT: f32 = 0.8;

/// Max distance of the downward ledge cast (meters).
pub const LEDGE_CAST_DISTANCE: f32 = 1000.0;

/// Max distance of the forward wall cast used to face walls (meters).
pub const FORWARD_HIT_DISTANCE: f32 = 1.0;

/// Head-look drop below the ledge for tall vaults (meters).
pub const HEAD_LOOK_LEDGE_DROP: f32 = 1.1;

/// `moveSpeed` animation parameter scale: half of `move_speed` already reads as full speed.
pub const ANIM_MOVE_SPEED_SCALE: f32 = 2.0;

/// Slack added to accumulated timers so a threshold is met on the tick it is due,
/// regardless of float drift from summing many small `dt`s (seconds).
pub const TIMER_EPS: f32 = 1.0e-4;
