/*!
Ledge detection and height-tier classification.

One downward cast from above and in front of the character finds the surface it would
climb onto. The hit height relative to the feet picks a tier:

- `(step_height, hop_height]`                 -> Hop
- `(hop_height, mount_height]`                -> Mount
- `(mount_height, jump_to_ledge_grab_height]` -> JumpToLedge

Anything at or below `step_height` is walkable ground handled by step resolution, and
anything above `jump_to_ledge_grab_height` is out of reach. Both classify as `None`.

A ledge also needs a riser: a face steeper than `max_ledge_angle` between the feet and the
cast point. A ramp rising ahead has none, so it stays walkable ground however high the
cast lands on it.
*/

use crate::config::ControllerConfig;
use crate::constants::LEDGE_CAST_DISTANCE;
use crate::utils::{flatten, ground_angle, normalize_or_zero};

use super::types::{CollisionQuery, Point3, Vec3, cast_down, world_up};

/// Reachability tier of a detected ledge, ordered by height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LedgeTier {
    #[default]
    None,
    Hop,
    Mount,
    JumpToLedge,
}

/// Classify a ledge `height` above the feet. Thresholds are tier ceilings.
#[inline]
pub fn classify_tier(height: f32, config: &ControllerConfig) -> LedgeTier {
    if height <= config.step_height {
        LedgeTier::None
    } else if height <= config.hop_height {
        LedgeTier::Hop
    } else if height <= config.mount_height {
        LedgeTier::Mount
    } else if height <= config.jump_to_ledge_grab_height {
        LedgeTier::JumpToLedge
    } else {
        LedgeTier::None
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgeSample {
    /// Contact on the ledge surface, or the cast origin when nothing was hit.
    pub point: Point3,
    /// Height of `point` above the feet at scan time.
    pub height: f32,
    /// Angle between the ledge surface normal and world up (degrees).
    pub surface_angle: f32,
    pub reachable: bool,
    /// Always `None` when not reachable.
    pub tier: LedgeTier,
}

impl LedgeSample {
    fn miss(point: Point3, height: f32) -> Self {
        Self {
            point,
            height,
            surface_angle: 0.0,
            reachable: false,
            tier: LedgeTier::None,
        }
    }
}

impl Default for LedgeSample {
    fn default() -> Self {
        Self::miss(Point3::origin(), 0.0)
    }
}

/// Casts for ledges ahead of the character.
///
/// `width_check` is the forward reach of the cast. It widens in midair so a jump can
/// catch a ledge a little further out, and narrows again on the ground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgeScanner {
    pub width_check: f32,
}

impl LedgeScanner {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            width_check: config.width_check,
        }
    }

    /// Pick the reach for the next scan from the grounding result.
    #[inline]
    pub fn set_grounded(&mut self, grounded: bool, config: &ControllerConfig) {
        self.width_check = if grounded {
            config.grounded_width_check
        } else {
            config.midair_width_check
        };
    }

    /// Scan ahead of `position` along the flattened `facing`.
    ///
    /// The surface angle is taken from a short ground cast at the midpoint of the ledge
    /// cast, so the face of a wall under a thin lip does not count as the ledge surface.
    /// When that cast finds nothing the ledge hit's own normal is used.
    ///
    /// The riser is looked for with a ray at step height along `facing`, no longer than the
    /// current width check.
    pub fn scan<Q: CollisionQuery + ?Sized>(
        &self,
        query: &Q,
        position: Point3,
        facing: Vec3,
        config: &ControllerConfig,
    ) -> LedgeSample {
        let layers = config.layers();
        let forward = normalize_or_zero(flatten(facing));
        let origin = position + world_up() * config.ledge_grab_height + forward * self.width_check;

        let Some(hit) = cast_down(query, origin, LEDGE_CAST_DISTANCE, layers) else {
            log::trace!("ledge scan: no surface under {origin:?}");
            return LedgeSample::miss(origin, config.ledge_grab_height);
        };

        let height = hit.point.y - position.y;

        let midpoint = origin - world_up() * (config.ledge_grab_height * 0.5);
        let cast_origin = midpoint + world_up() * config.step_height;
        let surface_normal = cast_down(query, cast_origin, config.ground_sample_distance, layers)
            .map_or(hit.normal, |mid| mid.normal);
        let surface_angle = ground_angle(surface_normal);

        let riser_origin = position + world_up() * config.step_height;
        let has_riser = query
            .cast(riser_origin, forward, self.width_check, layers)
            .is_some_and(|face| ground_angle(face.normal) >= config.max_ledge_angle);

        let tier = classify_tier(height, config);
        let reachable = height > 0.0
            && height <= config.ledge_grab_height
            && surface_angle < config.max_ledge_angle
            && has_riser
            && tier != LedgeTier::None;

        let sample = LedgeSample {
            point: hit.point,
            height,
            surface_angle,
            reachable,
            tier: if reachable { tier } else { LedgeTier::None },
        };
        log::trace!(
            "ledge scan: height {:.3} angle {:.1} riser {} tier {:?}",
            sample.height, sample.surface_angle, has_riser, sample.tier
        );
        sample
    }
}
