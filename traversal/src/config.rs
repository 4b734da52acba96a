/*!
Controller tunables.

A flat, immutable set of named thresholds, speeds, delays and distances supplied once at
construction. Components receive it by reference; nothing mutates it after validation.

Notes
- Distances are in meters, time in seconds, angles in degrees, rates in 1/seconds.
- Defaults follow the shipped character tuning. Jump speeds are velocity changes (m/s).
- Files are RON; every field is optional and falls back to its default.
*/

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::layers::{LayerMask, environment_mask};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Locomotion ---
    /// Stick magnitude below which movement is suppressed and foot IK is enabled.
    pub move_input_threshold: f32,
    /// Ground speed at full stick deflection (m/s).
    pub move_speed: f32,
    /// Turn rate multiplier; scaled by stick magnitude and dt.
    pub rotate_speed: f32,
    /// Rate for the cosmetic `horizontal`/`vertical` smoothing. Zero writes raw axes.
    pub animation_blend_smoothing: f32,
    /// Head-look clamp above the feet.
    pub max_head_look_up: f32,
    /// Head-look clamp below the feet (negative values keep the look above the feet).
    pub max_head_look_down: f32,

    // --- Ledges and vaulting ---
    /// Height above the feet of the downward ledge cast.
    pub ledge_grab_height: f32,
    /// Ceiling of the `Hop` tier.
    pub hop_height: f32,
    /// Ceiling of the `Mount` tier.
    pub mount_height: f32,
    /// Ceiling of the `JumpToLedge` tier; anything higher is out of reach.
    pub jump_to_ledge_grab_height: f32,
    /// Steepest ledge surface still climbable.
    pub max_ledge_angle: f32,
    /// Forward reach of the ledge cast before the first grounding check.
    pub width_check: f32,
    /// Forward reach of the ledge cast while grounded.
    pub grounded_width_check: f32,
    /// Forward reach of the ledge cast while airborne.
    pub midair_width_check: f32,
    /// Upward speed while leaping to a ledge (m/s).
    pub leap_speed: f32,
    /// Crouch time before the leap starts.
    pub leap_wait_time: f32,
    /// Hand height above the hang anchor.
    pub arm_height: f32,
    /// Continuous hold required before committing to a vault.
    pub vault_delay: f32,
    /// Stick magnitude that counts as holding toward a vault.
    pub vault_hold_threshold: f32,
    /// Continuous hold required before pulling up from a hang.
    pub pull_up_delay: f32,
    /// Stick magnitude that counts as holding toward a pull-up.
    pub pull_up_hold_threshold: f32,
    /// Duration of the pull-up.
    pub pull_up_time: f32,
    /// Rate at which the body is drawn toward the ledge while pulling up.
    pub pull_up_lerp_rate: f32,

    // --- Jumping ---
    /// Vertical velocity change of a jump (m/s).
    pub jump_height: f32,
    /// Horizontal velocity change of a jump along the move direction (m/s).
    pub jump_forward_speed: f32,
    /// Drop ahead that raises an automatic jump.
    pub forward_ground_distance_to_jump: f32,
    /// Forward tangent angle ahead (degrees from up) that raises an automatic jump.
    pub forward_jump_slope_angle: f32,

    // --- Steps and grounding ---
    /// Height above the feet that ground casts start from.
    pub step_height: f32,
    /// Rate at which the feet are pulled onto a step.
    pub step_smoothing: f32,
    /// Extra reach of the grounding cast below the feet.
    pub step_correct_height: f32,
    /// Reach of the ground sampler feeding the ground frame.
    pub ground_sample_distance: f32,
    /// Rate at which the ground frame follows the ground normal.
    pub ground_normal_smooth_rate: f32,
    /// Drag applied while grounded.
    pub grounded_drag: f32,

    /// Bits of [`crate::CollisionLayer`] the character's casts see.
    pub layer_mask: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_input_threshold: 0.12,
            move_speed: 5.0,
            rotate_speed: 30.0,
            animation_blend_smoothing: 0.0,
            max_head_look_up: 1.5,
            max_head_look_down: -0.09,

            ledge_grab_height: 2.0,
            hop_height: 0.32,
            mount_height: 0.55,
            jump_to_ledge_grab_height: 1.7,
            max_ledge_angle: 45.0,
            width_check: 0.32,
            grounded_width_check: 0.45,
            midair_width_check: 0.7,
            leap_speed: 2.0,
            leap_wait_time: 0.5,
            arm_height: 0.5,
            vault_delay: 1.0,
            vault_hold_threshold: 0.02,
            pull_up_delay: 0.9,
            pull_up_hold_threshold: 0.5,
            pull_up_time: 1.0,
            pull_up_lerp_rate: 80.0,

            jump_height: 6.0,
            jump_forward_speed: 4.0,
            forward_ground_distance_to_jump: 0.5,
            forward_jump_slope_angle: 135.0,

            step_height: 0.1,
            step_smoothing: 30.0,
            step_correct_height: 0.3,
            ground_sample_distance: 1.0,
            ground_normal_smooth_rate: 20.0,
            grounded_drag: 20.0,

            layer_mask: environment_mask().bits,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("I/O while reading controller config: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
    #[error("'{field}' must be finite (got {value})")]
    NonFinite { field: &'static str, value: f32 },
    #[error("'{field}' must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("'{field}' must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error(
        "ledge tiers must ascend: hop_height {hop} < mount_height {mount} < jump_to_ledge_grab_height {jump_to_ledge}"
    )]
    TiersNotAscending { hop: f32, mount: f32, jump_to_ledge: f32 },
    #[error(
        "ledge_grab_height {ledge_grab} is below jump_to_ledge_grab_height {jump_to_ledge}; taller ledges could never be seen"
    )]
    LedgeCastTooLow { ledge_grab: f32, jump_to_ledge: f32 },
    #[error("step_height {0} leaves no room for the jumping ground cast")]
    StepHeightTooSmall(f32),
    #[error("max_ledge_angle must be within (0, 90) degrees (got {0})")]
    LedgeAngleOutOfRange(f32),
    #[error("layer_mask must select at least one collision layer")]
    EmptyLayerMask,
}

impl ControllerConfig {
    /// Parse a RON document and validate it.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|e| ConfigError::Ron(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Ron(e.to_string()))
    }

    #[inline]
    pub fn layers(&self) -> LayerMask {
        LayerMask::new(self.layer_mask)
    }

    /// Ground cast length used by step resolution.
    #[inline]
    pub fn grounding_cast_distance(&self, jumping: bool) -> f32 {
        if jumping {
            self.step_height - crate::constants::JUMP_CAST_SHRINK
        } else {
            self.step_height + self.step_correct_height
        }
    }

    /// Reject configurations that would make tier classification or probing undefined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.scalar_fields() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        for (field, value) in [
            ("move_speed", self.move_speed),
            ("rotate_speed", self.rotate_speed),
            ("move_input_threshold", self.move_input_threshold),
            ("animation_blend_smoothing", self.animation_blend_smoothing),
            ("leap_speed", self.leap_speed),
            ("leap_wait_time", self.leap_wait_time),
            ("arm_height", self.arm_height),
            ("vault_delay", self.vault_delay),
            ("vault_hold_threshold", self.vault_hold_threshold),
            ("pull_up_delay", self.pull_up_delay),
            ("pull_up_hold_threshold", self.pull_up_hold_threshold),
            ("pull_up_lerp_rate", self.pull_up_lerp_rate),
            ("jump_height", self.jump_height),
            ("jump_forward_speed", self.jump_forward_speed),
            ("forward_ground_distance_to_jump", self.forward_ground_distance_to_jump),
            ("step_smoothing", self.step_smoothing),
            ("step_correct_height", self.step_correct_height),
            ("ground_normal_smooth_rate", self.ground_normal_smooth_rate),
            ("grounded_drag", self.grounded_drag),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        for (field, value) in [
            ("hop_height", self.hop_height),
            ("ledge_grab_height", self.ledge_grab_height),
            ("width_check", self.width_check),
            ("grounded_width_check", self.grounded_width_check),
            ("midair_width_check", self.midair_width_check),
            ("pull_up_time", self.pull_up_time),
            ("ground_sample_distance", self.ground_sample_distance),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !(self.hop_height < self.mount_height
            && self.mount_height < self.jump_to_ledge_grab_height)
        {
            return Err(ConfigError::TiersNotAscending {
                hop: self.hop_height,
                mount: self.mount_height,
                jump_to_ledge: self.jump_to_ledge_grab_height,
            });
        }

        if self.ledge_grab_height < self.jump_to_ledge_grab_height {
            return Err(ConfigError::LedgeCastTooLow {
                ledge_grab: self.ledge_grab_height,
                jump_to_ledge: self.jump_to_ledge_grab_height,
            });
        }

        if self.step_height <= crate::constants::JUMP_CAST_SHRINK {
            return Err(ConfigError::StepHeightTooSmall(self.step_height));
        }

        if !(self.max_ledge_angle > 0.0 && self.max_ledge_angle < 90.0) {
            return Err(ConfigError::LedgeAngleOutOfRange(self.max_ledge_angle));
        }

        if self.layer_mask == 0 {
            return Err(ConfigError::EmptyLayerMask);
        }

        Ok(())
    }

    fn scalar_fields(&self) -> [(&'static str, f32); 33] {
        [
            ("move_input_threshold", self.move_input_threshold),
            ("move_speed", self.move_speed),
            ("rotate_speed", self.rotate_speed),
            ("animation_blend_smoothing", self.animation_blend_smoothing),
            ("max_head_look_up", self.max_head_look_up),
            ("max_head_look_down", self.max_head_look_down),
            ("ledge_grab_height", self.ledge_grab_height),
            ("hop_height", self.hop_height),
            ("mount_height", self.mount_height),
            ("jump_to_ledge_grab_height", self.jump_to_ledge_grab_height),
            ("max_ledge_angle", self.max_ledge_angle),
            ("width_check", self.width_check),
            ("grounded_width_check", self.grounded_width_check),
            ("midair_width_check", self.midair_width_check),
            ("leap_speed", self.leap_speed),
            ("leap_wait_time", self.leap_wait_time),
            ("arm_height", self.arm_height),
            ("vault_delay", self.vault_delay),
            ("vault_hold_threshold", self.vault_hold_threshold),
            ("pull_up_delay", self.pull_up_delay),
            ("pull_up_hold_threshold", self.pull_up_hold_threshold),
            ("pull_up_time", self.pull_up_time),
            ("pull_up_lerp_rate", self.pull_up_lerp_rate),
            ("jump_height", self.jump_height),
            ("jump_forward_speed", self.jump_forward_speed),
            ("forward_ground_distance_to_jump", self.forward_ground_distance_to_jump),
            ("forward_jump_slope_angle", self.forward_jump_slope_angle),
            ("step_height", self.step_height),
            ("step_smoothing", self.step_smoothing),
            ("step_correct_height", self.step_correct_height),
            ("ground_sample_distance", self.ground_sample_distance),
            ("ground_normal_smooth_rate", self.ground_normal_smooth_rate),
            ("grounded_drag", self.grounded_drag),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ControllerConfig::default()
            .validate()
            .expect("default tuning must validate");
    }

    #[test]
    fn rejects_non_ascending_tiers() {
        let config = ControllerConfig {
            mount_height: 0.2,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TiersNotAscending { .. })
        ));

        let equal = ControllerConfig {
            mount_height: 1.7,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            equal.validate(),
            Err(ConfigError::TiersNotAscending { .. })
        ));
    }

    #[test]
    fn rejects_nan_and_negative_values() {
        let nan = ControllerConfig {
            move_speed: f32::NAN,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::NonFinite { field: "move_speed", .. })
        ));

        let negative = ControllerConfig {
            vault_delay: -1.0,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::Negative { field: "vault_delay", .. })
        ));
    }

    #[test]
    fn rejects_ledge_cast_below_the_tallest_tier() {
        let config = ControllerConfig {
            ledge_grab_height: 0.3,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LedgeCastTooLow { .. })
        ));

        let level = ControllerConfig {
            ledge_grab_height: 1.7,
            ..ControllerConfig::default()
        };
        level.validate().expect("cast at the tallest tier still sees it");
    }

    #[test]
    fn rejects_step_height_without_jump_cast_room() {
        let config = ControllerConfig {
            step_height: 0.02,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StepHeightTooSmall(_))
        ));
    }

    #[test]
    fn grounding_cast_shortens_while_jumping() {
        let config = ControllerConfig::default();
        assert!((config.grounding_cast_distance(false) - 0.4).abs() < 1.0e-6);
        assert!((config.grounding_cast_distance(true) - 0.08).abs() < 1.0e-6);
    }

    #[test]
    fn partial_ron_falls_back_to_defaults() {
        let config = ControllerConfig::from_ron_str("(move_speed: 7.5, vault_delay: 0.25)")
            .expect("valid partial config");
        assert_eq!(config.move_speed, 7.5);
        assert_eq!(config.vault_delay, 0.25);
        assert_eq!(config.hop_height, ControllerConfig::default().hop_height);
    }

    #[test]
    fn invalid_ron_is_rejected() {
        assert!(matches!(
            ControllerConfig::from_ron_str("(move_speed: \"fast\")"),
            Err(ConfigError::Ron(_))
        ));
        assert!(matches!(
            ControllerConfig::from_ron_str("(hop_height: 0.9)"),
            Err(ConfigError::TiersNotAscending { .. })
        ));
    }

    #[test]
    fn ron_output_parses_back() {
        let config = ControllerConfig {
            rotate_speed: 12.0,
            ..ControllerConfig::default()
        };
        let text = config.to_ron_string().expect("serializable");
        assert_eq!(ControllerConfig::from_ron_str(&text).expect("parses"), config);
    }
}
