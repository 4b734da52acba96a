/*!
Grounded locomotion: stick input to velocity and facing, plus jumping.

Only runs while the vault state machine is idle. Every tick it
- projects the stick onto the ground frame,
- writes the locomotion animation parameters,
- turns and drives the body when grounded and the stick is past the dead zone,
- casts at the floor just ahead and raises an automatic jump on drops or steep descents.
*/

use nalgebra as na;

use crate::animation::{AnimationSink, clips, params, play};
use crate::body::PhysicsBody;
use crate::camera::CameraProvider;
use crate::config::ControllerConfig;
use crate::constants::{
    ANIM_MOVE_SPEED_SCALE, AUTO_JUMP_MIN_INPUT, DEGENERATE_FACING_LEN,
    FORWARD_GROUND_CAST_DISTANCE, FORWARD_GROUND_CAST_LEAD,
};
use crate::input::InputFrame;
use crate::sensing::{CollisionQuery, GroundFrame, Point3, Vec3, cast_down, world_up};
use crate::utils::{
    clamp_magnitude, flatten, forward_angle, lerp, look_rotation, normalize_or_zero, right_of,
    slerp_clamped,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LocomotionState {
    #[default]
    Normal,
    /// Strafe while facing the camera direction.
    LockOn,
}

impl LocomotionState {
    #[inline]
    pub fn from_input(lock_on_held: bool) -> Self {
        if lock_on_held { Self::LockOn } else { Self::Normal }
    }
}

/// What one locomotion pass decided.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocomotionStep {
    /// Desired planar velocity. Zero inside the stick dead zone.
    pub movement: Vec3,
    /// Length of the stick projected onto the ground frame.
    pub magnitude: f32,
    /// Foot IK should plant the feet (character is idle).
    pub ik_enabled: bool,
    /// The floor ahead asks for a jump.
    pub auto_jump: bool,
}

#[derive(Clone, Debug, Default)]
pub struct LocomotionController {
    state: LocomotionState,
    /// Smoothed `horizontal`/`vertical` animation parameters.
    blend: na::Vector2<f32>,
    last: LocomotionStep,
}

impl LocomotionController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> LocomotionState {
        self.state
    }

    /// Result of the most recent [`LocomotionController::update`].
    #[inline]
    pub fn last_step(&self) -> &LocomotionStep {
        &self.last
    }

    pub fn reset(&mut self) {
        self.last = LocomotionStep::default();
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update<Q, B, A, C>(
        &mut self,
        dt: f32,
        input: &InputFrame,
        frame: &GroundFrame,
        grounded: bool,
        query: &Q,
        body: &mut B,
        animator: &mut A,
        camera: &C,
        config: &ControllerConfig,
    ) -> LocomotionStep
    where
        Q: CollisionQuery + ?Sized,
        B: PhysicsBody + ?Sized,
        A: AnimationSink + ?Sized,
        C: CameraProvider + ?Sized,
    {
        self.state = LocomotionState::from_input(input.lock_on);

        let move_dir = frame.project_stick(input.stick.x, input.stick.y);
        let magnitude = move_dir.norm();
        let active = magnitude > config.move_input_threshold;

        self.write_animation(dt, input, body.velocity(), animator, config);

        let movement = if active {
            normalize_or_zero(move_dir) * config.move_speed
        } else {
            Vec3::zeros()
        };

        let facing = match self.state {
            LocomotionState::Normal => flatten(move_dir),
            LocomotionState::LockOn => camera.flat_forward(),
        };

        if active && grounded {
            if facing.norm() > DEGENERATE_FACING_LEN {
                if let Some(target) = look_rotation(facing, world_up()) {
                    let t = dt * magnitude * config.rotate_speed;
                    body.set_rotation(slerp_clamped(body.rotation(), target, t));
                }
            }
            body.set_velocity(movement);
        }

        // The drop clause needs a hard push; the steepness clause also fires in the dead zone.
        let body_right = right_of(&body.rotation());
        let auto_jump = facing.norm() > DEGENERATE_FACING_LEN
            && forward_ground_wants_jump(query, body.position(), movement, &body_right, magnitude, config);

        self.last = LocomotionStep {
            movement,
            magnitude,
            ik_enabled: magnitude < config.move_input_threshold,
            auto_jump,
        };
        self.last
    }

    fn write_animation<A: AnimationSink + ?Sized>(
        &mut self,
        dt: f32,
        input: &InputFrame,
        velocity: Vec3,
        animator: &mut A,
        config: &ControllerConfig,
    ) {
        let move_speed = if config.move_speed > 0.0 {
            let planar = flatten(velocity) / config.move_speed * ANIM_MOVE_SPEED_SCALE;
            clamp_magnitude(planar, 1.0).norm()
        } else {
            0.0
        };

        let stick = input.stick;
        let target = if stick.norm() > 1.0 { stick.normalize() } else { stick };
        if config.animation_blend_smoothing > 0.0 {
            let t = dt * config.animation_blend_smoothing;
            self.blend = na::Vector2::new(lerp(self.blend.x, target.x, t), lerp(self.blend.y, target.y, t));
        } else {
            self.blend = target;
        }

        animator.set_float(params::MOVE_SPEED, move_speed);
        animator.set_float(params::HORIZONTAL, self.blend.x);
        animator.set_float(params::VERTICAL, self.blend.y);
        animator.set_bool(params::LOCK_ON, self.state == LocomotionState::LockOn);
    }
}

/// Cast at the floor slightly ahead along `movement`.
///
/// Wants a jump when the floor drops away (or is missing) while the stick is pushed hard,
/// or when the surface ahead descends more steeply than `forward_jump_slope_angle`.
pub fn forward_ground_wants_jump<Q: CollisionQuery + ?Sized>(
    query: &Q,
    position: Point3,
    movement: Vec3,
    body_right: &Vec3,
    magnitude: f32,
    config: &ControllerConfig,
) -> bool {
    let origin =
        position + movement * FORWARD_GROUND_CAST_LEAD + world_up() * config.ledge_grab_height;
    let hit = cast_down(query, origin, FORWARD_GROUND_CAST_DISTANCE, config.layers());

    let dropped = hit.is_none_or(|h| h.point.y <= position.y - config.forward_ground_distance_to_jump);
    let steep = hit.is_some_and(|h| forward_angle(*body_right, h.normal) > config.forward_jump_slope_angle);

    (dropped && magnitude > AUTO_JUMP_MIN_INPUT) || steep
}

/// Launch a jump along `movement`: clear velocity, hand the body back to gravity, then add
/// `jump_forward_speed` along the flattened movement plus `jump_height` straight up.
pub fn apply_jump<B, A>(body: &mut B, animator: &mut A, movement: Vec3, config: &ControllerConfig)
where
    B: PhysicsBody + ?Sized,
    A: AnimationSink + ?Sized,
{
    body.set_velocity(Vec3::zeros());
    body.set_drag(0.0);
    body.set_gravity_enabled(true);

    let forward = normalize_or_zero(flatten(movement)) * config.jump_forward_speed;
    body.apply_impulse(forward + world_up() * config.jump_height);

    play(animator, clips::JUMP);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::RecordingAnimator;
    use crate::body::KinematicBody;
    use crate::camera::FixedCamera;
    use crate::input::VirtualInput;
    use crate::sensing::{GroundFrameTracker, GroundSample};
    use crate::test_support::TestWorld;
    use crate::utils::forward_of;

    struct Rig {
        world: TestWorld,
        body: KinematicBody,
        anim: RecordingAnimator,
        camera: FixedCamera,
        frame: GroundFrame,
        loco: LocomotionController,
        config: ControllerConfig,
    }

    impl Rig {
        fn flat() -> Self {
            Self::on(TestWorld::flat(0.0))
        }

        fn on(world: TestWorld) -> Self {
            let mut tracker = GroundFrameTracker::new(20.0);
            let sample = GroundSample {
                point: Point3::origin(),
                normal: Vec3::y(),
                valid: true,
            };
            tracker.update(0.0, Point3::origin(), &sample, Vec3::x());
            Self {
                world,
                body: KinematicBody::new(Point3::origin()),
                anim: RecordingAnimator::default(),
                camera: FixedCamera::default(),
                frame: *tracker.frame(),
                loco: LocomotionController::new(),
                config: ControllerConfig::default(),
            }
        }

        fn step(&mut self, input: VirtualInput, grounded: bool) -> LocomotionStep {
            let frame = InputFrame::sample(&input);
            self.loco.update(
                1.0 / 60.0,
                &frame,
                &self.frame,
                grounded,
                &self.world,
                &mut self.body,
                &mut self.anim,
                &self.camera,
                &self.config,
            )
        }
    }

    #[test]
    fn full_stick_drives_body_at_move_speed() {
        let mut rig = Rig::flat();
        let step = rig.step(VirtualInput::stick(0.0, 1.0), true);
        assert!(!step.ik_enabled);
        assert!((rig.body.velocity - Vec3::new(0.0, 0.0, 5.0)).norm() < 1.0e-4);
        assert!(!step.auto_jump);
    }

    #[test]
    fn dead_zone_suppresses_movement_and_enables_ik() {
        let mut rig = Rig::flat();
        let step = rig.step(VirtualInput::stick(0.05, 0.05), true);
        assert!(step.ik_enabled);
        assert_eq!(step.movement, Vec3::zeros());
        assert_eq!(rig.body.velocity, Vec3::zeros());
        assert_eq!(rig.body.rotation, crate::sensing::Quat::identity());
    }

    #[test]
    fn airborne_ticks_leave_velocity_alone() {
        let mut rig = Rig::flat();
        rig.body.velocity = Vec3::new(0.0, -3.0, 1.0);
        let step = rig.step(VirtualInput::stick(1.0, 0.0), false);
        assert!(step.movement.norm() > 0.0);
        assert_eq!(rig.body.velocity, Vec3::new(0.0, -3.0, 1.0));
    }

    #[test]
    fn turning_rate_scales_with_stick_magnitude() {
        let mut soft = Rig::flat();
        soft.step(VirtualInput::stick(0.3, 0.0), true);
        let mut hard = Rig::flat();
        hard.step(VirtualInput::stick(1.0, 0.0), true);

        let soft_turn = soft.body.rotation.angle();
        let hard_turn = hard.body.rotation.angle();
        assert!(soft_turn > 0.0);
        assert!(hard_turn > soft_turn);

        // Enough ticks end up facing the stick direction (+X).
        for _ in 0..30 {
            hard.step(VirtualInput::stick(1.0, 0.0), true);
        }
        assert!((forward_of(&hard.body.rotation) - Vec3::x()).norm() < 1.0e-3);
    }

    #[test]
    fn lock_on_faces_camera_while_strafing() {
        let mut rig = Rig::flat();
        for _ in 0..30 {
            rig.step(VirtualInput::stick(1.0, 0.0).with_lock_on(), true);
        }
        assert_eq!(rig.loco.state(), LocomotionState::LockOn);
        assert!((forward_of(&rig.body.rotation) - Vec3::z()).norm() < 1.0e-4);
        assert!((rig.body.velocity - Vec3::new(5.0, 0.0, 0.0)).norm() < 1.0e-3);
        assert_eq!(rig.anim.flag(params::LOCK_ON), Some(true));
    }

    #[test]
    fn animation_parameters_follow_velocity_and_stick() {
        let mut rig = Rig::flat();
        rig.body.velocity = Vec3::new(0.0, -4.0, 1.25);
        rig.step(VirtualInput::stick(2.0, 2.0), false);
        // |(0, 1.25) / 5 * 2| = 0.5; vertical velocity does not count.
        assert!((rig.anim.float(params::MOVE_SPEED).unwrap_or(-1.0) - 0.5).abs() < 1.0e-5);
        let h = rig.anim.float(params::HORIZONTAL).unwrap_or(0.0);
        let v = rig.anim.float(params::VERTICAL).unwrap_or(0.0);
        assert!((h - std::f32::consts::FRAC_1_SQRT_2).abs() < 1.0e-5);
        assert!((v - std::f32::consts::FRAC_1_SQRT_2).abs() < 1.0e-5);
        assert_eq!(rig.anim.flag(params::LOCK_ON), Some(false));
    }

    #[test]
    fn blend_smoothing_eases_axes() {
        let mut rig = Rig::flat();
        rig.config.animation_blend_smoothing = 6.0;
        rig.step(VirtualInput::stick(0.0, 1.0), true);
        let v = rig.anim.float(params::VERTICAL).unwrap_or(0.0);
        assert!((v - 0.1).abs() < 1.0e-5);
    }

    #[test]
    fn drop_ahead_raises_auto_jump_only_at_full_stick() {
        // Standing on a platform whose edge is right at the feet.
        let world = TestWorld::flat(-2.0)
            .with_box(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 0.0, 0.05));
        let mut rig = Rig::on(world);
        assert!(rig.step(VirtualInput::stick(0.0, 1.0), true).auto_jump);
        assert!(!rig.step(VirtualInput::stick(0.0, 0.7), true).auto_jump);
    }

    #[test]
    fn missing_ground_ahead_counts_as_a_drop() {
        let mut rig = Rig::on(TestWorld::empty());
        assert!(rig.step(VirtualInput::stick(0.0, 1.0), true).auto_jump);
    }

    #[test]
    fn steep_descent_ahead_raises_auto_jump() {
        let c = ControllerConfig::default();
        let gentle = Vec3::new(0.0, 1.0, 0.5).normalize();
        let steeper = Vec3::new(0.0, 0.5, 1.0).normalize();
        let world = TestWorld::flat(-5.0)
            .with_sloped_box(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 0.0, 1.0), steeper);
        assert!(forward_ground_wants_jump(&world, Point3::origin(), Vec3::z(), &Vec3::x(), 0.3, &c));

        let world = TestWorld::flat(-5.0)
            .with_sloped_box(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 0.0, 1.0), gentle);
        assert!(!forward_ground_wants_jump(&world, Point3::origin(), Vec3::z(), &Vec3::x(), 0.3, &c));
    }

    #[test]
    fn steep_descent_under_a_resting_stick_still_jumps() {
        let steeper = Vec3::new(0.0, 0.5, 1.0).normalize();
        let world = TestWorld::flat(-5.0)
            .with_sloped_box(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 0.0, 1.0), steeper);

        let mut rig = Rig::on(world.clone());
        let step = rig.step(VirtualInput::stick(0.0, 0.08), true);
        assert_eq!(step.movement, Vec3::zeros());
        assert!(step.auto_jump);

        // No stick at all leaves no facing to cast along.
        let mut idle = Rig::on(world);
        assert!(!idle.step(VirtualInput::default(), true).auto_jump);
    }

    #[test]
    fn jump_replaces_velocity_with_forward_and_up() {
        let config = ControllerConfig::default();
        let mut body = KinematicBody::new(Point3::origin());
        body.velocity = Vec3::new(3.0, -1.0, 2.0);
        body.drag = 20.0;
        body.gravity_enabled = false;
        let mut anim = RecordingAnimator::default();

        apply_jump(&mut body, &mut anim, Vec3::new(0.0, 0.0, 5.0), &config);

        assert!((body.velocity - Vec3::new(0.0, 6.0, 4.0)).norm() < 1.0e-5);
        assert_eq!(body.drag, 0.0);
        assert!(body.gravity_enabled);
        assert!(anim.played(clips::JUMP));
    }

    #[test]
    fn standing_jump_goes_straight_up() {
        let config = ControllerConfig::default();
        let mut body = KinematicBody::new(Point3::origin());
        let mut anim = RecordingAnimator::default();
        apply_jump(&mut body, &mut anim, Vec3::zeros(), &config);
        assert_eq!(body.velocity, Vec3::new(0.0, 6.0, 0.0));
    }
}
