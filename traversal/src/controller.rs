/*!
Character controller: the single owner of one character's traversal state.

Hosts drive it through an explicit lifecycle:
- `init(query)` once the body is placed,
- `tick(dt, input, query)` once per rendered frame (input, ledge scan, ground refresh),
- `fixed_tick(dt, query)` once per physics step (state machine dispatch and movement).

The controller never integrates the body; the host steps its physics between fixed ticks.
In any state other than `None`, locomotion, grounding and ledge scanning are skipped so only
the active vault handler writes to the body.
*/

use crate::animation::{AnimationSink, clips, params, play};
use crate::body::PhysicsBody;
use crate::camera::CameraProvider;
use crate::config::{ConfigError, ControllerConfig};
use crate::constants::HEAD_LOOK_LEDGE_DROP;
use crate::input::{InputFrame, InputProvider};
use crate::locomotion::{LocomotionController, LocomotionState, apply_jump};
use crate::sensing::{
    CollisionQuery, GroundFrame, GroundFrameTracker, GroundSample, GroundSampler, LedgeSample,
    LedgeScanner, LedgeTier, Point3, Vec3, resolve_grounding,
};
use crate::utils::forward_of;
use crate::vault::{ActionState, VaultMachine, VaultTick, VaultTimers};

/// Values handed to the foot-IK / head-look collaborator after every fixed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IkTargets {
    /// Plant the feet: the character is idle.
    pub enabled: bool,
    pub step_height: f32,
    /// World point the head should look at.
    pub look_target: Point3,
}

pub struct CharacterController<B, A, C> {
    config: ControllerConfig,
    body: B,
    animator: A,
    camera: C,

    vault: VaultMachine,
    locomotion: LocomotionController,
    ground_sampler: GroundSampler,
    frame_tracker: GroundFrameTracker,
    ledge_scanner: LedgeScanner,

    input: InputFrame,
    ground_sample: GroundSample,
    ledge: LedgeSample,
    grounded: bool,
    jumping: bool,
    jump_latched: bool,
    ground_cast_distance: f32,
    ik: IkTargets,
}

impl<B, A, C> CharacterController<B, A, C>
where
    B: PhysicsBody,
    A: AnimationSink,
    C: CameraProvider,
{
    /// Validate `config` and take ownership of the collaborators.
    pub fn new(config: ControllerConfig, body: B, animator: A, camera: C) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            log::warn!("rejecting controller config: {e}");
            return Err(e);
        }

        let position = body.position();
        Ok(Self {
            ground_sampler: GroundSampler::from_config(&config),
            frame_tracker: GroundFrameTracker::new(config.ground_normal_smooth_rate),
            ledge_scanner: LedgeScanner::new(&config),
            vault: VaultMachine::new(),
            locomotion: LocomotionController::new(),
            input: InputFrame::default(),
            ground_sample: GroundSample::miss(position),
            ledge: LedgeSample::default(),
            grounded: false,
            jumping: false,
            jump_latched: false,
            ground_cast_distance: config.grounding_cast_distance(false),
            ik: IkTargets {
                enabled: true,
                step_height: config.step_height,
                look_target: position,
            },
            config,
            body,
            animator,
            camera,
        })
    }

    /// Sample the ground under the body and snap the ground frame onto it.
    pub fn init<Q: CollisionQuery + ?Sized>(&mut self, query: &Q) {
        let position = self.body.position();
        self.ground_sample = self.ground_sampler.sample(query, position);
        self.frame_tracker
            .reset(position, &self.ground_sample, self.camera.right());
        log::info!(
            "character controller ready at {:?} (ground found: {})",
            position, self.ground_sample.valid
        );
    }

    /// Frame-rate tick: input, ledge scan, ground refresh and step resolution.
    pub fn tick<I, Q>(&mut self, dt: f32, input: &I, query: &Q)
    where
        I: InputProvider + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        self.input = InputFrame::sample(input);
        if self.vault.state() != ActionState::None {
            return;
        }

        if self.input.jump_pressed {
            self.jump_latched = true;
        }

        let position = self.body.position();
        let facing = forward_of(&self.body.rotation());
        self.ledge = self.ledge_scanner.scan(query, position, facing, &self.config);
        self.ground_sample = self.ground_sampler.sample(query, position);
        log::trace!(
            "ground sample valid {} normal {:?}",
            self.ground_sample.valid, self.ground_sample.normal
        );

        self.check_grounding(dt, query);
    }

    /// Fixed-rate tick: head look, then the active state's handler.
    pub fn fixed_tick<Q: CollisionQuery + ?Sized>(&mut self, dt: f32, query: &Q) {
        self.update_head_look();

        if self.vault.state() == ActionState::None {
            self.frame_tracker.update(
                dt,
                self.body.position(),
                &self.ground_sample,
                self.camera.right(),
            );

            let step = self.locomotion.update(
                dt,
                &self.input,
                self.frame_tracker.frame(),
                self.grounded,
                query,
                &mut self.body,
                &mut self.animator,
                &self.camera,
                &self.config,
            );
            self.ik.enabled = step.ik_enabled;

            if step.auto_jump {
                self.jump_latched = true;
            }
            if self.grounded && self.jump_latched {
                apply_jump(&mut self.body, &mut self.animator, step.movement, &self.config);
                self.jumping = true;
            }
            self.jump_latched = false;
        }

        let tick = VaultTick {
            dt,
            hold: self.input.stick_magnitude(),
            grounded: self.grounded,
            tier: self.ledge.tier,
            target: self.ledge.point,
            movement: self.locomotion.last_step().movement,
        };
        let transitioned =
            self.vault
                .fixed_update(&tick, query, &mut self.body, &mut self.animator, &self.config);

        if transitioned == Some(ActionState::None) {
            self.finish_vault();
        }
    }

    /// Move the body to `point` and drop whatever the character was doing.
    pub fn teleport(&mut self, point: Point3) {
        log::info!("teleport to {point:?}");
        self.body.set_position(point);
        self.body.set_velocity(Vec3::zeros());
        self.vault.reset();
        self.finish_vault();
        self.locomotion.reset();
    }

    fn check_grounding<Q: CollisionQuery + ?Sized>(&mut self, dt: f32, query: &Q) {
        let grounding = resolve_grounding(query, &mut self.body, &self.config, self.jumping, dt);
        self.grounded = grounding.grounded;
        self.ground_cast_distance = grounding.cast_distance;
        self.animator.set_bool(params::GROUNDED, self.grounded);
        self.ledge_scanner.set_grounded(self.grounded, &self.config);

        if self.grounded {
            self.jumping = false;
        } else if !self.jumping {
            play(&mut self.animator, clips::FALLING);
        }
    }

    /// Back in `None` after a vault or respawn: the old ledge is behind us.
    fn finish_vault(&mut self) {
        self.jumping = false;
        self.jump_latched = false;
        self.ledge.reachable = false;
        self.ledge.tier = LedgeTier::None;
        self.animator.set_bool(params::PULL_UP, false);
        self.animator.set_bool(params::HANGING, false);
    }

    fn update_head_look(&mut self) {
        let position = self.body.position();
        let vault = self.ledge.point;
        let target_y = match self.ledge.tier {
            LedgeTier::Mount | LedgeTier::JumpToLedge => vault.y - HEAD_LOOK_LEDGE_DROP,
            LedgeTier::None | LedgeTier::Hop => vault.y,
        };
        let y = target_y
            .max(position.y - self.config.max_head_look_down)
            .min(position.y + self.config.max_head_look_up);
        self.ik.look_target = Point3::new(vault.x, y, vault.z) + forward_of(&self.body.rotation());
    }

    // --- Accessors ---

    #[inline]
    pub fn state(&self) -> ActionState {
        self.vault.state()
    }

    #[inline]
    pub fn previous_state(&self) -> ActionState {
        self.vault.previous_state()
    }

    #[inline]
    pub fn timers(&self) -> &VaultTimers {
        self.vault.timers()
    }

    #[inline]
    pub fn locomotion_state(&self) -> LocomotionState {
        self.locomotion.state()
    }

    #[inline]
    pub fn grounded(&self) -> bool {
        self.grounded
    }

    #[inline]
    pub fn jumping(&self) -> bool {
        self.jumping
    }

    /// Length of the grounding cast used by the last step resolution.
    #[inline]
    pub fn ground_cast_distance(&self) -> f32 {
        self.ground_cast_distance
    }

    #[inline]
    pub fn width_check(&self) -> f32 {
        self.ledge_scanner.width_check
    }

    #[inline]
    pub fn ledge(&self) -> &LedgeSample {
        &self.ledge
    }

    #[inline]
    pub fn ground_sample(&self) -> &GroundSample {
        &self.ground_sample
    }

    #[inline]
    pub fn ground_frame(&self) -> &GroundFrame {
        self.frame_tracker.frame()
    }

    #[inline]
    pub fn ik_targets(&self) -> &IkTargets {
        &self.ik
    }

    /// Planar velocity locomotion asked for on the last fixed tick.
    #[inline]
    pub fn movement(&self) -> Vec3 {
        self.locomotion.last_step().movement
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[inline]
    pub fn body(&self) -> &B {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    #[inline]
    pub fn animator(&self) -> &A {
        &self.animator
    }

    #[inline]
    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    #[inline]
    pub fn camera(&self) -> &C {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }
}
