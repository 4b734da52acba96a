/*!
Vault / ledge action state machine.

States (initial `None`):
- `None`: free locomotion. Watches the ledge tier ahead and either catches the ledge when
  the character leaves the ground, or commits to a vault after the stick has been held
  toward it for `vault_delay`.
- `LeapingToLedge`: crouches for `leap_wait_time`, then rises at `leap_speed` until the
  hands reach the ledge.
- `LedgeGrab`: hangs with the hands `arm_height` below the ledge. Holding the stick for
  `pull_up_delay` starts the pull-up.
- `PullingUp`: draws the body onto the ledge for `pull_up_time`, then returns to `None`.

All waiting is done by accumulating `dt` into [`VaultTimers`] and comparing against the
threshold at the top of the owning handler. Releasing the stick resets the hold timers to
zero. Every transition records the state it left and resets all timers.
*/

use crate::animation::{AnimationSink, clips, params, play};
use crate::body::PhysicsBody;
use crate::config::ControllerConfig;
use crate::constants::TIMER_EPS;
use crate::sensing::{CollisionQuery, LedgeTier, Point3, Vec3, face_wall, world_up};
use crate::utils::lerp_point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActionState {
    #[default]
    None,
    LeapingToLedge,
    LedgeGrab,
    PullingUp,
}

/// Elapsed time inside the current state, one accumulator per wait.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VaultTimers {
    /// Stick held toward a vaultable ledge.
    pub vault: f32,
    /// Crouch before a leap.
    pub leap_wait: f32,
    /// Stick held toward the ledge while hanging.
    pub ledge_grab_hold: f32,
    /// Time spent pulling up.
    pub pull_up: f32,
}

/// Everything a handler reads for one fixed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VaultTick {
    pub dt: f32,
    /// Left-stick magnitude.
    pub hold: f32,
    pub grounded: bool,
    /// Tier of the ledge the vault is aimed at.
    pub tier: LedgeTier,
    /// Ledge point the vault is aimed at.
    pub target: Point3,
    /// Last locomotion movement; steers the wall cast.
    pub movement: Vec3,
}

#[inline]
fn elapsed(timer: f32, threshold: f32) -> bool {
    timer + TIMER_EPS >= threshold
}

#[derive(Clone, Debug, Default)]
pub struct VaultMachine {
    state: ActionState,
    previous: ActionState,
    timers: VaultTimers,
}

impl VaultMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> ActionState {
        self.state
    }

    /// The state active immediately before the last transition.
    #[inline]
    pub fn previous_state(&self) -> ActionState {
        self.previous
    }

    #[inline]
    pub fn timers(&self) -> &VaultTimers {
        &self.timers
    }

    /// Switch states, remembering the one being left. Resets every timer.
    pub fn transition(&mut self, next: ActionState) {
        log::debug!("action state {:?} -> {:?}", self.state, next);
        self.previous = self.state;
        self.state = next;
        self.timers = VaultTimers::default();
    }

    /// Back to `None` with cleared timers, as on a respawn.
    pub fn reset(&mut self) {
        if self.state == ActionState::None {
            self.timers = VaultTimers::default();
        } else {
            self.transition(ActionState::None);
        }
    }

    /// Run the active state's handler, then the entry effects of any state it hands over to.
    /// Returns the new state when a transition happened.
    pub fn fixed_update<Q, B, A>(
        &mut self,
        tick: &VaultTick,
        query: &Q,
        body: &mut B,
        animator: &mut A,
        config: &ControllerConfig,
    ) -> Option<ActionState>
    where
        Q: CollisionQuery + ?Sized,
        B: PhysicsBody + ?Sized,
        A: AnimationSink + ?Sized,
    {
        let next = match self.state {
            ActionState::None => self.handle_none(tick, config),
            ActionState::LeapingToLedge => self.handle_leap(tick, query, body, config),
            ActionState::LedgeGrab => self.handle_ledge_grab(tick, query, body, animator, config),
            ActionState::PullingUp => self.handle_pull_up(tick, body, animator, config),
        }?;

        let from = self.state;
        self.transition(next);
        enter(from, next, tick, query, body, animator, config);
        Some(next)
    }

    fn handle_none(&mut self, tick: &VaultTick, config: &ControllerConfig) -> Option<ActionState> {
        if tick.tier == LedgeTier::None {
            self.timers.vault = 0.0;
            return None;
        }

        if !tick.grounded {
            return Some(ActionState::LedgeGrab);
        }

        if tick.hold > config.vault_hold_threshold {
            self.timers.vault += tick.dt;
            if elapsed(self.timers.vault, config.vault_delay) {
                return Some(match tick.tier {
                    LedgeTier::JumpToLedge => ActionState::LeapingToLedge,
                    _ => ActionState::PullingUp,
                });
            }
        } else {
            self.timers.vault = 0.0;
        }
        None
    }

    fn handle_leap<Q, B>(
        &mut self,
        tick: &VaultTick,
        query: &Q,
        body: &mut B,
        config: &ControllerConfig,
    ) -> Option<ActionState>
    where
        Q: CollisionQuery + ?Sized,
        B: PhysicsBody + ?Sized,
    {
        self.timers.leap_wait += tick.dt;
        if !elapsed(self.timers.leap_wait, config.leap_wait_time) {
            return None;
        }

        face_wall(query, body, tick.movement, config);
        body.set_velocity(world_up() * config.leap_speed);

        let reach = body.position().y + config.jump_to_ledge_grab_height + config.arm_height;
        (reach >= tick.target.y).then_some(ActionState::LedgeGrab)
    }

    fn handle_ledge_grab<Q, B, A>(
        &mut self,
        tick: &VaultTick,
        query: &Q,
        body: &mut B,
        animator: &mut A,
        config: &ControllerConfig,
    ) -> Option<ActionState>
    where
        Q: CollisionQuery + ?Sized,
        B: PhysicsBody + ?Sized,
        A: AnimationSink + ?Sized,
    {
        animator.set_bool(params::HANGING, true);

        // Hands on the ledge: feet hang `jump_to_ledge_grab_height - arm_height` below it.
        let mut position = body.position();
        position.y = tick.target.y - (config.jump_to_ledge_grab_height - config.arm_height);
        body.set_position(position);

        face_wall(query, body, tick.movement, config);

        if tick.hold >= config.pull_up_hold_threshold {
            self.timers.ledge_grab_hold += tick.dt;
            if elapsed(self.timers.ledge_grab_hold, config.pull_up_delay) {
                return Some(ActionState::PullingUp);
            }
        } else {
            self.timers.ledge_grab_hold = 0.0;
        }
        None
    }

    fn handle_pull_up<B, A>(
        &mut self,
        tick: &VaultTick,
        body: &mut B,
        animator: &mut A,
        config: &ControllerConfig,
    ) -> Option<ActionState>
    where
        B: PhysicsBody + ?Sized,
        A: AnimationSink + ?Sized,
    {
        animator.set_bool(params::PULL_UP, true);
        body.set_position(lerp_point(
            body.position(),
            tick.target,
            tick.dt * config.pull_up_lerp_rate,
        ));

        self.timers.pull_up += tick.dt;
        elapsed(self.timers.pull_up, config.pull_up_time).then_some(ActionState::None)
    }
}

/// Entry effects of `to`, some depending on where the machine came from.
fn enter<Q, B, A>(
    from: ActionState,
    to: ActionState,
    tick: &VaultTick,
    query: &Q,
    body: &mut B,
    animator: &mut A,
    config: &ControllerConfig,
) where
    Q: CollisionQuery + ?Sized,
    B: PhysicsBody + ?Sized,
    A: AnimationSink + ?Sized,
{
    match to {
        ActionState::None => {
            animator.set_bool(params::PULL_UP, false);
            animator.set_bool(params::HANGING, false);
        }
        ActionState::LeapingToLedge => {
            hold_still(body);
            body.set_drag(0.0);
            play(animator, clips::IDLE_TO_HANG);
        }
        ActionState::LedgeGrab => {
            hold_still(body);
            if from == ActionState::None {
                play(animator, clips::HANGING_IDLE);
            }
            animator.set_trigger(params::GRAB_LEDGE);
        }
        ActionState::PullingUp => {
            hold_still(body);
            if from == ActionState::None {
                face_wall(query, body, tick.movement, config);
                play(animator, clips::HANG_PULL_UP);
            }
        }
    }
}

/// Zero velocity and switch gravity off: the active state owns the motion.
fn hold_still<B: PhysicsBody + ?Sized>(body: &mut B) {
    body.set_velocity(Vec3::zeros());
    body.set_gravity_enabled(false);
}
