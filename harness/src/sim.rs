//! The host loop: uneven frames over a fixed-rate physics accumulator.

use traversal::{
    ActionState, CharacterController, ConfigError, ControllerConfig, PhysicsBody, Point3,
    RapierQueryWorld,
};

use crate::body::HarnessBody;
use crate::camera::FollowCamera;
use crate::course;
use crate::script::{LoggingAnimator, ScriptedInput};

pub const FIXED_DT: f32 = 1.0 / 60.0;
/// Cap on physics steps per frame so a long frame cannot stall the loop.
const MAX_STEPS_PER_FRAME: u32 = 5;
/// Frame times cycle through these multiples of the fixed step.
const FRAME_JITTER: [f32; 6] = [1.0, 1.4, 0.6, 2.1, 0.9, 0.5];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub time: f32,
    pub from: ActionState,
    pub to: ActionState,
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub transitions: Vec<Transition>,
    pub frames: usize,
    pub steps: u64,
    pub respawns: u32,
    pub position: Point3,
    pub grounded: bool,
    pub state: ActionState,
}

/// Run `input` over the course for `seconds` of simulated time.
pub fn run_course(
    config: ControllerConfig,
    seconds: f32,
    mut input: ScriptedInput,
) -> Result<RunReport, ConfigError> {
    let world = RapierQueryWorld::build(course::obstacles());
    let spawn = course::spawn();
    let body = HarnessBody::new(spawn, config.layers());
    let camera = FollowCamera::new(spawn);
    let mut character = CharacterController::new(config, body, LoggingAnimator, camera)?;
    character.init(&world);

    let mut transitions = Vec::new();
    let mut time = 0.0_f32;
    let mut accumulator = 0.0_f32;
    let mut frames = 0_usize;
    let mut steps = 0_u64;
    let mut respawns = 0_u32;

    while time < seconds {
        let dt = FIXED_DT * FRAME_JITTER[frames % FRAME_JITTER.len()];
        frames += 1;
        time += dt;

        input.advance(time);
        character.tick(dt, &input, &world);

        accumulator += dt;
        let mut frame_steps = 0;
        while accumulator >= FIXED_DT && frame_steps < MAX_STEPS_PER_FRAME {
            let from = character.state();
            character.fixed_tick(FIXED_DT, &world);
            character.body_mut().step(FIXED_DT, &world);
            accumulator -= FIXED_DT;
            frame_steps += 1;
            steps += 1;

            let to = character.state();
            if to != from {
                log::info!(
                    "{time:.2}s: {from:?} -> {to:?} at {:?}",
                    character.body().position()
                );
                transitions.push(Transition { time, from, to });
            }
        }
        if frame_steps == MAX_STEPS_PER_FRAME {
            accumulator = 0.0;
        }

        let position = character.body().position();
        character.camera_mut().follow(dt, position);

        if position.y < course::KILL_PLANE_Y {
            log::warn!("fell out of the course at {position:?}, respawning");
            character.teleport(spawn);
            respawns += 1;
        }
    }

    Ok(RunReport {
        transitions,
        frames,
        steps,
        respawns,
        position: character.body().position(),
        grounded: character.grounded(),
        state: character.state(),
    })
}
