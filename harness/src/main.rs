//! Headless host for the traversal controller.
//!
//! Builds the obstacle course as a Rapier query world, then runs a scripted character
//! across it. Run with `RUST_LOG=debug` to see animation events and landings.
//!
//! Usage: `harness [--config controller.ron] [--seconds 17.5]`

mod body;
mod camera;
mod course;
mod script;
mod sim;

use std::path::PathBuf;

use traversal::{ActionState, ControllerConfig};

use crate::script::ScriptedInput;

struct Args {
    config: Option<PathBuf>,
    seconds: f32,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        seconds: 17.5,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                let path = it.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--seconds" => {
                let value = it.next().ok_or("--seconds needs a value")?;
                args.seconds = value
                    .parse()
                    .map_err(|e| format!("bad --seconds '{value}': {e}"))?;
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(args)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            log::info!("loading controller config from {}", path.display());
            ControllerConfig::load(path)?
        }
        None => ControllerConfig::default(),
    };

    let report = sim::run_course(config, args.seconds, ScriptedInput::course_run())?;

    log::info!(
        "finished after {} frames / {} physics steps at {:?} (grounded: {}, state: {:?}, transitions: {}, respawns: {})",
        report.frames,
        report.steps,
        report.position,
        report.grounded,
        report.state,
        report.transitions.len(),
        report.respawns,
    );
    for t in &report.transitions {
        log::debug!("{:.2}s: {:?} -> {:?}", t.time, t.from, t.to);
    }
    if report.state != ActionState::None {
        log::warn!("run ended mid-vault");
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
