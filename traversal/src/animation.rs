//! Animation sink seam plus the parameter and clip names the controller writes.
//!
//! The controller only ever writes to the sink. Nothing is read back.

use std::collections::HashMap;

pub trait AnimationSink {
    fn set_float(&mut self, param: &str, value: f32);
    fn set_bool(&mut self, param: &str, value: bool);
    fn set_trigger(&mut self, param: &str);
    fn play_clip(&mut self, clip: &str, blend_time: f32);
}

/// Animator parameter names.
pub mod params {
    pub const MOVE_SPEED: &str = "moveSpeed";
    pub const HORIZONTAL: &str = "horizontal";
    pub const VERTICAL: &str = "vertical";
    pub const LOCK_ON: &str = "lockOn";
    pub const GROUNDED: &str = "grounded";
    pub const HANGING: &str = "hanging";
    pub const PULL_UP: &str = "pullUp";
    pub const GRAB_LEDGE: &str = "grabLedge";
}

/// A clip name with its cross-fade time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clip {
    pub name: &'static str,
    pub blend_time: f32,
}

pub mod clips {
    use super::Clip;

    pub const JUMP: Clip = Clip { name: "Jump", blend_time: 0.2 };
    pub const FALLING: Clip = Clip { name: "Falling", blend_time: 0.02 };
    pub const HANGING_IDLE: Clip = Clip { name: "Hanging Idle", blend_time: 0.2 };
    pub const IDLE_TO_HANG: Clip = Clip { name: "Idle to Hang", blend_time: 0.2 };
    pub const HANG_PULL_UP: Clip = Clip { name: "Hang Pull Up", blend_time: 0.0 };
}

#[inline]
pub fn play<A: AnimationSink + ?Sized>(sink: &mut A, clip: Clip) {
    sink.play_clip(clip.name, clip.blend_time);
}

/// Sink that remembers everything written to it. Handy for replays and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingAnimator {
    pub floats: HashMap<String, f32>,
    pub bools: HashMap<String, bool>,
    pub triggers: Vec<String>,
    pub clips: Vec<(String, f32)>,
}

impl RecordingAnimator {
    pub fn float(&self, param: &str) -> Option<f32> {
        self.floats.get(param).copied()
    }

    pub fn flag(&self, param: &str) -> Option<bool> {
        self.bools.get(param).copied()
    }

    pub fn trigger_count(&self, param: &str) -> usize {
        self.triggers.iter().filter(|t| t.as_str() == param).count()
    }

    pub fn last_clip(&self) -> Option<&str> {
        self.clips.last().map(|(name, _)| name.as_str())
    }

    pub fn played(&self, clip: Clip) -> bool {
        self.clips.iter().any(|(name, _)| name == clip.name)
    }
}

impl AnimationSink for RecordingAnimator {
    fn set_float(&mut self, param: &str, value: f32) {
        self.floats.insert(param.to_owned(), value);
    }

    fn set_bool(&mut self, param: &str, value: bool) {
        self.bools.insert(param.to_owned(), value);
    }

    fn set_trigger(&mut self, param: &str) {
        self.triggers.push(param.to_owned());
    }

    fn play_clip(&mut self, clip: &str, blend_time: f32) {
        self.clips.push((clip.to_owned(), blend_time));
    }
}
