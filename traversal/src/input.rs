//! Input provider seam and the per-frame snapshot the controller works from.

use nalgebra as na;

pub trait InputProvider {
    /// Axis value in [-1, 1].
    fn axis(&self, name: &str) -> f32;
    fn button_held(&self, name: &str) -> bool;
    fn button_pressed_this_frame(&self, name: &str) -> bool;
}

/// Input names the controller asks for.
pub mod names {
    pub const HORIZONTAL: &str = "Horizontal";
    pub const VERTICAL: &str = "Vertical";
    pub const JUMP: &str = "Jump";
    pub const LOCK_ON: &str = "LeftBumper";
}

/// Input sampled once per frame tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Left stick: x = horizontal, y = vertical.
    pub stick: na::Vector2<f32>,
    pub lock_on: bool,
    pub jump_pressed: bool,
}

impl InputFrame {
    pub fn sample<I: InputProvider + ?Sized>(input: &I) -> Self {
        Self {
            stick: na::Vector2::new(
                input.axis(names::HORIZONTAL).clamp(-1.0, 1.0),
                input.axis(names::VERTICAL).clamp(-1.0, 1.0),
            ),
            lock_on: input.button_held(names::LOCK_ON),
            jump_pressed: input.button_pressed_this_frame(names::JUMP),
        }
    }

    #[inline]
    pub fn stick_magnitude(&self) -> f32 {
        self.stick.norm()
    }
}

/// Input provider driven by code: AI, replays, scripted tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VirtualInput {
    pub horizontal: f32,
    pub vertical: f32,
    pub lock_on: bool,
    pub jump_pressed: bool,
}

impl VirtualInput {
    pub fn stick(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
            ..Self::default()
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    pub fn with_lock_on(mut self) -> Self {
        self.lock_on = true;
        self
    }
}

impl InputProvider for VirtualInput {
    fn axis(&self, name: &str) -> f32 {
        match name {
            names::HORIZONTAL => self.horizontal,
            names::VERTICAL => self.vertical,
            _ => 0.0,
        }
    }

    fn button_held(&self, name: &str) -> bool {
        match name {
            names::LOCK_ON => self.lock_on,
            names::JUMP => self.jump_pressed,
            _ => false,
        }
    }

    fn button_pressed_this_frame(&self, name: &str) -> bool {
        name == names::JUMP && self.jump_pressed
    }
}
