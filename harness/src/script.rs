//! Scripted input timeline and a logging animation sink.

use traversal::{AnimationSink, InputProvider, VirtualInput};

/// One segment of the timeline: `input` is held until `until` seconds.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub until: f32,
    pub input: VirtualInput,
}

impl Segment {
    pub fn new(until: f32, input: VirtualInput) -> Self {
        Self { until, input }
    }
}

/// Plays a list of segments back in order. A segment's jump is a press on its first
/// frame only; lock-on and the stick are held for the whole segment.
pub struct ScriptedInput {
    segments: Vec<Segment>,
    index: Option<usize>,
    current: VirtualInput,
}

impl ScriptedInput {
    pub fn new(mut segments: Vec<Segment>) -> Self {
        segments.sort_by(|a, b| a.until.total_cmp(&b.until));
        Self {
            segments,
            index: None,
            current: VirtualInput::default(),
        }
    }

    /// Walk the course: wait, hold forward over the curb, onto the crate and up the
    /// terrace, jump in place on top, strafe while locked on, then let go.
    pub fn course_run() -> Self {
        Self::new(vec![
            Segment::new(0.5, VirtualInput::default()),
            Segment::new(14.0, VirtualInput::stick(0.0, 1.0)),
            Segment::new(15.5, VirtualInput::default().with_jump()),
            Segment::new(16.0, VirtualInput::stick(0.5, 0.0).with_lock_on()),
            Segment::new(f32::INFINITY, VirtualInput::default()),
        ])
    }

    /// Select the segment active at `time` seconds.
    pub fn advance(&mut self, time: f32) {
        let index = self
            .segments
            .iter()
            .position(|segment| time < segment.until)
            .or_else(|| self.segments.len().checked_sub(1));

        let Some(index) = index else {
            self.current = VirtualInput::default();
            return;
        };

        let entered = self.index != Some(index);
        self.current = self.segments[index].input;
        self.current.jump_pressed &= entered;
        if entered {
            log::debug!("input segment {index} at {time:.2}s: {:?}", self.current);
            self.index = Some(index);
        }
    }
}

impl InputProvider for ScriptedInput {
    fn axis(&self, name: &str) -> f32 {
        self.current.axis(name)
    }

    fn button_held(&self, name: &str) -> bool {
        self.current.button_held(name)
    }

    fn button_pressed_this_frame(&self, name: &str) -> bool {
        self.current.button_pressed_this_frame(name)
    }
}

/// Writes animation events to the log instead of an animator.
#[derive(Default)]
pub struct LoggingAnimator;

impl AnimationSink for LoggingAnimator {
    fn set_float(&mut self, param: &str, value: f32) {
        log::trace!("anim {param} = {value:.3}");
    }

    fn set_bool(&mut self, param: &str, value: bool) {
        log::trace!("anim {param} = {value}");
    }

    fn set_trigger(&mut self, param: &str) {
        log::debug!("anim trigger {param}");
    }

    fn play_clip(&mut self, clip: &str, blend_time: f32) {
        log::debug!("anim play '{clip}' (blend {blend_time:.2}s)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traversal::input::names;

    #[test]
    fn jump_is_pressed_only_on_the_first_frame_of_its_segment() {
        let mut input = ScriptedInput::new(vec![
            Segment::new(1.0, VirtualInput::stick(0.0, 1.0)),
            Segment::new(2.0, VirtualInput::default().with_jump()),
        ]);

        input.advance(0.5);
        assert_eq!(input.axis(names::VERTICAL), 1.0);
        assert!(!input.button_pressed_this_frame(names::JUMP));

        input.advance(1.2);
        assert!(input.button_pressed_this_frame(names::JUMP));
        input.advance(1.3);
        assert!(!input.button_pressed_this_frame(names::JUMP));
        assert_eq!(input.axis(names::VERTICAL), 0.0);
    }

    #[test]
    fn last_segment_holds_past_the_end() {
        let mut input = ScriptedInput::new(vec![Segment::new(
            1.0,
            VirtualInput::stick(0.5, 0.0).with_lock_on(),
        )]);
        input.advance(5.0);
        assert_eq!(input.axis(names::HORIZONTAL), 0.5);
        assert!(input.button_held(names::LOCK_ON));
    }
}
