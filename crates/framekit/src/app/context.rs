use super::input::InputLatch;
use super::metrics::LoopMetricsSnapshot;
use super::rendering::{Font, ScalingTransform};
use crate::random::Random;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
    Stopped,
}

impl LoopState {
    pub(crate) fn request_stop(&mut self) {
        if *self == LoopState::Running {
            *self = LoopState::Stopping;
        }
    }

    pub(crate) fn settle(&mut self) -> LoopState {
        if *self == LoopState::Stopping {
            *self = LoopState::Stopped;
        }
        *self
    }
}

#[derive(Debug)]
pub struct Context {
    pub(crate) input: InputLatch,
    pub(crate) loop_state: LoopState,
    pub(crate) display_width: u32,
    pub(crate) display_height: u32,
    pub(crate) scaling: Option<ScalingTransform>,
    pub(crate) pause_on_focus_loss: bool,
    pub(crate) focused: bool,
    pub(crate) tick_count: u64,
    pub(crate) metrics: LoopMetricsSnapshot,
    font: Font,
    random: Random,
}

impl Context {
    pub(crate) fn new(display_width: u32, display_height: u32, random: Random) -> Self {
        Self {
            input: InputLatch::new(),
            loop_state: LoopState::Running,
            display_width,
            display_height,
            scaling: None,
            pause_on_focus_loss: true,
            focused: true,
            tick_count: 0,
            metrics: LoopMetricsSnapshot::default(),
            font: Font::default(),
            random,
        }
    }

    pub fn input(&self) -> &InputLatch {
        &self.input
    }

    pub fn random(&mut self) -> &mut Random {
        &mut self.random
    }

    pub fn default_font(&self) -> &Font {
        &self.font
    }

    pub fn window_width(&self) -> u32 {
        self.display_width
    }

    pub fn window_height(&self) -> u32 {
        self.display_height
    }

    pub fn scaling(&self) -> Option<&ScalingTransform> {
        self.scaling.as_ref()
    }

    /// Mouse position in logical-buffer pixels, or in display pixels when no buffer is set up.
    /// `None` while the cursor is over the letterbox border.
    pub fn mouse_buffer_position(&self) -> Option<(i32, i32)> {
        let (x, y) = (self.input.mouse_x(), self.input.mouse_y());
        match &self.scaling {
            Some(scaling) => scaling.display_to_buffer(x, y),
            None => Some((x, y)),
        }
    }

    pub fn quit(&mut self) {
        self.loop_state.request_stop();
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn is_paused(&self) -> bool {
        self.pause_on_focus_loss && !self.focused
    }

    pub fn set_pause_on_focus_loss(&mut self, enabled: bool) {
        self.pause_on_focus_loss = enabled;
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn metrics(&self) -> LoopMetricsSnapshot {
        self.metrics
    }
}
