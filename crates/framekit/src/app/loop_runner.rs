use std::time::Instant;

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info};
use winit::error::{EventLoopError, OsError};

use crate::config::{ConfigError, FrameworkConfig};
use crate::logging::LoggingError;
use crate::random::Random;

use super::context::{Context, LoopState};
use super::events::{EventSource, FrameEvent};
use super::input::Key;
use super::metrics::MetricsAccumulator;
use super::rendering::{Canvas, Color, ScalingError, ScalingTransform};

#[derive(Debug, Error)]
pub enum FrameworkError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create display @ {width}x{height}: {source}")]
    CreateWindow {
        width: u32,
        height: u32,
        #[source]
        source: OsError,
    },
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("failed to present frame: {0}")]
    Present(#[source] PixelsError),
    #[error("failed to set up logical buffer: {0}")]
    Buffer(#[from] ScalingError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub trait Game {
    fn tick(&mut self, ctx: &mut Context);

    fn render(&mut self, ctx: &mut Context, canvas: &mut Canvas);
}

pub trait Presenter {
    fn present(
        &mut self,
        canvas: &Canvas,
        scaling: Option<&ScalingTransform>,
    ) -> Result<(), FrameworkError>;
}

#[derive(Debug)]
pub struct FrameDriver {
    context: Context,
    canvas: Canvas,
    clear_color: Color,
    redraw_due: bool,
    metrics: MetricsAccumulator,
}

impl FrameDriver {
    pub fn new(config: &FrameworkConfig, display_width: u32, display_height: u32) -> Self {
        let mut context = Context::new(
            display_width,
            display_height,
            Random::new(config.random_seed),
        );
        context.pause_on_focus_loss = config.pause_on_focus_loss;

        Self {
            context,
            canvas: Canvas::new(display_width, display_height),
            clear_color: config.clear_color,
            redraw_due: false,
            metrics: MetricsAccumulator::new(config.metrics_log_interval()),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn setup_buffer(&mut self, width: u32, height: u32) -> Result<(), FrameworkError> {
        let scaling = ScalingTransform::new(
            width,
            height,
            self.context.display_width,
            self.context.display_height,
        )?;
        self.install_scaling(scaling);
        Ok(())
    }

    pub fn setup_transformation(&mut self, width: u32, height: u32) -> Result<(), FrameworkError> {
        let scaling = ScalingTransform::stretched(
            width,
            height,
            self.context.display_width,
            self.context.display_height,
        )?;
        self.install_scaling(scaling);
        Ok(())
    }

    fn install_scaling(&mut self, scaling: ScalingTransform) {
        self.canvas = Canvas::new(scaling.buffer_width, scaling.buffer_height);
        self.context.scaling = Some(scaling);
        info!(
            buffer_width = scaling.buffer_width,
            buffer_height = scaling.buffer_height,
            mode = ?scaling.mode,
            scale_x = scaling.scale_x(),
            scale_y = scaling.scale_y(),
            offset_x = scaling.offset_x,
            offset_y = scaling.offset_y,
            "buffer_configured"
        );
    }

    pub fn run<S, P, G>(
        &mut self,
        source: &mut S,
        presenter: &mut P,
        game: &mut G,
    ) -> Result<(), FrameworkError>
    where
        S: EventSource + ?Sized,
        P: Presenter + ?Sized,
        G: Game + ?Sized,
    {
        info!(
            display_width = self.context.display_width,
            display_height = self.context.display_height,
            buffered = self.context.scaling.is_some(),
            "loop_started"
        );

        while self.context.loop_state.settle() != LoopState::Stopped {
            let event = source.wait_event()?;
            self.handle_event(event, game);

            if self.redraw_due && source.is_empty() {
                self.redraw(presenter, game)?;
            }
        }

        info!(ticks = self.context.tick_count, "loop_stopped");
        Ok(())
    }

    pub fn handle_event<G>(&mut self, event: FrameEvent, game: &mut G)
    where
        G: Game + ?Sized,
    {
        let context = &mut self.context;
        match event {
            FrameEvent::CloseRequested => {
                context.loop_state.request_stop();
                info!(reason = "window_close", "shutdown_requested");
            }
            FrameEvent::Tick => self.run_tick(game),
            FrameEvent::KeyDown(key) => context.input.on_key_down(key),
            FrameEvent::KeyUp(key) => context.input.on_key_up(key),
            FrameEvent::MouseMoved { x, y, dx, dy } => context.input.on_mouse_move(x, y, dx, dy),
            FrameEvent::MouseButtonDown(button) => context.input.on_mouse_button_down(button),
            FrameEvent::MouseButtonUp(button) => context.input.on_mouse_button_up(button),
            FrameEvent::FocusChanged(focused) => {
                context.focused = focused;
                if context.pause_on_focus_loss {
                    info!(paused = !focused, "focus_changed");
                }
            }
        }
    }

    /// Releases and focus changes still reach the context; a close yields `None`.
    pub fn wait_for_keypress<S>(&mut self, source: &mut S) -> Result<Option<Key>, FrameworkError>
    where
        S: EventSource + ?Sized,
    {
        loop {
            match source.wait_event()? {
                FrameEvent::KeyDown(key) => return Ok(Some(key)),
                FrameEvent::KeyUp(key) => self.context.input.on_key_up(key),
                FrameEvent::MouseButtonUp(button) => self.context.input.on_mouse_button_up(button),
                FrameEvent::FocusChanged(focused) => self.context.focused = focused,
                FrameEvent::CloseRequested => {
                    self.context.loop_state.request_stop();
                    info!(reason = "window_close", "shutdown_requested");
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    fn run_tick<G>(&mut self, game: &mut G)
    where
        G: Game + ?Sized,
    {
        if self.context.is_paused() {
            return;
        }

        self.redraw_due = true;
        game.tick(&mut self.context);
        self.context.input.begin_tick();
        self.context.tick_count = self.context.tick_count.saturating_add(1);
        self.metrics.record_tick();

        if self.context.loop_state == LoopState::Stopping {
            debug!(tick = self.context.tick_count, "quit_requested");
        }
    }

    fn redraw<P, G>(&mut self, presenter: &mut P, game: &mut G) -> Result<(), FrameworkError>
    where
        P: Presenter + ?Sized,
        G: Game + ?Sized,
    {
        self.redraw_due = false;
        self.canvas.clear(self.clear_color);
        game.render(&mut self.context, &mut self.canvas);
        presenter.present(&self.canvas, self.context.scaling.as_ref())?;

        let now = Instant::now();
        self.metrics.record_frame(now);
        if let Some(snapshot) = self.metrics.maybe_snapshot(now) {
            self.context.metrics = snapshot;
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                ticks = self.context.tick_count,
                "loop_metrics"
            );
        }
        Ok(())
    }
}
