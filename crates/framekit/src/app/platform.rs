use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use tracing::{info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton as WinitMouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::config::FrameworkConfig;

use super::context::Context;
use super::events::{EventSource, FrameEvent};
use super::input::{Key, MouseButton};
use super::loop_runner::{FrameDriver, FrameworkError, Game, Presenter};
use super::rendering::{Canvas, ScalingTransform};

pub struct Framework {
    driver: FrameDriver,
    source: WinitEventSource,
    presenter: PixelsPresenter,
}

impl Framework {
    pub fn init(config: &FrameworkConfig) -> Result<Self, FrameworkError> {
        let event_loop = EventLoop::new().map_err(FrameworkError::CreateEventLoop)?;
        let mut builder = WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(PhysicalSize::new(config.window_width, config.window_height))
            .with_resizable(false);
        if config.fullscreen {
            builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        let window = Arc::new(builder.build(&event_loop).map_err(|source| {
            FrameworkError::CreateWindow {
                width: config.window_width,
                height: config.window_height,
                source,
            }
        })?);

        let monitor_size = config
            .fullscreen
            .then(|| window.current_monitor())
            .flatten()
            .map(|monitor| monitor.size());
        let size = display_size(window.inner_size(), monitor_size);
        let presenter = PixelsPresenter::new(Arc::clone(&window), size.width, size.height)?;
        let source = WinitEventSource::new(event_loop, window, config.tick_interval());
        let driver = FrameDriver::new(config, size.width, size.height);

        info!(
            title = config.window_title.as_str(),
            display_width = size.width,
            display_height = size.height,
            fullscreen = config.fullscreen,
            tick_rate = config.tick_rate.max(1),
            "framework_initialized"
        );

        Ok(Self {
            driver,
            source,
            presenter,
        })
    }

    pub fn setup_buffer(&mut self, width: u32, height: u32) -> Result<(), FrameworkError> {
        self.driver.setup_buffer(width, height)
    }

    pub fn setup_transformation(&mut self, width: u32, height: u32) -> Result<(), FrameworkError> {
        self.driver.setup_transformation(width, height)
    }

    pub fn run<G>(&mut self, game: &mut G) -> Result<(), FrameworkError>
    where
        G: Game + ?Sized,
    {
        self.driver.run(&mut self.source, &mut self.presenter, game)
    }

    pub fn wait_for_keypress(&mut self) -> Result<Option<Key>, FrameworkError> {
        self.driver.wait_for_keypress(&mut self.source)
    }

    pub fn context(&self) -> &Context {
        self.driver.context()
    }

    pub fn context_mut(&mut self) -> &mut Context {
        self.driver.context_mut()
    }
}

// At most one tick is queued per wakeup; a late schedule resyncs instead of bursting.
pub struct WinitEventSource {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    pending: VecDeque<FrameEvent>,
    cursor: Option<(i32, i32)>,
    tick_interval: Duration,
    next_tick: Instant,
    exited: bool,
}

impl WinitEventSource {
    fn new(event_loop: EventLoop<()>, window: Arc<Window>, tick_interval: Duration) -> Self {
        Self {
            event_loop,
            window,
            pending: VecDeque::new(),
            cursor: None,
            tick_interval,
            next_tick: Instant::now() + tick_interval,
            exited: false,
        }
    }

    fn pump(&mut self, timeout: Duration) {
        let window_id = self.window.id();
        let pending = &mut self.pending;
        let cursor = &mut self.cursor;
        let status = self
            .event_loop
            .pump_events(Some(timeout), |event, _| {
                if let Event::WindowEvent {
                    window_id: event_window,
                    event,
                } = event
                {
                    if event_window == window_id {
                        translate_window_event(&event, cursor, pending);
                    }
                }
            });

        if let PumpStatus::Exit(code) = status {
            if code != 0 {
                warn!(code, "event_loop_exit_code");
            }
            self.exited = true;
            self.pending.push_back(FrameEvent::CloseRequested);
        }
    }

    fn queue_due_tick(&mut self) {
        let now = Instant::now();
        if now < self.next_tick {
            return;
        }
        self.pending.push_back(FrameEvent::Tick);
        self.next_tick += self.tick_interval;
        if self.next_tick <= now {
            self.next_tick = now + self.tick_interval;
        }
    }
}

impl EventSource for WinitEventSource {
    fn wait_event(&mut self) -> Result<FrameEvent, FrameworkError> {
        loop {
            self.queue_due_tick();
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }
            if self.exited {
                return Ok(FrameEvent::CloseRequested);
            }
            let timeout = self.next_tick.saturating_duration_since(Instant::now());
            self.pump(timeout);
        }
    }

    fn is_empty(&mut self) -> bool {
        if self.pending.is_empty() && !self.exited {
            self.pump(Duration::ZERO);
            self.queue_due_tick();
        }
        self.pending.is_empty()
    }
}

// Borderless fullscreen is applied asynchronously on some platforms, so the monitor size
// wins over the inner size read right after window creation.
fn display_size(
    inner: PhysicalSize<u32>,
    fullscreen_monitor: Option<PhysicalSize<u32>>,
) -> PhysicalSize<u32> {
    match fullscreen_monitor {
        Some(size) if size.width > 0 && size.height > 0 => size,
        _ => inner,
    }
}

fn translate_window_event(
    event: &WindowEvent,
    cursor: &mut Option<(i32, i32)>,
    out: &mut VecDeque<FrameEvent>,
) {
    match event {
        WindowEvent::CloseRequested => out.push_back(FrameEvent::CloseRequested),
        WindowEvent::Focused(focused) => out.push_back(FrameEvent::FocusChanged(*focused)),
        WindowEvent::KeyboardInput { event, .. } => {
            if event.repeat {
                return;
            }
            let PhysicalKey::Code(code) = event.physical_key else {
                return;
            };
            let Some(key) = key_from_code(code) else {
                return;
            };
            out.push_back(match event.state {
                ElementState::Pressed => FrameEvent::KeyDown(key),
                ElementState::Released => FrameEvent::KeyUp(key),
            });
        }
        WindowEvent::CursorMoved { position, .. } => {
            let x = position.x.round() as i32;
            let y = position.y.round() as i32;
            out.push_back(cursor_moved(cursor, x, y));
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let Some(button) = mouse_button_from_winit(*button) else {
                return;
            };
            out.push_back(match state {
                ElementState::Pressed => FrameEvent::MouseButtonDown(button),
                ElementState::Released => FrameEvent::MouseButtonUp(button),
            });
        }
        _ => {}
    }
}

fn cursor_moved(cursor: &mut Option<(i32, i32)>, x: i32, y: i32) -> FrameEvent {
    let (dx, dy) = match *cursor {
        Some((last_x, last_y)) => (x - last_x, y - last_y),
        None => (0, 0),
    };
    *cursor = Some((x, y));
    FrameEvent::MouseMoved { x, y, dx, dy }
}

fn mouse_button_from_winit(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

fn key_from_code(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 => Key::Num0,
        KeyCode::Digit1 => Key::Num1,
        KeyCode::Digit2 => Key::Num2,
        KeyCode::Digit3 => Key::Num3,
        KeyCode::Digit4 => Key::Num4,
        KeyCode::Digit5 => Key::Num5,
        KeyCode::Digit6 => Key::Num6,
        KeyCode::Digit7 => Key::Num7,
        KeyCode::Digit8 => Key::Num8,
        KeyCode::Digit9 => Key::Num9,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::Escape => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Space => Key::Space,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::ControlLeft => Key::LeftCtrl,
        KeyCode::ControlRight => Key::RightCtrl,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::AltRight => Key::RightAlt,
        KeyCode::Minus => Key::Minus,
        KeyCode::Equal => Key::Equals,
        KeyCode::Comma => Key::Comma,
        KeyCode::Period => Key::Period,
        KeyCode::Slash => Key::Slash,
        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Quote => Key::Quote,
        KeyCode::Backquote => Key::Backquote,
        KeyCode::BracketLeft => Key::LeftBracket,
        KeyCode::BracketRight => Key::RightBracket,
        KeyCode::Backslash => Key::Backslash,
        _ => return None,
    };
    Some(key)
}

pub struct PixelsPresenter {
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl PixelsPresenter {
    fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, FrameworkError> {
        let width = width.max(1);
        let height = height.max(1);
        let surface = SurfaceTexture::new(width, height, window);
        let pixels = Pixels::new(width, height, surface).map_err(FrameworkError::CreateRenderer)?;
        Ok(Self {
            pixels,
            width,
            height,
        })
    }
}

impl Presenter for PixelsPresenter {
    fn present(
        &mut self,
        canvas: &Canvas,
        scaling: Option<&ScalingTransform>,
    ) -> Result<(), FrameworkError> {
        let frame = self.pixels.frame_mut();
        frame.fill(0);
        match scaling {
            Some(scaling) => scaling.blit(canvas, frame, self.width, self.height),
            None => copy_unscaled(canvas, frame, self.width, self.height),
        }
        self.pixels.render().map_err(FrameworkError::Present)
    }
}

fn copy_unscaled(canvas: &Canvas, frame: &mut [u8], frame_width: u32, frame_height: u32) {
    let copy_width = canvas.width().min(frame_width) as usize * 4;
    let rows = canvas.height().min(frame_height) as usize;
    let source_stride = canvas.width() as usize * 4;
    let frame_stride = frame_width as usize * 4;
    let source = canvas.frame();

    for row in 0..rows {
        let src = row * source_stride;
        let dst = row * frame_stride;
        frame[dst..dst + copy_width].copy_from_slice(&source[src..src + copy_width]);
    }
}
