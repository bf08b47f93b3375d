use std::env;
use std::process;

use framekit::{
    circles_intersect, colors, deg_to_rad, init_logging, rectangle_contains_point, Canvas, Circle,
    Color, Context, Framework, FrameworkConfig, FrameworkError, Game, Key, MouseButton, Point,
    Rectangle, Velocity,
};
use tracing::{error, info};

const CONFIG_ENV_VAR: &str = "FRAMEKIT_CONFIG";
const BUFFER_WIDTH: u32 = 320;
const BUFFER_HEIGHT: u32 = 240;
const PLAYER_SIZE: f32 = 12.0;
const PLAYER_SPEED: f32 = 2.0;
const TARGET_RADIUS: f32 = 6.0;
const MAX_PARTICLES: usize = 256;
const PARTICLE_PALETTE: [Color; 5] = [
    colors::YELLOW,
    colors::CYAN,
    colors::MAGENTA,
    colors::LIME,
    colors::WHITE,
];

#[derive(Debug, Clone, Copy)]
struct Particle {
    position: Point,
    velocity: Velocity,
    ttl: u32,
    color: Color,
}

#[derive(Debug)]
struct DemoGame {
    player: Rectangle,
    target: Circle,
    particles: Vec<Particle>,
    score: u32,
}

impl DemoGame {
    fn new() -> Self {
        Self {
            player: Rectangle::new(
                (BUFFER_WIDTH as f32 - PLAYER_SIZE) / 2.0,
                (BUFFER_HEIGHT as f32 - PLAYER_SIZE) / 2.0,
                PLAYER_SIZE,
                PLAYER_SIZE,
            ),
            target: Circle::new(40.0, 40.0, TARGET_RADIUS),
            particles: Vec::new(),
            score: 0,
        }
    }

    fn player_circle(&self) -> Circle {
        let half = self.player.w / 2.0;
        Circle::new(self.player.x + half, self.player.y + half, half)
    }

    fn move_player(&mut self, velocity: Velocity) {
        let moved = velocity.apply(Point::new(self.player.x, self.player.y));
        self.player.x = moved.x.clamp(0.0, BUFFER_WIDTH as f32 - self.player.w);
        self.player.y = moved.y.clamp(0.0, BUFFER_HEIGHT as f32 - self.player.h);
    }

    fn relocate_target(&mut self, ctx: &mut Context) {
        let random = ctx.random();
        self.target.x = random.random_float(TARGET_RADIUS, BUFFER_WIDTH as f32 - TARGET_RADIUS);
        self.target.y = random.random_float(TARGET_RADIUS, BUFFER_HEIGHT as f32 - TARGET_RADIUS);
    }

    fn spawn_burst(&mut self, ctx: &mut Context, origin: Point) {
        let random = ctx.random();
        let count = random.random_int(6, 12);
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle = deg_to_rad(random.random_float(0.0, 360.0));
            let speed = random.random_float(0.5, 2.0);
            let color_index = random.random_int(0, PARTICLE_PALETTE.len() as i32 - 1) as usize;
            self.particles.push(Particle {
                position: origin,
                velocity: Velocity::new(angle.cos() * speed, angle.sin() * speed),
                ttl: random.roll_dice(2, 20).max(1) as u32,
                color: PARTICLE_PALETTE[color_index],
            });
        }
    }

    fn update_particles(&mut self) {
        let bounds = Rectangle::new(0.0, 0.0, BUFFER_WIDTH as f32, BUFFER_HEIGHT as f32);
        for particle in &mut self.particles {
            particle.position = particle.velocity.apply(particle.position);
            particle.ttl = particle.ttl.saturating_sub(1);
        }
        self.particles.retain(|particle| {
            particle.ttl > 0 && rectangle_contains_point(bounds, particle.position)
        });
    }
}

impl Game for DemoGame {
    fn tick(&mut self, ctx: &mut Context) {
        let input = ctx.input();
        if input.is_key_pressed(Key::Escape) {
            info!(reason = "escape_key", "shutdown_requested");
            ctx.quit();
            return;
        }

        let mut velocity = Velocity::default();
        if input.is_key_down(Key::Left) || input.is_key_down(Key::A) {
            velocity.dx -= PLAYER_SPEED;
        }
        if input.is_key_down(Key::Right) || input.is_key_down(Key::D) {
            velocity.dx += PLAYER_SPEED;
        }
        if input.is_key_down(Key::Up) || input.is_key_down(Key::W) {
            velocity.dy -= PLAYER_SPEED;
        }
        if input.is_key_down(Key::Down) || input.is_key_down(Key::S) {
            velocity.dy += PLAYER_SPEED;
        }
        let clicked = input.is_mouse_button_pressed(MouseButton::Left);

        self.move_player(velocity);

        if circles_intersect(self.player_circle(), self.target) {
            self.score += 1;
            info!(score = self.score, "target_collected");
            let origin = self.target.center();
            self.spawn_burst(ctx, origin);
            self.relocate_target(ctx);
        }

        if clicked {
            if let Some((x, y)) = ctx.mouse_buffer_position() {
                self.spawn_burst(ctx, Point::new(x as f32, y as f32));
            }
        }

        self.update_particles();
    }

    fn render(&mut self, ctx: &mut Context, canvas: &mut Canvas) {
        canvas.fill_circle(
            self.target.x as i32,
            self.target.y as i32,
            self.target.r as i32,
            colors::RED,
        );
        canvas.fill_rect(
            self.player.x as i32,
            self.player.y as i32,
            self.player.w as i32,
            self.player.h as i32,
            colors::GREEN,
        );
        canvas.draw_rect(
            self.player.x as i32,
            self.player.y as i32,
            self.player.w as i32,
            self.player.h as i32,
            colors::DARK_GREEN,
        );
        for particle in &self.particles {
            canvas.put_pixel(
                particle.position.x as i32,
                particle.position.y as i32,
                particle.color,
            );
        }

        let font = ctx.default_font();
        let metrics = ctx.metrics();
        canvas.draw_text(
            font,
            2,
            2,
            &format!("FPS {:.0} TPS {:.0}", metrics.fps, metrics.tps),
            colors::LIGHT_GREY,
        );
        canvas.draw_text(
            font,
            2,
            2 + font.line_height(),
            &format!("SCORE {}", self.score),
            colors::YELLOW,
        );
    }
}

fn load_config() -> Result<FrameworkConfig, FrameworkError> {
    let config = match env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => FrameworkConfig::from_json_file(path)?,
        _ => FrameworkConfig {
            window_title: "framekit demo".to_string(),
            window_width: 960,
            window_height: 720,
            ..FrameworkConfig::default()
        },
    };
    Ok(config.with_env_overrides())
}

fn run() -> Result<(), FrameworkError> {
    let config = load_config()?;
    init_logging(&config.log)?;
    info!("=== framekit demo startup ===");

    let mut framework = Framework::init(&config)?;
    framework.setup_buffer(BUFFER_WIDTH, BUFFER_HEIGHT)?;

    info!("press any key to start");
    let Some(key) = framework.wait_for_keypress()? else {
        info!("closed before start");
        return Ok(());
    };
    info!(key = ?key, "start_key_pressed");

    let mut game = DemoGame::new();
    framework.run(&mut game)?;
    info!(score = game.score, "shutdown");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        error!(error = %err, "startup_failed");
        eprintln!("framekit demo failed: {err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use framekit::{FrameDriver, FrameEvent, Presenter, QueuedEventSource, ScalingTransform};

    use super::*;

    #[derive(Default)]
    struct CountingPresenter {
        frames: u32,
    }

    impl Presenter for CountingPresenter {
        fn present(
            &mut self,
            _canvas: &Canvas,
            _scaling: Option<&ScalingTransform>,
        ) -> Result<(), FrameworkError> {
            self.frames += 1;
            Ok(())
        }
    }

    fn driver() -> FrameDriver {
        let config = FrameworkConfig {
            random_seed: Some(7),
            ..FrameworkConfig::default()
        };
        let mut driver = FrameDriver::new(&config, 640, 480);
        driver
            .setup_buffer(BUFFER_WIDTH, BUFFER_HEIGHT)
            .expect("buffer fits");
        driver
    }

    fn run(driver: &mut FrameDriver, game: &mut DemoGame, events: Vec<FrameEvent>) -> u32 {
        let mut source = QueuedEventSource::new(events);
        let mut presenter = CountingPresenter::default();
        driver
            .run(&mut source, &mut presenter, game)
            .expect("loop runs");
        presenter.frames
    }

    #[test]
    fn held_arrow_moves_player_each_tick() {
        let mut driver = driver();
        let mut game = DemoGame::new();
        let start_x = game.player.x;

        let frames = run(
            &mut driver,
            &mut game,
            vec![FrameEvent::KeyDown(Key::Right), FrameEvent::Tick, FrameEvent::Tick],
        );

        assert_eq!(game.player.x, start_x + 2.0 * PLAYER_SPEED);
        assert_eq!(frames, 1);
    }

    #[test]
    fn escape_quits() {
        let mut driver = driver();
        let mut game = DemoGame::new();
        run(
            &mut driver,
            &mut game,
            vec![
                FrameEvent::KeyDown(Key::Escape),
                FrameEvent::Tick,
                FrameEvent::KeyDown(Key::Right),
                FrameEvent::Tick,
            ],
        );

        assert_eq!(driver.context().tick_count(), 1);
    }

    #[test]
    fn player_stays_inside_buffer() {
        let mut game = DemoGame::new();
        for _ in 0..500 {
            game.move_player(Velocity::new(-PLAYER_SPEED, PLAYER_SPEED));
        }
        assert_eq!(game.player.x, 0.0);
        assert_eq!(game.player.y, BUFFER_HEIGHT as f32 - PLAYER_SIZE);
    }

    #[test]
    fn click_inside_buffer_spawns_particles() {
        let mut driver = driver();
        let mut game = DemoGame::new();
        run(
            &mut driver,
            &mut game,
            vec![
                FrameEvent::MouseMoved {
                    x: 320,
                    y: 240,
                    dx: 0,
                    dy: 0,
                },
                FrameEvent::MouseButtonDown(MouseButton::Left),
                FrameEvent::Tick,
            ],
        );

        assert!(!game.particles.is_empty());
        assert!(game.particles.len() <= 12);
    }

    #[test]
    fn touching_target_scores_and_moves_it() {
        let mut driver = driver();
        let mut game = DemoGame::new();
        game.target = Circle::new(
            game.player.x + PLAYER_SIZE / 2.0,
            game.player.y + PLAYER_SIZE / 2.0,
            TARGET_RADIUS,
        );
        let before = game.target;

        run(&mut driver, &mut game, vec![FrameEvent::Tick]);

        assert_eq!(game.score, 1);
        assert_ne!(game.target, before);
    }
}
