pub mod app;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod random;

pub use app::{
    colors, Bitmap, BitmapError, Canvas, Color, Context, EventSource, Font, FrameDriver,
    FrameEvent, Framework, FrameworkError, Game, InputError, InputLatch, Key, LoopMetricsSnapshot,
    LoopState, MouseButton, PixelsPresenter, Presenter, QueuedEventSource, ScaleMode, ScalingError,
    ScalingTransform, WinitEventSource, GLYPH_HEIGHT, GLYPH_WIDTH,
};
pub use config::{
    ConfigError, FrameworkConfig, LogConfig, DEFAULT_LOG_FILE, LOG_FILE_ENV_VAR,
    TICK_RATE_ENV_VAR,
};
pub use geometry::{
    angle_between_points, circle_contains_point, circles_intersect, deg_to_rad,
    distance_between_points, lines_intersect, rad_to_deg, rectangle_contains_point,
    rectangles_intersect, Circle, Line, Point, Rectangle, Velocity,
};
pub use logging::{init_logging, LoggingError};
pub use random::Random;
