mod context;
mod events;
mod input;
mod loop_runner;
mod metrics;
mod platform;
pub(crate) mod rendering;

pub use context::{Context, LoopState};
pub use events::{EventSource, FrameEvent, QueuedEventSource};
pub use input::{InputError, InputLatch, Key, MouseButton};
pub use loop_runner::{FrameDriver, FrameworkError, Game, Presenter};
pub use metrics::LoopMetricsSnapshot;
pub use platform::{Framework, PixelsPresenter, WinitEventSource};
pub use rendering::{
    colors, Bitmap, BitmapError, Canvas, Color, Font, ScaleMode, ScalingError, ScalingTransform,
    GLYPH_HEIGHT, GLYPH_WIDTH,
};
