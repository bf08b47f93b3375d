mod bitmap;
mod canvas;
pub mod colors;
mod font;
mod transform;

pub use bitmap::{Bitmap, BitmapError};
pub use canvas::Canvas;
pub use colors::Color;
pub use font::{Font, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use transform::{ScaleMode, ScalingError, ScalingTransform};
