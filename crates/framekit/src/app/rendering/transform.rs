use thiserror::Error;

use super::canvas::Canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScalingError {
    #[error("logical buffer must be non-empty, got {width}x{height}")]
    EmptyBuffer { width: u32, height: u32 },
    #[error("display must be non-empty, got {width}x{height}")]
    EmptyDisplay { width: u32, height: u32 },
    #[error(
        "display {display_width}x{display_height} is smaller than logical buffer \
{buffer_width}x{buffer_height}"
    )]
    DisplayTooSmall {
        buffer_width: u32,
        buffer_height: u32,
        display_width: u32,
        display_height: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    Letterbox { scale: u32 },
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingTransform {
    pub buffer_width: u32,
    pub buffer_height: u32,
    pub mode: ScaleMode,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl ScalingTransform {
    pub fn new(
        buffer_width: u32,
        buffer_height: u32,
        display_width: u32,
        display_height: u32,
    ) -> Result<Self, ScalingError> {
        check_buffer(buffer_width, buffer_height)?;

        let scale = (display_width / buffer_width).min(display_height / buffer_height);
        if scale == 0 {
            return Err(ScalingError::DisplayTooSmall {
                buffer_width,
                buffer_height,
                display_width,
                display_height,
            });
        }

        let scaled_width = buffer_width * scale;
        let scaled_height = buffer_height * scale;
        Ok(Self {
            buffer_width,
            buffer_height,
            mode: ScaleMode::Letterbox { scale },
            scaled_width,
            scaled_height,
            offset_x: (display_width - scaled_width) / 2,
            offset_y: (display_height - scaled_height) / 2,
        })
    }

    pub fn stretched(
        buffer_width: u32,
        buffer_height: u32,
        display_width: u32,
        display_height: u32,
    ) -> Result<Self, ScalingError> {
        check_buffer(buffer_width, buffer_height)?;
        if display_width == 0 || display_height == 0 {
            return Err(ScalingError::EmptyDisplay {
                width: display_width,
                height: display_height,
            });
        }

        Ok(Self {
            buffer_width,
            buffer_height,
            mode: ScaleMode::Stretch,
            scaled_width: display_width,
            scaled_height: display_height,
            offset_x: 0,
            offset_y: 0,
        })
    }

    pub fn scale_x(&self) -> f32 {
        self.scaled_width as f32 / self.buffer_width as f32
    }

    pub fn scale_y(&self) -> f32 {
        self.scaled_height as f32 / self.buffer_height as f32
    }

    pub fn display_to_buffer(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        let local_x = i64::from(x) - i64::from(self.offset_x);
        let local_y = i64::from(y) - i64::from(self.offset_y);
        if local_x < 0
            || local_y < 0
            || local_x >= i64::from(self.scaled_width)
            || local_y >= i64::from(self.scaled_height)
        {
            return None;
        }
        Some((
            to_source(local_x as u32, self.buffer_width, self.scaled_width) as i32,
            to_source(local_y as u32, self.buffer_height, self.scaled_height) as i32,
        ))
    }

    pub fn blit(&self, source: &Canvas, frame: &mut [u8], frame_width: u32, frame_height: u32) {
        if source.width() != self.buffer_width || source.height() != self.buffer_height {
            return;
        }

        let src = source.frame();
        let src_stride = self.buffer_width as usize * 4;
        let end_y = self
            .offset_y
            .saturating_add(self.scaled_height)
            .min(frame_height);
        let end_x = self
            .offset_x
            .saturating_add(self.scaled_width)
            .min(frame_width);

        for dst_y in self.offset_y..end_y {
            let src_y = to_source(dst_y - self.offset_y, self.buffer_height, self.scaled_height);
            let src_row = &src[src_y * src_stride..(src_y + 1) * src_stride];
            let dst_row_start = dst_y as usize * frame_width as usize * 4;

            for dst_x in self.offset_x..end_x {
                let src_x = to_source(dst_x - self.offset_x, self.buffer_width, self.scaled_width);
                let dst = dst_row_start + dst_x as usize * 4;
                let Some(target) = frame.get_mut(dst..dst + 4) else {
                    return;
                };
                target.copy_from_slice(&src_row[src_x * 4..src_x * 4 + 4]);
            }
        }
    }
}

fn check_buffer(width: u32, height: u32) -> Result<(), ScalingError> {
    if width == 0 || height == 0 {
        return Err(ScalingError::EmptyBuffer { width, height });
    }
    Ok(())
}

// `scaled` is never zero: both constructors reject empty displays and buffers.
fn to_source(local: u32, buffer: u32, scaled: u32) -> usize {
    let index = u64::from(local) * u64::from(buffer) / u64::from(scaled);
    (index as usize).min(buffer as usize - 1)
}
