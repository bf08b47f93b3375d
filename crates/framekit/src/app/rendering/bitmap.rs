use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;

use super::colors::Color;

#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("failed to open bitmap {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode bitmap {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("bitmap data is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Bitmap {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BitmapError> {
        let path = path.as_ref();
        let reader = ImageReader::open(path).map_err(|source| BitmapError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = reader.decode().map_err(|source| BitmapError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = decoded.to_rgba8();
        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, BitmapError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(BitmapError::SizeMismatch {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut color = [0; 4];
        color.copy_from_slice(self.rgba.get(offset..offset + 4)?);
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_decodes_png_into_rgba() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tiny.png");
        let image = image::RgbaImage::from_raw(2, 2, vec![
            255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 0, 0, 0, 0,
        ])
        .expect("raw image");
        image.save(&path).expect("save png");

        let bitmap = Bitmap::load(&path).expect("load png");
        assert_eq!((bitmap.width(), bitmap.height()), (2, 2));
        assert_eq!(bitmap.texel(1, 0), Some([0, 255, 0, 255]));
        assert_eq!(bitmap.texel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(bitmap.texel(2, 0), None);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = Bitmap::load(dir.path().join("missing.png")).expect_err("missing file");
        assert!(matches!(error, BitmapError::Open { .. }));
    }

    #[test]
    fn from_rgba_rejects_wrong_length() {
        let error = Bitmap::from_rgba(2, 2, vec![0; 15]).expect_err("short buffer");
        assert!(matches!(
            error,
            BitmapError::SizeMismatch {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }
}
