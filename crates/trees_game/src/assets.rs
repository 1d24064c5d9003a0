//! Spritesheet loading.
//!
//! The file is opened, sniffed and decoded inside `load_picture`; the handle is
//! dropped before the function returns on every path.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageReader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to open '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

/// Axis-aligned rectangle in picture pixel space: origin at the bottom-left
/// corner, y up, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelRect {
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Decoded RGBA8 image. Rows are stored top row first, as uploaded to the GPU.
#[derive(Debug, Clone)]
pub struct Picture {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Picture {
    pub fn from_rgba8(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }
}

pub fn load_picture(path: &Path) -> Result<Picture, AssetError> {
    let file = File::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let image = reader.decode().map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Picture::from_rgba8(width, height, rgba.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str, ext: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "trees_assets_test_{}_{}_{}.{}",
            name_hint,
            std::process::id(),
            nanos,
            ext
        ))
    }

    #[test]
    fn loads_png_with_bounds() {
        let path = temp_file_path("valid", "png");
        let mut img = RgbaImage::new(64, 96);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        img.save_with_format(&path, ImageFormat::Png)
            .expect("failed to write temp png");

        let picture = load_picture(&path).expect("png should decode");
        let _ = fs::remove_file(&path);

        assert_eq!(picture.bounds(), PixelRect::new(0, 0, 64, 96));
        assert_eq!(picture.rgba().len(), 64 * 96 * 4);
        assert_eq!(&picture.rgba()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = temp_file_path("missing", "png");
        let err = load_picture(&path).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("failed to open"));
    }

    #[test]
    fn garbage_bytes_are_decode_error() {
        let path = temp_file_path("garbage", "png");
        fs::write(&path, b"definitely not an image").expect("failed to write temp file");
        let err = load_picture(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn truncated_png_is_decode_error() {
        let path = temp_file_path("truncated", "png");
        let mut bytes = Vec::new();
        RgbaImage::new(8, 8)
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("failed to encode png");
        bytes.truncate(bytes.len() / 2);
        fs::write(&path, &bytes).expect("failed to write temp file");
        let err = load_picture(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn rect_extent_saturates() {
        let rect = PixelRect::new(0, 0, 32, 16);
        assert_eq!((rect.width(), rect.height()), (32, 16));
        assert!(PixelRect::new(5, 5, 5, 9).is_empty());
        assert_eq!(PixelRect::new(9, 0, 5, 4).width(), 0);
    }
}
