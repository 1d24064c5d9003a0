//! Fixed-grid slicing of a spritesheet into frames.
//!
//! Enumeration order is rows outer, bottom to top, and columns inner, left to
//! right, so `index = row * columns + col` with row 0 at the bottom of the
//! sheet. When the sheet is not a multiple of the tile size the last row and
//! column are clipped to the sheet bounds rather than sampling past its edge.
//! The frames therefore partition the sheet exactly, and every frame is at
//! most `tile x tile`.

use crate::assets::{Picture, PixelRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub rect: PixelRect,
}

impl SpriteFrame {
    pub fn size(&self) -> (u32, u32) {
        (self.rect.width(), self.rect.height())
    }
}

/// Number of columns and rows `slice_frames` produces for these bounds.
pub fn grid_dimensions(bounds: PixelRect, tile: u32) -> (u32, u32) {
    if tile == 0 || bounds.is_empty() {
        return (0, 0);
    }
    (bounds.width().div_ceil(tile), bounds.height().div_ceil(tile))
}

pub fn slice_frames(bounds: PixelRect, tile: u32) -> Vec<SpriteFrame> {
    let (columns, rows) = grid_dimensions(bounds, tile);
    let mut frames = Vec::with_capacity((columns * rows) as usize);
    for row in 0..rows {
        let min_y = bounds.min_y + row * tile;
        let max_y = (min_y + tile).min(bounds.max_y);
        for col in 0..columns {
            let min_x = bounds.min_x + col * tile;
            let max_x = (min_x + tile).min(bounds.max_x);
            frames.push(SpriteFrame {
                rect: PixelRect::new(min_x, min_y, max_x, max_y),
            });
        }
    }
    frames
}

/// The sliced frames of one spritesheet, kept for the whole run.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    frames: Vec<SpriteFrame>,
    texture_size: (u32, u32),
}

impl SpriteAtlas {
    pub fn from_picture(picture: &Picture, tile: u32) -> Result<Self, String> {
        let frames = slice_frames(picture.bounds(), tile);
        if frames.is_empty() {
            return Err(format!(
                "Spritesheet {}x{} yields no {}px frames",
                picture.width(),
                picture.height(),
                tile
            ));
        }
        let (columns, rows) = grid_dimensions(picture.bounds(), tile);
        log::info!(
            "Spritesheet {}x{} sliced into {} frames ({}x{} grid of {}px tiles)",
            picture.width(),
            picture.height(),
            frames.len(),
            columns,
            rows,
            tile
        );
        Ok(Self {
            frames,
            texture_size: (picture.width(), picture.height()),
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&SpriteFrame> {
        self.frames.get(index)
    }

    /// Texture coordinates `[u0, v0, u1, v1]` of a frame. Texture space has v
    /// pointing down from the top row, so the y-up rect is flipped.
    pub fn uv(&self, index: usize) -> Option<[f32; 4]> {
        let frame = self.frames.get(index)?;
        let (w, h) = (self.texture_size.0 as f32, self.texture_size.1 as f32);
        let r = frame.rect;
        Some([
            r.min_x as f32 / w,
            1.0 - r.max_y as f32 / h,
            r.max_x as f32 / w,
            1.0 - r.min_y as f32 / h,
        ])
    }
}
