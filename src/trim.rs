//! Cropping rendered glyphs to their visible pixels and re-centering them.
//!
//! Text layout leaves a glyph somewhere inside its drawing surface, shifted by
//! the font's bearings and baseline. [`trim_and_center`] removes the fully
//! transparent margins and places what remains in the middle of a canvas of
//! the requested size.
//!
//! Centering uses floor division on both axes: content of width `cw` on a
//! canvas of width `CW` starts at `floor((CW - cw) / 2)`, so an odd leftover
//! pixel always ends up on the right (or bottom) margin. The same rule applies
//! when the content is larger than the canvas; the overhang is clipped.

use image::{RgbaImage, imageops};

use crate::error::TrimError;
use crate::icon::{IconImage, RectPx, SizePx};

// ============================================================================
// BoundingBox
// ============================================================================

/// Inclusive pixel bounds of the visible content of a buffer.
///
/// Always non-empty: `min_x <= max_x` and `min_y <= max_y`. A buffer with no
/// visible pixels has no bounding box at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        debug_assert!(min_x <= max_x && min_y <= max_y);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A box covering the single pixel at (x, y).
    pub fn point(x: u32, y: u32) -> Self {
        Self::new(x, y, x, y)
    }

    /// Returns the smallest box covering both `self` and (x, y).
    pub fn including(self, x: u32, y: u32) -> Self {
        Self {
            min_x: self.min_x.min(x),
            min_y: self.min_y.min(y),
            max_x: self.max_x.max(x),
            max_y: self.max_y.max(y),
        }
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.width(), self.height())
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Converts to an (x, y, width, height) rectangle.
    pub fn to_rect(&self) -> RectPx {
        RectPx::new(self.min_x, self.min_y, self.width(), self.height())
    }
}

// ============================================================================
// Trimming
// ============================================================================

/// Finds the smallest box enclosing every pixel with non-zero alpha.
///
/// Returns `None` for a fully transparent (or zero-sized) buffer.
pub fn bounding_box(buffer: &RgbaImage) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;

    for (x, y, pixel) in buffer.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            Some(b) => b.including(x, y),
            None => BoundingBox::point(x, y),
        });
    }

    bounds
}

/// Copies the pixels inside `bounds` into a new buffer.
///
/// Channel values are copied verbatim. Bounds reaching past the buffer are
/// clamped to it.
pub fn crop(buffer: &RgbaImage, bounds: BoundingBox) -> RgbaImage {
    imageops::crop_imm(
        buffer,
        bounds.min_x,
        bounds.min_y,
        bounds.width(),
        bounds.height(),
    )
    .to_image()
}

/// Returns the top-left position that centers `content` on `canvas`.
///
/// Negative when the content is larger than the canvas on that axis.
pub fn center_offset(content: SizePx, canvas: SizePx) -> (i64, i64) {
    let axis = |canvas: u32, content: u32| (i64::from(canvas) - i64::from(content)).div_euclid(2);
    (
        axis(canvas.width, content.width),
        axis(canvas.height, content.height),
    )
}

/// Copies `content` into the middle of a transparent canvas.
pub fn center_on_canvas(content: &RgbaImage, canvas: SizePx) -> RgbaImage {
    center_on_canvas_with_bounds(content, canvas).0
}

/// Like [`center_on_canvas`], also returning where the content landed.
///
/// The returned rectangle is clipped to the canvas and is empty if nothing
/// of `content` is visible.
pub fn center_on_canvas_with_bounds(content: &RgbaImage, canvas: SizePx) -> (RgbaImage, RectPx) {
    let mut out = RgbaImage::new(canvas.width, canvas.height);
    let (x, y) = center_offset(SizePx::of(content), canvas);

    // The destination starts fully transparent, so source-over reduces to a copy.
    imageops::replace(&mut out, content, x, y);

    let left = x.max(0);
    let top = y.max(0);
    let right = (x + i64::from(content.width())).min(i64::from(canvas.width));
    let bottom = (y + i64::from(content.height())).min(i64::from(canvas.height));

    let placed = if right > left && bottom > top {
        RectPx::new(
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        )
    } else {
        RectPx::default()
    };

    (out, placed)
}

/// Crops `buffer` to its visible pixels and centers the result on a canvas.
///
/// A fully transparent buffer yields a fully transparent canvas. Zero-sized
/// buffers or canvases are rejected.
pub fn trim_and_center(buffer: &RgbaImage, canvas: SizePx) -> Result<RgbaImage, TrimError> {
    trim_icon(buffer, canvas, 1.0).map(|icon| icon.data)
}

/// Trims and centers `buffer`, wrapping the result as an [`IconImage`].
pub fn trim_icon(buffer: &RgbaImage, canvas: SizePx, scale: f32) -> Result<IconImage, TrimError> {
    if SizePx::of(buffer).is_empty() {
        return Err(TrimError::EmptyBuffer);
    }
    if canvas.is_empty() {
        return Err(TrimError::InvalidCanvas {
            width: canvas.width,
            height: canvas.height,
        });
    }

    let Some(bounds) = bounding_box(buffer) else {
        let blank = RgbaImage::new(canvas.width, canvas.height);
        return Ok(IconImage::new(blank, scale, RectPx::default()));
    };

    let (data, placed) = center_on_canvas_with_bounds(&crop(buffer, bounds), canvas);
    Ok(IconImage::new(data, scale, placed))
}

// ============================================================================
// Tests
// ============================================================================
