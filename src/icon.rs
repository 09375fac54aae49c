//! Geometry and image types shared by the trimmer and the renderer.
//!
//! Rendered glyphs are carried around as [`IconImage`]s: an RGBA buffer plus
//! the display scale it was rendered for and the rectangle the glyph ended up
//! occupying on its canvas.

use image::RgbaImage;

/// A rectangle defined in pixel coordinates.
///
/// Used to describe where trimmed glyph content sits within a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the image
    pub x: u32,
    /// Y offset from the top edge of the image
    pub y: u32,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
}

impl RectPx {
    /// Creates a new rectangle with the given position and dimensions.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge coordinate (x + width), exclusive.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height), exclusive.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns true if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.width, self.height)
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the dimensions of an image.
    pub fn of(image: &RgbaImage) -> Self {
        Self::new(image.width(), image.height())
    }

    /// Returns true if either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rendered icon with its associated metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    /// The image data in RGBA format.
    pub data: RgbaImage,

    /// The display scale factor.
    ///
    /// - 1.0 for standard resolution (@1x)
    /// - 2.0 for retina/HiDPI (@2x)
    ///
    /// The "logical" size of the icon is `dimensions / scale`.
    pub scale: f32,

    /// The region of the canvas covered by the trimmed glyph.
    ///
    /// Empty when nothing visible was drawn.
    pub content_bounds: RectPx,
}

impl IconImage {
    /// Creates a new icon image with the given data and metadata.
    pub fn new(data: RgbaImage, scale: f32, content_bounds: RectPx) -> Self {
        Self {
            data,
            scale,
            content_bounds,
        }
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::of(&self.data)
    }

    /// Returns the logical size of the icon (dimensions / scale).
    ///
    /// For a 64x64 @2x icon, the logical size is 32x32.
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.data.width() as f32 / self.scale,
            self.data.height() as f32 / self.scale,
        )
    }

    /// Returns true if no glyph pixels were drawn.
    pub fn is_blank(&self) -> bool {
        self.content_bounds.is_empty()
    }
}

/// The same icon rendered at several display scales.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IconSet {
    pub images: Vec<IconImage>,
}

impl IconSet {
    /// Creates a new empty icon set.
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    pub fn from_images(images: Vec<IconImage>) -> Self {
        Self { images }
    }

    pub fn add_image(&mut self, image: IconImage) {
        self.images.push(image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Finds the image whose pixel width is closest to `target_size`.
    pub fn find_by_pixel_size(&self, target_size: u32) -> Option<&IconImage> {
        self.images
            .iter()
            .min_by_key(|img| img.data.width().abs_diff(target_size))
    }

    /// Finds the image rendered for the given scale, if any.
    pub fn find_by_scale(&self, scale: f32) -> Option<&IconImage> {
        self.images
            .iter()
            .find(|img| (img.scale - scale).abs() < 0.001)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IconImage> {
        self.images.iter()
    }
}

impl IntoIterator for IconSet {
    type Item = IconImage;
    type IntoIter = std::vec::IntoIter<IconImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.into_iter()
    }
}

impl<'a> IntoIterator for &'a IconSet {
    type Item = &'a IconImage;
    type IntoIter = std::slice::Iter<'a, IconImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_px_edges() {
        let rect = RectPx::new(10, 20, 100, 200);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 220);
        assert!(!rect.is_empty());
        assert!(RectPx::default().is_empty());
        assert_eq!(rect.size(), SizePx::new(100, 200));
    }

    #[test]
    fn size_px_predicates() {
        assert!(SizePx::new(0, 10).is_empty());
        assert!(!SizePx::new(1, 1).is_empty());
    }

    #[test]
    fn icon_image_logical_size() {
        let img = IconImage::new(RgbaImage::new(64, 64), 2.0, RectPx::default());
        assert_eq!(img.logical_size(), (32.0, 32.0));
        assert!(img.is_blank());
    }

    #[test]
    fn icon_set_lookup() {
        let mut set = IconSet::new();
        assert!(set.is_empty());

        set.add_image(IconImage::new(RgbaImage::new(16, 16), 1.0, RectPx::default()));
        set.add_image(IconImage::new(RgbaImage::new(32, 32), 2.0, RectPx::default()));
        assert_eq!(set.len(), 2);

        let found = set.find_by_pixel_size(20).unwrap();
        assert_eq!(found.dimensions().width, 16);

        assert_eq!(set.find_by_scale(2.0).unwrap().dimensions().width, 32);
        assert!(set.find_by_scale(3.0).is_none());
    }
}
