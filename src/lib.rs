//! iconfont-renderer: render icon-font glyphs as tightly centered bitmaps
//!
//! This crate loads an icon font and maps icon names and CSS codes to its
//! glyphs. It renders a glyph with a chosen color, size and background, crops
//! the transparent margins that text layout leaves around it, and centers it
//! on the requested canvas.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use iconfont_renderer::{Color, FontRegistry, GlyphStyle, IconCatalog, IconRenderer};
//!
//! let font = FontRegistry::global().register_file("awesome", "fonts/awesome.ttf").ok();
//! let catalog = IconCatalog::from_file("fonts/awesome.json")?;
//! let mut renderer = IconRenderer::new(catalog, font);
//!
//! let style = GlyphStyle::square(64)
//!     .with_color(Color::rgb(0x33, 0x66, 0x99))
//!     .with_scale(2.0);
//! let icon = renderer.render("fa-github", &style)?;
//! icon.data.save("github@2x.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Trimming
//!
//! The trimming step is usable on any RGBA buffer:
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use iconfont_renderer::{SizePx, bounding_box, trim_and_center};
//!
//! let mut img = RgbaImage::new(64, 64);
//! img.put_pixel(32, 32, Rgba([0, 0, 0, 255]));
//!
//! let bounds = bounding_box(&img).unwrap();
//! assert_eq!((bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y), (32, 32, 32, 32));
//!
//! let centered = trim_and_center(&img, SizePx::new(64, 64))?;
//! assert_eq!(centered.get_pixel(31, 31)[3], 255);
//! # Ok::<(), iconfont_renderer::TrimError>(())
//! ```

mod catalog;
mod error;
mod font;
mod icon;
mod raster;
mod renderer;
mod style;
mod trim;

pub use catalog::{IconCatalog, parse_codepoint};
pub use error::{CatalogError, FontError, RenderError, TrimError};
pub use font::{FontRegistry, IconFont};
pub use icon::{IconImage, IconSet, RectPx, SizePx};
pub use raster::{PLACEHOLDER, glyph_svg, rasterize_svg, render_glyph};
pub use renderer::IconRenderer;
pub use style::{Color, GlyphStyle, MAX_PIXEL_SIDE, ParseColorError};
pub use trim::{
    BoundingBox, bounding_box, center_offset, center_on_canvas, center_on_canvas_with_bounds,
    crop, trim_and_center, trim_icon,
};
