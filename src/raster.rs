//! Glyph rasterization using resvg/usvg.
//!
//! A glyph is drawn by building a one-element SVG document (a centered
//! `<text>` node) and rendering it with resvg against the font's private
//! font database. The result is then trimmed and centered on the requested
//! canvas, and finally laid over the background color.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use log::warn;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::fontdb::Database;
use resvg::usvg::{Options, Tree};

use crate::error::RenderError;
use crate::font::IconFont;
use crate::icon::{IconImage, SizePx};
use crate::style::{Color, GlyphStyle};
use crate::trim::trim_icon;

/// Drawn in place of the requested glyph when no icon font is available.
pub const PLACEHOLDER: char = '?';

// ============================================================================
// Glyph Rendering
// ============================================================================

/// Renders `glyph` from `font` according to `style`.
///
/// Without a font, the [`PLACEHOLDER`] character is drawn with the system
/// fallback font instead. If the system has no fonts either, the result is
/// the background alone.
pub fn render_glyph(
    font: Option<&IconFont>,
    glyph: char,
    style: &GlyphStyle,
) -> Result<IconImage, RenderError> {
    style.validate().map_err(RenderError::InvalidStyle)?;

    let fallback;
    let (font, glyph) = match font {
        Some(font) => (Some(font), glyph),
        None => {
            warn!(
                "no icon font available, drawing placeholder for U+{:04X}",
                u32::from(glyph)
            );
            fallback = IconFont::system_fallback();
            (fallback.as_deref(), PLACEHOLDER)
        }
    };

    let canvas = style.pixel_size();
    let font_size = style.pixel_font_size();
    let scratch = scratch_size(canvas, font_size);

    let drawn = match font {
        Some(font) => {
            let svg = glyph_svg(font.family(), glyph, scratch, font_size, style.color);
            rasterize_svg(&svg, font.database(), scratch)?
        }
        None => RgbaImage::new(scratch.width, scratch.height),
    };

    let mut icon = trim_icon(&drawn, canvas, style.scale)?;
    if !style.background.is_transparent() {
        icon.data = fill_background(&icon.data, style.background);
    }
    Ok(icon)
}

/// Size of the surface the glyph is first drawn on.
///
/// Large enough that glyphs overhanging their advance box are not clipped
/// before trimming.
fn scratch_size(canvas: SizePx, font_size: f32) -> SizePx {
    let side = (font_size * 2.0).ceil() as u32;
    SizePx::new(canvas.width.max(side), canvas.height.max(side))
}

/// Builds an SVG document drawing `glyph` centered on a `canvas` surface.
pub fn glyph_svg(family: &str, glyph: char, canvas: SizePx, font_size: f32, color: Color) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text x="{cx}" y="{cy}" font-family="{family}" font-size="{size}" "#,
            r#"fill="{fill}" fill-opacity="{opacity:.4}" "#,
            r#"text-anchor="middle" dominant-baseline="central">&#x{code:X};</text>"#,
            "</svg>",
        ),
        w = canvas.width,
        h = canvas.height,
        cx = canvas.width as f32 / 2.0,
        cy = canvas.height as f32 / 2.0,
        family = escape_xml(&quote_family(family)),
        size = font_size,
        fill = color.to_rgb_hex(),
        opacity = f32::from(color.alpha()) / 255.0,
        code = u32::from(glyph),
    )
}

/// Quotes a family name as a CSS string.
///
/// Double quotes are used when the name contains an apostrophe.
fn quote_family(family: &str) -> String {
    if family.contains('\'') && !family.contains('"') {
        format!("\"{family}\"")
    } else {
        format!("'{}'", family.replace('\'', "\\'"))
    }
}

/// Escapes text for use inside a double-quoted XML attribute.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders an SVG document onto a `size` pixmap using fonts from `fontdb`.
pub fn rasterize_svg(
    svg: &str,
    fontdb: Arc<Database>,
    size: SizePx,
) -> Result<RgbaImage, RenderError> {
    let options = Options {
        fontdb,
        ..Options::default()
    };
    let tree = Tree::from_str(svg, &options)?;

    let mut pixmap = Pixmap::new(size.width, size.height).ok_or(RenderError::Allocation {
        width: size.width,
        height: size.height,
    })?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    // tiny_skia stores premultiplied alpha, image expects straight alpha.
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        dst.0 = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
    }

    img
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let a_f = a as f32 / 255.0;
    let channel = |c: u8| (c as f32 / a_f).round().min(255.0) as u8;
    [channel(r), channel(g), channel(b), a]
}

// ============================================================================
// Compositing
// ============================================================================

/// Lays `glyph` over a canvas filled with `background`.
fn fill_background(glyph: &RgbaImage, background: Color) -> RgbaImage {
    let under = Rgba(background.to_array());
    let mut canvas = glyph.clone();
    for pixel in canvas.pixels_mut() {
        *pixel = source_over(*pixel, under);
    }
    canvas
}

/// Porter-Duff source-over of one straight-alpha pixel onto another.
fn source_over(top: Rgba<u8>, under: Rgba<u8>) -> Rgba<u8> {
    let unit = |v: u8| f32::from(v) / 255.0;
    let top_a = unit(top[3]);
    let under_a = unit(under[3]) * (1.0 - top_a);
    let alpha = top_a + under_a;
    if alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().take(3).enumerate() {
        let c = (unit(top[i]) * top_a + unit(under[i]) * under_a) / alpha;
        *channel = (c * 255.0).round() as u8;
    }
    out[3] = (alpha * 255.0).round() as u8;
    Rgba(out)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::system_test_font;
    use crate::trim::{BoundingBox, bounding_box};

    fn test_font() -> Option<IconFont> {
        system_test_font().map(|bytes| IconFont::from_bytes(bytes).unwrap())
    }

    #[test]
    fn family_quoting() {
        assert_eq!(quote_family("DejaVu Sans"), "'DejaVu Sans'");
        assert_eq!(quote_family("Tom's Icons"), "\"Tom's Icons\"");
        assert_eq!(quote_family(r#"A "b" 'c'"#), r#"'A "b" \'c\''"#);
    }

    #[test]
    fn glyph_svg_markup() {
        let svg = glyph_svg(
            "Icons & <Co>",
            '\u{f09b}',
            SizePx::new(40, 20),
            16.0,
            Color::rgba(255, 0, 0, 51),
        );
        assert!(svg.contains(r#"width="40" height="20""#));
        assert!(svg.contains(r#"x="20" y="10""#));
        assert!(svg.contains("font-family=\"'Icons &amp; &lt;Co&gt;'\""));

        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains(r#"fill-opacity="0.2000""#));
        assert!(svg.contains("&#xF09B;</text>"));
        let svg = glyph_svg("Tom's Icons", 'a', SizePx::new(8, 8), 8.0, Color::BLACK);
        assert!(svg.contains(r#"font-family="&quot;Tom's Icons&quot;""#));
    }

    #[test]
    fn scratch_surface_fits_font() {
        assert_eq!(scratch_size(SizePx::new(64, 64), 20.0), SizePx::new(64, 64));
        assert_eq!(scratch_size(SizePx::new(16, 100), 20.0), SizePx::new(40, 100));
    }

    #[test]
    fn rasterize_shapes_without_fonts() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect x="2" y="3" width="4" height="5" fill="#ff0000" shape-rendering="crispEdges"/></svg>"##;
        let img = rasterize_svg(svg, Arc::new(Database::new()), SizePx::new(10, 10)).unwrap();

        assert_eq!(img.dimensions(), (10, 10));
        assert_eq!(bounding_box(&img), Some(BoundingBox::new(2, 3, 5, 7)));
        assert_eq!(img.get_pixel(3, 4).0, [255, 0, 0, 255]);
    }

    #[test]
    fn malformed_svg_is_an_error() {
        let err = rasterize_svg("<svg", Arc::new(Database::new()), SizePx::new(4, 4)).unwrap_err();
        assert!(matches!(err, RenderError::Svg(_)));
    }

    #[test]
    fn unpremultiply_restores_color() {
        assert_eq!(unpremultiply(0, 0, 0, 0), [0, 0, 0, 0]);
        assert_eq!(unpremultiply(51, 0, 51, 51), [255, 0, 255, 51]);
        assert_eq!(unpremultiply(10, 20, 30, 255), [10, 20, 30, 255]);
    }

    #[test]
    fn antialiased_edge_blends_into_background() {
        assert_eq!(
            source_over(Rgba([0, 0, 0, 128]), Rgba([255, 255, 255, 255])).0,
            [127, 127, 127, 255]
        );
        assert_eq!(
            source_over(Rgba([255, 0, 0, 51]), Rgba([0, 0, 255, 255])).0,
            [51, 0, 204, 255]
        );
        assert_eq!(
            source_over(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 128])).0,
            [0, 0, 0, 255]
        );
        assert_eq!(source_over(Rgba([9, 9, 9, 0]), Rgba([0, 0, 0, 0])).0, [0, 0, 0, 0]);
    }

    #[test]
    fn background_fills_canvas() {
        let mut glyph = RgbaImage::new(4, 4);
        glyph.put_pixel(1, 1, Rgba([0, 0, 0, 255]));
        glyph.put_pixel(2, 1, Rgba([0, 0, 0, 128]));

        let out = fill_background(&glyph, Color::WHITE);
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(1, 1).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(2, 1).0, [127, 127, 127, 255]);

        let tinted = fill_background(&glyph, Color::rgba(0, 0, 255, 128));
        assert_eq!(tinted.get_pixel(3, 3).0, [0, 0, 255, 128]);
        assert_eq!(tinted.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn invalid_style_is_rejected() {
        let err = render_glyph(None, 'x', &GlyphStyle::new(0, 16)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidStyle(_)));
    }

    #[test]
    fn oversized_style_is_rejected_before_drawing() {
        let err = render_glyph(None, 'x', &GlyphStyle::square(100_000)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidStyle(_)));

        let err = render_glyph(None, 'x', &GlyphStyle::square(64).with_font_size(50_000.0))
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidStyle(_)));
    }

    #[test]
    fn missing_font_falls_back() {
        let style = GlyphStyle::square(32).with_background(Color::WHITE);
        let icon = render_glyph(None, '\u{f09b}', &style).unwrap();

        assert_eq!(icon.dimensions(), SizePx::new(32, 32));
        assert_eq!(icon.data.get_pixel(0, 0).0, [255, 255, 255, 255]);

        if IconFont::system_fallback().is_some() {
            assert!(!icon.is_blank(), "placeholder should be drawn");
            assert!(icon.data.pixels().any(|p| p.0 != [255, 255, 255, 255]));
        }
    }

    #[test]
    fn placeholder_matches_fallback_font() {
        let Some(fallback) = IconFont::system_fallback() else {
            return;
        };
        let style = GlyphStyle::square(32);
        let placeholder = render_glyph(None, '\u{f09b}', &style).unwrap();
        let expected = render_glyph(Some(fallback.as_ref()), PLACEHOLDER, &style).unwrap();
        assert_eq!(placeholder, expected);
    }

    #[test]
    fn renders_centered_glyph() {
        let Some(font) = test_font() else {
            return;
        };
        let style = GlyphStyle::square(64).with_font_size(48.0);
        let icon = render_glyph(Some(&font), 'H', &style).unwrap();

        assert_eq!(icon.dimensions(), SizePx::new(64, 64));
        assert!(!icon.is_blank());

        let placed = icon.content_bounds;
        let left = placed.x;
        let right = 64 - placed.right();
        let top = placed.y;
        let bottom = 64 - placed.bottom();
        assert!(left <= right && right - left <= 1, "{placed:?}");
        assert!(top <= bottom && bottom - top <= 1, "{placed:?}");
        assert_eq!(bounding_box(&icon.data).map(|b| b.to_rect()), Some(placed));
    }

    #[test]
    fn renders_color_and_scale() {
        let Some(font) = test_font() else {
            return;
        };
        let style = GlyphStyle::square(32)
            .with_color(Color::rgb(0, 0, 255))
            .with_background(Color::rgb(255, 255, 0))
            .with_scale(2.0);
        let icon = render_glyph(Some(&font), 'O', &style).unwrap();

        assert_eq!(icon.dimensions(), SizePx::new(64, 64));
        assert_eq!(icon.scale, 2.0);
        assert_eq!(icon.logical_size(), (32.0, 32.0));
        assert_eq!(icon.data.get_pixel(0, 0).0, [255, 255, 0, 255]);
        assert!(icon.data.pixels().any(|p| p.0 == [0, 0, 255, 255]));
    }

    #[test]
    fn transparent_color_renders_nothing() {
        let Some(font) = test_font() else {
            return;
        };
        let style = GlyphStyle::square(24).with_color(Color::TRANSPARENT);
        let icon = render_glyph(Some(&font), 'M', &style).unwrap();
        assert!(icon.is_blank());
        assert!(icon.data.pixels().all(|p| p[3] == 0));
    }
}
