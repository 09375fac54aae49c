//! Serializable glyph styling: canvas size, colors, font size and scale.
//!
//! A [`GlyphStyle`] round-trips through JSON so that render requests can be
//! stored alongside an icon manifest or passed in from another process.
//!
//! ```json
//! {
//!   "width": 64,
//!   "height": 64,
//!   "fontSize": 48.0,
//!   "color": "#336699ff",
//!   "background": "#00000000",
//!   "scale": 2.0
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};

use crate::icon::SizePx;

/// Largest surface side, in device pixels, a style may ask for.
///
/// Applies to the scaled canvas and to the drawing surface, which is twice
/// the pixel font size.
pub const MAX_PIXEL_SIDE: u32 = 8192;

// ============================================================================
// Color
// ============================================================================

/// An 8-bit sRGB color with alpha.
///
/// Parses from `#rgb`, `#rrggbb`, `#rrggbbaa` (leading `#` optional) or the
/// keyword `transparent`, and serializes as `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub Srgba<u8>);

impl Color {
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(Srgba::new(r, g, b, a))
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Returns the channels as `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        let c = self.0;
        [c.red, c.green, c.blue, c.alpha]
    }

    pub fn alpha(self) -> u8 {
        self.0.alpha
    }

    pub fn is_transparent(self) -> bool {
        self.0.alpha == 0
    }

    /// Returns the color without alpha as `#rrggbb`.
    pub fn to_rgb_hex(self) -> String {
        let [r, g, b, _] = self.to_array();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_array();
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color `{0}`")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }

        let err = || ParseColorError(s.to_owned());
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        // palette handles the 3 and 6 digit forms; the alpha byte is ours.
        let (rgb, alpha) = match hex.len() {
            3 | 6 => (hex, 255),
            8 => {
                let alpha = u8::from_str_radix(&hex[6..], 16).map_err(|_| err())?;
                (&hex[..6], alpha)
            }
            _ => return Err(err()),
        };
        let rgb: Srgb<u8> = rgb.parse().map_err(|_| err())?;

        Ok(Self::rgba(rgb.red, rgb.green, rgb.blue, alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

// ============================================================================
// GlyphStyle
// ============================================================================

/// How a glyph should be drawn.
///
/// `width` and `height` are logical sizes; the rendered bitmap is
/// `round(width * scale) x round(height * scale)` pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GlyphStyle {
    /// Logical canvas width.
    pub width: u32,

    /// Logical canvas height.
    pub height: u32,

    /// Logical font size in points. Defaults to the shorter canvas side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    /// Glyph fill color.
    #[serde(default)]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub color: Color,

    /// Canvas fill behind the glyph.
    #[serde(default = "default_background")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub background: Color,

    /// Display scale factor (2.0 for @2x).
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_background() -> Color {
    Color::TRANSPARENT
}

fn default_scale() -> f32 {
    1.0
}

impl GlyphStyle {
    /// A black glyph on a transparent `width x height` canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            font_size: None,
            color: Color::BLACK,
            background: default_background(),
            scale: default_scale(),
        }
    }

    /// A black glyph on a transparent square canvas.
    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Logical canvas size.
    pub fn size(&self) -> SizePx {
        SizePx::new(self.width, self.height)
    }

    /// Canvas size in device pixels.
    pub fn pixel_size(&self) -> SizePx {
        let scaled = |v: u32| (v as f32 * self.scale).round() as u32;
        SizePx::new(scaled(self.width), scaled(self.height))
    }

    /// Logical font size, falling back to the shorter canvas side.
    pub fn font_size(&self) -> f32 {
        self.font_size
            .unwrap_or_else(|| self.width.min(self.height) as f32)
    }

    /// Font size in device pixels.
    pub fn pixel_font_size(&self) -> f32 {
        self.font_size() * self.scale
    }

    /// Checks that the style describes a drawable glyph.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(format!("scale must be positive, got {}", self.scale));
        }
        if self.pixel_size().is_empty() {
            return Err(format!(
                "canvas {}x{} at scale {} has no pixels",
                self.width, self.height, self.scale
            ));
        }
        let pixels = self.pixel_size();
        if pixels.width > MAX_PIXEL_SIDE || pixels.height > MAX_PIXEL_SIDE {
            return Err(format!(
                "canvas {}x{} exceeds {MAX_PIXEL_SIDE} pixels per side",
                pixels.width, pixels.height
            ));
        }
        let font_size = self.font_size();
        if !(font_size.is_finite() && font_size > 0.0) {
            return Err(format!("font size must be positive, got {font_size}"));
        }
        let pixel_font_size = self.pixel_font_size();
        if pixel_font_size * 2.0 > MAX_PIXEL_SIDE as f32 {
            return Err(format!(
                "font size {pixel_font_size}px needs a surface over {MAX_PIXEL_SIDE} pixels"
            ));
        }
        Ok(())
    }

    /// Serializes the style to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the style to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a style from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
