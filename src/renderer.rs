//! The icon rendering entry point: lookup, rasterize, trim, memoize.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::catalog::IconCatalog;
use crate::error::RenderError;
use crate::font::IconFont;
use crate::icon::{IconImage, IconSet};
use crate::raster::render_glyph;
use crate::style::GlyphStyle;

// ============================================================================
// CacheKey
// ============================================================================

/// Key for memoized renders.
///
/// Floats are keyed by their bit patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    glyph: char,
    width: u32,
    height: u32,
    font_size_bits: Option<u32>,
    scale_bits: u32,
    color: [u8; 4],
    background: [u8; 4],
}

impl CacheKey {
    fn new(glyph: char, style: &GlyphStyle) -> Self {
        Self {
            glyph,
            width: style.width,
            height: style.height,
            font_size_bits: style.font_size.map(f32::to_bits),
            scale_bits: style.scale.to_bits(),
            color: style.color.to_array(),
            background: style.background.to_array(),
        }
    }
}

// ============================================================================
// IconRenderer
// ============================================================================

/// Renders icons from one icon font by name or CSS code.
///
/// # Example
///
/// ```
/// use iconfont_renderer::{GlyphStyle, IconCatalog, IconRenderer, RenderError};
///
/// let catalog = IconCatalog::from_json(r#"{"prefix": "fa-", "icons": {"github": "f09b"}}"#)?;
/// let mut renderer = IconRenderer::new(catalog, None);
///
/// assert_eq!(renderer.glyph("fa-github"), Some('\u{f09b}'));
/// assert!(matches!(
///     renderer.render("fa-missing", &GlyphStyle::square(32)),
///     Err(RenderError::UnknownIcon(_))
/// ));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct IconRenderer {
    catalog: IconCatalog,
    font: Option<Arc<IconFont>>,
    cache: HashMap<CacheKey, IconImage>,
}

impl IconRenderer {
    /// Creates a renderer for `catalog`.
    ///
    /// With `font` set to `None` every icon renders as a placeholder glyph.
    pub fn new(catalog: IconCatalog, font: Option<Arc<IconFont>>) -> Self {
        Self {
            catalog,
            font,
            cache: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &IconCatalog {
        &self.catalog
    }

    pub fn font(&self) -> Option<&IconFont> {
        self.font.as_deref()
    }

    /// Replaces the font, dropping every memoized render.
    pub fn set_font(&mut self, font: Option<Arc<IconFont>>) {
        self.font = font;
        self.clear_cache();
    }

    /// Resolves a name or CSS code to its glyph.
    pub fn glyph(&self, query: &str) -> Option<char> {
        self.catalog.lookup(query)
    }

    /// Resolves a name or CSS code to a string holding its glyph, for
    /// embedding in text drawn with the icon font.
    pub fn glyph_string(&self, query: &str) -> Option<String> {
        self.glyph(query).map(String::from)
    }

    /// Renders the icon named by `query`.
    ///
    /// Unknown names fail with [`RenderError::UnknownIcon`].
    pub fn render(&mut self, query: &str, style: &GlyphStyle) -> Result<IconImage, RenderError> {
        let glyph = self
            .glyph(query)
            .ok_or_else(|| RenderError::UnknownIcon(query.to_owned()))?;

        let key = CacheKey::new(glyph, style);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        debug!(
            "rendering `{query}` (U+{:04X}) at {}x{} @{}x",
            u32::from(glyph),
            style.width,
            style.height,
            style.scale
        );
        let icon = render_glyph(self.font.as_deref(), glyph, style)?;
        self.cache.insert(key, icon.clone());
        Ok(icon)
    }

    /// Renders the icon once per display scale in `scales`.
    pub fn render_scales(
        &mut self,
        query: &str,
        style: &GlyphStyle,
        scales: &[f32],
    ) -> Result<IconSet, RenderError> {
        let images = scales
            .iter()
            .map(|&scale| self.render(query, &style.clone().with_scale(scale)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IconSet::from_images(images))
    }

    /// Number of memoized renders.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Clears memoized renders. Useful for freeing memory.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================
