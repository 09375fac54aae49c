//! Lookup of icon glyphs by name or CSS code.
//!
//! An icon font ships with a manifest that maps each icon name to the
//! codepoint of its glyph. The CSS code of an icon is its name with the
//! font's class prefix prepended (`github` becomes `fa-github`).
//!
//! ```json
//! {
//!   "prefix": "fa-",
//!   "icons": {
//!     "github": "f09b",
//!     "home": "\\f015"
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// On-disk manifest format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    #[serde(default)]
    prefix: String,
    icons: BTreeMap<String, String>,
}

/// A name-to-glyph table for one icon font.
///
/// Names and codes are matched ignoring ASCII case and surrounding
/// whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconCatalog {
    prefix: String,
    glyphs: BTreeMap<String, char>,
}

impl IconCatalog {
    /// Creates an empty catalog whose CSS codes start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: normalize(&prefix.into()),
            glyphs: BTreeMap::new(),
        }
    }

    /// Parses a JSON manifest.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        let mut catalog = Self::new(manifest.prefix);

        for (name, value) in manifest.icons {
            let glyph = parse_codepoint(&value)
                .ok_or_else(|| CatalogError::InvalidCodepoint {
                    name: name.clone(),
                    value: value.clone(),
                })?;
            catalog.insert(&name, glyph);
        }

        Ok(catalog)
    }

    /// Reads and parses a JSON manifest from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the catalog back into manifest form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let manifest = Manifest {
            prefix: self.prefix.clone(),
            icons: self
                .glyphs
                .iter()
                .map(|(name, glyph)| (name.clone(), format!("{:x}", u32::from(*glyph))))
                .collect(),
        };
        serde_json::to_string_pretty(&manifest)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Adds or replaces an icon, returning the glyph it previously mapped to.
    pub fn insert(&mut self, name: &str, glyph: char) -> Option<char> {
        self.glyphs.insert(normalize(name), glyph)
    }

    /// Looks up an icon by bare name (`github`).
    pub fn glyph_for_name(&self, name: &str) -> Option<char> {
        self.glyphs.get(&normalize(name)).copied()
    }

    /// Looks up an icon by prefixed CSS code (`fa-github`).
    pub fn glyph_for_code(&self, code: &str) -> Option<char> {
        let code = normalize(code);
        let name = code.strip_prefix(self.prefix.as_str())?;
        self.glyphs.get(name).copied()
    }

    /// Looks up an icon by CSS code, then by bare name.
    pub fn lookup(&self, query: &str) -> Option<char> {
        self.glyph_for_code(query)
            .or_else(|| self.glyph_for_name(query))
    }

    /// Returns the CSS code for an icon name.
    pub fn css_code(&self, name: &str) -> String {
        format!("{}{}", self.prefix, normalize(name))
    }

    /// Reverse lookup: the first name (alphabetically) mapped to `glyph`.
    pub fn name_for_glyph(&self, glyph: char) -> Option<&str> {
        self.glyphs
            .iter()
            .find(|(_, g)| **g == glyph)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Iterates over `(name, glyph)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, char)> {
        self.glyphs.iter().map(|(name, glyph)| (name.as_str(), *glyph))
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

/// Parses a hexadecimal codepoint.
///
/// Accepts a bare hex string (`f09b`) optionally prefixed by `\` (CSS
/// escape), `U+` or `0x`. Returns `None` for anything that is not a Unicode
/// scalar value.
pub fn parse_codepoint(value: &str) -> Option<char> {
    let value = value.trim();
    let hex = ["\\", "U+", "u+", "0x", "0X"]
        .iter()
        .find_map(|prefix| value.strip_prefix(prefix))
        .unwrap_or(value);

    if hex.is_empty() || hex.len() > 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

// ============================================================================
// Tests
// ============================================================================
