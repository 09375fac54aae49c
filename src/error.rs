//! Error types for trimming, font loading, catalog parsing and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Precondition violations of the glyph trimmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrimError {
    #[error("source buffer has no pixels")]
    EmptyBuffer,

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
}

/// Font registration failures.
///
/// Cloneable so that a failed registration can be cached and handed back
/// to later callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    #[error("failed to read font file {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("font data contains no usable face")]
    InvalidData,

    #[error("font face has no family name")]
    MissingFamily,
}

/// Icon manifest failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed icon manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read icon manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("icon `{name}` has invalid codepoint `{value}`")]
    InvalidCodepoint { name: String, value: String },
}

/// Failures of the glyph rendering path.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown icon `{0}`")]
    UnknownIcon(String),

    #[error("invalid glyph style: {0}")]
    InvalidStyle(String),

    #[error(transparent)]
    Trim(#[from] TrimError),

    #[error("failed to build glyph document: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("cannot allocate a {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },
}
