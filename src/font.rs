//! Icon font loading and per-name registration.
//!
//! Fonts are registered explicitly through a [`FontRegistry`] rather than as
//! a side effect of the first render. Each name is loaded once; the outcome,
//! success or failure, is remembered for the lifetime of the registry.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use log::{debug, warn};
use resvg::usvg::fontdb::{Database, Family, Query};

use crate::error::FontError;

// ============================================================================
// IconFont
// ============================================================================

/// A loaded font, held in its own private font database.
///
/// Keeping each font in a separate database means text rendered with it can
/// never silently fall back to some other installed font.
#[derive(Clone)]
pub struct IconFont {
    family: String,
    database: Arc<Database>,
}

impl IconFont {
    /// Loads a font from TrueType/OpenType bytes.
    ///
    /// The family name of the first face becomes the font's family.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        let mut database = Database::new();
        database.load_font_data(bytes);

        let face = database.faces().next().ok_or(FontError::InvalidData)?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .ok_or(FontError::MissingFamily)?;

        Ok(Self {
            family,
            database: Arc::new(database),
        })
    }

    /// Loads a font file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FontError> {
        Self::from_bytes(read_font_file(path.as_ref())?)
    }

    /// The process-wide fallback font, used when no icon font is available.
    ///
    /// Built lazily from the installed system fonts, preferring whatever the
    /// system maps to `sans-serif`. `None` if the system has no fonts at all.
    pub fn system_fallback() -> Option<Arc<IconFont>> {
        static FALLBACK: OnceLock<Option<Arc<IconFont>>> = OnceLock::new();

        FALLBACK
            .get_or_init(|| {
                let mut database = Database::new();
                database.load_system_fonts();

                let sans = Query {
                    families: &[Family::SansSerif],
                    ..Query::default()
                };
                let face = match database.query(&sans) {
                    Some(id) => database.face(id),
                    None => database.faces().next(),
                };
                let family = face?.families.first()?.0.clone();
                debug!(
                    "loaded {} system faces, fallback family `{family}`",
                    database.len()
                );

                Some(Arc::new(IconFont {
                    family,
                    database: Arc::new(database),
                }))
            })
            .clone()
    }

    /// The font's family name, as used to select it when rendering.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Number of faces loaded from the font data.
    pub fn face_count(&self) -> usize {
        self.database.len()
    }

    pub(crate) fn database(&self) -> Arc<Database> {
        Arc::clone(&self.database)
    }
}

impl fmt::Debug for IconFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconFont")
            .field("family", &self.family)
            .field("faces", &self.database.len())
            .finish()
    }
}

fn read_font_file(path: &Path) -> Result<Vec<u8>, FontError> {
    fs::read(path).map_err(|e| FontError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

// ============================================================================
// FontRegistry
// ============================================================================

/// A thread-safe cache of registered fonts keyed by name.
#[derive(Default)]
pub struct FontRegistry {
    fonts: Mutex<HashMap<String, Result<Arc<IconFont>, FontError>>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static FontRegistry {
        static GLOBAL: OnceLock<FontRegistry> = OnceLock::new();
        GLOBAL.get_or_init(FontRegistry::new)
    }

    /// Registers font bytes under `name`.
    ///
    /// If `name` was registered before, the earlier outcome is returned and
    /// `bytes` is ignored.
    pub fn register(&self, name: &str, bytes: Vec<u8>) -> Result<Arc<IconFont>, FontError> {
        self.register_with(name, || Ok(bytes))
    }

    /// Registers a font file under `name`, reading it only on first use.
    pub fn register_file(
        &self,
        name: &str,
        path: impl AsRef<Path>,
    ) -> Result<Arc<IconFont>, FontError> {
        self.register_with(name, || read_font_file(path.as_ref()))
    }

    /// Registers the font produced by `load` under `name`.
    ///
    /// `load` runs at most once per name; later calls return the cached
    /// result without invoking it.
    pub fn register_with<F>(&self, name: &str, load: F) -> Result<Arc<IconFont>, FontError>
    where
        F: FnOnce() -> Result<Vec<u8>, FontError>,
    {
        let mut fonts = self.lock();

        if let Some(cached) = fonts.get(name) {
            if let Err(err) = cached {
                warn!("icon font `{name}` previously failed to register: {err}");
            }
            return cached.clone();
        }

        let result = load().and_then(IconFont::from_bytes).map(Arc::new);
        match &result {
            Ok(font) => debug!(
                "registered icon font `{name}` (family `{}`, {} faces)",
                font.family(),
                font.face_count()
            ),
            Err(err) => warn!("failed to register icon font `{name}`: {err}"),
        }

        fonts.insert(name.to_owned(), result.clone());
        result
    }

    /// Returns the font registered under `name`, if registration succeeded.
    pub fn get(&self, name: &str) -> Option<Arc<IconFont>> {
        self.lock().get(name)?.as_ref().ok().cloned()
    }

    /// Returns true if `name` was registered successfully.
    pub fn is_registered(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Drops the cached outcome for `name` so it can be registered again.
    pub fn forget(&self, name: &str) -> bool {
        self.lock().remove(name).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Result<Arc<IconFont>, FontError>>> {
        self.fonts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fonts = self.lock();
        let mut names: Vec<_> = fonts.keys().collect();
        names.sort();
        f.debug_struct("FontRegistry").field("fonts", &names).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

/// Reads a commonly installed TrueType font, if this machine has one.
#[cfg(test)]
pub(crate) fn system_test_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|path| fs::read(path).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = IconFont::from_bytes(b"definitely not a font".to_vec()).unwrap_err();
        assert_eq!(err, FontError::InvalidData);
        assert_eq!(IconFont::from_bytes(Vec::new()).unwrap_err(), FontError::InvalidData);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = IconFont::from_file("/nonexistent/icons.ttf").unwrap_err();
        assert!(matches!(err, FontError::Io { ref path, .. } if path == Path::new("/nonexistent/icons.ttf")));
    }

    #[test]
    fn loads_real_font() {
        let Some(bytes) = system_test_font() else {
            return;
        };
        let font = IconFont::from_bytes(bytes).unwrap();
        assert!(!font.family().is_empty());
        assert!(font.face_count() >= 1);
    }

    #[test]
    fn failed_registration_is_cached() {
        let registry = FontRegistry::new();
        let calls = Cell::new(0);
        let load = || {
            calls.set(calls.get() + 1);
            Ok(b"junk".to_vec())
        };

        assert_eq!(registry.register_with("icons", load).unwrap_err(), FontError::InvalidData);
        assert_eq!(
            registry
                .register_with("icons", || {
                    calls.set(calls.get() + 1);
                    Ok(Vec::new())
                })
                .unwrap_err(),
            FontError::InvalidData
        );
        assert_eq!(calls.get(), 1);
        assert!(!registry.is_registered("icons"));
        assert!(registry.get("icons").is_none());
    }

    #[test]
    fn forget_allows_retry() {
        let registry = FontRegistry::new();
        registry
            .register_file("icons", "/nonexistent/icons.ttf")
            .unwrap_err();

        assert!(registry.forget("icons"));
        assert!(!registry.forget("icons"));

        let err = registry
            .register_with("icons", || Err(FontError::MissingFamily))
            .unwrap_err();
        assert_eq!(err, FontError::MissingFamily);
    }

    #[test]
    fn successful_registration_is_shared() {
        let Some(bytes) = system_test_font() else {
            return;
        };
        let registry = FontRegistry::new();
        let first = registry.register("sans", bytes).unwrap();
        let second = registry.register("sans", Vec::new()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.is_registered("sans"));
        assert!(Arc::ptr_eq(&registry.get("sans").unwrap(), &first));
        assert!(format!("{registry:?}").contains("sans"));
    }

    #[test]
    fn global_registry_is_singleton() {
        assert!(std::ptr::eq(FontRegistry::global(), FontRegistry::global()));
    }
}
