use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{GridError, GridResult};

/// Shared handle to a parsed TrueType font, usable at any pixel size.
#[derive(Clone)]
pub struct FontHandle {
    font: Arc<fontdue::Font>,
}

impl FontHandle {
    /// Parse a font from raw TrueType/OpenType bytes.
    pub fn from_bytes(bytes: &[u8]) -> GridResult<Self> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| GridError::font(format!("parse font: {e}")))?;
        Ok(Self {
            font: Arc::new(font),
        })
    }

    pub(crate) fn font(&self) -> &fontdue::Font {
        &self.font
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("name", &self.font.name())
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

/// Source of parsed fonts for page activation.
pub trait FontProvider: Send + Sync {
    /// Load the font stored at `path`. Missing or corrupt files are fatal.
    fn load(&self, path: &Path) -> GridResult<FontHandle>;
}

/// Filesystem font provider. Every call reads and parses the file again.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsFontProvider;

impl FontProvider for FsFontProvider {
    fn load(&self, path: &Path) -> GridResult<FontHandle> {
        let bytes = std::fs::read(path)
            .map_err(|e| GridError::font(format!("read font '{}': {e}", path.display())))?;
        let handle = FontHandle::from_bytes(&bytes).map_err(|e| match e {
            GridError::Font(msg) => GridError::font(format!("'{}': {msg}", path.display())),
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded font");
        Ok(handle)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
