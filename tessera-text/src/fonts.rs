//! Font loading — explicit bytes, a file path, or system discovery.
//!
//! Discovery goes through `font-kit`'s system source to find the best
//! monospace match and hands the raw face bytes to `fontdue`. All
//! failures here are configuration errors: they surface once, at
//! startup, and are not recoverable further down.

use std::path::Path;

use font_kit::family_name::FamilyName;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("failed to read font file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse font data: {0}")]
    Parse(&'static str),
    #[error("no usable monospace font on this system: {0}")]
    Discovery(String),
}

/// Parse an in-memory font face.
pub fn load_font_bytes(bytes: &[u8]) -> Result<fontdue::Font, FontError> {
    fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()).map_err(FontError::Parse)
}

/// Read and parse a font file.
pub fn load_font_file(path: impl AsRef<Path>) -> Result<fontdue::Font, FontError> {
    let bytes = std::fs::read(path.as_ref())?;
    load_font_bytes(&bytes)
}

/// Find the system's best monospace face and load it.
pub fn discover_monospace() -> Result<fontdue::Font, FontError> {
    let handle = SystemSource::new()
        .select_best_match(&[FamilyName::Monospace], &Properties::new())
        .map_err(|e| FontError::Discovery(e.to_string()))?;
    let face = handle
        .load()
        .map_err(|e| FontError::Discovery(e.to_string()))?;
    let data = face.copy_font_data().ok_or_else(|| {
        FontError::Discovery(format!("face {} exposes no font data", face.full_name()))
    })?;

    log::info!("using monospace face {}", face.full_name());
    load_font_bytes(&data)
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail_to_parse() {
        assert!(matches!(
            load_font_bytes(&[0xDE, 0xAD, 0xBE, 0xEF]),
            Err(FontError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        assert!(matches!(
            load_font_file("/nonexistent/face.ttf"),
            Err(FontError::Io(_))
        ));
    }

    #[test]
    fn test_discovered_face_covers_ascii() {
        // Bare CI images may have no fonts installed — skip gracefully.
        let Ok(font) = discover_monospace() else { return };
        for ch in 'A'..='Z' {
            assert_ne!(font.lookup_glyph_index(ch), 0, "missing glyph for {ch}");
        }
    }
}
