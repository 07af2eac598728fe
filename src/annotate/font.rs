//! Font discovery for overlay text

use ab_glyph::FontVec;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{AppError, Result};

/// DejaVu Sans, compiled in so overlays render on hosts without system fonts
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

// Common locations on Linux and macOS hosts
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// Load a font from `path`
pub fn load_font(path: &Path) -> Option<FontVec> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            debug!(path = ?path, error = %e, "Font not readable");
            return None;
        }
    };

    match FontVec::try_from_vec(data) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!(path = ?path, error = %e, "File is not a usable font");
            None
        }
    }
}

/// The font compiled into the binary
pub fn bundled_font() -> Result<FontVec> {
    FontVec::try_from_vec(BUNDLED_FONT.to_vec())
        .map_err(|e| AppError::Internal(format!("Bundled overlay font is invalid: {}", e)))
}

/// Load the configured font, else the first system font found, else the
/// bundled font
pub fn discover_font(configured: Option<&str>) -> Result<FontVec> {
    if let Some(path) = configured {
        if let Some(font) = load_font(Path::new(path)) {
            debug!(path = %path, "Loaded configured overlay font");
            return Ok(font);
        }
        warn!(path = %path, "Configured overlay font could not be loaded, searching system fonts");
    }

    let system = SYSTEM_FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .filter(|p| p.exists())
        .find_map(|p| {
            let font = load_font(p)?;
            debug!(path = ?p, "Loaded system overlay font");
            Some(font)
        });

    match system {
        Some(font) => Ok(font),
        None => {
            debug!("No system font found, using bundled overlay font");
            bundled_font()
        }
    }
}
