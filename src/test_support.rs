//! Helpers shared by the unit tests.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use resvg::usvg::fontdb;

use crate::composer::{BODY_FONT_FILE, TITLE_FONT_FILE};
use crate::emoji::GlyphRasterizer;
use crate::error::OgResult;

const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Finds any outline TrueType/OpenType font on this machine.
///
/// `OG_TEST_FONT` wins, then a few well-known paths, then whatever the system
/// font database reports.
pub fn system_font() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("OG_TEST_FONT").map(PathBuf::from) {
        if path.is_file() {
            return Some(path);
        }
    }

    if let Some(path) = CANDIDATES.iter().map(PathBuf::from).find(|p| p.is_file()) {
        return Some(path);
    }

    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    db.faces().find_map(|face| match &face.source {
        fontdb::Source::File(path) if face.index == 0 && is_plain_outline_font(path) => {
            Some(path.clone())
        }
        _ => None,
    })
}

fn is_plain_outline_font(path: &Path) -> bool {
    let name = path.to_string_lossy().to_ascii_lowercase();
    (name.ends_with(".ttf") || name.ends_with(".otf")) && !name.contains("emoji")
}

/// Populates `dir` with a font directory the composer accepts, copying a
/// system font under the expected face names.
pub fn font_dir_fixture(dir: &Path) -> Option<PathBuf> {
    let font = system_font()?;
    let font_dir = dir.join("fonts");
    std::fs::create_dir_all(&font_dir).ok()?;
    for name in [TITLE_FONT_FILE, BODY_FONT_FILE] {
        std::fs::copy(&font, font_dir.join(name)).ok()?;
    }
    Some(font_dir)
}

/// Rasterizer double producing a solid square, or nothing for `""`.
pub struct SquareRasterizer {
    pub color: Rgba<u8>,
}

impl GlyphRasterizer for SquareRasterizer {
    fn name(&self) -> &str {
        "square"
    }

    fn rasterize(&self, emoji: &str, size: u32) -> OgResult<Option<RgbaImage>> {
        if emoji.is_empty() {
            return Ok(None);
        }
        Ok(Some(RgbaImage::from_pixel(size, size, self.color)))
    }
}

/// Rasterizer double whose glyphs have no visible pixels.
pub struct BlankRasterizer;

impl GlyphRasterizer for BlankRasterizer {
    fn name(&self) -> &str {
        "blank"
    }

    fn rasterize(&self, _emoji: &str, size: u32) -> OgResult<Option<RgbaImage>> {
        Ok(Some(RgbaImage::new(size, size)))
    }
}
