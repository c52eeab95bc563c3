//! Emoji rasterization.
//!
//! Emoji glyphs come from a [`GlyphRasterizer`]. Two sources exist:
//!
//! - [`ColorFontRasterizer`] reads bitmap strikes (sbix/CBDT) from a color
//!   emoji font such as Apple Color Emoji or Noto Color Emoji.
//! - [`TwemojiRasterizer`] renders the bundled Twemoji SVG set (requires the
//!   `twemoji` feature).
//!
//! [`default_rasterizer`] picks one for the current platform and
//! [`render_emoji`] turns a glyph into the cropped tile pasted on the badge.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, GlyphId, GlyphImageFormat};
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{OgError, OgResult};
use crate::geometry::{crop, opaque_bounds};
use crate::svg::composite_over;

/// Target glyph size in pixels.
pub const DEFAULT_EMOJI_SIZE: u32 = 64;

/// Scratch tile the glyph is drawn on before cropping.
pub const TILE_WIDTH: u32 = 250;
pub const TILE_HEIGHT: u32 = 200;
/// Where the glyph lands on the scratch tile.
pub const TILE_ORIGIN: (i32, i32) = (40, 15);

// ============================================================================
// GlyphRasterizer
// ============================================================================

/// Something that can turn an emoji into color pixels.
pub trait GlyphRasterizer {
    /// Short human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Rasterizes `emoji` so that one em spans roughly `size` pixels.
    ///
    /// Returns `Ok(None)` when this source has no image for the glyph.
    fn rasterize(&self, emoji: &str, size: u32) -> OgResult<Option<RgbaImage>>;
}

// ============================================================================
// ColorFontRasterizer
// ============================================================================

/// Reads embedded PNG strikes from a color-emoji font.
pub struct ColorFontRasterizer {
    font: FontVec,
    path: PathBuf,
}

impl ColorFontRasterizer {
    /// Loads the first face of a font file or collection.
    pub fn load(path: impl AsRef<Path>) -> OgResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| OgError::font_load(path, e))?;
        let font = FontVec::try_from_vec_and_index(data, 0).map_err(|e| OgError::font_load(path, e))?;
        Ok(Self {
            font,
            path: path.to_path_buf(),
        })
    }

}

impl GlyphRasterizer for ColorFontRasterizer {
    fn name(&self) -> &str {
        "color-font"
    }

    fn rasterize(&self, emoji: &str, size: u32) -> OgResult<Option<RgbaImage>> {
        // Sequences (ZWJ, skin tones) need shaping; the base codepoint is used.
        let Some(c) = emoji.chars().next() else {
            return Ok(None);
        };
        let id = self.font.glyph_id(c);
        if id == GlyphId(0) {
            debug!(emoji, font = %self.path.display(), "glyph not in font");
            return Ok(None);
        }

        let strike_size = u16::try_from(size).unwrap_or(u16::MAX);
        let Some(raster) = self.font.glyph_raster_image2(id, strike_size) else {
            debug!(emoji, "glyph has no bitmap strike");
            return Ok(None);
        };
        if !matches!(raster.format, GlyphImageFormat::Png) {
            debug!(emoji, format = ?raster.format, "unsupported strike format");
            return Ok(None);
        }

        let strike = image::load_from_memory_with_format(raster.data, ImageFormat::Png)?.to_rgba8();
        Ok(Some(scale_strike(strike, raster.pixels_per_em, size)))
    }
}

/// Resizes a bitmap strike drawn at `pixels_per_em` so one em spans `size`
/// pixels.
///
/// A strike already at the target size is returned as is. A zero
/// `pixels_per_em` is treated as one.
pub fn scale_strike(strike: RgbaImage, pixels_per_em: u16, size: u32) -> RgbaImage {
    let factor = size as f32 / f32::from(pixels_per_em.max(1));
    let width = ((strike.width() as f32 * factor).round() as u32).max(1);
    let height = ((strike.height() as f32 * factor).round() as u32).max(1);

    if (width, height) == strike.dimensions() {
        return strike;
    }
    imageops::resize(&strike, width, height, FilterType::Lanczos3)
}

// ============================================================================
// TwemojiRasterizer
// ============================================================================

/// Renders emoji from the bundled Twemoji SVG assets.
#[cfg(feature = "twemoji")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TwemojiRasterizer;

#[cfg(feature = "twemoji")]
impl GlyphRasterizer for TwemojiRasterizer {
    fn name(&self) -> &str {
        "twemoji"
    }

    fn rasterize(&self, emoji: &str, size: u32) -> OgResult<Option<RgbaImage>> {
        use crate::svg::{render_svg, twemoji_svg};

        let Some(svg) = twemoji_svg(emoji) else {
            return Ok(None);
        };

        render_svg(svg, size)
            .map(Some)
            .ok_or_else(|| OgError::Svg(format!("failed to render twemoji asset for {emoji:?}")))
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Well-known color-emoji font locations for the current platform.
pub fn platform_emoji_fonts() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &["/System/Library/Fonts/Apple Color Emoji.ttc"]
    } else if cfg!(target_os = "linux") {
        &[
            "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
            "/usr/share/fonts/noto/NotoColorEmoji.ttf",
            "/usr/share/fonts/google-noto-emoji/NotoColorEmoji.ttf",
            "/usr/share/fonts/noto-emoji/NotoColorEmoji.ttf",
        ]
    } else {
        &[]
    }
}

/// Chooses the emoji source for a run.
///
/// An explicit `emoji_font` must load. Otherwise the first usable platform
/// font is taken, then the bundled Twemoji set when compiled in.
pub fn default_rasterizer(config: &Config) -> OgResult<Box<dyn GlyphRasterizer>> {
    if let Some(path) = &config.emoji_font {
        debug!(path = %path.display(), "using configured emoji font");
        return Ok(Box::new(ColorFontRasterizer::load(path)?));
    }

    for path in platform_emoji_fonts().iter().map(Path::new).filter(|p| p.is_file()) {
        match ColorFontRasterizer::load(path) {
            Ok(rasterizer) => {
                debug!(path = %path.display(), "using platform emoji font");
                return Ok(Box::new(rasterizer));
            }
            Err(err) => warn!(error = %err, "skipping unusable emoji font"),
        }
    }

    fallback_rasterizer()
}

#[cfg(feature = "twemoji")]
fn fallback_rasterizer() -> OgResult<Box<dyn GlyphRasterizer>> {
    debug!("no platform emoji font, using bundled twemoji");
    Ok(Box::new(TwemojiRasterizer))
}

#[cfg(not(feature = "twemoji"))]
fn fallback_rasterizer() -> OgResult<Box<dyn GlyphRasterizer>> {
    Err(OgError::EmojiFontUnavailable(format!(
        "no color-emoji font found (checked {:?}); set OG_EMOJI_FONT or enable the `twemoji` feature",
        platform_emoji_fonts()
    )))
}

// ============================================================================
// Tile rendering
// ============================================================================

/// Draws `emoji` on a transparent scratch tile and crops it to the visible
/// pixels.
///
/// A glyph without visible pixels yields the uncropped transparent tile.
pub fn render_emoji(rasterizer: &dyn GlyphRasterizer, emoji: &str, size: u32) -> OgResult<RgbaImage> {
    let mut tile = RgbaImage::new(TILE_WIDTH, TILE_HEIGHT);

    if let Some(glyph) = rasterizer.rasterize(emoji, size)? {
        let (x, y) = TILE_ORIGIN;
        composite_over(&mut tile, &glyph, x, y);
    }

    match opaque_bounds(&tile) {
        Some(bounds) => Ok(crop(&tile, bounds)),
        None => {
            warn!(emoji, rasterizer = rasterizer.name(), "emoji rendered no visible pixels");
            Ok(tile)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BlankRasterizer, SquareRasterizer};
    use image::Rgba;

    #[test]
    fn visible_glyph_is_cropped() {
        let rasterizer = SquareRasterizer { color: Rgba([255, 0, 0, 255]) };
        let tile = render_emoji(&rasterizer, "🔥", DEFAULT_EMOJI_SIZE).unwrap();
        assert_eq!(tile.dimensions(), (64, 64));
        assert_eq!(tile.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn oversized_glyph_is_clipped_to_tile() {
        let rasterizer = SquareRasterizer { color: Rgba([0, 255, 0, 255]) };
        let tile = render_emoji(&rasterizer, "🔥", 300).unwrap();
        assert_eq!(tile.dimensions(), (TILE_WIDTH - 40, TILE_HEIGHT - 15));
    }

    #[test]
    fn blank_glyph_returns_uncropped_tile() {
        let tile = render_emoji(&BlankRasterizer, "🔥", DEFAULT_EMOJI_SIZE).unwrap();
        assert_eq!(tile.dimensions(), (TILE_WIDTH, TILE_HEIGHT));
        assert!(tile.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn missing_glyph_returns_uncropped_tile() {
        let rasterizer = SquareRasterizer { color: Rgba([0, 0, 255, 255]) };
        let tile = render_emoji(&rasterizer, "", DEFAULT_EMOJI_SIZE).unwrap();
        assert_eq!(tile.dimensions(), (TILE_WIDTH, TILE_HEIGHT));
    }

    #[test]
    fn strike_scales_down_to_target() {
        let strike = RgbaImage::from_pixel(160, 128, Rgba([255, 200, 0, 255]));
        let scaled = scale_strike(strike, 160, 64);
        assert_eq!(scaled.dimensions(), (64, 51));
        let center = scaled.get_pixel(32, 25).0;
        for (got, want) in center.iter().zip([255u8, 200, 0, 255]) {
            assert!(got.abs_diff(want) <= 1, "center {center:?}");
        }
    }

    #[test]
    fn strike_at_target_size_is_untouched() {
        let mut strike = RgbaImage::new(64, 64);
        strike.put_pixel(3, 5, Rgba([9, 8, 7, 6]));
        let scaled = scale_strike(strike.clone(), 64, 64);
        assert_eq!(scaled, strike);
    }

    #[test]
    fn zero_ppem_strike_does_not_divide_by_zero() {
        let scaled = scale_strike(RgbaImage::new(2, 3), 0, 4);
        assert_eq!(scaled.dimensions(), (8, 12));
    }

    #[test]
    fn platform_color_font_renders_cropped_tile() {
        let Some(path) = platform_emoji_fonts().iter().map(Path::new).find(|p| p.is_file()) else {
            eprintln!("skipping: no platform color-emoji font");
            return;
        };
        let rasterizer = ColorFontRasterizer::load(path).unwrap();

        let tile = render_emoji(&rasterizer, "🔥", DEFAULT_EMOJI_SIZE).unwrap();

        // Strikes carry some padding around the em box, then get cropped
        assert!(tile.width() <= 96 && tile.height() <= 96, "tile {:?}", tile.dimensions());
        assert!(tile.width() >= 32 && tile.height() >= 32, "tile {:?}", tile.dimensions());
        assert!(tile.pixels().any(|p| p[3] == 255));
    }

    #[test]
    fn missing_color_font_is_font_load_error() {
        let err = ColorFontRasterizer::load("/no/such/emoji.ttc").err().unwrap();
        assert!(matches!(err, OgError::FontLoad { .. }));
    }

    #[test]
    fn configured_emoji_font_must_load() {
        let config = Config {
            emoji_font: Some(PathBuf::from("/no/such/emoji.ttc")),
            ..Config::default()
        };
        let err = default_rasterizer(&config).err().unwrap();
        assert!(matches!(err, OgError::FontLoad { .. }));
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn default_rasterizer_always_available_with_twemoji() {
        let rasterizer = default_rasterizer(&Config::default()).unwrap();
        assert!(["color-font", "twemoji"].contains(&rasterizer.name()));
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn twemoji_renders_visible_fire() {
        let tile = render_emoji(&TwemojiRasterizer, "🔥", DEFAULT_EMOJI_SIZE).unwrap();
        assert!(tile.width() <= 65 && tile.height() <= 65);
        assert!(tile.pixels().any(|p| p[3] == 255));
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn twemoji_unknown_glyph_is_none() {
        assert!(TwemojiRasterizer.rasterize("x", 64).unwrap().is_none());
    }
}
