//! Single-line text layout and drawing with ab_glyph.
//!
//! Text is laid out left to right from a pen origin at the top-left of the
//! ascender line, the same convention the layout constants are expressed in.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, Glyph, PxScale, Rect, ScaleFont, point};
use image::{Rgba, RgbaImage};
use imageproc::pixelops::interpolate;

use crate::error::{OgError, OgResult};

/// A loaded font face at a fixed em size.
pub struct TextFont {
    font: FontVec,
    scale: PxScale,
    path: PathBuf,
}

impl std::fmt::Debug for TextFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFont")
            .field("path", &self.path)
            .field("scale", &self.scale)
            .finish()
    }
}

impl TextFont {
    /// Loads a TrueType/OpenType face so that one em spans `em_px` pixels.
    pub fn load(path: impl AsRef<Path>, em_px: f32) -> OgResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| OgError::font_load(path, e))?;
        Self::from_bytes(data, em_px, path)
    }

    /// Builds a face from raw font bytes; `path` is only used for diagnostics.
    pub fn from_bytes(data: Vec<u8>, em_px: f32, path: impl AsRef<Path>) -> OgResult<Self> {
        let path = path.as_ref();
        let font = FontVec::try_from_vec(data).map_err(|e| OgError::font_load(path, e))?;
        let units_per_em = font
            .units_per_em()
            .ok_or_else(|| OgError::font_load(path, "font has no units-per-em"))?;

        // ab_glyph scales by ascent-to-descent height; convert the em size.
        let scale = PxScale::from(em_px * font.height_unscaled() / units_per_em);

        Ok(Self {
            font,
            scale,
            path: path.to_path_buf(),
        })
    }

    /// Positions each glyph of `text` relative to the pen origin.
    fn layout(&self, text: &str) -> Vec<Glyph> {
        let scaled = self.font.as_scaled(self.scale);
        let ascent = scaled.ascent();
        let mut caret = 0.0f32;
        let mut previous = None;
        let mut glyphs = Vec::with_capacity(text.len());

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(self.scale, point(caret, ascent)));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        glyphs
    }

    /// Returns the ink bounding box of `text` relative to the pen origin.
    ///
    /// Text without any visible glyph measures as an empty rectangle at the
    /// origin.
    pub fn measure(&self, text: &str) -> Rect {
        let mut bounds: Option<Rect> = None;

        for glyph in self.layout(text) {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let b = outlined.px_bounds();
            bounds = Some(match bounds {
                None => b,
                Some(acc) => Rect {
                    min: point(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
                    max: point(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
                },
            });
        }

        bounds.unwrap_or(Rect {
            min: point(0.0, 0.0),
            max: point(0.0, 0.0),
        })
    }

    /// Width in whole pixels of the ink bounding box of `text`.
    pub fn ink_width(&self, text: &str) -> u32 {
        let bounds = self.measure(text);
        (bounds.max.x.ceil() - bounds.min.x.floor()).max(0.0) as u32
    }
}

/// Draws `text` with its pen origin at `(x, y)`.
///
/// Coverage is blended over the existing pixels; anything outside the canvas
/// is clipped.
pub fn draw_text(canvas: &mut RgbaImage, x: i32, y: i32, text: &str, font: &TextFont, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();

    for glyph in font.layout(text) {
        let Some(outlined) = font.font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        let left = x + bounds.min.x as i32;
        let top = y + bounds.min.y as i32;

        outlined.draw(|gx, gy, coverage| {
            let px = left + gx as i32;
            let py = top + gy as i32;
            if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                return;
            }
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            *pixel = interpolate(color, *pixel, coverage.clamp(0.0, 1.0));
        });
    }
}

/// Draws `text` horizontally centered on a canvas of `canvas_width` at `y`.
///
/// There is no wrapping or truncation; text wider than the canvas overflows
/// both edges. Returns the x offset used.
pub fn center_text(
    canvas: &mut RgbaImage,
    y: i32,
    text: &str,
    font: &TextFont,
    color: Rgba<u8>,
    canvas_width: u32,
) -> i32 {
    let text_width = font.ink_width(text);
    let x = (canvas_width as i32 - text_width as i32).div_euclid(2);
    draw_text(canvas, x, y, text, font, color);
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn missing_font_file_is_font_load_error() {
        let err = TextFont::load("/definitely/not/here.ttf", 22.0).unwrap_err();
        match err {
            OgError::FontLoad { path, .. } => assert_eq!(path, Path::new("/definitely/not/here.ttf")),
            other => panic!("expected FontLoad, got {other:?}"),
        }
    }

    #[test]
    fn garbage_bytes_are_font_load_error() {
        let err = TextFont::from_bytes(b"not a font".to_vec(), 22.0, "garbage.ttf").unwrap_err();
        assert!(matches!(err, OgError::FontLoad { .. }));
    }

    #[test]
    fn measure_grows_with_text() {
        let Some(path) = test_support::system_font() else {
            eprintln!("skipping: no TrueType font available");
            return;
        };
        let font = TextFont::load(&path, 22.0).unwrap();

        assert_eq!(font.ink_width(""), 0);
        assert_eq!(font.ink_width("   "), 0);
        let short = font.ink_width("Hi");
        let long = font.ink_width("Hi there, longer text");
        assert!(short > 0);
        assert!(long > short);

        let bigger = TextFont::load(&path, 52.0).unwrap();
        assert!(bigger.ink_width("Hi") > short);
    }

    #[test]
    fn centered_text_is_symmetric() {
        let Some(path) = test_support::system_font() else {
            eprintln!("skipping: no TrueType font available");
            return;
        };
        let font = TextFont::load(&path, 40.0).unwrap();
        let mut canvas = RgbaImage::from_pixel(400, 100, Rgba([0, 0, 0, 255]));

        let x = center_text(&mut canvas, 20, "HHHH", &font, Rgba([255, 255, 255, 255]), 400);
        assert_eq!(x, (400 - font.ink_width("HHHH") as i32).div_euclid(2));

        let lit: Vec<u32> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] > 0)
            .map(|(x, _, _)| x)
            .collect();
        assert!(!lit.is_empty());
        let left = *lit.iter().min().unwrap() as i32;
        let right = 399 - *lit.iter().max().unwrap() as i32;
        // Offsets follow the advance origin, so side bearings skew the margins slightly
        assert!((left - right).abs() <= 16, "left margin {left}, right margin {right}");
    }

    #[test]
    fn overflowing_text_is_clipped_not_rejected() {
        let Some(path) = test_support::system_font() else {
            eprintln!("skipping: no TrueType font available");
            return;
        };
        let font = TextFont::load(&path, 40.0).unwrap();
        let mut canvas = RgbaImage::from_pixel(50, 60, Rgba([0, 0, 0, 255]));

        let x = center_text(
            &mut canvas,
            5,
            "A title far wider than the canvas",
            &font,
            Rgba([255, 255, 255, 255]),
            50,
        );
        assert!(x < 0);
    }
}
