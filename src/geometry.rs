//! Pixel geometry used by the layout.
//!
//! Rectangles and sizes in integer pixel units, plus helpers for finding and
//! cropping the visible region of an RGBA tile.

use image::RgbaImage;

/// A rectangle defined in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the canvas
    pub x: u32,
    /// Y offset from the top edge of the canvas
    pub y: u32,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
}

impl RectPx {
    /// Creates a new rectangle with the given position and dimensions.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle starting at origin (0, 0) with the given dimensions.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    /// Creates a rectangle of the given size, horizontally centered on a
    /// canvas of `canvas_width` at vertical offset `y`.
    pub fn centered_x(canvas_width: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x: canvas_width.saturating_sub(width) / 2,
            y,
            width,
            height,
        }
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns the top-left position that centers an `inner_width` x
    /// `inner_height` box inside this rectangle.
    ///
    /// Uses floor division, so an inner box larger than the rectangle gets a
    /// negative offset relative to the rectangle's origin.
    pub fn center_offset(&self, inner_width: u32, inner_height: u32) -> (i32, i32) {
        let dx = (self.width as i32 - inner_width as i32).div_euclid(2);
        let dy = (self.height as i32 - inner_height as i32).div_euclid(2);
        (self.x as i32 + dx, self.y as i32 + dy)
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The pixel at the center of this size, rounded down.
    pub fn center(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }
}

/// Finds the bounding box of all pixels with non-zero alpha.
///
/// Returns `None` when the image is fully transparent.
pub fn opaque_bounds(image: &RgbaImage) -> Option<RectPx> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut found = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        found = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    found.then(|| RectPx::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Copies the given region out of an image.
pub fn crop(image: &RgbaImage, rect: RectPx) -> RgbaImage {
    image::imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image()
}
