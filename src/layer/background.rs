//! Background fill and radial glow.

use super::{Layer, RenderContext, opaque};
use crate::color::Rgb8;
use crate::error::OgResult;
use crate::geometry::SizePx;

/// Fills the whole canvas with an opaque color.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundLayer {
    pub color: Rgb8,
}

impl Layer for BackgroundLayer {
    fn name(&self) -> &'static str {
        "background"
    }

    fn paint(&self, ctx: &mut RenderContext) -> OgResult<()> {
        let fill = opaque(self.color);
        for pixel in ctx.canvas.pixels_mut() {
            *pixel = fill;
        }
        Ok(())
    }
}

/// Brightens the canvas around its center.
///
/// The boost is `max_boost` at the center and falls off linearly to zero at
/// `radius` pixels.
#[derive(Debug, Clone, Copy)]
pub struct RadialGlowLayer {
    pub max_boost: f64,
    pub radius: f64,
}

impl Default for RadialGlowLayer {
    fn default() -> Self {
        Self {
            max_boost: 12.0,
            radius: 500.0,
        }
    }
}

impl Layer for RadialGlowLayer {
    fn name(&self) -> &'static str {
        "radial-glow"
    }

    fn paint(&self, ctx: &mut RenderContext) -> OgResult<()> {
        apply_radial_glow(&mut ctx.canvas, self.max_boost, self.radius);
        Ok(())
    }
}

/// Adds `max(0, trunc(max_boost * (1 - d / radius)))` to each color channel,
/// where `d` is the distance to the canvas center. Channels saturate at 255
/// and alpha is left alone.
pub fn apply_radial_glow(canvas: &mut image::RgbaImage, max_boost: f64, radius: f64) {
    let (cx, cy) = SizePx::new(canvas.width(), canvas.height()).center();
    let (cx, cy) = (f64::from(cx), f64::from(cy));

    for (y, row) in canvas.rows_mut().enumerate() {
        let dy = y as f64 - cy;
        let dy2 = dy * dy;

        for (x, pixel) in row.enumerate() {
            let dx = x as f64 - cx;
            let dist = (dx * dx + dy2).sqrt() / radius;
            let boost = (max_boost * (1.0 - dist)) as i64;
            if boost <= 0 {
                continue;
            }
            let boost = boost.min(255) as u8;
            for channel in &mut pixel.0[..3] {
                *channel = channel.saturating_add(boost);
            }
        }
    }
}
