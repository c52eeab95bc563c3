//! Accent badge and the emoji pasted on it.

use image::RgbaImage;
use tracing::debug;

use super::{Layer, RenderContext};
use crate::color::Rgb8;
use crate::error::{OgError, OgResult};
use crate::geometry::RectPx;
use crate::svg::{composite_over, render_svg, rounded_rect_svg};

/// Where the badge was painted.
///
/// Emitted by [`BadgeLayer`], consumed by [`EmojiLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeBounds(pub RectPx);

/// A filled rounded rectangle.
#[derive(Debug, Clone, Copy)]
pub struct BadgeLayer {
    pub rect: RectPx,
    pub corner_radius: u32,
    pub color: Rgb8,
}

impl Layer for BadgeLayer {
    fn name(&self) -> &'static str {
        "badge"
    }

    fn paint(&self, ctx: &mut RenderContext) -> OgResult<()> {
        let svg = rounded_rect_svg(self.rect.width, self.rect.height, self.corner_radius, self.color);
        let shape = render_svg(&svg, self.rect.width.max(self.rect.height))
            .ok_or_else(|| OgError::Svg("failed to rasterize badge".into()))?;

        composite_over(&mut ctx.canvas, &shape, self.rect.x as i32, self.rect.y as i32);
        Ok(())
    }

    fn emit(&self, ctx: &mut RenderContext) {
        ctx.set(BadgeBounds(self.rect));
    }
}

/// Pastes an emoji tile centered on the badge.
///
/// Without an upstream [`BadgeBounds`] the tile is centered on the canvas.
pub struct EmojiLayer {
    pub tile: RgbaImage,
}

impl Layer for EmojiLayer {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn paint(&self, ctx: &mut RenderContext) -> OgResult<()> {
        let area = ctx
            .get::<BadgeBounds>()
            .map(|b| b.0)
            .unwrap_or_else(|| RectPx::from_size(ctx.canvas.width(), ctx.canvas.height()));

        let (x, y) = area.center_offset(self.tile.width(), self.tile.height());
        debug!(x, y, width = self.tile.width(), height = self.tile.height(), "placing emoji");
        composite_over(&mut ctx.canvas, &self.tile, x, y);
        Ok(())
    }
}
