//! Solid accent bars.

use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use super::{Layer, RenderContext, opaque};
use crate::color::Rgb8;
use crate::error::OgResult;
use crate::geometry::RectPx;

/// A filled axis-aligned rectangle, used for the separator and the bottom
/// edge bar.
#[derive(Debug, Clone, Copy)]
pub struct BarLayer {
    pub name: &'static str,
    pub rect: RectPx,
    pub color: Rgb8,
}

impl Layer for BarLayer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn paint(&self, ctx: &mut RenderContext) -> OgResult<()> {
        if self.rect.width == 0 || self.rect.height == 0 {
            return Ok(());
        }
        let rect = Rect::at(self.rect.x as i32, self.rect.y as i32).of_size(self.rect.width, self.rect.height);
        draw_filled_rect_mut(&mut ctx.canvas, rect, opaque(self.color));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SizePx;

    #[test]
    fn separator_covers_exact_rect() {
        let mut ctx = RenderContext::new(SizePx::new(1200, 630));
        BarLayer {
            name: "separator",
            rect: RectPx::centered_x(1200, 340, 60, 4),
            color: (237, 119, 47),
        }
        .paint(&mut ctx)
        .unwrap();

        assert_eq!(ctx.canvas.get_pixel(570, 340).0, [237, 119, 47, 255]);
        assert_eq!(ctx.canvas.get_pixel(629, 343).0, [237, 119, 47, 255]);
        assert_eq!(ctx.canvas.get_pixel(569, 340)[3], 0);
        assert_eq!(ctx.canvas.get_pixel(630, 340)[3], 0);
        assert_eq!(ctx.canvas.get_pixel(600, 344)[3], 0);
    }

    #[test]
    fn bottom_bar_reaches_last_row() {
        let mut ctx = RenderContext::new(SizePx::new(1200, 630));
        BarLayer {
            name: "bottom-bar",
            rect: RectPx::new(0, 626, 1200, 4),
            color: (1, 2, 3),
        }
        .paint(&mut ctx)
        .unwrap();

        assert_eq!(ctx.canvas.get_pixel(0, 629).0, [1, 2, 3, 255]);
        assert_eq!(ctx.canvas.get_pixel(1199, 626).0, [1, 2, 3, 255]);
        assert_eq!(ctx.canvas.get_pixel(0, 625)[3], 0);
    }

    #[test]
    fn empty_bar_is_a_no_op() {
        let mut ctx = RenderContext::new(SizePx::new(4, 4));
        BarLayer {
            name: "empty",
            rect: RectPx::new(0, 0, 0, 4),
            color: (1, 2, 3),
        }
        .paint(&mut ctx)
        .unwrap();
        assert!(ctx.canvas.pixels().all(|p| p[3] == 0));
    }
}
