//! Horizontally centered text lines.

use image::Rgba;

use super::{Layer, RenderContext};
use crate::error::OgResult;
use crate::text::{TextFont, center_text};

pub struct CenteredTextLayer<'a> {
    pub name: &'static str,
    pub text: &'a str,
    pub font: &'a TextFont,
    /// Top of the ascender line.
    pub y: i32,
    pub color: Rgba<u8>,
}

impl Layer for CenteredTextLayer<'_> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn paint(&self, ctx: &mut RenderContext) -> OgResult<()> {
        let width = ctx.canvas.width();
        center_text(&mut ctx.canvas, self.y, self.text, self.font, self.color, width);
        Ok(())
    }
}
