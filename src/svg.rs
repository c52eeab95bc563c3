//! Vector shapes and RGBA compositing.
//!
//! The badge and the bundled Twemoji glyphs are SVG documents rasterized with
//! resvg. Every RGBA tile reaches the canvas through [`composite_over`].

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::color::{Rgb8, rgb_to_hex};

/// Looks up the Twemoji SVG document for `emoji`.
///
/// Twemoji keys most glyphs without the emoji presentation selector, so a
/// miss is retried with U+FE0F removed.
#[cfg(feature = "twemoji")]
pub fn twemoji_svg(emoji: &str) -> Option<&'static str> {
    use twemoji_assets::svg::SvgTwemojiAsset;

    let asset = SvgTwemojiAsset::from_emoji(emoji)
        .or_else(|| SvgTwemojiAsset::from_emoji(&emoji.replace('\u{FE0F}', "")))?;
    Some(asset.as_ref())
}

/// Markup for a `width` x `height` rectangle with rounded corners.
pub fn rounded_rect_svg(width: u32, height: u32, radius: u32, fill: Rgb8) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><rect width="{width}" height="{height}" rx="{radius}" ry="{radius}" fill="{}"/></svg>"#,
        rgb_to_hex(fill),
    )
}

/// Rasterizes an SVG document so its longer side spans `size` pixels.
///
/// Returns `None` when the markup does not parse or the target is empty.
pub fn render_svg(svg_data: &str, size: u32) -> Option<RgbaImage> {
    let tree = Tree::from_str(svg_data, &Options::default()).ok()?;

    let doc = tree.size();
    let scale = size as f32 / doc.width().max(doc.height());
    let mut pixmap = Pixmap::new(
        (doc.width() * scale).ceil() as u32,
        (doc.height() * scale).ceil() as u32,
    )?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Some(straight_alpha_image(&pixmap))
}

/// tiny_skia keeps premultiplied pixels; `image` expects straight alpha.
fn straight_alpha_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

/// Draws `src` over `dest` with its top-left corner at `(x, y)`.
///
/// Source-over blending; whatever falls outside `dest` is dropped.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let (dest_w, dest_h) = (dest.width() as i32, dest.height() as i32);

    for (sx, sy, pixel) in src.enumerate_pixels() {
        let (dx, dy) = (x + sx as i32, y + sy as i32);
        if pixel[3] == 0 || dx < 0 || dy < 0 || dx >= dest_w || dy >= dest_h {
            continue;
        }
        let under = dest.get_pixel_mut(dx as u32, dy as u32);
        *under = source_over(*pixel, *under);
    }
}

fn source_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    let da = u32::from(dst[3]);

    // Channel weights scaled by 255 * 255.
    let src_weight = sa * 255;
    let dst_weight = da * (255 - sa);
    let total = src_weight + dst_weight;
    if total == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mix = |s: u8, d: u8| {
        ((u32::from(s) * src_weight + u32::from(d) * dst_weight + total / 2) / total) as u8
    };
    Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        ((total + 127) / 255) as u8,
    ])
}
