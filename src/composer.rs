//! Card composition engine.
//!
//! [`Composer`] loads the text faces and the emoji source once, then renders
//! any number of [`ImageItem`]s into the fixed 1200x630 layout and writes
//! them as RGB PNG files.
//!
//! # Layout
//!
//! | Element     | Position                          | Style                     |
//! |-------------|-----------------------------------|---------------------------|
//! | Badge       | 120x120 at (540, 115), radius 24  | accent fill               |
//! | Emoji       | centered on the badge             | 64 px                     |
//! | Title       | centered, y = 270                 | bold 52 px, white         |
//! | Separator   | 60x4 at (570, 340)                | accent                    |
//! | Description | centered, y = 370                 | regular 22 px, light gray |
//! | Brand       | centered, y = 570                 | regular 16 px, dark gray  |
//! | Bottom bar  | 1200x4 at (0, 626)                | accent                    |

use std::fs::File;
use std::io::BufWriter;
use std::path::{Component, Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{Rgb, Rgba, RgbImage, RgbaImage};
use tracing::{debug, info, warn};

use crate::batch::ImageItem;
use crate::color::Rgb8;
use crate::config::Config;
use crate::emoji::{DEFAULT_EMOJI_SIZE, GlyphRasterizer, default_rasterizer, render_emoji};
use crate::error::{OgError, OgResult};
use crate::geometry::{RectPx, SizePx};
use crate::layer::{
    BackgroundLayer, BadgeLayer, BarLayer, CenteredTextLayer, EmojiLayer, LayerPipeline,
    RadialGlowLayer, RenderContext,
};
use crate::text::TextFont;

pub const CANVAS: SizePx = SizePx::new(1200, 630);

pub const TITLE_FONT_FILE: &str = "BricolageGrotesque-Bold.ttf";
pub const BODY_FONT_FILE: &str = "BricolageGrotesque-Regular.ttf";
pub const TITLE_SIZE: f32 = 52.0;
pub const DESCRIPTION_SIZE: f32 = 22.0;
pub const BRAND_SIZE: f32 = 16.0;

pub const BADGE_SIZE: u32 = 120;
pub const BADGE_Y: u32 = 115;
pub const BADGE_RADIUS: u32 = 24;
pub const TITLE_Y: i32 = 270;
pub const SEPARATOR_Y: u32 = 340;
pub const SEPARATOR_WIDTH: u32 = 60;
pub const SEPARATOR_HEIGHT: u32 = 4;
pub const DESCRIPTION_Y: i32 = 370;
/// Distance of the brand line from the bottom edge.
pub const BRAND_OFFSET: u32 = 60;
pub const BOTTOM_BAR_HEIGHT: u32 = 4;

pub const TITLE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const DESCRIPTION_COLOR: Rgba<u8> = Rgba([170, 170, 170, 255]);
pub const BRAND_COLOR: Rgba<u8> = Rgba([100, 100, 100, 255]);

// ============================================================================
// Fonts
// ============================================================================

/// The three text faces of the layout.
#[derive(Debug)]
pub struct Fonts {
    pub title: TextFont,
    pub description: TextFont,
    pub brand: TextFont,
}

impl Fonts {
    /// Loads the bold and regular faces from `font_dir`.
    pub fn load(font_dir: &Path) -> OgResult<Self> {
        let bold = font_dir.join(TITLE_FONT_FILE);
        let regular = font_dir.join(BODY_FONT_FILE);
        debug!(font_dir = %font_dir.display(), "loading text fonts");

        Ok(Self {
            title: TextFont::load(&bold, TITLE_SIZE)?,
            description: TextFont::load(&regular, DESCRIPTION_SIZE)?,
            brand: TextFont::load(&regular, BRAND_SIZE)?,
        })
    }
}

// ============================================================================
// Composer
// ============================================================================

/// Renders items with one configuration.
pub struct Composer {
    config: Config,
    fonts: Fonts,
    rasterizer: Box<dyn GlyphRasterizer>,
}

impl Composer {
    /// Creates a composer using the platform's default emoji source.
    pub fn new(config: Config) -> OgResult<Self> {
        let rasterizer = default_rasterizer(&config)?;
        Self::with_rasterizer(config, rasterizer)
    }

    /// Creates a composer with an explicit emoji source.
    pub fn with_rasterizer(config: Config, rasterizer: Box<dyn GlyphRasterizer>) -> OgResult<Self> {
        let fonts = Fonts::load(&config.font_dir)?;
        debug!(rasterizer = rasterizer.name(), "composer ready");
        Ok(Self {
            config,
            fonts,
            rasterizer,
        })
    }

    /// Builds the layer pipeline for one item.
    fn pipeline<'a>(&'a self, item: &'a ImageItem, emoji_tile: RgbaImage) -> LayerPipeline<'a> {
        let config = &self.config;
        let brand_y = (CANVAS.height - BRAND_OFFSET) as i32;

        LayerPipeline::new()
            .with(BackgroundLayer {
                color: config.background,
            })
            .with(RadialGlowLayer::default())
            .with(BadgeLayer {
                rect: RectPx::centered_x(CANVAS.width, BADGE_Y, BADGE_SIZE, BADGE_SIZE),
                corner_radius: BADGE_RADIUS,
                color: config.accent,
            })
            .with(EmojiLayer { tile: emoji_tile })
            .with(CenteredTextLayer {
                name: "title",
                text: &item.title,
                font: &self.fonts.title,
                y: TITLE_Y,
                color: TITLE_COLOR,
            })
            .with(BarLayer {
                name: "separator",
                rect: RectPx::centered_x(CANVAS.width, SEPARATOR_Y, SEPARATOR_WIDTH, SEPARATOR_HEIGHT),
                color: config.accent,
            })
            .with(CenteredTextLayer {
                name: "description",
                text: &item.description,
                font: &self.fonts.description,
                y: DESCRIPTION_Y,
                color: DESCRIPTION_COLOR,
            })
            .with(CenteredTextLayer {
                name: "brand",
                text: &config.brand_text,
                font: &self.fonts.brand,
                y: brand_y,
                color: BRAND_COLOR,
            })
            .with(BarLayer {
                name: "bottom-bar",
                rect: RectPx::new(
                    0,
                    CANVAS.height - BOTTOM_BAR_HEIGHT,
                    CANVAS.width,
                    BOTTOM_BAR_HEIGHT,
                ),
                color: config.accent,
            })
    }

    /// Renders an item to a flattened RGB image.
    pub fn render(&self, item: &ImageItem) -> OgResult<RgbImage> {
        let tile = render_emoji(self.rasterizer.as_ref(), &item.emoji, DEFAULT_EMOJI_SIZE)?;
        let mut ctx = RenderContext::new(CANVAS);
        let pipeline = self.pipeline(item, tile);
        debug!(layers = ?pipeline.names(), "rendering card");
        pipeline.render(&mut ctx)?;
        Ok(flatten(&ctx.canvas, self.config.background))
    }

    /// Renders an item and writes it to `output_dir/<filename>`.
    ///
    /// The directory is created if missing and an existing file is
    /// overwritten. Returns the path written.
    #[tracing::instrument(skip(self, item, output_dir), fields(filename = %item.filename))]
    pub fn generate(&self, item: &ImageItem, output_dir: &Path) -> OgResult<PathBuf> {
        let image = self.render(item)?;

        std::fs::create_dir_all(output_dir).map_err(|e| OgError::io(output_dir, e))?;
        warn_if_escaping(&item.filename);
        let output_path = output_dir.join(&item.filename);
        save_png(&image, &output_path)?;

        info!(path = %output_path.display(), "generated image");
        Ok(output_path)
    }
}

/// Renders a single image with a freshly built [`Composer`].
pub fn generate(
    filename: &str,
    title: &str,
    emoji: &str,
    description: &str,
    output_dir: &Path,
    config: &Config,
) -> OgResult<PathBuf> {
    let item = ImageItem::new(filename, title, emoji, description);
    Composer::new(config.clone())?.generate(&item, output_dir)
}

// ============================================================================
// Output
// ============================================================================

/// Composites an RGBA canvas over an opaque background and drops alpha.
pub fn flatten(canvas: &RgbaImage, background: Rgb8) -> RgbImage {
    let (br, bg, bb) = background;
    let base = [br, bg, bb];

    RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let Rgba([r, g, b, a]) = *canvas.get_pixel(x, y);
        let a = u32::from(a);
        let mix = |s: u8, d: u8| ((u32::from(s) * a + u32::from(d) * (255 - a) + 127) / 255) as u8;
        Rgb([mix(r, base[0]), mix(g, base[1]), mix(b, base[2])])
    })
}

/// Writes an RGB image as a PNG with maximum compression.
pub fn save_png(image: &RgbImage, path: &Path) -> OgResult<()> {
    let file = File::create(path).map_err(|e| OgError::io(path, e))?;
    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        CompressionType::Best,
        FilterType::Adaptive,
    );
    image.write_with_encoder(encoder)?;
    Ok(())
}

/// Filenames are joined verbatim; flag ones that leave the output directory.
fn warn_if_escaping(filename: &str) {
    let path = Path::new(filename);
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        warn!(filename, "filename escapes the output directory");
    }
}
