//! og-renderer: Open Graph card generator
//!
//! Renders 1200x630 social preview images: a dark background with a soft
//! radial glow, an accent badge holding an emoji, a centered title and
//! description, a brand line, and an accent bar along the bottom edge.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use og_renderer::{Composer, ImageItem, get_config};
//!
//! let config = get_config()?;
//! let composer = Composer::new(config)?;
//!
//! let item = ImageItem::new("launch.png", "We shipped", "🚀", "Release notes inside");
//! let path = composer.generate(&item, Path::new("public/og"))?;
//! println!("wrote {}", path.display());
//! # Ok::<(), og_renderer::OgError>(())
//! ```
//!
//! # Configuration
//!
//! Settings come from `OG_*` environment variables, optionally backed by
//! `.env`-style override files, then by the top-level keys of a JSON batch
//! file. See [`config`] and [`BatchFile`].

pub mod batch;
pub mod color;
pub mod composer;
pub mod config;
pub mod emoji;
mod error;
pub mod geometry;
pub mod layer;
pub mod svg;
pub mod text;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(test)]
mod test_support;

pub use batch::{BatchFile, ImageItem};
pub use color::{Rgb8, hex_to_rgb, rgb_to_hex};
pub use composer::{Composer, generate};
pub use config::{Config, Environment, get_config};
pub use emoji::{GlyphRasterizer, render_emoji};
pub use error::{OgError, OgResult};
pub use geometry::{RectPx, SizePx};
pub use text::TextFont;
