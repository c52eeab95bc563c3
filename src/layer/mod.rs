//! Layer infrastructure for card composition.
//!
//! A card is painted by running a [`LayerPipeline`] over a [`RenderContext`].
//! Each layer paints onto the shared canvas and may emit typed properties
//! that later layers read, so layers stay independent of each other.
//!
//! # Pipeline
//!
//! ```text
//! Background ─► Radial glow ─► Badge ──emits BadgeBounds──► Emoji
//!                                                             │
//!          Bottom bar ◄─ Brand ◄─ Description ◄─ Separator ◄─ Title
//! ```

pub mod background;
pub mod badge;
pub mod bar;
pub mod text;

pub use background::{BackgroundLayer, RadialGlowLayer, apply_radial_glow};
pub use badge::{BadgeBounds, BadgeLayer, EmojiLayer};
pub use bar::BarLayer;
pub use text::CenteredTextLayer;

use std::any::{Any, TypeId};
use std::collections::HashMap;

use image::{Rgba, RgbaImage};
use tracing::trace;

use crate::color::Rgb8;
use crate::error::OgResult;
use crate::geometry::SizePx;

// ============================================================================
// Render Context
// ============================================================================

/// Context that flows through the rendering pipeline.
///
/// # Example
///
/// ```ignore
/// // Upstream layer emits a property
/// ctx.set(BadgeBounds(rect));
///
/// // Downstream layer reads the property
/// if let Some(BadgeBounds(rect)) = ctx.get::<BadgeBounds>() {
///     // Center on the badge...
/// }
/// ```
pub struct RenderContext {
    /// The canvas being painted.
    pub canvas: RgbaImage,

    /// Typed property bag for inter-layer communication.
    properties: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RenderContext {
    /// Creates a context with a fully transparent canvas.
    pub fn new(size: SizePx) -> Self {
        Self {
            canvas: RgbaImage::new(size.width, size.height),
            properties: HashMap::new(),
        }
    }

    /// Returns the canvas dimensions.
    pub fn size(&self) -> SizePx {
        SizePx::new(self.canvas.width(), self.canvas.height())
    }

    /// Sets a typed property that downstream layers can read.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.properties.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Gets a typed property set by an upstream layer.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.properties
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    /// Checks if a property has been set.
    pub fn has<T: Any + Send + Sync>(&self) -> bool {
        self.properties.contains_key(&TypeId::of::<T>())
    }
}

/// Opaque RGBA pixel from an RGB triple.
pub fn opaque((r, g, b): Rgb8) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

// ============================================================================
// Layer Trait
// ============================================================================

/// One compositing step.
///
/// [`paint`](Self::paint) modifies the canvas; [`emit`](Self::emit) runs
/// afterwards and is the place to publish properties for later layers.
pub trait Layer {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Paints onto the canvas, reading any upstream properties it needs.
    fn paint(&self, ctx: &mut RenderContext) -> OgResult<()>;

    /// Emits properties for downstream layers. Emits nothing by default.
    fn emit(&self, _ctx: &mut RenderContext) {}
}

// ============================================================================
// Layer Pipeline
// ============================================================================

/// An ordered list of layers.
#[derive(Default)]
pub struct LayerPipeline<'a> {
    layers: Vec<Box<dyn Layer + 'a>>,
}

impl<'a> LayerPipeline<'a> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Appends a layer.
    pub fn with(mut self, layer: impl Layer + 'a) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Names of the layers in paint order.
    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Runs every layer in order, stopping at the first error.
    pub fn render(&self, ctx: &mut RenderContext) -> OgResult<()> {
        for layer in &self.layers {
            trace!(layer = layer.name(), "painting layer");
            layer.paint(ctx)?;
            layer.emit(ctx);
        }
        Ok(())
    }
}
