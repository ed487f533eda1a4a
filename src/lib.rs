//! Garble renders short strings into images that people can read and OCR engines struggle with.
//!
//! One request flows through a fixed pipeline:
//!
//! - [`GlyphLayoutEngine`] picks a font size that fits and places each character
//! - [`BackgroundSynthesizer`] paints a flat or coherent-noise base with an optional overlay
//! - [`GlyphRasterizer`] draws, rotates and pastes every glyph onto a transparent text layer
//! - [`WarpEngine`] distorts the text layer or the whole canvas
//! - [`NoiseInjector`] adds strokes and salt-and-pepper pixels
//!
//! [`Renderer`] runs the stages in order against a [`GarbleConfig`] and a [`FontProvider`];
//! [`handle_request`] wraps it for query-string transports. All randomness comes from an explicit
//! [`RandomSource`], so a fixed seed reproduces an image byte for byte.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod background;
mod config;
mod effects;
mod encode;
mod foundation;
mod palette;
mod render;
mod request;
mod text;

pub use crate::assets::fonts::{FontFace, FontProvider, FsFontProvider, MemoryFontProvider, is_loadable_font};
pub use crate::background::BackgroundSynthesizer;
pub use crate::background::perlin::{Fbm, Noise2D, PerlinNoise, field_bulk, field_pointwise};
pub use crate::config::{
    BackgroundConfig, BackgroundMode, CanvasConfig, CountRange, FontConfig, GarbleConfig, Interval,
    NoiseDiscipline, NoiseSpec, OverlaySpec, Placement, SaltPepper, StrokeNoise, TextColorMode,
    TextConfig, VerticalOffset, WarpConfig, WarpStrategy, WarpTarget, truncate_chars,
};
pub use crate::effects::composite::{composite_onto_canvas, over, paste_masked};
pub use crate::effects::noise::{NoiseInjector, salt_and_pepper};
pub use crate::effects::strokes::{StrokeItem, StrokeShape, paint_strokes, random_stroke};
pub use crate::effects::warp::{
    DistortionField, MeshBulge, RadialBulge, SineShear, WarpEngine, resample,
};
pub use crate::encode::png::{PNG_CONTENT_TYPE, decode_png, encode_png};
pub use imageproc::geometric_transformations::Interpolation;
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Layer, Point, PremulRgba8, Raster, Rect, Rgb8, Vec2, premul,
};
pub use crate::foundation::error::{GarbleError, GarbleResult};
pub use crate::foundation::rng::RandomSource;
pub use crate::palette::{ColorPalette, Tone};
pub use crate::render::pipeline::{RenderedImage, Renderer, render_canvas, render_png};
pub use crate::request::{ImageRequest, ImageResponse, handle_request};
pub use crate::text::baseline::{BaselinePolicy, Jitter, SineWave, clamp_amplitude, policy_for};
pub use crate::text::layout::{GlyphDescriptor, GlyphLayoutEngine, LayoutPlan};
pub use crate::text::raster::GlyphRasterizer;
pub use crate::text::shaper::{GlyphMetrics, GlyphShaper};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
