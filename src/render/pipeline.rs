use crate::assets::fonts::FontProvider;
use crate::background::BackgroundSynthesizer;
use crate::config::{GarbleConfig, WarpTarget, truncate_chars};
use crate::effects::composite::composite_onto_canvas;
use crate::effects::noise::NoiseInjector;
use crate::effects::warp::WarpEngine;
use crate::encode::png::{PNG_CONTENT_TYPE, encode_png};
use crate::foundation::core::{Canvas, Layer, Raster};
use crate::foundation::error::GarbleResult;
use crate::foundation::rng::RandomSource;
use crate::text::layout::GlyphLayoutEngine;
use crate::text::raster::GlyphRasterizer;
use crate::text::shaper::GlyphShaper;

/// An encoded image ready to hand to a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// PNG bytes.
    pub png: Vec<u8>,
}

impl RenderedImage {
    /// MIME type of [`RenderedImage::png`].
    pub fn content_type(&self) -> &'static str {
        PNG_CONTENT_TYPE
    }
}

/// Runs the full pipeline for one validated configuration.
///
/// Stages run in a fixed order, each taking exclusive ownership of the buffer it works on:
/// 1. font resolution and glyph layout
/// 2. background synthesis and overlay
/// 3. glyph rasterization onto a transparent text layer
/// 4. warp parameters, bounded by the ink on the text layer
/// 5. warp of the text layer (or of the whole canvas after compositing)
/// 6. stroke noise, then salt-and-pepper
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    config: &'a GarbleConfig,
    fonts: &'a dyn FontProvider,
}

impl std::fmt::Debug for Renderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> Renderer<'a> {
    /// Validate `config` and bind it to a font provider.
    pub fn new(config: &'a GarbleConfig, fonts: &'a dyn FontProvider) -> GarbleResult<Self> {
        config.validate()?;
        Ok(Self { config, fonts })
    }

    /// Render `text` (cut to the configured maximum length) into an opaque canvas.
    #[tracing::instrument(skip_all, fields(chars = text.chars().count()))]
    pub fn render_canvas(&self, text: &str, rng: &mut RandomSource) -> GarbleResult<Canvas> {
        let cfg = self.config;
        let (w, h) = (cfg.canvas.width, cfg.canvas.height);
        let text = truncate_chars(text, cfg.text.max_length);

        let faces = self.fonts.resolve(&cfg.fonts.candidates)?;
        let mut shaper = GlyphShaper::new(&faces)?;
        let plan = GlyphLayoutEngine::new(cfg.canvas, &cfg.text, &cfg.palette).layout(
            text,
            &mut shaper,
            rng,
        )?;
        tracing::debug!(
            font_size = plan.font_size,
            glyphs = plan.len(),
            exhausted = plan.size_search_exhausted,
            "layout planned"
        );

        let mut canvas = BackgroundSynthesizer::new(&cfg.background, &cfg.palette).synthesize(w, h, rng)?;
        let text_layer = GlyphRasterizer::new(&cfg.text, &cfg.palette).draw_plan(
            &plan,
            w,
            h,
            &mut shaper,
            rng,
        )?;
        let warp = WarpEngine::from_config(&cfg.warp, w, h, shift_budget(&text_layer), rng);

        canvas = match cfg.warp.target {
            WarpTarget::TextLayer => {
                let warped = warp.warp(&text_layer)?;
                composite_onto_canvas(&mut canvas, &warped)?;
                canvas
            }
            WarpTarget::Canvas => {
                composite_onto_canvas(&mut canvas, &text_layer)?;
                warp.warp(&canvas)?
            }
        };

        NoiseInjector::new(&cfg.noise, &cfg.palette).apply(&mut canvas, rng)?;
        Ok(canvas)
    }

    /// Render `text` and encode it as PNG.
    pub fn render_png(&self, text: &str, rng: &mut RandomSource) -> GarbleResult<RenderedImage> {
        let canvas = self.render_canvas(text, rng)?;
        let png = encode_png(&canvas)?;
        Ok(RenderedImage {
            width: canvas.width(),
            height: canvas.height(),
            png,
        })
    }
}

/// Horizontal room between the inked part of the text layer and the canvas edges.
///
/// Rotated glyph buffers overhang their layout slots, so the slack is read from the pasted pixels
/// rather than from the plan.
fn shift_budget(text_layer: &Layer) -> f64 {
    let Some((first, last)) = text_layer.ink_columns() else {
        return f64::INFINITY;
    };
    let left = f64::from(first);
    let right = f64::from(text_layer.width() - 1 - last);
    left.min(right)
}

/// One-shot [`Renderer::render_canvas`].
pub fn render_canvas(
    text: &str,
    config: &GarbleConfig,
    fonts: &dyn FontProvider,
    rng: &mut RandomSource,
) -> GarbleResult<Canvas> {
    Renderer::new(config, fonts)?.render_canvas(text, rng)
}

/// One-shot [`Renderer::render_png`].
pub fn render_png(
    text: &str,
    config: &GarbleConfig,
    fonts: &dyn FontProvider,
    rng: &mut RandomSource,
) -> GarbleResult<RenderedImage> {
    Renderer::new(config, fonts)?.render_png(text, rng)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
