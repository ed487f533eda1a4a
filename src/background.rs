//! Base canvas synthesis.

pub(crate) mod perlin;

use crate::config::{BackgroundConfig, BackgroundMode, OverlaySpec};
use crate::effects::composite::composite_onto_canvas;
use crate::effects::strokes::{StrokeItem, paint_strokes, random_stroke};
use crate::foundation::core::{Canvas, Raster};
use crate::foundation::error::GarbleResult;
use crate::foundation::math::to_u8_channel;
use crate::foundation::rng::RandomSource;
use crate::palette::ColorPalette;

use self::perlin::{Fbm, PerlinNoise, field_bulk, field_pointwise};

/// Produces the opaque canvas every other stage draws onto.
#[derive(Clone, Copy, Debug)]
pub struct BackgroundSynthesizer<'a> {
    cfg: &'a BackgroundConfig,
    palette: &'a ColorPalette,
}

impl<'a> BackgroundSynthesizer<'a> {
    /// Synthesizer for `cfg`, drawing overlay colors from `palette`.
    pub fn new(cfg: &'a BackgroundConfig, palette: &'a ColorPalette) -> Self {
        Self { cfg, palette }
    }

    /// Base canvas followed by the optional overlay.
    #[tracing::instrument(skip(self, rng))]
    pub fn synthesize(&self, width: u32, height: u32, rng: &mut RandomSource) -> GarbleResult<Canvas> {
        let mut canvas = match self.cfg.mode {
            BackgroundMode::Flat { min, max } => {
                let rgb = [
                    rng.uniform_u8(min, max),
                    rng.uniform_u8(min, max),
                    rng.uniform_u8(min, max),
                ];
                Canvas::filled(width, height, rgb)?
            }
            BackgroundMode::CoherentNoise {
                scale,
                octaves,
                persistence,
                lacunarity,
                channel_scale,
                parallel,
            } => {
                let fbm = Fbm::new(PerlinNoise::new(rng), octaves, persistence, lacunarity);
                let field = if parallel {
                    field_bulk(&fbm, width, height, scale)
                } else {
                    field_pointwise(&fbm, width, height, scale)
                };
                noise_canvas(width, height, &field, channel_scale)?
            }
        };
        if let Some(overlay) = &self.cfg.overlay {
            self.apply_overlay(&mut canvas, overlay, rng)?;
        }
        Ok(canvas)
    }

    /// Composite translucent palette shapes onto `canvas`.
    pub fn apply_overlay(
        &self,
        canvas: &mut Canvas,
        overlay: &OverlaySpec,
        rng: &mut RandomSource,
    ) -> GarbleResult<()> {
        let count = rng.uniform_u32(overlay.count.min, overlay.count.max) as usize;
        if count == 0 || overlay.shapes.is_empty() {
            return Ok(());
        }
        let (w, h) = (canvas.width(), canvas.height());
        let items: Vec<StrokeItem> = (0..count)
            .map(|_| {
                let shape = overlay.shapes[rng.pick_index(overlay.shapes.len())];
                let width = f64::from(rng.uniform_f32(overlay.width.min, overlay.width.max));
                let color = self.palette.pick(overlay.tone, rng);
                let alpha = rng.uniform_u32(overlay.alpha.min, overlay.alpha.max).min(255) as u8;
                random_stroke(shape, w, h, width, color, alpha, rng)
            })
            .collect();
        let layer = paint_strokes(w, h, &items)?;
        composite_onto_canvas(canvas, &layer)
    }
}

/// Min-max normalize `field` to `[0, 255]` and scale each channel.
fn noise_canvas(width: u32, height: u32, field: &[f64], channel_scale: [f32; 3]) -> GarbleResult<Canvas> {
    let min = field.iter().copied().fold(f64::INFINITY, f64::min);
    let max = field.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let mut bytes = Vec::with_capacity(field.len() * 3);
    for &v in field {
        let n = if span > f64::EPSILON {
            (v - min) / span * 255.0
        } else {
            255.0
        };
        for s in channel_scale {
            bytes.push(to_u8_channel(n * f64::from(s)));
        }
    }
    Canvas::from_rgb_bytes(width, height, bytes)
}

#[cfg(test)]
#[path = "../tests/unit/background.rs"]
mod tests;
