//! Post-distortion artifacts: random strokes and salt-and-pepper pixels.

use crate::config::{NoiseDiscipline, NoiseSpec};
use crate::effects::composite::composite_onto_canvas;
use crate::effects::strokes::{StrokeItem, paint_strokes, random_stroke};
use crate::foundation::core::{Canvas, Raster};
use crate::foundation::error::GarbleResult;
use crate::foundation::rng::RandomSource;
use crate::palette::ColorPalette;

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Applies the configured noise to a finished canvas.
#[derive(Clone, Copy, Debug)]
pub struct NoiseInjector<'a> {
    spec: &'a NoiseSpec,
    palette: &'a ColorPalette,
}

impl<'a> NoiseInjector<'a> {
    /// Injector drawing stroke colors from `palette`.
    pub fn new(spec: &'a NoiseSpec, palette: &'a ColorPalette) -> Self {
        Self { spec, palette }
    }

    /// Draw the random strokes onto `canvas`. Returns how many were drawn.
    pub fn apply_strokes(&self, canvas: &mut Canvas, rng: &mut RandomSource) -> GarbleResult<usize> {
        let cfg = &self.spec.strokes;
        let count = rng.uniform_u32(cfg.count.min, cfg.count.max) as usize;
        if count == 0 || cfg.shapes.is_empty() {
            return Ok(0);
        }

        let (w, h) = (canvas.width(), canvas.height());
        let items: Vec<StrokeItem> = (0..count)
            .map(|_| {
                let shape = cfg.shapes[rng.pick_index(cfg.shapes.len())];
                let width = f64::from(rng.uniform_f32(cfg.width.min, cfg.width.max));
                let color = self.palette.pick(cfg.tone, rng);
                random_stroke(shape, w, h, width, color, 255, rng)
            })
            .collect();

        let layer = paint_strokes(w, h, &items)?;
        composite_onto_canvas(canvas, &layer)?;
        Ok(count)
    }

    /// Apply salt-and-pepper noise. Returns how many pixels were replaced.
    pub fn apply_salt_pepper(&self, canvas: &mut Canvas, rng: &mut RandomSource) -> usize {
        let sp = self.spec.salt_pepper;
        salt_and_pepper(canvas, sp.amount, sp.discipline, rng)
    }

    /// Strokes followed by salt-and-pepper.
    pub fn apply(&self, canvas: &mut Canvas, rng: &mut RandomSource) -> GarbleResult<()> {
        let strokes = self.apply_strokes(canvas, rng)?;
        let pixels = self.apply_salt_pepper(canvas, rng);
        tracing::debug!(strokes, pixels, "noise injected");
        Ok(())
    }
}

/// Replace a fraction `amount` of pixels with pure black or pure white.
///
/// [`NoiseDiscipline::ExactCount`] picks exactly `round(width * height * amount)` distinct pixels,
/// each black or white with equal probability. [`NoiseDiscipline::Bernoulli`] decides every pixel
/// independently, so only the expected count matches.
pub fn salt_and_pepper(
    canvas: &mut Canvas,
    amount: f64,
    discipline: NoiseDiscipline,
    rng: &mut RandomSource,
) -> usize {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    let amount = amount.min(1.0);
    let (w, h) = (canvas.width(), canvas.height());
    let total = (w as usize) * (h as usize);

    match discipline {
        NoiseDiscipline::ExactCount => {
            let n = ((total as f64) * amount).round() as usize;
            let picked = rng.sample_indices(total, n);
            for idx in &picked {
                let (x, y) = ((idx % w as usize) as u32, (idx / w as usize) as u32);
                let px = if rng.chance(0.5) { WHITE } else { BLACK };
                canvas.put_pixel(x, y, px);
            }
            picked.len()
        }
        NoiseDiscipline::Bernoulli => {
            let half = amount / 2.0;
            let mut changed = 0;
            for y in 0..h {
                for x in 0..w {
                    let u = rng.unit();
                    let px = if u < half {
                        BLACK
                    } else if u < amount {
                        WHITE
                    } else {
                        continue;
                    };
                    canvas.put_pixel(x, y, px);
                    changed += 1;
                }
            }
            changed
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/noise.rs"]
mod tests;
