//! Font-size search and per-glyph placement.

use crate::config::{CanvasConfig, Placement, TextColorMode, TextConfig};
use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::{GarbleError, GarbleResult};
use crate::foundation::rng::RandomSource;
use crate::palette::{ColorPalette, Tone};
use crate::text::baseline::policy_for;
use crate::text::shaper::GlyphMetrics;

/// One positioned character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphDescriptor {
    /// The character.
    pub ch: char,
    /// Index of the face it is drawn with.
    pub face: usize,
    /// Font size in pixels.
    pub font_size: u32,
    /// Measured advance at `font_size`.
    pub advance: f32,
    /// Extra space after this glyph (may be negative).
    pub spacing: f32,
    /// Fill color.
    pub color: Rgb8,
    /// Left edge of the glyph slot, and the vertical center the glyph is drawn around.
    pub origin: Point,
}

/// Ordered glyphs plus the measurements the later stages need.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutPlan {
    /// Glyphs in drawing order.
    pub glyphs: Vec<GlyphDescriptor>,
    /// Width from the first slot's left edge to the last slot's right edge.
    pub total_advance: f64,
    /// Global font size.
    pub font_size: u32,
    /// The search hit the floor size without fitting; the text may overflow.
    pub size_search_exhausted: bool,
    /// Largest vertical offset the baseline policy may produce.
    pub wave_amplitude: f64,
}

impl LayoutPlan {
    /// `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }
}

/// Turns text into a [`LayoutPlan`] that fits the canvas.
#[derive(Clone, Copy, Debug)]
pub struct GlyphLayoutEngine<'a> {
    canvas: CanvasConfig,
    text: &'a TextConfig,
    palette: &'a ColorPalette,
}

impl<'a> GlyphLayoutEngine<'a> {
    /// Engine for one canvas size and text configuration.
    pub fn new(canvas: CanvasConfig, text: &'a TextConfig, palette: &'a ColorPalette) -> Self {
        Self {
            canvas,
            text,
            palette,
        }
    }

    /// Width available to the glyph block.
    fn available_width(&self) -> f64 {
        let w = f64::from(self.canvas.width);
        let hpad = f64::from(self.text.horizontal_padding);
        match self.text.placement {
            Placement::Centered => w - 2.0 * hpad,
            Placement::FixedLeft { padding } => (w - f64::from(padding) - hpad).min(w - 2.0 * hpad),
        }
    }

    /// Widest face's advance for every character, plus the spacing allowance between them.
    fn measure<M: GlyphMetrics + ?Sized>(
        &self,
        chars: &[char],
        size: u32,
        metrics: &mut M,
    ) -> GarbleResult<f64> {
        let mut total = 0.0f64;
        for &ch in chars {
            let mut widest = 0.0f32;
            for face in 0..metrics.face_count() {
                widest = widest.max(metrics.advance(face, ch, size)?);
            }
            total += f64::from(widest);
        }
        let gaps = chars.len().saturating_sub(1) as f64;
        Ok(total + gaps * f64::from(self.text.spacing.max))
    }

    /// Largest size in `[min_font_size, initial_font_size]` that fits, and whether none did.
    fn search_size<M: GlyphMetrics + ?Sized>(
        &self,
        chars: &[char],
        metrics: &mut M,
    ) -> GarbleResult<(u32, bool)> {
        let available = self.available_width();
        let floor = self.text.min_font_size.max(1);
        let mut size = self.text.initial_font_size.max(floor);
        loop {
            if self.measure(chars, size, metrics)? <= available {
                return Ok((size, false));
            }
            if size <= floor {
                return Ok((floor, true));
            }
            size -= 1;
        }
    }

    /// Plan the glyphs for `text`.
    ///
    /// Empty text yields an empty plan. A search that reaches the floor size still returns a plan
    /// at that size with [`LayoutPlan::size_search_exhausted`] set.
    #[tracing::instrument(skip(self, text, metrics, rng), fields(chars = text.chars().count()))]
    pub fn layout<M: GlyphMetrics + ?Sized>(
        &self,
        text: &str,
        metrics: &mut M,
        rng: &mut RandomSource,
    ) -> GarbleResult<LayoutPlan> {
        let faces = metrics.face_count();
        if faces == 0 {
            return Err(GarbleError::font_asset("layout needs at least one font face"));
        }
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Ok(LayoutPlan {
                font_size: self.text.initial_font_size,
                ..LayoutPlan::default()
            });
        }

        let (size, exhausted) = self.search_size(&chars, metrics)?;
        if exhausted {
            tracing::warn!(size, "font-size search reached the floor");
        }

        let request_color = self.palette.pick(Tone::Dark, rng);
        let mut pending = Vec::with_capacity(chars.len());
        for (i, &ch) in chars.iter().enumerate() {
            let face = rng.pick_index(faces);
            let advance = metrics.advance(face, ch, size)?;
            // Only gaps between glyphs get spacing.
            let spacing = if i + 1 < chars.len() {
                rng.uniform_f32(self.text.spacing.min, self.text.spacing.max)
            } else {
                0.0
            };
            let color = match self.text.color_mode {
                TextColorMode::PerGlyph => self.palette.pick(Tone::Dark, rng),
                TextColorMode::PerRequest => request_color,
            };
            pending.push((ch, face, advance, spacing, color));
        }
        let total: f64 = pending
            .iter()
            .map(|&(_, _, adv, sp, _)| f64::from(adv) + f64::from(sp))
            .sum();

        let w = f64::from(self.canvas.width);
        let mut x = match self.text.placement {
            Placement::Centered => (w - total) / 2.0,
            Placement::FixedLeft { padding } => f64::from(padding),
        };

        let mut policy = policy_for(
            &self.text.vertical_offset,
            self.canvas.height,
            size,
            f64::from(self.text.vertical_padding),
            rng,
        );
        let mid = f64::from(self.canvas.height) / 2.0;

        let mut glyphs = Vec::with_capacity(pending.len());
        for (i, (ch, face, advance, spacing, color)) in pending.into_iter().enumerate() {
            let center_x = x + f64::from(advance) / 2.0;
            let dy = policy.offset(i, center_x, rng);
            glyphs.push(GlyphDescriptor {
                ch,
                face,
                font_size: size,
                advance,
                spacing,
                color,
                origin: Point::new(x, mid + dy),
            });
            x += f64::from(advance) + f64::from(spacing);
        }

        Ok(LayoutPlan {
            glyphs,
            total_advance: total,
            font_size: size,
            size_search_exhausted: exhausted,
            wave_amplitude: policy.bound(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
