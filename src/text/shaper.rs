use std::collections::HashMap;

use crate::assets::fonts::FontFace;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{GarbleError, GarbleResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Alpha channel.
    pub(crate) a: u8,
}

impl TextBrushRgba8 {
    pub(crate) fn opaque([r, g, b]: Rgb8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Per-character advance measurement over a fixed set of faces.
///
/// Layout only needs widths, so it is written against this trait rather than against
/// [`GlyphShaper`] directly.
pub trait GlyphMetrics {
    /// Number of faces glyphs may be drawn from.
    fn face_count(&self) -> usize;

    /// Measured horizontal advance of `ch` in face `face` at `size` pixels.
    fn advance(&mut self, face: usize, ch: char, size: u32) -> GarbleResult<f32>;
}

struct ShapedFace {
    family: String,
    weight: parley::style::FontWeight,
    style: parley::style::FontStyle,
    font: vello_cpu::peniko::FontData,
}

/// Parley-backed shaper for single characters, one registered family per resolved face.
pub struct GlyphShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: Vec<ShapedFace>,
    advances: HashMap<(usize, char, u32), f32>,
}

impl std::fmt::Debug for GlyphShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphShaper")
            .field(
                "families",
                &self.faces.iter().map(|f| f.family.as_str()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl GlyphShaper {
    /// Register every face with a fresh Parley context.
    pub fn new(faces: &[FontFace]) -> GarbleResult<Self> {
        if faces.is_empty() {
            return Err(GarbleError::font_asset("no font faces to shape with"));
        }

        let mut font_ctx = parley::FontContext::default();
        let mut shaped = Vec::with_capacity(faces.len());
        for face in faces {
            let families = font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(face.data.as_ref().clone()), None);
            let (family_id, infos) = families.first().ok_or_else(|| {
                GarbleError::font_asset(format!("'{}' registered no font families", face.id))
            })?;
            let family = font_ctx
                .collection
                .family_name(*family_id)
                .ok_or_else(|| {
                    GarbleError::font_asset(format!("'{}' has an unnamed font family", face.id))
                })?
                .to_string();
            let (weight, style) = infos
                .first()
                .map(|info| (info.weight(), info.style()))
                .unwrap_or_default();

            shaped.push(ShapedFace {
                family,
                weight,
                style,
                font: vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.data.as_ref().clone()),
                    0,
                ),
            });
        }

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            faces: shaped,
            advances: HashMap::new(),
        })
    }

    /// Shape `ch` as a single-line layout in face `face`.
    pub(crate) fn layout_glyph(
        &mut self,
        face: usize,
        ch: char,
        size: u32,
        brush: TextBrushRgba8,
    ) -> GarbleResult<parley::Layout<TextBrushRgba8>> {
        if size == 0 {
            return Err(GarbleError::validation("glyph size must be > 0"));
        }
        let shaped = self
            .faces
            .get(face)
            .ok_or_else(|| GarbleError::evaluation(format!("font face index {face} out of range")))?;

        let mut buf = [0u8; 4];
        let text: &str = ch.encode_utf8(&mut buf);

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(shaped.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(shaped.weight));
        builder.push_default(parley::style::StyleProperty::FontStyle(shaped.style));
        builder.push_default(parley::style::StyleProperty::FontSize(size as f32));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Font data used to draw glyphs of face `face`.
    pub(crate) fn font(&self, face: usize) -> GarbleResult<&vello_cpu::peniko::FontData> {
        self.faces
            .get(face)
            .map(|f| &f.font)
            .ok_or_else(|| GarbleError::evaluation(format!("font face index {face} out of range")))
    }

    /// Family names of the registered faces, in face order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.family.as_str())
    }
}

impl GlyphMetrics for GlyphShaper {
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn advance(&mut self, face: usize, ch: char, size: u32) -> GarbleResult<f32> {
        if let Some(v) = self.advances.get(&(face, ch, size)) {
            return Ok(*v);
        }
        let layout = self.layout_glyph(face, ch, size, TextBrushRgba8::default())?;
        let mut adv = 0.0f32;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                adv += run.glyphs().map(|g| g.advance).sum::<f32>();
            }
        }
        self.advances.insert((face, ch, size), adv);
        Ok(adv)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaper.rs"]
mod tests;
