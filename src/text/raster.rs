use crate::config::TextConfig;
use crate::effects::composite::paste_masked;
use crate::foundation::core::{Affine, Layer, Point, Raster, Rect, Vec2};
use crate::foundation::error::GarbleResult;
use crate::foundation::rng::RandomSource;
use crate::palette::{ColorPalette, Tone};
use crate::render::cpu::{affine_to_cpu, paint_layer};
use crate::text::layout::{GlyphDescriptor, LayoutPlan};
use crate::text::shaper::{GlyphShaper, TextBrushRgba8};

/// Padding around the glyph box covered by an inverted block.
const BLOCK_MARGIN: f64 = 2.0;

/// Draws each planned glyph into its own buffer, rotates it and pastes it onto the text layer.
#[derive(Clone, Copy, Debug)]
pub struct GlyphRasterizer<'a> {
    text: &'a TextConfig,
    palette: &'a ColorPalette,
}

impl<'a> GlyphRasterizer<'a> {
    /// Rasterizer for one request.
    pub fn new(text: &'a TextConfig, palette: &'a ColorPalette) -> Self {
        Self { text, palette }
    }

    /// Render `desc` as if into a transparent `2 * font_size` square, rotated by a random angle
    /// about the square's center. The buffer is grown to the rotated square's bounding box so no
    /// corner is clipped.
    ///
    /// With probability `block_probability` the glyph is drawn in a light color over a dark,
    /// independently rotated rectangle.
    pub fn rasterize(
        &self,
        desc: &GlyphDescriptor,
        shaper: &mut GlyphShaper,
        rng: &mut RandomSource,
    ) -> GarbleResult<Layer> {
        let side = desc.font_size.max(1) * 2;
        let (fill, block) = if rng.chance(self.text.block_probability) {
            let block_color = self.palette.pick(Tone::Dark, rng);
            let block_angle = f64::from(rng.uniform_f32(
                self.text.rotation_deg.min,
                self.text.rotation_deg.max,
            ));
            (
                self.palette.pick(Tone::Light, rng),
                Some((block_color, block_angle)),
            )
        } else {
            (desc.color, None)
        };
        let angle = f64::from(rng.uniform_f32(
            self.text.rotation_deg.min,
            self.text.rotation_deg.max,
        ));

        let layout = shaper.layout_glyph(desc.face, desc.ch, desc.font_size, TextBrushRgba8::opaque(fill))?;
        let font = shaper.font(desc.face)?.clone();

        let s = f64::from(side);
        let glyph_w = f64::from(desc.advance);
        let glyph_h = f64::from(layout.height());
        let offset = Vec2::new((s - glyph_w) / 2.0, (s - glyph_h) / 2.0);
        let center = Point::new(s / 2.0, s / 2.0);

        let (out_w, out_h) = rotated_extent(side, angle);
        // y points down, so a visually counter-clockwise turn is a negative kurbo angle.
        let place = Affine::translate(Vec2::new(f64::from(out_w) / 2.0, f64::from(out_h) / 2.0))
            * Affine::rotate(-angle.to_radians())
            * Affine::translate(-center.to_vec2());

        paint_layer(out_w, out_h, |ctx| {
            if let Some(([r, g, b], block_angle)) = block {
                let rect = Rect::new(
                    offset.x - BLOCK_MARGIN,
                    offset.y - BLOCK_MARGIN,
                    offset.x + glyph_w + BLOCK_MARGIN,
                    offset.y + glyph_h + BLOCK_MARGIN,
                );
                let spin = Affine::rotate_about(-block_angle.to_radians(), center);
                ctx.set_transform(affine_to_cpu(place * spin));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, 255));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
            }

            ctx.set_transform(affine_to_cpu(place * Affine::translate(offset)));
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
            Ok(())
        })
    }

    /// Paste a rotated glyph so its center sits on the slot center of `desc`.
    pub fn composite(&self, text_layer: &mut Layer, glyph: &Layer, desc: &GlyphDescriptor) {
        let x = desc.origin.x + f64::from(desc.advance) / 2.0 - f64::from(glyph.width()) / 2.0;
        let y = desc.origin.y - f64::from(glyph.height()) / 2.0;
        paste_masked(text_layer, glyph, x.round() as i32, y.round() as i32);
    }

    /// Rasterize every glyph of `plan` onto a fresh transparent layer.
    #[tracing::instrument(skip_all, fields(glyphs = plan.len()))]
    pub fn draw_plan(
        &self,
        plan: &LayoutPlan,
        width: u32,
        height: u32,
        shaper: &mut GlyphShaper,
        rng: &mut RandomSource,
    ) -> GarbleResult<Layer> {
        let mut layer = Layer::transparent(width, height)?;
        for desc in &plan.glyphs {
            let glyph = self.rasterize(desc, shaper, rng)?;
            self.composite(&mut layer, &glyph, desc);
        }
        Ok(layer)
    }
}

/// Size of the bounding box of a `side x side` square rotated by `degrees`.
pub(crate) fn rotated_extent(side: u32, degrees: f64) -> (u32, u32) {
    let s = f64::from(side);
    let bbox = Affine::rotate(degrees.to_radians()).transform_rect_bbox(Rect::new(0.0, 0.0, s, s));
    // Trim float noise so an unrotated square keeps its exact size.
    let w = ((bbox.width() - 1e-6).ceil() as u32).max(1);
    let h = ((bbox.height() - 1e-6).ceil() as u32).max(1);
    (w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/text/raster.rs"]
mod tests;
