//! Thin bridge onto `vello_cpu` for anti-aliased vector and glyph drawing.

use crate::foundation::core::{Affine, BezPath, Layer};
use crate::foundation::error::{GarbleError, GarbleResult};

/// Draw into a fresh transparent `width x height` context and return the result as a [`Layer`].
pub(crate) fn paint_layer(
    width: u32,
    height: u32,
    f: impl FnOnce(&mut vello_cpu::RenderContext) -> GarbleResult<()>,
) -> GarbleResult<Layer> {
    let w: u16 = width
        .try_into()
        .map_err(|_| GarbleError::evaluation("paint width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GarbleError::evaluation("paint height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(GarbleError::evaluation("paint surface must be non-empty"));
    }

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    f(&mut ctx)?;
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    // Pixmap bytes are already premultiplied RGBA8.
    Layer::from_premul_bytes(width, height, pixmap.data_as_u8_slice().to_vec())
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
