use crate::foundation::core::{Canvas, Layer, PremulRgba8, Raster};
use crate::foundation::error::{GarbleError, GarbleResult};
use crate::foundation::math::mul_div255_u8;

/// Premultiplied source-over with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Paste `src` with its top-left corner at `(x, y)`, using its own alpha as the mask.
///
/// Transparent margins of `src` leave `dst` untouched; parts of `src` outside `dst` are clipped.
pub fn paste_masked<R: Raster>(dst: &mut R, src: &Layer, x: i32, y: i32) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    for sy in 0..src.height() {
        let ty = i64::from(y) + i64::from(sy);
        if ty < 0 || ty >= dh {
            continue;
        }
        for sx in 0..src.width() {
            let tx = i64::from(x) + i64::from(sx);
            if tx < 0 || tx >= dw {
                continue;
            }
            let Some(s) = src.pixel(sx, sy) else { continue };
            if s[3] == 0 {
                continue;
            }
            let (tx, ty) = (tx as u32, ty as u32);
            if let Some(d) = dst.pixel(tx, ty) {
                dst.put_pixel(tx, ty, over(d, s, 1.0));
            }
        }
    }
}

/// Source-over a full-size layer onto the canvas.
pub fn composite_onto_canvas(canvas: &mut Canvas, layer: &Layer) -> GarbleResult<()> {
    if canvas.width() != layer.width() || canvas.height() != layer.height() {
        return Err(GarbleError::evaluation(
            "composite expects a layer matching the canvas size",
        ));
    }
    for (d, s) in canvas
        .as_bytes_mut()
        .chunks_exact_mut(3)
        .zip(layer.as_bytes().chunks_exact(4))
    {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], 255], [s[0], s[1], s[2], s[3]], 1.0);
        d.copy_from_slice(&out[..3]);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
