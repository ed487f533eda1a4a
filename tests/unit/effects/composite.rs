use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn paste_keeps_content_under_transparent_margins() {
    let mut dst = Layer::transparent(6, 6).unwrap();
    dst.put_pixel(0, 0, [0, 0, 255, 255]);

    let mut glyph = Layer::transparent(3, 3).unwrap();
    glyph.put_pixel(2, 2, [255, 0, 0, 255]);

    paste_masked(&mut dst, &glyph, 0, 0);
    assert_eq!(dst.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(dst.pixel(2, 2), Some([255, 0, 0, 255]));
}

#[test]
fn paste_clips_at_every_edge() {
    let mut dst = Canvas::filled(4, 4, [9, 9, 9]).unwrap();
    let mut src = Layer::transparent(3, 3).unwrap();
    for y in 0..3 {
        for x in 0..3 {
            src.put_pixel(x, y, [255, 255, 255, 255]);
        }
    }
    paste_masked(&mut dst, &src, -2, -2);
    paste_masked(&mut dst, &src, 3, 3);
    paste_masked(&mut dst, &src, 100, -100);
    assert_eq!(dst.rgb(0, 0), Some([255, 255, 255]));
    assert_eq!(dst.rgb(3, 3), Some([255, 255, 255]));
    assert_eq!(dst.rgb(1, 1), Some([9, 9, 9]));
}

#[test]
fn composite_rejects_size_mismatch() {
    let mut canvas = Canvas::filled(4, 4, [0, 0, 0]).unwrap();
    let layer = Layer::transparent(3, 4).unwrap();
    assert!(composite_onto_canvas(&mut canvas, &layer).is_err());
}

#[test]
fn composite_blends_half_alpha() {
    let mut canvas = Canvas::filled(1, 1, [0, 0, 0]).unwrap();
    let mut layer = Layer::transparent(1, 1).unwrap();
    layer.put_pixel(0, 0, [128, 128, 128, 128]);
    composite_onto_canvas(&mut canvas, &layer).unwrap();
    assert_eq!(canvas.rgb(0, 0), Some([128, 128, 128]));
}
