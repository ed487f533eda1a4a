use super::*;
use crate::config::Interval;
use crate::foundation::core::{Canvas, Layer};

fn gradient_canvas(w: u32, h: u32) -> Canvas {
    let mut bytes = Vec::with_capacity((w * h * 3) as usize);
    for y in 0..h {
        for x in 0..w {
            bytes.extend_from_slice(&[(x * 7 % 256) as u8, (y * 11 % 256) as u8, 90]);
        }
    }
    Canvas::from_rgb_bytes(w, h, bytes).unwrap()
}

#[test]
fn radial_bulge_sources_stay_in_bounds() {
    let field = RadialBulge {
        factor: 0.3,
        width: 100,
        height: 100,
    };
    for y in 0..100 {
        for x in 0..100 {
            let (sx, sy) = field.source_pixel(x, y).unwrap();
            assert!(sx < 100 && sy < 100, "({x},{y}) -> ({sx},{sy})");
        }
    }
}

#[test]
fn radial_bulge_passes_through_outside_circle() {
    let field = RadialBulge {
        factor: 0.8,
        width: 60,
        height: 20,
    };
    assert_eq!(field.source_pixel(0, 0), Some((0, 0)));
    assert_eq!(field.source_pixel(59, 19), Some((59, 19)));
    assert_eq!(field.source_pixel(60, 0), None);
}

#[test]
fn radial_bulge_reads_toward_rim() {
    let field = RadialBulge {
        factor: 1.0,
        width: 100,
        height: 100,
    };
    // Half way to the rim the source sits further out but still inside the circle.
    let (sx, _) = field.source_pixel(75, 50).unwrap();
    assert!(sx > 75 && sx < 100, "sx = {sx}");
}

#[test]
fn radial_factors_across_range_do_not_panic() {
    let src = gradient_canvas(37, 23);
    for i in 0..=10 {
        let field = RadialBulge {
            factor: f64::from(i) / 10.0,
            width: 37,
            height: 23,
        };
        let out = resample(&src, &field, false).unwrap();
        assert_eq!((out.width(), out.height()), (37, 23));
    }
}

#[test]
fn zero_strength_warps_are_identity() {
    let src = gradient_canvas(40, 30);
    let shear = SineShear {
        amplitude: 0.0,
        frequency: 0.2,
    };
    assert_eq!(resample(&src, &shear, false).unwrap(), src);

    let radial = RadialBulge {
        factor: 0.0,
        width: 40,
        height: 30,
    };
    assert_eq!(resample(&src, &radial, false).unwrap(), src);
}

#[test]
fn parallel_matches_sequential() {
    let src = gradient_canvas(64, 48);
    let mesh = MeshBulge::new(64, 48, 6, 0.5);
    assert_eq!(
        resample(&src, &mesh, true).unwrap(),
        resample(&src, &mesh, false).unwrap()
    );

    let shear = SineShear {
        amplitude: 3.0,
        frequency: 0.15,
    };
    assert_eq!(
        resample(&src, &shear, true).unwrap(),
        resample(&src, &shear, false).unwrap()
    );
}

#[test]
fn mesh_sources_stay_inside() {
    for factor in [-1.0, -0.4, 0.0, 0.6, 1.0] {
        let mesh = MeshBulge::new(50, 20, 8, factor);
        for y in 0..20 {
            for x in 0..50 {
                let p = mesh.source_for(x, y).unwrap();
                assert!(p.x >= 0.0 && p.x < 50.0 && p.y >= 0.0 && p.y < 20.0);
            }
        }
    }
}

#[test]
fn shear_leaves_vacated_layer_pixels_transparent() {
    let mut layer = Layer::transparent(20, 10).unwrap();
    for y in 0..10 {
        for x in 0..20 {
            layer.put_pixel(x, y, [0, 0, 200, 255]);
        }
    }
    let shear = SineShear {
        amplitude: 4.0,
        frequency: std::f64::consts::FRAC_PI_2 / 3.0,
    };
    let out = resample(&layer, &shear, false).unwrap();
    // Row 3 shifts right by 4 pixels, so its left edge reads from off-canvas.
    assert_eq!(out.pixel(0, 3).map(|p| p[3]), Some(0));
    assert_eq!(out.pixel(10, 3), Some([0, 0, 200, 255]));
}

#[test]
fn engine_caps_shear_amplitude() {
    let cfg = WarpConfig {
        strategy: WarpStrategy::SineShear {
            amplitude: Interval::fixed(10.0),
            frequency: Interval::fixed(0.1),
        },
        ..WarpConfig::default()
    };
    let mut rng = RandomSource::seeded(4);
    let engine = WarpEngine::from_config(&cfg, 100, 40, 2.0, &mut rng);
    match engine.kind {
        WarpKind::Shear(s) => assert_eq!(s.amplitude, 2.0),
        other => panic!("unexpected warp {other:?}"),
    }
}

#[test]
fn engine_none_is_identity() {
    let cfg = WarpConfig {
        strategy: WarpStrategy::None,
        ..WarpConfig::default()
    };
    let mut rng = RandomSource::seeded(4);
    let engine = WarpEngine::from_config(&cfg, 10, 10, f64::INFINITY, &mut rng);
    assert!(engine.is_identity());
    let src = gradient_canvas(10, 10);
    assert_eq!(engine.warp(&src).unwrap(), src);
}

#[test]
fn shear_keeps_original_canvas_where_source_is_off_canvas() {
    let src = gradient_canvas(20, 10);
    let shear = SineShear {
        amplitude: 4.0,
        frequency: std::f64::consts::FRAC_PI_2 / 3.0,
    };
    let out = resample(&src, &shear, false).unwrap();
    // Row 3 reads four pixels to the left; its first columns have no source.
    assert_eq!(out.pixel(0, 3), src.pixel(0, 3));
    assert_eq!(out.pixel(12, 3), src.pixel(8, 3));
}

#[test]
fn radial_bulge_moves_pixels_inside_circle_only() {
    let src = gradient_canvas(40, 40);
    let field = RadialBulge {
        factor: 1.0,
        width: 40,
        height: 40,
    };
    let out = resample(&src, &field, true).unwrap();
    assert_eq!(out.pixel(0, 0), src.pixel(0, 0));
    let (sx, sy) = field.source_pixel(28, 20).unwrap();
    assert_eq!(out.pixel(28, 20), src.pixel(sx, sy));
}

#[test]
fn fields_pick_their_reconstruction_filter() {
    let shear = SineShear {
        amplitude: 1.0,
        frequency: 0.1,
    };
    let mesh = MeshBulge::new(10, 10, 2, 0.2);
    let radial = RadialBulge {
        factor: 0.2,
        width: 10,
        height: 10,
    };
    assert!(matches!(shear.interpolation(), Interpolation::Bilinear));
    assert!(matches!(mesh.interpolation(), Interpolation::Bicubic));
    assert!(matches!(radial.interpolation(), Interpolation::Nearest));
}
