use super::*;
use crate::foundation::core::Raster;

#[test]
fn control_points_stay_on_canvas() {
    let mut rng = RandomSource::seeded(21);
    for shape in [
        StrokeShape::Line,
        StrokeShape::Rect,
        StrokeShape::Polyline,
        StrokeShape::Curve,
    ] {
        for _ in 0..20 {
            let s = random_stroke(shape, 120, 40, 2.0, [1, 2, 3], 255, &mut rng);
            let bbox = s.path.control_box();
            assert!(bbox.x0 >= 0.0 && bbox.x1 <= 120.0);
            assert!(bbox.y0 >= 0.0 && bbox.y1 <= 40.0);
        }
    }
}

#[test]
fn polyline_has_four_vertices() {
    let mut rng = RandomSource::seeded(2);
    let s = random_stroke(StrokeShape::Polyline, 50, 50, 2.0, [0, 0, 0], 255, &mut rng);
    assert_eq!(s.path.elements().len(), 4);
}

#[test]
fn painted_line_marks_pixels() {
    let mut path = BezPath::new();
    path.move_to((0.0, 5.0));
    path.line_to((20.0, 5.0));
    let item = StrokeItem {
        path,
        width: 3.0,
        color: [255, 0, 0],
        alpha: 255,
    };
    let layer = paint_strokes(20, 10, &[item]).unwrap();
    assert_eq!(layer.pixel(10, 5), Some([255, 0, 0, 255]));
    assert_eq!(layer.pixel(10, 0).map(|p| p[3]), Some(0));
}

#[test]
fn no_strokes_paint_nothing() {
    let layer = paint_strokes(16, 16, &[]).unwrap();
    assert!(layer.is_blank());
}
