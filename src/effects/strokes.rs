use kurbo::Shape;
use smallvec::SmallVec;

use crate::foundation::core::{BezPath, Layer, Point, Rect, Rgb8};
use crate::foundation::error::GarbleResult;
use crate::foundation::rng::RandomSource;
use crate::render::cpu::{bezpath_to_cpu, paint_layer};

/// Geometry of a random stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeShape {
    /// Straight segment between two random points.
    Line,
    /// Outline of the rectangle spanned by two random points.
    Rect,
    /// Open path through four random points.
    Polyline,
    /// Cubic curve between two random points with two random control points.
    Curve,
}

/// One stroke ready to paint.
#[derive(Clone, Debug)]
pub struct StrokeItem {
    /// Outline to stroke.
    pub path: BezPath,
    /// Stroke width in pixels.
    pub width: f64,
    /// Straight color.
    pub color: Rgb8,
    /// Opacity.
    pub alpha: u8,
}

/// Build a stroke whose control points are uniform over a `width x height` canvas.
pub fn random_stroke(
    shape: StrokeShape,
    width: u32,
    height: u32,
    stroke_width: f64,
    color: Rgb8,
    alpha: u8,
    rng: &mut RandomSource,
) -> StrokeItem {
    let (w, h) = (f64::from(width), f64::from(height));
    let n = match shape {
        StrokeShape::Line | StrokeShape::Rect => 2,
        StrokeShape::Polyline | StrokeShape::Curve => 4,
    };
    let pts: SmallVec<[Point; 4]> = (0..n)
        .map(|_| Point::new(rng.uniform_f64(0.0, w), rng.uniform_f64(0.0, h)))
        .collect();

    let mut path = BezPath::new();
    match shape {
        StrokeShape::Line => {
            path.move_to(pts[0]);
            path.line_to(pts[1]);
        }
        StrokeShape::Rect => {
            path = Rect::from_points(pts[0], pts[1]).to_path(0.1);
        }
        StrokeShape::Polyline => {
            path.move_to(pts[0]);
            for p in &pts[1..] {
                path.line_to(*p);
            }
        }
        StrokeShape::Curve => {
            path.move_to(pts[0]);
            path.curve_to(pts[2], pts[3], pts[1]);
        }
    }

    StrokeItem {
        path,
        width: stroke_width.max(0.1),
        color,
        alpha,
    }
}

/// Paint `strokes` in order onto a transparent `width x height` layer.
pub fn paint_strokes(width: u32, height: u32, strokes: &[StrokeItem]) -> GarbleResult<Layer> {
    paint_layer(width, height, |ctx| {
        for s in strokes {
            let [r, g, b] = s.color;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, s.alpha));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(s.width));
            ctx.stroke_path(&bezpath_to_cpu(&s.path));
        }
        Ok(())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/strokes.rs"]
mod tests;
