//! Inverse-mapped geometric distortions.
//!
//! Every warp is expressed as a [`DistortionField`]: for each destination pixel it names the
//! continuous source position to sample. [`resample`] hands the field to `imageproc`'s
//! `warp_with`, which reconstructs the source with the field's interpolation and never reads
//! outside the source buffer.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, warp_with};

use crate::config::{WarpConfig, WarpStrategy};
use crate::effects::composite::over;
use crate::foundation::core::{Point, Raster, Vec2};
use crate::foundation::error::{GarbleError, GarbleResult};
use crate::foundation::rng::RandomSource;

/// Source position returned for destinations that have no source; every filter rejects it.
const OFF_CANVAS: (f32, f32) = (-8.0, -8.0);

/// Inverse mapping from destination pixels to source positions.
pub trait DistortionField: Sync {
    /// Continuous source position for destination pixel `(x, y)`, or `None` to leave it vacated.
    ///
    /// Pixel `i` spans `[i, i + 1)`, so the center of pixel `(x, y)` is `(x + 0.5, y + 0.5)`.
    fn source_for(&self, x: u32, y: u32) -> Option<Point>;

    /// Reconstruction filter used to read the source.
    fn interpolation(&self) -> Interpolation;
}

/// Horizontal row shift `amplitude * sin(y * frequency)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineShear {
    /// Peak shift in pixels.
    pub amplitude: f64,
    /// Radians per row.
    pub frequency: f64,
}

impl DistortionField for SineShear {
    fn source_for(&self, x: u32, y: u32) -> Option<Point> {
        let shift = self.amplitude * (f64::from(y) * self.frequency).sin();
        Some(Point::new(f64::from(x) + 0.5 - shift, f64::from(y) + 0.5))
    }

    fn interpolation(&self) -> Interpolation {
        Interpolation::Bilinear
    }
}

/// Radial bulge evaluated at the corners of a coarse mesh and interpolated inside each cell.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBulge {
    width: u32,
    height: u32,
    grid: u32,
    corners: Vec<Point>,
}

impl MeshBulge {
    /// Build the mesh for a `width x height` buffer.
    ///
    /// Corner sources follow `r' = r + (r^2 - r) * factor` with `r` measured in units of the
    /// inscribed radius; positive factors magnify the center.
    pub fn new(width: u32, height: u32, grid: u32, factor: f64) -> Self {
        let grid = grid.max(1);
        let (w, h) = (f64::from(width), f64::from(height));
        let center = Point::new(w / 2.0, h / 2.0);
        let radius = (w.min(h) / 2.0).max(f64::EPSILON);

        let mut corners = Vec::with_capacity(((grid + 1) * (grid + 1)) as usize);
        for j in 0..=grid {
            for i in 0..=grid {
                let p = Point::new(
                    w * f64::from(i) / f64::from(grid),
                    h * f64::from(j) / f64::from(grid),
                );
                let v = p - center;
                let r = v.hypot() / radius;
                let src = if r > 0.0 {
                    let r2 = r + (r * r - r) * factor;
                    center + v * (r2 / r)
                } else {
                    center
                };
                corners.push(Point::new(src.x.clamp(0.0, w), src.y.clamp(0.0, h)));
            }
        }
        Self {
            width,
            height,
            grid,
            corners,
        }
    }

    fn corner(&self, i: u32, j: u32) -> Point {
        self.corners[(j * (self.grid + 1) + i) as usize]
    }
}

impl DistortionField for MeshBulge {
    fn source_for(&self, x: u32, y: u32) -> Option<Point> {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let g = f64::from(self.grid);
        let gx = (f64::from(x) + 0.5) / w * g;
        let gy = (f64::from(y) + 0.5) / h * g;
        let ci = (gx.floor() as u32).min(self.grid - 1);
        let cj = (gy.floor() as u32).min(self.grid - 1);
        let tx = gx - f64::from(ci);
        let ty = gy - f64::from(cj);

        let top = self.corner(ci, cj).lerp(self.corner(ci + 1, cj), tx);
        let bottom = self.corner(ci, cj + 1).lerp(self.corner(ci + 1, cj + 1), tx);
        let p = top.lerp(bottom, ty);
        // Corners may sit exactly on the far edge; keep the sample strictly inside.
        Some(Point::new(
            p.x.clamp(0.0, (w - 1e-3).max(0.0)),
            p.y.clamp(0.0, (h - 1e-3).max(0.0)),
        ))
    }

    fn interpolation(&self) -> Interpolation {
        Interpolation::Bicubic
    }
}

/// Exact per-pixel inverse bulge inside the inscribed circle.
///
/// Pixels outside the circle map to themselves. Inside it a destination pixel at distance `d` from
/// the center reads the source at `d - d * factor * (d - R) / R`, which never leaves the circle for
/// factors in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialBulge {
    /// Bulge strength in `[0, 1]`.
    pub factor: f64,
    /// Buffer width.
    pub width: u32,
    /// Buffer height.
    pub height: u32,
}

impl RadialBulge {
    /// Integer source pixel for destination `(x, y)`; `None` only for off-canvas destinations.
    pub fn source_pixel(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let center = Point::new(w / 2.0, h / 2.0);
        let radius = w.min(h) / 2.0;
        let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let v: Vec2 = p - center;
        let d = v.hypot();
        if radius <= 0.0 || d >= radius {
            return Some((x, y));
        }

        let factor = self.factor.clamp(0.0, 1.0);
        let src_d = d - d * factor * (d - radius) / radius;
        let src = if d > 0.0 { center + v * (src_d / d) } else { center };
        let sx = src.x.floor().clamp(0.0, w - 1.0) as u32;
        let sy = src.y.floor().clamp(0.0, h - 1.0) as u32;
        Some((sx, sy))
    }
}

impl DistortionField for RadialBulge {
    fn source_for(&self, x: u32, y: u32) -> Option<Point> {
        self.source_pixel(x, y)
            .map(|(sx, sy)| Point::new(f64::from(sx) + 0.5, f64::from(sy) + 0.5))
    }

    fn interpolation(&self) -> Interpolation {
        Interpolation::Nearest
    }
}

/// Resample `src` through `field` into a buffer of the same size.
///
/// The warped pixels are composited over [`Raster::vacated`], so destinations whose source falls
/// off the buffer (or too close to its edge for the filter) keep the vacated value. With
/// `parallel` unset the warp runs on a single-thread pool.
pub fn resample<R, F>(src: &R, field: &F, parallel: bool) -> GarbleResult<R>
where
    R: Raster,
    F: DistortionField + ?Sized,
{
    let (width, height) = (src.width(), src.height());
    let image = RgbaImage::from_fn(width, height, |x, y| Rgba(src.pixel(x, y).unwrap_or([0; 4])));
    let interpolation = field.interpolation();

    // imageproc puts pixel centers on integer coordinates.
    let mapping = |x: f32, y: f32| match field.source_for(x as u32, y as u32) {
        Some(p) => ((p.x - 0.5) as f32, (p.y - 0.5) as f32),
        None => OFF_CANVAS,
    };
    let warp = || warp_with(&image, mapping, interpolation, Rgba([0, 0, 0, 0]));
    let warped = if parallel {
        warp()
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .map_err(|e| GarbleError::evaluation(format!("warp thread pool: {e}")))?
            .install(warp)
    };

    let mut out = src.vacated();
    for (x, y, px) in warped.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        if let Some(dst) = out.pixel(x, y) {
            out.put_pixel(x, y, over(dst, px.0, 1.0));
        }
    }
    Ok(out)
}

#[derive(Clone, Debug, PartialEq)]
enum WarpKind {
    Identity,
    Shear(SineShear),
    Mesh(MeshBulge),
    Radial(RadialBulge),
}

/// Per-request warp with its random parameters already drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct WarpEngine {
    kind: WarpKind,
    parallel: bool,
}

impl WarpEngine {
    /// Engine that returns its input unchanged.
    pub fn identity() -> Self {
        Self {
            kind: WarpKind::Identity,
            parallel: false,
        }
    }

    /// Draw the warp parameters for a `width x height` target.
    ///
    /// `max_shift` caps the sine-shear amplitude so shifted ink stays on the canvas.
    pub fn from_config(
        cfg: &WarpConfig,
        width: u32,
        height: u32,
        max_shift: f64,
        rng: &mut RandomSource,
    ) -> Self {
        let kind = match cfg.strategy {
            WarpStrategy::None => WarpKind::Identity,
            WarpStrategy::SineShear {
                amplitude,
                frequency,
            } => {
                let amp = f64::from(rng.uniform_f32(amplitude.min, amplitude.max));
                let freq = f64::from(rng.uniform_f32(frequency.min, frequency.max));
                let cap = max_shift.max(0.0);
                if amp > cap {
                    tracing::debug!(drawn = amp, cap, "sine shear amplitude capped by text slack");
                }
                WarpKind::Shear(SineShear {
                    amplitude: amp.min(cap),
                    frequency: freq,
                })
            }
            WarpStrategy::MeshBulge { grid, factor } => {
                let f = f64::from(rng.uniform_f32(factor.min, factor.max));
                WarpKind::Mesh(MeshBulge::new(width, height, grid, f.clamp(-1.0, 1.0)))
            }
            WarpStrategy::RadialBulge { factor } => {
                let f = f64::from(rng.uniform_f32(factor.min, factor.max));
                WarpKind::Radial(RadialBulge {
                    factor: f.clamp(0.0, 1.0),
                    width,
                    height,
                })
            }
        };
        match &kind {
            WarpKind::Shear(f) => {
                tracing::debug!(amplitude = f.amplitude, frequency = f.frequency, "sine shear")
            }
            WarpKind::Radial(f) => tracing::debug!(factor = f.factor, "radial bulge"),
            WarpKind::Mesh(f) => tracing::debug!(grid = f.grid, "mesh bulge"),
            WarpKind::Identity => {}
        }
        Self {
            kind,
            parallel: cfg.parallel,
        }
    }

    /// `true` when [`WarpEngine::warp`] is a plain copy.
    pub fn is_identity(&self) -> bool {
        matches!(self.kind, WarpKind::Identity)
    }

    /// Apply the warp. Dimensions are preserved.
    pub fn warp<R: Raster>(&self, src: &R) -> GarbleResult<R> {
        match &self.kind {
            WarpKind::Identity => Ok(src.clone()),
            WarpKind::Shear(f) => resample(src, f, self.parallel),
            WarpKind::Mesh(f) => resample(src, f, self.parallel),
            WarpKind::Radial(f) => resample(src, f, self.parallel),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/warp.rs"]
mod tests;
