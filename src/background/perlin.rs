//! Seeded gradient noise for the coherent background field.

use rayon::prelude::*;

use crate::foundation::rng::RandomSource;

/// Scalar field over the plane.
pub trait Noise2D: Sync {
    /// Field value at `(x, y)`, roughly within `[-1, 1]`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

const GRADIENTS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2),
    (-std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2),
    (std::f64::consts::FRAC_1_SQRT_2, -std::f64::consts::FRAC_1_SQRT_2),
    (-std::f64::consts::FRAC_1_SQRT_2, -std::f64::consts::FRAC_1_SQRT_2),
];

/// Classic 2D Perlin noise over a shuffled 256-entry permutation.
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    perm: [u8; 512],
}

impl PerlinNoise {
    /// Permutation drawn from `rng`.
    pub fn new(rng: &mut RandomSource) -> Self {
        let mut base: Vec<u8> = (0..=255u8).collect();
        rng.shuffle(&mut base);
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i & 255];
        }
        Self { perm }
    }

    fn hash(&self, x: i64, y: i64) -> usize {
        let xi = (x & 255) as usize;
        let yi = (y & 255) as usize;
        self.perm[usize::from(self.perm[xi]) + yi] as usize
    }

    fn grad(&self, x: i64, y: i64, dx: f64, dy: f64) -> f64 {
        let (gx, gy) = GRADIENTS[self.hash(x, y) & 7];
        gx * dx + gy * dy
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

impl Noise2D for PerlinNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let (dx, dy) = (x - x0, y - y0);
        let (ix, iy) = (x0 as i64, y0 as i64);

        let n00 = self.grad(ix, iy, dx, dy);
        let n10 = self.grad(ix + 1, iy, dx - 1.0, dy);
        let n01 = self.grad(ix, iy + 1, dx, dy - 1.0);
        let n11 = self.grad(ix + 1, iy + 1, dx - 1.0, dy - 1.0);

        let u = fade(dx);
        let v = fade(dy);
        let top = n00 + (n10 - n00) * u;
        let bottom = n01 + (n11 - n01) * u;
        (top + (bottom - top) * v) * std::f64::consts::SQRT_2
    }
}

/// Fractal sum of octaves of a base noise.
#[derive(Clone, Debug)]
pub struct Fbm<N> {
    noise: N,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
}

impl<N: Noise2D> Fbm<N> {
    /// Wrap `noise`.
    pub fn new(noise: N, octaves: u32, persistence: f64, lacunarity: f64) -> Self {
        Self {
            noise,
            octaves: octaves.max(1),
            persistence,
            lacunarity,
        }
    }
}

impl<N: Noise2D> Noise2D for Fbm<N> {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        let mut freq = 1.0;
        let mut norm = 0.0;
        for _ in 0..self.octaves {
            sum += self.noise.sample(x * freq, y * freq) * amp;
            norm += amp;
            amp *= self.persistence;
            freq *= self.lacunarity;
        }
        if norm > 0.0 { sum / norm } else { 0.0 }
    }
}

/// Evaluate `noise` at `(x * scale, y * scale)` for every pixel, one pixel at a time.
pub fn field_pointwise<N: Noise2D + ?Sized>(noise: &N, width: u32, height: u32, scale: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity((width as usize) * (height as usize));
    for y in 0..height {
        for x in 0..width {
            out.push(noise.sample(f64::from(x) * scale, f64::from(y) * scale));
        }
    }
    out
}

/// Same field as [`field_pointwise`], rows evaluated on the rayon pool.
pub fn field_bulk<N: Noise2D + ?Sized>(noise: &N, width: u32, height: u32, scale: f64) -> Vec<f64> {
    let mut out = vec![0.0; (width as usize) * (height as usize)];
    if width == 0 {
        return out;
    }
    out.par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let fy = (y as f64) * scale;
            for (x, v) in row.iter_mut().enumerate() {
                *v = noise.sample((x as f64) * scale, fy);
            }
        });
    out
}

#[cfg(test)]
#[path = "../../tests/unit/background/perlin.rs"]
mod tests;
