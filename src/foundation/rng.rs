use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, RngCore, SeedableRng};

use crate::foundation::error::{GarbleError, GarbleResult};

/// Random-number handle threaded by `&mut` through every pipeline stage.
///
/// Every draw in a render goes through one `RandomSource`, so a seeded source makes the whole
/// pipeline reproducible.
#[derive(Clone, Debug)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Deterministic source for tests and fixtures.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system, for production requests.
    pub fn from_os() -> GarbleResult<Self> {
        let rng = StdRng::try_from_os_rng()
            .map_err(|e| GarbleError::evaluation(format!("os rng unavailable: {e}")))?;
        Ok(Self { rng })
    }

    /// Per-request source derived from a base seed and the request text.
    ///
    /// Two requests with different text never share generator state even under the same seed.
    pub fn for_request(seed: u64, text: &str) -> Self {
        let derived = xxhash_rust::xxh3::xxh3_64_with_seed(text.as_bytes(), seed);
        Self::seeded(derived)
    }

    /// Raw 64-bit draw.
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform float in `[lo, hi]`. Returns `lo` for an empty or inverted interval.
    pub fn uniform_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if !(hi > lo) {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    /// Uniform float in `[lo, hi]`. Returns `lo` for an empty or inverted interval.
    pub fn uniform_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if !(hi > lo) {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    /// Uniform integer in `[lo, hi]` (inclusive).
    pub fn uniform_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    /// Uniform byte in `[lo, hi]` (inclusive).
    pub fn uniform_u8(&mut self, lo: u8, hi: u8) -> u8 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    /// Bernoulli draw with probability `p` (clamped to `[0, 1]`).
    pub fn chance(&mut self, p: f64) -> bool {
        if !p.is_finite() {
            return false;
        }
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform draw in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Pick one element uniformly, `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    /// `amount` distinct indices from `0..len` (clamped to `len`).
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, len, amount.min(len)).into_vec()
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
