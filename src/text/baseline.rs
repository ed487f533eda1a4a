//! Per-character vertical offset policies.

use crate::config::VerticalOffset;
use crate::foundation::rng::RandomSource;

/// Vertical offset for one glyph, measured from the canvas midline.
pub trait BaselinePolicy {
    /// Offset for the glyph at `index` whose slot center sits at horizontal position `x`.
    fn offset(&mut self, index: usize, x: f64, rng: &mut RandomSource) -> f64;

    /// Largest absolute offset this policy can return.
    fn bound(&self) -> f64;
}

/// Coherent wave `amplitude * sin(frequency * x)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineWave {
    /// Peak offset in pixels.
    pub amplitude: f64,
    /// Radians per pixel.
    pub frequency: f64,
}

impl BaselinePolicy for SineWave {
    fn offset(&mut self, _index: usize, x: f64, _rng: &mut RandomSource) -> f64 {
        self.amplitude * (self.frequency * x).sin()
    }

    fn bound(&self) -> f64 {
        self.amplitude
    }
}

/// Independent uniform offset in `[-amplitude, amplitude]` per glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jitter {
    /// Maximum offset in pixels.
    pub amplitude: f64,
}

impl BaselinePolicy for Jitter {
    fn offset(&mut self, _index: usize, _x: f64, rng: &mut RandomSource) -> f64 {
        rng.uniform_f64(-self.amplitude, self.amplitude)
    }

    fn bound(&self) -> f64 {
        self.amplitude
    }
}

/// `min(configured, (canvas_height - font_size) / 2 - vertical_padding)`, floored at zero.
pub fn clamp_amplitude(configured: f64, canvas_height: u32, font_size: u32, vertical_padding: f64) -> f64 {
    let room = (f64::from(canvas_height) - f64::from(font_size)) / 2.0 - vertical_padding;
    configured.min(room).max(0.0)
}

/// Build the policy for one request; wave parameters are drawn here, once.
pub fn policy_for(
    cfg: &VerticalOffset,
    canvas_height: u32,
    font_size: u32,
    vertical_padding: f64,
    rng: &mut RandomSource,
) -> Box<dyn BaselinePolicy> {
    match *cfg {
        VerticalOffset::SineWave {
            amplitude,
            frequency,
        } => {
            let amp = f64::from(rng.uniform_f32(amplitude.min, amplitude.max));
            let freq = f64::from(rng.uniform_f32(frequency.min, frequency.max));
            Box::new(SineWave {
                amplitude: clamp_amplitude(amp, canvas_height, font_size, vertical_padding),
                frequency: freq,
            })
        }
        VerticalOffset::Jitter { amplitude } => Box::new(Jitter {
            amplitude: clamp_amplitude(
                f64::from(amplitude),
                canvas_height,
                font_size,
                vertical_padding,
            ),
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/baseline.rs"]
mod tests;
