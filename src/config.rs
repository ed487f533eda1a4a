//! Immutable per-request configuration.
//!
//! One [`GarbleConfig`] is built (or loaded from JSON) up front and handed by reference to every
//! pipeline stage. Nothing in the pipeline mutates it.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::effects::strokes::StrokeShape;
use crate::foundation::error::{GarbleError, GarbleResult};
use crate::palette::{ColorPalette, Tone};

/// Closed float interval `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Interval {
    /// Construct an interval.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Degenerate interval holding a single value.
    pub const fn fixed(v: f32) -> Self {
        Self { min: v, max: v }
    }

    fn check(self, what: &str) -> GarbleResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(GarbleError::validation(format!("{what} must be finite")));
        }
        if self.min > self.max {
            return Err(GarbleError::validation(format!("{what} min must be <= max")));
        }
        Ok(())
    }
}

/// Closed integer interval `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    /// Lower bound.
    pub min: u32,
    /// Upper bound.
    pub max: u32,
}

impl CountRange {
    /// Construct a range.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn check(self, what: &str) -> GarbleResult<()> {
        if self.min > self.max {
            return Err(GarbleError::validation(format!("{what} min must be <= max")));
        }
        if self.max > 1_000 {
            return Err(GarbleError::validation(format!("{what} max must be <= 1000")));
        }
        Ok(())
    }
}

/// Output image dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Font candidates handed to the [`FontProvider`](crate::FontProvider).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Directory relative identifiers are resolved against.
    pub root: PathBuf,
    /// Ordered candidate identifiers (file paths).
    pub candidates: Vec<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            candidates: vec![
                "fonts/DejaVuSans-Bold.ttf".to_string(),
                "fonts/DejaVuSerif-Bold.ttf".to_string(),
                "fonts/LiberationSans-Bold.ttf".to_string(),
                "fonts/LiberationSerif-Bold.ttf".to_string(),
            ],
        }
    }
}

/// Per-character baseline offset policy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerticalOffset {
    /// Coherent wave: `amplitude * sin(frequency * x)` of the glyph's horizontal position.
    SineWave {
        /// Amplitude range in pixels, drawn once per request.
        amplitude: Interval,
        /// Angular frequency range in radians per pixel, drawn once per request.
        frequency: Interval,
    },
    /// Independent uniform offset in `[-amplitude, amplitude]` per character.
    Jitter {
        /// Maximum offset in pixels.
        amplitude: f32,
    },
}

/// Where the glyph block starts horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Center the measured block on the canvas.
    Centered,
    /// Start at a fixed left padding.
    FixedLeft {
        /// Left edge of the first glyph slot, in pixels.
        padding: f32,
    },
}

/// How text colors are assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextColorMode {
    /// Independent dark palette color per glyph.
    PerGlyph,
    /// One dark palette color for the whole request.
    PerRequest,
}

/// Layout and glyph rasterization settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Text used when a request carries none.
    pub default_text: String,
    /// Inputs are truncated to this many characters.
    pub max_length: usize,
    /// First size tried by the font-size search.
    pub initial_font_size: u32,
    /// Floor of the font-size search.
    pub min_font_size: u32,
    /// Horizontal padding on each side, in pixels.
    pub horizontal_padding: f32,
    /// Vertical padding on each side, in pixels.
    pub vertical_padding: f32,
    /// Extra advance after each glyph, in pixels (may be negative).
    pub spacing: Interval,
    /// Per-glyph rotation range in degrees.
    pub rotation_deg: Interval,
    /// Baseline offset policy.
    pub vertical_offset: VerticalOffset,
    /// Horizontal placement policy.
    pub placement: Placement,
    /// Text color policy.
    pub color_mode: TextColorMode,
    /// Probability of drawing a glyph as light-on-dark inside a rotated block.
    pub block_probability: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_text: "No Text Provided".to_string(),
            max_length: 50,
            initial_font_size: 48,
            min_font_size: 10,
            horizontal_padding: 2.0,
            vertical_padding: 2.0,
            spacing: Interval::new(-5.0, 5.0),
            rotation_deg: Interval::new(-35.0, 35.0),
            vertical_offset: VerticalOffset::Jitter { amplitude: 8.0 },
            placement: Placement::Centered,
            color_mode: TextColorMode::PerGlyph,
            block_probability: 0.0,
        }
    }
}

/// Base canvas synthesis mode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackgroundMode {
    /// One uniformly random light color; each channel in `[min, max]`.
    Flat {
        /// Lowest channel value.
        min: u8,
        /// Highest channel value.
        max: u8,
    },
    /// Seeded multi-octave Perlin field normalized to `[0, 255]`.
    CoherentNoise {
        /// Field frequency in cycles per pixel for the first octave.
        scale: f64,
        /// Number of octaves.
        octaves: u32,
        /// Amplitude multiplier between octaves.
        persistence: f64,
        /// Frequency multiplier between octaves.
        lacunarity: f64,
        /// Per-channel multiplier applied after normalization.
        channel_scale: [f32; 3],
        /// Evaluate rows on the rayon pool.
        parallel: bool,
    },
}

/// Translucent shapes composited onto the background before glyphs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    /// Number of shapes.
    pub count: CountRange,
    /// Shapes to choose from.
    pub shapes: Vec<StrokeShape>,
    /// Stroke width range in pixels.
    pub width: Interval,
    /// Alpha range.
    pub alpha: CountRange,
    /// Palette tone.
    pub tone: Tone,
}

/// Background settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Base fill mode.
    pub mode: BackgroundMode,
    /// Optional translucent overlay.
    pub overlay: Option<OverlaySpec>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            mode: BackgroundMode::Flat { min: 220, max: 255 },
            overlay: None,
        }
    }
}

/// Geometric distortion strategy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarpStrategy {
    /// No distortion.
    None,
    /// Row-wise horizontal shift `amplitude * sin(y * frequency)`.
    SineShear {
        /// Amplitude range in pixels.
        amplitude: Interval,
        /// Frequency range in radians per row.
        frequency: Interval,
    },
    /// Radial bulge approximated on a `grid x grid` mesh with smooth interpolation.
    MeshBulge {
        /// Cells per side.
        grid: u32,
        /// Bulge factor range.
        factor: Interval,
    },
    /// Exact per-pixel inverse radial bulge with nearest-pixel sampling.
    RadialBulge {
        /// Bulge factor range, within `[0, 1]`.
        factor: Interval,
    },
}

/// What the warp is applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarpTarget {
    /// Only the composed text layer.
    TextLayer,
    /// The whole canvas after the text layer is composited.
    Canvas,
}

/// Warp settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    /// Strategy.
    pub strategy: WarpStrategy,
    /// Target buffer.
    pub target: WarpTarget,
    /// Resample rows on the rayon pool.
    pub parallel: bool,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            strategy: WarpStrategy::SineShear {
                amplitude: Interval::new(1.5, 3.0),
                frequency: Interval::new(0.05, 0.1),
            },
            target: WarpTarget::TextLayer,
            parallel: false,
        }
    }
}

/// Random strokes drawn over the finished text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeNoise {
    /// Number of strokes.
    pub count: CountRange,
    /// Stroke width range in pixels.
    pub width: Interval,
    /// Shapes to choose from.
    pub shapes: Vec<StrokeShape>,
    /// Palette tone.
    pub tone: Tone,
}

impl Default for StrokeNoise {
    fn default() -> Self {
        Self {
            count: CountRange::new(5, 7),
            width: Interval::fixed(2.0),
            shapes: vec![StrokeShape::Polyline],
            tone: Tone::Mid,
        }
    }
}

/// How salt-and-pepper pixels are selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseDiscipline {
    /// Sample exactly `round(width * height * amount)` distinct pixels.
    ExactCount,
    /// Independent per-pixel draw: black with `amount/2`, white with `amount/2`.
    Bernoulli,
}

/// Salt-and-pepper settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaltPepper {
    /// Fraction of pixels to corrupt, in `[0, 1]`.
    pub amount: f64,
    /// Selection discipline.
    pub discipline: NoiseDiscipline,
}

impl Default for SaltPepper {
    fn default() -> Self {
        Self {
            amount: 0.01,
            discipline: NoiseDiscipline::ExactCount,
        }
    }
}

/// Post-distortion artifact settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSpec {
    /// Stroke noise.
    pub strokes: StrokeNoise,
    /// Salt-and-pepper noise.
    pub salt_pepper: SaltPepper,
}

/// Complete pipeline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarbleConfig {
    /// Output size.
    pub canvas: CanvasConfig,
    /// Font candidates.
    pub fonts: FontConfig,
    /// Layout and glyph settings.
    pub text: TextConfig,
    /// Color sets.
    pub palette: ColorPalette,
    /// Background settings.
    pub background: BackgroundConfig,
    /// Warp settings.
    pub warp: WarpConfig,
    /// Post-render noise.
    pub noise: NoiseSpec,
}

impl Default for GarbleConfig {
    /// 400x100 centered layout with per-character jitter, a mild sine shear of the text layer,
    /// polyline strokes and 1% salt-and-pepper.
    fn default() -> Self {
        Self {
            canvas: CanvasConfig {
                width: 400,
                height: 100,
            },
            fonts: FontConfig::default(),
            text: TextConfig::default(),
            palette: ColorPalette::default(),
            background: BackgroundConfig::default(),
            warp: WarpConfig::default(),
            noise: NoiseSpec::default(),
        }
    }
}

impl GarbleConfig {
    /// Compact 300x50 contact-obfuscation layout: sine-wave baseline from a fixed left margin,
    /// light lines under the text and curves over it.
    pub fn classic() -> Self {
        Self {
            canvas: CanvasConfig {
                width: 300,
                height: 50,
            },
            fonts: FontConfig {
                root: PathBuf::from("fonts"),
                candidates: vec![
                    "DejaVuSans.ttf".to_string(),
                    "Arial.ttf".to_string(),
                    "Verdana.ttf".to_string(),
                    "Tahoma.ttf".to_string(),
                ],
            },
            text: TextConfig {
                default_text: "TFA1974 (at) AOL (dotcom)".to_string(),
                initial_font_size: 20,
                horizontal_padding: 4.0,
                spacing: Interval::new(-2.0, 2.0),
                rotation_deg: Interval::new(-18.0, 18.0),
                vertical_offset: VerticalOffset::SineWave {
                    amplitude: Interval::new(2.5, 4.5),
                    frequency: Interval::new(0.08, 0.12),
                },
                placement: Placement::FixedLeft { padding: 15.0 },
                ..TextConfig::default()
            },
            palette: ColorPalette::default(),
            background: BackgroundConfig {
                mode: BackgroundMode::Flat { min: 220, max: 255 },
                overlay: Some(OverlaySpec {
                    count: CountRange::new(5, 10),
                    shapes: vec![StrokeShape::Line],
                    width: Interval::fixed(1.0),
                    alpha: CountRange::new(60, 120),
                    tone: Tone::Mid,
                }),
            },
            warp: WarpConfig {
                strategy: WarpStrategy::None,
                ..WarpConfig::default()
            },
            noise: NoiseSpec {
                strokes: StrokeNoise {
                    count: CountRange::new(3, 5),
                    width: Interval::fixed(2.0),
                    shapes: vec![StrokeShape::Curve],
                    tone: Tone::Mid,
                },
                salt_pepper: SaltPepper {
                    amount: 0.0,
                    discipline: NoiseDiscipline::ExactCount,
                },
            },
        }
    }

    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> GarbleResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| GarbleError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> GarbleResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GarbleError::validation(format!("failed to open config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| GarbleError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that can never produce an image.
    pub fn validate(&self) -> GarbleResult<()> {
        let CanvasConfig { width, height } = self.canvas;
        if width == 0 || height == 0 {
            return Err(GarbleError::validation("canvas dimensions must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(GarbleError::validation("canvas dimensions must fit in u16"));
        }
        if self.fonts.candidates.is_empty() {
            return Err(GarbleError::validation("at least one font candidate is required"));
        }

        let t = &self.text;
        if t.max_length == 0 {
            return Err(GarbleError::validation("text max_length must be > 0"));
        }
        if t.min_font_size == 0 || t.min_font_size > t.initial_font_size {
            return Err(GarbleError::validation(
                "font sizes must satisfy 0 < min_font_size <= initial_font_size",
            ));
        }
        if t.initial_font_size > 512 {
            return Err(GarbleError::validation("initial_font_size must be <= 512"));
        }
        for (v, what) in [
            (t.horizontal_padding, "horizontal_padding"),
            (t.vertical_padding, "vertical_padding"),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(GarbleError::validation(format!("{what} must be >= 0")));
            }
        }
        t.spacing.check("text spacing")?;
        t.rotation_deg.check("text rotation_deg")?;
        match t.vertical_offset {
            VerticalOffset::SineWave {
                amplitude,
                frequency,
            } => {
                amplitude.check("sine amplitude")?;
                frequency.check("sine frequency")?;
            }
            VerticalOffset::Jitter { amplitude } => {
                if !amplitude.is_finite() || amplitude < 0.0 {
                    return Err(GarbleError::validation("jitter amplitude must be >= 0"));
                }
            }
        }
        if let Placement::FixedLeft { padding } = t.placement {
            if !padding.is_finite() {
                return Err(GarbleError::validation("placement padding must be finite"));
            }
        }
        check_probability(t.block_probability, "block_probability")?;

        for tone in [Tone::Dark, Tone::Mid, Tone::Light] {
            if self.palette.tone(tone).is_empty() {
                return Err(GarbleError::validation(format!(
                    "palette tone {tone:?} must not be empty"
                )));
            }
        }

        match self.background.mode {
            BackgroundMode::Flat { min, max } => {
                if min > max {
                    return Err(GarbleError::validation("flat background min must be <= max"));
                }
            }
            BackgroundMode::CoherentNoise {
                scale,
                octaves,
                persistence,
                lacunarity,
                channel_scale,
                ..
            } => {
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(GarbleError::validation("noise scale must be > 0"));
                }
                if !(1..=8).contains(&octaves) {
                    return Err(GarbleError::validation("noise octaves must be in 1..=8"));
                }
                if !persistence.is_finite() || persistence <= 0.0 {
                    return Err(GarbleError::validation("noise persistence must be > 0"));
                }
                if !lacunarity.is_finite() || lacunarity < 1.0 {
                    return Err(GarbleError::validation("noise lacunarity must be >= 1"));
                }
                if channel_scale.iter().any(|s| !s.is_finite() || *s < 0.0) {
                    return Err(GarbleError::validation("channel_scale must be >= 0"));
                }
            }
        }
        if let Some(overlay) = &self.background.overlay {
            overlay.count.check("overlay count")?;
            overlay.width.check("overlay width")?;
            overlay.alpha.check("overlay alpha")?;
            if overlay.alpha.max > 255 {
                return Err(GarbleError::validation("overlay alpha must be <= 255"));
            }
            if overlay.shapes.is_empty() && overlay.count.max > 0 {
                return Err(GarbleError::validation("overlay needs at least one shape"));
            }
        }

        match self.warp.strategy {
            WarpStrategy::None => {}
            WarpStrategy::SineShear {
                amplitude,
                frequency,
            } => {
                amplitude.check("shear amplitude")?;
                frequency.check("shear frequency")?;
            }
            WarpStrategy::MeshBulge { grid, factor } => {
                if !(1..=64).contains(&grid) {
                    return Err(GarbleError::validation("mesh grid must be in 1..=64"));
                }
                factor.check("mesh factor")?;
                if factor.min < -1.0 || factor.max > 1.0 {
                    return Err(GarbleError::validation("mesh factor must be within [-1, 1]"));
                }
            }
            WarpStrategy::RadialBulge { factor } => {
                factor.check("radial factor")?;
                if factor.min < 0.0 || factor.max > 1.0 {
                    return Err(GarbleError::validation("radial factor must be within [0, 1]"));
                }
            }
        }

        let s = &self.noise.strokes;
        s.count.check("stroke count")?;
        s.width.check("stroke width")?;
        if s.shapes.is_empty() && s.count.max > 0 {
            return Err(GarbleError::validation("stroke noise needs at least one shape"));
        }
        check_probability(self.noise.salt_pepper.amount, "salt_pepper amount")?;
        Ok(())
    }

    /// Apply the request defaults: empty-handed requests get `default_text`, long inputs are cut
    /// to `max_length` characters.
    pub fn request_text(&self, text: Option<&str>) -> String {
        let text = text.unwrap_or(&self.text.default_text);
        truncate_chars(text, self.text.max_length).to_string()
    }
}

fn check_probability(p: f64, what: &str) -> GarbleResult<()> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(GarbleError::validation(format!("{what} must be within [0, 1]")));
    }
    Ok(())
}

/// Cut `s` to at most `max` Unicode scalar values.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
