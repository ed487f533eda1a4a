use crate::foundation::core::Rgb8;
use crate::foundation::rng::RandomSource;

/// Which palette set a color is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Text fills and inverted blocks.
    Dark,
    /// Noise strokes and overlays.
    Mid,
    /// Glyph fill inside an inverted block.
    Light,
}

/// Fixed color sets used for text, inverted blocks and noise strokes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    /// Dark colors.
    pub dark: Vec<Rgb8>,
    /// Mid-tone colors.
    pub mid: Vec<Rgb8>,
    /// Light colors.
    pub light: Vec<Rgb8>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            dark: vec![
                [20, 20, 40],
                [40, 16, 16],
                [16, 48, 24],
                [60, 30, 70],
                [10, 40, 80],
                [70, 50, 20],
                [30, 30, 30],
            ],
            mid: vec![
                [90, 90, 150],
                [150, 80, 80],
                [80, 140, 90],
                [120, 120, 120],
                [160, 110, 60],
                [70, 130, 160],
            ],
            light: vec![
                [255, 255, 255],
                [240, 236, 220],
                [225, 245, 250],
                [250, 230, 235],
                [230, 250, 225],
            ],
        }
    }
}

impl ColorPalette {
    /// Colors of one tone.
    pub fn tone(&self, tone: Tone) -> &[Rgb8] {
        match tone {
            Tone::Dark => &self.dark,
            Tone::Mid => &self.mid,
            Tone::Light => &self.light,
        }
    }

    /// Uniformly pick a color of `tone`. An empty set falls back to black or white.
    pub fn pick(&self, tone: Tone, rng: &mut RandomSource) -> Rgb8 {
        match rng.pick(self.tone(tone)) {
            Some(c) => *c,
            None if tone == Tone::Light => [255, 255, 255],
            None => [0, 0, 0],
        }
    }
}
