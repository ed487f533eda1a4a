#![allow(dead_code)]

use std::path::Path;

use garble::{FontConfig, GarbleConfig, MemoryFontProvider};

const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn font_paths() -> Vec<&'static str> {
    CANDIDATES
        .iter()
        .copied()
        .filter(|p| Path::new(p).is_file())
        .collect()
}

/// Up to two installed fonts, or `None` (with a note) when the machine has none.
pub fn fonts() -> Option<MemoryFontProvider> {
    let paths = font_paths();
    if paths.is_empty() {
        eprintln!("no system fonts found; skipping");
        return None;
    }
    let mut provider = MemoryFontProvider::new();
    for p in paths.into_iter().take(2) {
        provider = provider.with_face(p, std::fs::read(p).ok()?);
    }
    Some(provider)
}

/// `base` pointed at the faces held by `provider`.
pub fn with_fonts(base: GarbleConfig, provider: &MemoryFontProvider) -> GarbleConfig {
    GarbleConfig {
        fonts: FontConfig {
            candidates: provider.ids(),
            ..FontConfig::default()
        },
        ..base
    }
}

pub fn variance(bytes: &[u8]) -> f64 {
    let n = bytes.len() as f64;
    let mean = bytes.iter().map(|b| f64::from(*b)).sum::<f64>() / n;
    bytes
        .iter()
        .map(|b| (f64::from(*b) - mean).powi(2))
        .sum::<f64>()
        / n
}
