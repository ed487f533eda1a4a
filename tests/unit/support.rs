//! Shared helpers for unit tests that need real font files.

use std::path::Path;

use crate::assets::fonts::MemoryFontProvider;

pub(crate) const SYSTEM_FONT_PATHS: &[&str] = &[
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

/// Paths of installed system fonts, in preference order.
pub(crate) fn system_font_paths() -> Vec<&'static str> {
    SYSTEM_FONT_PATHS
        .iter()
        .copied()
        .filter(|p| Path::new(p).is_file())
        .collect()
}

/// In-memory provider holding up to two installed system fonts, or `None` when the machine has
/// none of the known faces.
pub(crate) fn system_fonts() -> Option<MemoryFontProvider> {
    let paths = system_font_paths();
    if paths.is_empty() {
        eprintln!("no system fonts found; skipping font-dependent test");
        return None;
    }
    let mut provider = MemoryFontProvider::new();
    for p in paths.into_iter().take(2) {
        let bytes = std::fs::read(p).ok()?;
        provider = provider.with_face(p, bytes);
    }
    Some(provider)
}
