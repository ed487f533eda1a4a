//! Text stages: glyph shaping, layout planning and per-glyph rasterization.

pub(crate) mod baseline;
pub(crate) mod layout;
pub(crate) mod raster;
pub(crate) mod shaper;
