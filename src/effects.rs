pub(crate) mod composite;
pub(crate) mod noise;
pub(crate) mod strokes;
pub(crate) mod warp;
