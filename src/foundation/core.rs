use crate::foundation::error::{GarbleError, GarbleResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Straight (opaque) RGB color.
pub type Rgb8 = [u8; 3];

/// Premultiplied RGBA color.
pub type PremulRgba8 = [u8; 4];

/// Pixel storage shared by [`Canvas`] and [`Layer`].
///
/// Pixels are exchanged as premultiplied RGBA; opaque buffers report alpha 255 and drop alpha on
/// write. All accessors are bounds-checked: out-of-range reads return `None` and out-of-range
/// writes are ignored.
pub trait Raster: Clone + Send + Sync {
    /// Bytes per pixel in [`Raster::as_bytes`].
    const CHANNELS: usize;

    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Row-major pixel bytes.
    fn as_bytes(&self) -> &[u8];

    /// Mutable row-major pixel bytes.
    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Buffer a resampling pass writes into.
    ///
    /// A destination pixel whose source falls off-canvas keeps whatever this returns: transparent
    /// for layers, the untouched original for opaque canvases.
    fn vacated(&self) -> Self;

    /// Decode one pixel from its byte slice.
    fn decode(px: &[u8]) -> PremulRgba8;

    /// Encode one pixel into its byte slice.
    fn encode(px: PremulRgba8, out: &mut [u8]);

    /// Read the pixel at `(x, y)`.
    fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        let idx = self.index_of(x, y)?;
        Some(Self::decode(&self.as_bytes()[idx..idx + Self::CHANNELS]))
    }

    /// Write the pixel at `(x, y)`. Returns `false` when the coordinate is off-canvas.
    fn put_pixel(&mut self, x: u32, y: u32, px: PremulRgba8) -> bool {
        let Some(idx) = self.index_of(x, y) else {
            return false;
        };
        Self::encode(px, &mut self.as_bytes_mut()[idx..idx + Self::CHANNELS]);
        true
    }

    /// Byte offset of `(x, y)`, or `None` off-canvas.
    fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(((y as usize) * (self.width() as usize) + (x as usize)) * Self::CHANNELS)
    }

    /// Bytes per row.
    fn row_stride(&self) -> usize {
        (self.width() as usize) * Self::CHANNELS
    }
}

fn checked_len(width: u32, height: u32, channels: usize) -> GarbleResult<usize> {
    if width == 0 || height == 0 {
        return Err(GarbleError::validation(
            "raster dimensions must be non-zero",
        ));
    }
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(GarbleError::validation(
            "raster dimensions must fit in u16",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| GarbleError::evaluation("raster buffer size overflow"))
}

/// Opaque RGB pixel buffer: the background and the final output image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Canvas filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: Rgb8) -> GarbleResult<Self> {
        let len = checked_len(width, height, 3)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..(len / 3) {
            data.extend_from_slice(&rgb);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap existing RGB bytes.
    pub fn from_rgb_bytes(width: u32, height: u32, data: Vec<u8>) -> GarbleResult<Self> {
        let len = checked_len(width, height, 3)?;
        if data.len() != len {
            return Err(GarbleError::evaluation(
                "canvas bytes must match width*height*3",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// RGB color at `(x, y)`.
    pub fn rgb(&self, x: u32, y: u32) -> Option<Rgb8> {
        self.pixel(x, y).map(|[r, g, b, _]| [r, g, b])
    }

    /// Consume the canvas and return its RGB bytes.
    pub fn into_rgb_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl Raster for Canvas {
    const CHANNELS: usize = 3;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn vacated(&self) -> Self {
        self.clone()
    }

    fn decode(px: &[u8]) -> PremulRgba8 {
        [px[0], px[1], px[2], 255]
    }

    fn encode(px: PremulRgba8, out: &mut [u8]) {
        out.copy_from_slice(&px[..3]);
    }
}

/// Transparent premultiplied RGBA buffer used for glyphs and the composed text layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Layer {
    /// Fully transparent layer.
    pub fn transparent(width: u32, height: u32) -> GarbleResult<Self> {
        let len = checked_len(width, height, 4)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Wrap existing premultiplied RGBA bytes.
    pub fn from_premul_bytes(width: u32, height: u32, data: Vec<u8>) -> GarbleResult<Self> {
        let len = checked_len(width, height, 4)?;
        if data.len() != len {
            return Err(GarbleError::evaluation(
                "layer bytes must match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// `true` when every pixel has zero alpha.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// First and last columns holding any non-transparent pixel, or `None` for a blank layer.
    pub fn ink_columns(&self) -> Option<(u32, u32)> {
        let mut cols: Option<(u32, u32)> = None;
        for row in self.data.chunks_exact(self.row_stride()) {
            for (x, px) in row.chunks_exact(4).enumerate() {
                if px[3] == 0 {
                    continue;
                }
                let x = x as u32;
                cols = Some(cols.map_or((x, x), |(lo, hi)| (lo.min(x), hi.max(x))));
            }
        }
        cols
    }
}

impl Raster for Layer {
    const CHANNELS: usize = 4;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn vacated(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: vec![0u8; self.data.len()],
        }
    }

    fn decode(px: &[u8]) -> PremulRgba8 {
        [px[0], px[1], px[2], px[3]]
    }

    fn encode(px: PremulRgba8, out: &mut [u8]) {
        out.copy_from_slice(&px);
    }
}

/// Premultiply a straight RGB color with `alpha`.
pub fn premul(rgb: Rgb8, alpha: u8) -> PremulRgba8 {
    let a = u16::from(alpha);
    let p = |c: u8| -> u8 { ((u16::from(c) * a + 127) / 255) as u8 };
    [p(rgb[0]), p(rgb[1]), p(rgb[2]), alpha]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
