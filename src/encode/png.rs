use std::io::Cursor;

use crate::foundation::core::{Canvas, Raster};
use crate::foundation::error::{GarbleError, GarbleResult};

/// MIME type of [`encode_png`] output.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Encode an opaque canvas as an 8-bit RGB PNG.
pub fn encode_png(canvas: &Canvas) -> GarbleResult<Vec<u8>> {
    let img = image::RgbImage::from_raw(canvas.width(), canvas.height(), canvas.as_bytes().to_vec())
        .ok_or_else(|| GarbleError::encode("canvas bytes do not match its dimensions"))?;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| GarbleError::encode(format!("png encode failed: {e}")))?;
    Ok(buf)
}

/// Decode PNG bytes back into an opaque canvas.
pub fn decode_png(bytes: &[u8]) -> GarbleResult<Canvas> {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| GarbleError::encode(format!("png decode failed: {e}")))?
        .to_rgb8();
    let (w, h) = img.dimensions();
    Canvas::from_rgb_bytes(w, h, img.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
