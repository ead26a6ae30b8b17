//! PNG container for the background image.
//!
//! Pixels are stored as 8-bit RGB with no alpha, so every 24-bit palette code
//! survives exactly. Anything else found on load (RGBA, 16-bit, greyscale) is
//! not one of our images and is rejected instead of converted.

use std::io::Cursor;

use anyhow::{Context, Result, bail};
use image::{DynamicImage, ImageFormat, RgbImage};
use tileworld_engine::codec::ImageBuffer;

/// Encode an image buffer as PNG bytes.
pub fn encode_png(image: &ImageBuffer) -> Result<Vec<u8>> {
    let width = u32::try_from(image.width()).context("image too wide for PNG")?;
    let height = u32::try_from(image.height()).context("image too tall for PNG")?;
    let rgb = RgbImage::from_raw(width, height, image.to_rgb8())
        .context("pixel buffer does not match image size")?;

    let mut cursor = Cursor::new(Vec::new());
    rgb.write_to(&mut cursor, ImageFormat::Png)
        .with_context(|| format!("encoding {}x{} PNG", width, height))?;
    Ok(cursor.into_inner())
}

/// Decode PNG bytes written by [`encode_png`].
pub fn decode_png(bytes: &[u8]) -> Result<ImageBuffer> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .context("decoding PNG")?;
    let rgb = match decoded {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => bail!("expected an 8-bit RGB PNG, found {:?}", other.color()),
    };
    let (width, height) = rgb.dimensions();
    ImageBuffer::from_rgb8(width as usize, height as usize, rgb.as_raw())
        .context("PNG pixel data does not match its header")
}
