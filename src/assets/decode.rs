use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{LeafletError, LeafletResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster image in premultiplied RGBA8 form.
///
/// Cheap to clone; the pixel buffer is shared.
#[derive(Clone)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba8_premul.len())
            .finish()
    }
}

impl DecodedImage {
    /// Wrap straight-alpha RGBA8 pixels, premultiplying them.
    pub fn from_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> LeafletResult<Self> {
        check_dimensions(width, height)?;
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8.len() != expected {
            return Err(LeafletError::validation(format!(
                "image buffer is {} bytes, expected {expected} for {width}x{height}",
                rgba8.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba8);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8),
        })
    }

    /// Solid-color image, mostly useful for previews and tests.
    pub fn solid(width: u32, height: u32, rgba8: [u8; 4]) -> LeafletResult<Self> {
        let n = (width as usize) * (height as usize);
        let mut px = Vec::with_capacity(n * 4);
        for _ in 0..n {
            px.extend_from_slice(&rgba8);
        }
        Self::from_rgba8(width, height, px)
    }
}

/// Decode PNG/JPEG/... bytes into a [`DecodedImage`].
pub fn decode_image(bytes: &[u8]) -> LeafletResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::from_rgba8(width, height, rgba.into_raw())
}

fn check_dimensions(width: u32, height: u32) -> LeafletResult<()> {
    if width == 0 || height == 0 {
        return Err(LeafletError::validation(format!(
            "image has zero intrinsic size ({width}x{height})"
        )));
    }
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(LeafletError::validation(format!(
            "image {width}x{height} exceeds the {max}x{max} raster limit",
            max = u16::MAX
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
