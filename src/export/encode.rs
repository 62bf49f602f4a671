use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use anyhow::Context;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{LeafletError, LeafletResult};

/// JPEG quality used when none is given, matching the browser default.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.92;

/// Encoded output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        })
    }
}

impl FromStr for ImageFormat {
    type Err = LeafletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" | "image/png" => Ok(Self::Png),
            "jpeg" | "jpg" | "image/jpeg" => Ok(Self::Jpeg),
            other => Err(LeafletError::validation(format!(
                "unknown image format \"{other}\" (expected png or jpeg)"
            ))),
        }
    }
}

/// Map a `0..=1` quality to the encoder's `1..=100` scale.
pub(crate) fn jpeg_quality(quality: Option<f32>) -> u8 {
    let q = quality
        .filter(|q| q.is_finite())
        .unwrap_or(DEFAULT_JPEG_QUALITY)
        .clamp(0.0, 1.0);
    ((q * 100.0).round() as u8).clamp(1, 100)
}

/// Encode a straight-alpha RGBA image.
///
/// JPEG has no alpha channel; it is dropped. `quality` only affects JPEG.
pub fn encode_rgba(
    image: &image::RgbaImage,
    format: ImageFormat,
    quality: Option<f32>,
) -> LeafletResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Png => {
            image
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .context("encode png")
                .map_err(|e| LeafletError::encode(format!("{e:#}")))?;
        }
        ImageFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut buf,
                jpeg_quality(quality),
            );
            enc.encode_image(&rgb)
                .context("encode jpeg")
                .map_err(|e| LeafletError::encode(format!("{e:#}")))?;
        }
    }
    if buf.is_empty() {
        return Err(LeafletError::encode(format!("{format} encoder produced no data")));
    }
    Ok(buf)
}

/// `data:<mime>;base64,<payload>`.
pub fn data_url(bytes: &[u8], format: ImageFormat) -> String {
    format!(
        "data:{};base64,{}",
        format.mime(),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
