use crate::error::{Error, Result};
use crate::normalize::NormalizedImage;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::fmt;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Jpeg { quality: u8 },
    /// The `image` crate only writes lossless WebP.
    WebP,
}

impl Default for PayloadFormat {
    fn default() -> Self {
        PayloadFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl PayloadFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            PayloadFormat::Jpeg { .. } => "image/jpeg",
            PayloadFormat::WebP => "image/webp",
        }
    }
}

/// `data:<mime>;base64,<body>`, ready to drop into a JSON field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    /// Wraps an already encoded data string as-is.
    pub fn from_string(data: impl Into<String>) -> Self {
        EncodedPayload(data.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the inline string back into pixels.
    pub fn decode_image(&self) -> Result<DynamicImage> {
        let (_, body) = self
            .0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .ok_or_else(|| Error::InvalidPayload("not a base64 data string".to_string()))?;
        let bytes = BASE64
            .decode(body)
            .map_err(|e| Error::InvalidPayload(format!("bad base64: {e}")))?;
        image::load_from_memory(&bytes).map_err(|e| Error::InvalidPayload(e.to_string()))
    }
}

impl fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn encode_payload(image: &NormalizedImage, format: PayloadFormat) -> Result<EncodedPayload> {
    let mut bytes = Vec::new();
    match format {
        PayloadFormat::Jpeg { quality } => {
            let rgb = image.image.to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, quality)
                .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .map_err(Error::Encode)?;
        }
        PayloadFormat::WebP => {
            let rgba = image.image.to_rgba8();
            WebPEncoder::new_lossless(&mut bytes)
                .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
                .map_err(Error::Encode)?;
        }
    }

    Ok(EncodedPayload(format!(
        "data:{};base64,{}",
        format.mime(),
        BASE64.encode(&bytes)
    )))
}
