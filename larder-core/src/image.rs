//! Inline images: recipe pictures and avatars arrive as base64 data URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;

use crate::error::ImageError;

/// Allowed image formats for recipe pictures and avatars.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum decoded size (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Content type detected from the bytes, not the one the URI claims.
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Decode `data:image/<fmt>;base64,<payload>` and check the bytes are an
/// allowed image format.
pub fn decode_data_uri(input: &str) -> Result<DecodedImage, ImageError> {
    let rest = input
        .trim()
        .strip_prefix("data:")
        .ok_or(ImageError::NotDataUri)?;
    let (media_type, payload) = rest.split_once(";base64,").ok_or(ImageError::NotDataUri)?;
    if !media_type.starts_with("image/") {
        return Err(ImageError::NotDataUri);
    }

    // Base64 expands by 4/3; reject oversized payloads before decoding them.
    if payload.len() / 4 * 3 > MAX_FILE_SIZE + 3 {
        return Err(ImageError::TooLarge {
            size: payload.len() / 4 * 3,
            max: MAX_FILE_SIZE,
        });
    }

    let data = STANDARD.decode(payload.trim())?;
    if data.len() > MAX_FILE_SIZE {
        return Err(ImageError::TooLarge {
            size: data.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let format = image::guess_format(&data).map_err(|_| ImageError::UnknownFormat)?;
    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ImageError::UnsupportedFormat(format!("{:?}", format)));
    }

    Ok(DecodedImage {
        content_type: format.to_mime_type().to_string(),
        data,
    })
}
