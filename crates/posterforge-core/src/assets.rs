//! Image asset ingestion.
//!
//! Only the decoded pixel dimensions of an uploaded file matter to the
//! document; the bytes themselves travel as a `data:` URI source reference.

use crate::geometry::{Geometry, fit_centered};
use crate::tools::IMAGE_CANVAS_FRACTION;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageError, ImageReader};
use kurbo::Size;
use std::io::Cursor;
use thiserror::Error;

/// Asset ingestion errors.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] ImageError),
    #[error("Image has zero width or height")]
    EmptyImage,
}

/// A decoded upload, ready to become an image element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub width: u32,
    pub height: u32,
    /// Source reference for the element.
    pub src: String,
}

impl ImageAsset {
    /// Decode `bytes` and build a data URI for them.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let (width, height) = probe_dimensions(bytes)?;
        Ok(Self {
            width,
            height,
            src: data_uri(bytes),
        })
    }

    /// Geometry of the new element on a canvas: proportional, within 80% of
    /// the canvas, centered.
    pub fn placement(&self, canvas: Size) -> Geometry {
        fit_centered(
            f64::from(self.width),
            f64::from(self.height),
            canvas,
            IMAGE_CANVAS_FRACTION,
        )
    }
}

/// Pixel dimensions of an encoded image (PNG, JPEG or WebP), read from its
/// header without decoding the pixels.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), AssetError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ImageError::IoError)?
        .into_dimensions()?;
    if width == 0 || height == 0 {
        return Err(AssetError::EmptyImage);
    }
    Ok((width, height))
}

/// Base64 `data:` URI for encoded image bytes.
pub fn data_uri(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
