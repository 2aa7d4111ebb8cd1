//! Core types for image encoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::datauri;

/// Errors that can occur during encoding.
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format:?} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },

    /// The candidate list was empty
    #[error("No output format candidates configured")]
    NoCandidates,
}

/// Check dimensions and buffer length shared by every encoder.
pub(crate) fn validate_rgb(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Encoded output formats, spelled `"jpeg"` and `"png"` when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// Lossy, quality driven.
    Jpeg,
    /// Lossless.
    Png,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Settings for [`encode_within_budget`](super::encode_within_budget).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncoderConfig {
    /// First JPEG quality tried (1-100).
    pub start_quality: u8,
    /// Lowest JPEG quality the search will go down to.
    pub quality_floor: u8,
    /// Quality decrement per iteration.
    pub quality_step: u8,
    /// Formats to evaluate, in order of preference on equal size.
    pub candidates: Vec<OutputFormat>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            start_quality: 95,
            quality_floor: 10,
            quality_step: 5,
            candidates: vec![OutputFormat::Jpeg],
        }
    }
}

/// An encoded image and how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: OutputFormat,
    /// JPEG quality used, `None` for lossless formats.
    pub quality: Option<u8>,
    /// Whether the byte budget was met.
    pub within_budget: bool,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Encoded payload size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// `data:<mime>;base64,<payload>` representation.
    pub fn data_uri(&self) -> String {
        datauri::to_data_uri(self.format.mime_type(), &self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metadata() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }

    #[test]
    fn test_validate_rgb() {
        assert!(validate_rgb(&[0u8; 12], 2, 2).is_ok());
        assert!(matches!(
            validate_rgb(&[0u8; 11], 2, 2),
            Err(EncodeError::InvalidPixelData {
                expected: 12,
                actual: 11
            })
        ));
        assert!(matches!(
            validate_rgb(&[], 0, 2),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encoded_image_data_uri() {
        let img = EncodedImage {
            format: OutputFormat::Png,
            quality: None,
            within_budget: true,
            bytes: vec![1, 2, 3],
        };
        assert_eq!(img.size_bytes(), 3);
        assert_eq!(img.data_uri(), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::EncodingFailed {
            format: OutputFormat::Jpeg,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Jpeg encoding failed: boom");
    }
}
