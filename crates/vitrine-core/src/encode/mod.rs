//! Encoding composited rasters into transportable bytes.
//!
//! This module provides:
//! - JPEG encoding at an explicit quality ([`encode_jpeg`])
//! - Lossless PNG encoding ([`encode_png`])
//! - Byte-budgeted encoding over an ordered list of candidate formats
//!   ([`encode_within_budget`])
//!
//! Sizes are measured on the encoded payload itself. A data URI adds base64
//! overhead on top; see [`crate::datauri::payload_size`].

mod budget;
mod jpeg;
mod png;
mod types;

pub use budget::{encode_within_budget, search_jpeg_quality};
pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use types::{EncodeError, EncodedImage, EncoderConfig, OutputFormat};
