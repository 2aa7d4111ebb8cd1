//! Pipeline-level error type.

use thiserror::Error;

use crate::composite::CompositeError;
use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Any failure the pipeline can report.
///
/// Per-unit failures (decode, composite, encode) are captured in
/// [`UnitFailure`](crate::UnitFailure)s and never abort a batch.
/// `InvalidDimensions` in a target list and `Config` errors are caller bugs
/// and fail the whole call.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Source bytes are not a valid raster.
    #[error("Decode failure: {0}")]
    Decode(#[from] DecodeError),

    /// A target or source has a zero dimension.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A raster's pixel buffer does not match its dimensions.
    #[error("Malformed raster: expected {expected} bytes, got {actual}")]
    MalformedRaster { expected: usize, actual: usize },

    /// The encoder failed.
    #[error("Encode failure: {0}")]
    Encode(#[from] EncodeError),

    /// The configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl From<CompositeError> for PipelineError {
    fn from(err: CompositeError) -> Self {
        match err {
            CompositeError::InvalidDimensions {
                target_width,
                target_height,
                source_width,
                source_height,
            } => {
                if target_width == 0 || target_height == 0 {
                    PipelineError::InvalidDimensions {
                        width: target_width,
                        height: target_height,
                    }
                } else {
                    PipelineError::InvalidDimensions {
                        width: source_width,
                        height: source_height,
                    }
                }
            }
            CompositeError::MalformedRaster { expected, actual } => {
                PipelineError::MalformedRaster { expected, actual }
            }
        }
    }
}
