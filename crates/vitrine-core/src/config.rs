//! Pipeline configuration.
//!
//! All settings are plain data with defaults matching the storefront's
//! requirements. Callers may deserialize partial configurations; missing
//! fields fall back to their defaults. Serialized keys are camelCase
//! (`byteBudget`, `maxEdge`) to match the browser's naming.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::composite::CompositeOptions;
use crate::encode::EncoderConfig;

/// Byte budget for catalog-class artifacts: 349 KiB.
pub const DEFAULT_BYTE_BUDGET: usize = 349 * 1024;

/// Longest edge of previews sent to the content service.
pub const DEFAULT_PREVIEW_EDGE: u32 = 512;

/// JPEG quality of previews.
pub const DEFAULT_PREVIEW_QUALITY: u8 = 85;

/// Configuration rejected by [`PipelineConfig::validate`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// `byte_budget` is zero.
    #[error("Byte budget must be greater than zero")]
    ZeroBudget,

    /// A JPEG quality setting is outside 1..=100.
    #[error("Quality {name} = {value} is outside 1..=100")]
    QualityOutOfRange { name: &'static str, value: u8 },

    /// The search would start below its own floor.
    #[error("Quality floor ({floor}) is above the start quality ({start})")]
    FloorAboveStart { floor: u8, start: u8 },

    /// A zero step would never leave the start quality.
    #[error("Quality step must be greater than zero")]
    ZeroQualityStep,

    /// The encoder has no format to try.
    #[error("At least one output format candidate is required")]
    NoCandidates,

    /// `blur_downscale` is zero.
    #[error("Blur downscale factor must be greater than zero")]
    ZeroBlurDownscale,

    /// `blur_sigma` is negative, infinite or NaN.
    #[error("Blur sigma must be a finite, non-negative number (got {0})")]
    InvalidBlurSigma(f32),

    /// Previews would have no pixels.
    #[error("Preview edge must be greater than zero")]
    ZeroPreviewEdge,
}

/// Settings for the preview downsampler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewConfig {
    /// Previews are scaled so their longest edge is at most this many pixels.
    pub max_edge: u32,
    /// Fixed JPEG quality (1-100).
    pub quality: u8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_edge: DEFAULT_PREVIEW_EDGE,
            quality: DEFAULT_PREVIEW_QUALITY,
        }
    }
}

/// Everything the batch orchestrator and preview downsampler need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Maximum encoded size of each artifact, in bytes. Advisory: the
    /// encoder returns its best effort when it cannot meet it.
    pub byte_budget: usize,
    pub encoder: EncoderConfig,
    pub composite: CompositeOptions,
    pub preview: PreviewConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            byte_budget: DEFAULT_BYTE_BUDGET,
            encoder: EncoderConfig::default(),
            composite: CompositeOptions::default(),
            preview: PreviewConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Check every field; the first problem found is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.byte_budget == 0 {
            return Err(ConfigError::ZeroBudget);
        }

        let encoder = &self.encoder;
        check_quality("startQuality", encoder.start_quality)?;
        check_quality("qualityFloor", encoder.quality_floor)?;
        if encoder.quality_floor > encoder.start_quality {
            return Err(ConfigError::FloorAboveStart {
                floor: encoder.quality_floor,
                start: encoder.start_quality,
            });
        }
        if encoder.quality_step == 0 {
            return Err(ConfigError::ZeroQualityStep);
        }
        if encoder.candidates.is_empty() {
            return Err(ConfigError::NoCandidates);
        }

        if self.composite.blur_downscale == 0 {
            return Err(ConfigError::ZeroBlurDownscale);
        }
        let sigma = self.composite.blur_sigma;
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(ConfigError::InvalidBlurSigma(sigma));
        }

        self.preview.validate()
    }
}

impl PreviewConfig {
    /// Check the edge and quality; used on its own by the preview path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_edge == 0 {
            return Err(ConfigError::ZeroPreviewEdge);
        }
        check_quality("preview quality", self.quality)
    }
}

fn check_quality(name: &'static str, value: u8) -> Result<(), ConfigError> {
    if (1..=100).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::QualityOutOfRange { name, value })
    }
}
