//! Compact previews for the content-generation service.
//!
//! Previews have a soft size goal rather than a hard budget: each source is
//! scaled down to a bounded longest edge and encoded once at a fixed JPEG
//! quality.

use crate::config::PreviewConfig;
use crate::datauri;
use crate::decode::{resize_to_fit, FilterType, SourceImage};
use crate::encode::{encode_jpeg, OutputFormat};
use crate::error::PipelineError;
use crate::parallel_map;

/// A small JPEG standing in for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactPreview {
    pub source_index: usize,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl CompactPreview {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn data_uri(&self) -> String {
        datauri::to_data_uri(OutputFormat::Jpeg.mime_type(), &self.bytes)
    }
}

/// One preview per source, in input order.
///
/// Sources are scaled by `min(1, max_edge / longest_edge)`, so small
/// sources keep their size. A source that cannot be previewed yields an
/// `Err` in its slot; an invalid config yields an `Err` in every slot.
pub fn downsample(
    sources: &[SourceImage],
    config: &PreviewConfig,
) -> Vec<Result<CompactPreview, PipelineError>> {
    if let Err(err) = config.validate() {
        return sources
            .iter()
            .map(|_| Err(PipelineError::from(err.clone())))
            .collect();
    }

    parallel_map(sources.iter().collect(), |source| preview_one(source, config))
}

/// Data URIs of every preview, failing on the first source that cannot be
/// previewed.
pub fn preview_uris(
    sources: &[SourceImage],
    config: &PreviewConfig,
) -> Result<Vec<String>, PipelineError> {
    downsample(sources, config)
        .into_iter()
        .map(|preview| preview.map(|p| p.data_uri()))
        .collect()
}

fn preview_one(source: &SourceImage, config: &PreviewConfig) -> Result<CompactPreview, PipelineError> {
    let raster = &source.raster;
    if raster.width == 0 || raster.height == 0 {
        return Err(PipelineError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        });
    }

    let expected = raster.pixel_count() as usize * 3;
    let malformed = PipelineError::MalformedRaster {
        expected,
        actual: raster.pixels.len(),
    };
    if raster.pixels.len() != expected {
        return Err(malformed);
    }

    let scaled = resize_to_fit(raster, config.max_edge, FilterType::Bilinear).ok_or(malformed)?;
    let (width, height) = (scaled.width, scaled.height);
    let bytes = encode_jpeg(&scaled.pixels, width, height, config.quality)?;

    log::debug!(
        "preview of source {}: {}x{} -> {}x{}, {} bytes",
        source.index,
        raster.width,
        raster.height,
        width,
        height,
        bytes.len()
    );

    Ok(CompactPreview {
        source_index: source.index,
        width,
        height,
        bytes,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::decode::Raster;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: previews never exceed the edge and never upscale.
        #[test]
        fn prop_preview_bounds(
            (width, height) in (1u32..=300, 1u32..=300),
            max_edge in 1u32..=128,
        ) {
            let src = SourceImage::new(0, "p.png", Raster::filled(width, height, [1, 2, 3]));
            let config = PreviewConfig { max_edge, quality: 85 };
            let preview = downsample(&[src], &config).remove(0).unwrap();

            prop_assert!(preview.width.max(preview.height) <= max_edge);
            prop_assert!(preview.width <= width && preview.height <= height);
            prop_assert!(preview.width >= 1 && preview.height >= 1);
        }
    }
}
