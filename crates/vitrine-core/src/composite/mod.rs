//! Geometric compositing: fit a source photo into an exact target frame.
//!
//! Two strategies are available and the caller picks one per target:
//!
//! - [`Strategy::CoverCrop`] fills the frame by cropping a centered region
//!   with the target's aspect ratio. Catalog images use this for uniform
//!   framing; content at the edges may be lost.
//! - [`Strategy::BlurPad`] draws the whole source with a contain fit over a
//!   blurred cover-fitted copy of itself. Hero images use this so the
//!   product is never cropped and the padding matches the photo.
//!
//! Whatever the strategy, the output is exactly `width x height`.

mod blur_pad;
mod cover;

pub use blur_pad::{contain_placement, Placement};
pub use cover::{cover_crop_rect, crop, CropRect};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{FilterType, Raster};

/// Errors that can occur while compositing.
#[derive(Debug, Clone, Error)]
pub enum CompositeError {
    /// Target or source has a zero dimension.
    #[error(
        "Invalid dimensions: target {target_width}x{target_height}, source {source_width}x{source_height}"
    )]
    InvalidDimensions {
        target_width: u32,
        target_height: u32,
        source_width: u32,
        source_height: u32,
    },

    /// Pixel buffer length does not match the raster's dimensions.
    #[error("Malformed raster: expected {expected} bytes, got {actual}")]
    MalformedRaster { expected: usize, actual: usize },
}

/// How a source is fitted into its target frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Crop a centered region with the target aspect ratio, then scale.
    CoverCrop,
    /// Contain-fit the whole source over a blurred cover-fitted backdrop.
    BlurPad,
}

/// Tunables for [`composite`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompositeOptions {
    /// Filter for the sharp layers (the cover crop and the blur-pad foreground).
    pub filter: FilterType,
    /// Gaussian sigma of the background blur, in output pixels.
    pub blur_sigma: f32,
    /// The background is blurred at `1 / blur_downscale` of the frame size.
    pub blur_downscale: u32,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
            blur_sigma: 24.0,
            blur_downscale: 4,
        }
    }
}

/// Fit `source` into a `width x height` frame using `strategy`.
///
/// # Errors
///
/// `CompositeError::InvalidDimensions` when the target or source has a zero
/// dimension, `CompositeError::MalformedRaster` when the source buffer does
/// not match its dimensions.
pub fn composite(
    source: &Raster,
    width: u32,
    height: u32,
    strategy: Strategy,
    options: &CompositeOptions,
) -> Result<Raster, CompositeError> {
    if width == 0 || height == 0 || source.width == 0 || source.height == 0 {
        return Err(CompositeError::InvalidDimensions {
            target_width: width,
            target_height: height,
            source_width: source.width,
            source_height: source.height,
        });
    }

    let expected = source.pixel_count() as usize * 3;
    if source.pixels.len() != expected {
        return Err(CompositeError::MalformedRaster {
            expected,
            actual: source.pixels.len(),
        });
    }

    let output = match strategy {
        Strategy::CoverCrop => cover::cover_crop(source, width, height, options)?,
        Strategy::BlurPad => blur_pad::blur_pad(source, width, height, options)?,
    };

    debug_assert_eq!((output.width, output.height), (width, height));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Blue frame with a red block around the center.
    fn marked_image(width: u32, height: u32, block: u32) -> Raster {
        let (cx, cy) = (width / 2, height / 2);
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                if x.abs_diff(cx) < block && y.abs_diff(cy) < block {
                    pixels.extend_from_slice(&[255, 0, 0]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 255]);
                }
            }
        }
        Raster::new(width, height, pixels)
    }

    fn is_red(rgb: [u8; 3]) -> bool {
        rgb[0] > 200 && rgb[2] < 55
    }

    #[test]
    fn test_zero_target_is_invalid() {
        let src = Raster::filled(10, 10, [0, 0, 0]);
        for (w, h) in [(0, 10), (10, 0), (0, 0)] {
            let result = composite(&src, w, h, Strategy::CoverCrop, &CompositeOptions::default());
            assert!(matches!(
                result,
                Err(CompositeError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_empty_source_is_invalid() {
        let src = Raster::new(0, 0, vec![]);
        let result = composite(&src, 10, 10, Strategy::BlurPad, &CompositeOptions::default());
        assert!(matches!(
            result,
            Err(CompositeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_malformed_source_is_rejected() {
        let src = Raster {
            width: 10,
            height: 10,
            pixels: vec![0u8; 10],
        };
        let result = composite(&src, 5, 5, Strategy::CoverCrop, &CompositeOptions::default());
        assert!(matches!(
            result,
            Err(CompositeError::MalformedRaster {
                expected: 300,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_cover_crop_keeps_center_wider_source() {
        // Same aspect ratios as 1800x1200 into 1300x2000, at a tenth of the size
        let src = marked_image(180, 120, 6);
        let out = composite(&src, 130, 200, Strategy::CoverCrop, &CompositeOptions::default())
            .unwrap();

        assert_eq!((out.width, out.height), (130, 200));
        assert!(is_red(out.pixel(65, 100).unwrap()));
        assert!(!is_red(out.pixel(2, 2).unwrap()));
    }

    #[test]
    fn test_cover_crop_keeps_center_taller_source() {
        let src = marked_image(120, 400, 6);
        let out = composite(&src, 130, 200, Strategy::CoverCrop, &CompositeOptions::default())
            .unwrap();

        assert_eq!((out.width, out.height), (130, 200));
        assert!(is_red(out.pixel(65, 100).unwrap()));
        assert!(!is_red(out.pixel(65, 2).unwrap()));
    }

    #[test]
    fn test_blur_pad_keeps_whole_subject() {
        // Tall source: sharp foreground is centered, padding on both sides
        let src = marked_image(60, 120, 4);
        let out = composite(&src, 200, 200, Strategy::BlurPad, &CompositeOptions::default())
            .unwrap();

        assert_eq!((out.width, out.height), (200, 200));
        assert!(is_red(out.pixel(100, 100).unwrap()));
        // Top row of the foreground is the source's blue border
        assert_eq!(out.pixel(100, 0).map(|p| p[2] > 200), Some(true));
    }

    #[test]
    fn test_strategies_differ_for_mismatched_aspect() {
        let src = marked_image(90, 30, 3);
        let options = CompositeOptions::default();
        let crop = composite(&src, 60, 60, Strategy::CoverCrop, &options).unwrap();
        let pad = composite(&src, 60, 60, Strategy::BlurPad, &options).unwrap();
        assert_ne!(crop, pad);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::{
        composite, contain_placement, cover_crop_rect, CompositeOptions, Raster,
        Strategy as Fit,
    };
    use proptest::prelude::*;

    fn fit_strategy() -> impl Strategy<Value = Fit> {
        prop_oneof![Just(Fit::CoverCrop), Just(Fit::BlurPad)]
    }

    fn noise(width: u32, height: u32) -> Raster {
        let pixels = (0..(width * height * 3) as usize)
            .map(|i| ((i * 37) % 256) as u8)
            .collect();
        Raster::new(width, height, pixels)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// Property: output dimensions always equal the target.
        #[test]
        fn prop_output_matches_target(
            (src_w, src_h) in (1u32..=60, 1u32..=60),
            (width, height) in (1u32..=60, 1u32..=60),
            strategy in fit_strategy(),
        ) {
            let src = noise(src_w, src_h);
            let out = composite(&src, width, height, strategy, &CompositeOptions::default()).unwrap();

            prop_assert_eq!((out.width, out.height), (width, height));
            prop_assert_eq!(out.pixels.len(), (width * height * 3) as usize);
        }

        /// Property: the crop rect is centered and has the target aspect.
        #[test]
        fn prop_crop_rect_centered(
            (src_w, src_h) in (1u32..=4000, 1u32..=4000),
            (width, height) in (1u32..=2000, 1u32..=2000),
        ) {
            let rect = cover_crop_rect(src_w, src_h, width, height);
            let (cx, cy) = rect.center();

            prop_assert!(rect.x + rect.width <= src_w);
            prop_assert!(rect.y + rect.height <= src_h);
            prop_assert!((cx - src_w as f64 / 2.0).abs() <= 0.5);
            prop_assert!((cy - src_h as f64 / 2.0).abs() <= 0.5);
            prop_assert!(rect.width == src_w || rect.height == src_h);
        }

        /// Property: a contain fit always lies inside the frame.
        #[test]
        fn prop_contain_inside_frame(
            (src_w, src_h) in (1u32..=4000, 1u32..=4000),
            (width, height) in (1u32..=2000, 1u32..=2000),
        ) {
            let p = contain_placement(src_w, src_h, width, height);
            prop_assert!(p.x >= 0 && p.y >= 0);
            prop_assert!(p.x as u32 + p.width <= width);
            prop_assert!(p.y as u32 + p.height <= height);
            prop_assert!(p.width == width || p.height == height);
        }
    }
}
