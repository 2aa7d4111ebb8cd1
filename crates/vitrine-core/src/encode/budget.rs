//! Size-constrained encoding.
//!
//! Each configured candidate format is encoded once. JPEG walks quality
//! down from `start_quality` in `quality_step` decrements until the output
//! fits the byte budget or the floor is reached. PNG is encoded losslessly.
//! The smallest candidate that fits wins; if none fits, the smallest
//! overall is returned with `within_budget = false`.

use super::{encode_jpeg, encode_png, EncodeError, EncodedImage, EncoderConfig, OutputFormat};
use crate::decode::Raster;

/// Encode `raster` so that its payload is at most `budget` bytes when possible.
///
/// Missing the budget is not an error: the best attempt is returned with
/// `within_budget` unset.
///
/// # Errors
///
/// Returns an error only when the underlying encoder fails, the raster is
/// malformed or the candidate list is empty.
pub fn encode_within_budget(
    raster: &Raster,
    budget: usize,
    config: &EncoderConfig,
) -> Result<EncodedImage, EncodeError> {
    let mut attempts = Vec::with_capacity(config.candidates.len());
    for format in &config.candidates {
        let attempt = match format {
            OutputFormat::Jpeg => search_jpeg_quality(raster, budget, config)?,
            OutputFormat::Png => {
                let bytes = encode_png(&raster.pixels, raster.width, raster.height)?;
                EncodedImage {
                    format: OutputFormat::Png,
                    quality: None,
                    within_budget: bytes.len() <= budget,
                    bytes,
                }
            }
        };
        log::trace!(
            "{:?} candidate: {} bytes (budget {})",
            attempt.format,
            attempt.size_bytes(),
            budget
        );
        attempts.push(attempt);
    }

    let chosen = select_candidate(attempts).ok_or(EncodeError::NoCandidates)?;
    if !chosen.within_budget {
        log::warn!(
            "budget of {} bytes missed for {}x{}: best was {} bytes as {:?} (quality {:?})",
            budget,
            raster.width,
            raster.height,
            chosen.size_bytes(),
            chosen.format,
            chosen.quality
        );
    }
    Ok(chosen)
}

/// Lower JPEG quality step by step until the output fits or the floor is hit.
pub fn search_jpeg_quality(
    raster: &Raster,
    budget: usize,
    config: &EncoderConfig,
) -> Result<EncodedImage, EncodeError> {
    let floor = config.quality_floor.clamp(1, 100);
    let step = config.quality_step.max(1);
    let mut quality = config.start_quality.clamp(floor, 100);

    let mut bytes = encode_jpeg(&raster.pixels, raster.width, raster.height, quality)?;
    while bytes.len() > budget && quality > floor {
        quality = quality.saturating_sub(step).max(floor);
        bytes = encode_jpeg(&raster.pixels, raster.width, raster.height, quality)?;
        log::trace!("jpeg quality {} -> {} bytes", quality, bytes.len());
    }

    Ok(EncodedImage {
        format: OutputFormat::Jpeg,
        quality: Some(quality),
        within_budget: bytes.len() <= budget,
        bytes,
    })
}

/// Smallest attempt that fits, else smallest overall. Ties go to the
/// earlier candidate.
fn select_candidate(attempts: Vec<EncodedImage>) -> Option<EncodedImage> {
    let (fitting, over): (Vec<_>, Vec<_>) = attempts.into_iter().partition(|a| a.within_budget);
    fitting
        .into_iter()
        .min_by_key(EncodedImage::size_bytes)
        .or_else(|| over.into_iter().min_by_key(EncodedImage::size_bytes))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn noisy(width: u32, height: u32, seed: u32) -> Raster {
        let mut state = seed | 1;
        let pixels = (0..(width * height * 3) as usize)
            .map(|i| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                ((i as u32 / 3 % width) * 2 + (state >> 27)).min(255) as u8
            })
            .collect();
        Raster::new(width, height, pixels)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Property: lowering quality along the search path never grows the output.
        #[test]
        fn prop_quality_steps_are_monotonic(
            (width, height) in (32u32..=96, 32u32..=96),
            seed in any::<u32>(),
        ) {
            let img = noisy(width, height, seed);
            let mut previous = usize::MAX;
            for quality in (10u8..=95).rev().step_by(5) {
                let size = encode_jpeg(&img.pixels, width, height, quality).unwrap().len();
                prop_assert!(size <= previous, "quality {} grew to {} from {}", quality, size, previous);
                previous = size;
            }
        }

        /// Property: the result fits whenever the floor encoding fits.
        #[test]
        fn prop_budget_met_above_floor_size(
            (width, height) in (16u32..=64, 16u32..=64),
            seed in any::<u32>(),
            slack in 0usize..4096,
        ) {
            let img = noisy(width, height, seed);
            let floor_size = encode_jpeg(&img.pixels, width, height, 10).unwrap().len();
            let budget = floor_size + slack;

            let out = encode_within_budget(&img, budget, &EncoderConfig::default()).unwrap();
            prop_assert!(out.within_budget);
            prop_assert!(out.size_bytes() <= budget);
        }
    }
}
