//! Blur-pad: show the whole source over a blurred, cover-fitted copy of itself.

use image::imageops::{self, FilterType as ImageFilter};
use image::RgbImage;

use super::cover::{cover_crop_rect, crop};
use super::{CompositeError, CompositeOptions};
use crate::decode::{resize, FilterType, Raster};

/// Where a scaled copy of the source lands inside the target frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Contain fit: `scale = min(tw/sw, th/sh)`, centered, never clipped.
pub fn contain_placement(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> Placement {
    let scale = (target_w as f64 / src_w as f64).min(target_h as f64 / src_h as f64);
    let width = ((src_w as f64 * scale).round() as u32).clamp(1, target_w);
    let height = ((src_h as f64 * scale).round() as u32).clamp(1, target_h);
    Placement {
        x: ((target_w - width) / 2) as i64,
        y: ((target_h - height) / 2) as i64,
        width,
        height,
    }
}

pub(super) fn blur_pad(
    source: &Raster,
    width: u32,
    height: u32,
    options: &CompositeOptions,
) -> Result<Raster, CompositeError> {
    let malformed = || CompositeError::MalformedRaster {
        expected: source.pixel_count() as usize * 3,
        actual: source.pixels.len(),
    };

    let mut canvas = background(source, width, height, options).ok_or_else(malformed)?;

    let fg = contain_placement(source.width, source.height, width, height);
    let foreground = resize(source, fg.width, fg.height, options.filter)
        .and_then(Raster::into_rgb_image)
        .ok_or_else(malformed)?;
    imageops::replace(&mut canvas, &foreground, fg.x, fg.y);

    log::trace!(
        "blur-pad {}x{} -> foreground {:?} in {}x{}",
        source.width,
        source.height,
        fg,
        width,
        height
    );

    Ok(Raster::from_rgb_image(canvas))
}

/// Cover-fitted, blurred copy of the source filling the whole frame.
///
/// The blur runs on a copy reduced by `blur_downscale` with the sigma
/// scaled to match, then the result is stretched back to the frame. Only
/// the part of the source that stays visible after the cover fit is ever
/// scaled, so extreme aspect ratios cost no more than the window itself.
fn background(
    source: &Raster,
    width: u32,
    height: u32,
    options: &CompositeOptions,
) -> Option<RgbImage> {
    let factor = options.blur_downscale.max(1);
    let small_w = width.div_ceil(factor).max(1);
    let small_h = height.div_ceil(factor).max(1);

    let visible = cover_crop_rect(source.width, source.height, small_w, small_h);
    let window = crop(source, visible);
    let filled = resize(&window, small_w, small_h, FilterType::Bilinear)?.into_rgb_image()?;

    let sigma = options.blur_sigma / factor as f32;
    let blurred = if sigma > 0.0 {
        imageops::blur(&filled, sigma)
    } else {
        filled
    };

    if blurred.dimensions() == (width, height) {
        return Some(blurred);
    }
    Some(imageops::resize(&blurred, width, height, ImageFilter::Triangle))
}
