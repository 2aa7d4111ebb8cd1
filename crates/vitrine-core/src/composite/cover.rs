//! Cover-crop: fill the frame by cropping a centered region of the source.

use super::{CompositeError, CompositeOptions};
use crate::decode::{resize, Raster};

/// A pixel-aligned rectangle inside a source raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Center of the rectangle in source pixel coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }
}

/// Largest centered region of a `src_w x src_h` source that has the target's
/// aspect ratio.
///
/// A source wider than the target keeps its full height and loses columns
/// on both sides. Otherwise it keeps its full width and loses rows above and
/// below. Callers guarantee all dimensions are non-zero.
pub fn cover_crop_rect(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> CropRect {
    let target_aspect = target_w as f64 / target_h as f64;
    let source_aspect = src_w as f64 / src_h as f64;

    if source_aspect > target_aspect {
        let width = ((src_h as f64 * target_aspect).round() as u32).clamp(1, src_w);
        CropRect {
            x: (src_w - width) / 2,
            y: 0,
            width,
            height: src_h,
        }
    } else {
        let height = ((src_w as f64 / target_aspect).round() as u32).clamp(1, src_h);
        CropRect {
            x: 0,
            y: (src_h - height) / 2,
            width: src_w,
            height,
        }
    }
}

/// Copy the pixels inside `rect` into a new raster.
///
/// `rect` must lie inside `image`.
pub fn crop(image: &Raster, rect: CropRect) -> Raster {
    if rect.x == 0 && rect.y == 0 && rect.width == image.width && rect.height == image.height {
        return image.clone();
    }

    let src_stride = image.width as usize * 3;
    let row_len = rect.width as usize * 3;
    let mut output = Vec::with_capacity(row_len * rect.height as usize);

    for y in rect.y..rect.y + rect.height {
        let start = y as usize * src_stride + rect.x as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Raster::new(rect.width, rect.height, output)
}

pub(super) fn cover_crop(
    source: &Raster,
    width: u32,
    height: u32,
    options: &CompositeOptions,
) -> Result<Raster, CompositeError> {
    let rect = cover_crop_rect(source.width, source.height, width, height);
    log::trace!(
        "cover-crop {}x{} -> {:?} -> {}x{}",
        source.width,
        source.height,
        rect,
        width,
        height
    );

    let cropped = crop(source, rect);
    resize(&cropped, width, height, options.filter).ok_or(CompositeError::MalformedRaster {
        expected: cropped.pixel_count() as usize * 3,
        actual: cropped.pixels.len(),
    })
}
