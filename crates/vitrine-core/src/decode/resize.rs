//! Raster resizing used by the compositor and the preview downsampler.
//!
//! All functions return new `Raster` instances without modifying the input.

use super::{FilterType, Raster};

/// Resize a raster to exact dimensions.
///
/// Returns `None` when a target dimension is zero or the source buffer does
/// not match its declared dimensions.
pub fn resize(image: &Raster, width: u32, height: u32, filter: FilterType) -> Option<Raster> {
    if width == 0 || height == 0 {
        return None;
    }

    if image.width == width && image.height == height {
        return Some(image.clone());
    }

    let rgb_image = image.to_rgb_image()?;
    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Some(Raster::from_rgb_image(resized))
}

/// Resize a raster so that its longest edge is at most `max_edge`.
///
/// Aspect ratio is preserved and images that already fit are returned
/// unchanged; this never upscales.
pub fn resize_to_fit(image: &Raster, max_edge: u32, filter: FilterType) -> Option<Raster> {
    if max_edge == 0 {
        return None;
    }

    let (new_width, new_height) = fit_within(image.width, image.height, max_edge);
    resize(image, new_width, new_height, filter)
}

/// Dimensions of `width x height` scaled by `min(1, max_edge / longest_edge)`.
///
/// Both results are rounded and at least 1.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let longest = width.max(height);
    if longest <= max_edge {
        return (width, height);
    }

    let scale = max_edge as f64 / longest as f64;
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_edge);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_edge);
    (new_width, new_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 3);
    }

    #[test]
    fn test_resize_upscale() {
        let img = create_test_image(50, 25);
        let resized = resize(&img, 130, 200, FilterType::Lanczos3).unwrap();

        assert_eq!(resized.width, 130);
        assert_eq!(resized.height, 200);
    }

    #[test]
    fn test_resize_zero_dimensions() {
        let img = create_test_image(100, 50);

        assert!(resize(&img, 0, 50, FilterType::Bilinear).is_none());
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_none());
    }

    #[test]
    fn test_resize_to_fit_landscape() {
        let img = create_test_image(1800, 1200);
        let resized = resize_to_fit(&img, 512, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 512);
        assert_eq!(resized.height, 341); // 1200 * (512/1800) = 341.3
    }

    #[test]
    fn test_resize_to_fit_portrait() {
        let img = create_test_image(1200, 1800);
        let resized = resize_to_fit(&img, 512, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 341);
        assert_eq!(resized.height, 512);
    }

    #[test]
    fn test_resize_to_fit_never_upscales() {
        let img = create_test_image(100, 50);
        let resized = resize_to_fit(&img, 512, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 100);
        assert_eq!(resized.height, 50);
    }

    #[test]
    fn test_resize_to_fit_zero_max_edge() {
        let img = create_test_image(100, 50);
        assert!(resize_to_fit(&img, 0, FilterType::Bilinear).is_none());
    }

    #[test]
    fn test_fit_within_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_within(10_000, 3, 512), (512, 1));
        assert_eq!(fit_within(3, 10_000, 512), (1, 512));
    }

    #[test]
    fn test_fit_within_zero_input() {
        assert_eq!(fit_within(0, 0, 256), (0, 0));
    }
}
