//! Source photo decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, Orientation, Raster, SourceImage};

/// Decode an uploaded photo (JPEG, PNG or WebP) into a [`SourceImage`].
///
/// The format is guessed from the bytes, not from `name`. EXIF orientation
/// is applied so that the raster is upright. Any alpha channel is dropped.
///
/// # Errors
///
/// Returns `DecodeError::EmptyInput` for an empty buffer,
/// `DecodeError::InvalidFormat` when the format cannot be recognized and
/// `DecodeError::CorruptedFile` when decoding fails part way.
pub fn decode_source(
    index: usize,
    name: impl Into<String>,
    bytes: &[u8],
) -> Result<SourceImage, DecodeError> {
    let raster = decode_raster(bytes)?;
    Ok(SourceImage::new(index, name, raster))
}

/// Decode image bytes into an upright RGB raster.
pub fn decode_raster(bytes: &[u8]) -> Result<Raster, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let raster = Raster::from_rgb_image(apply_orientation(img, orientation).into_rgb8());
    if raster.is_empty() {
        return Err(DecodeError::ZeroDimensions {
            width: raster.width,
            height: raster.height,
        });
    }

    log::debug!(
        "decoded {}x{} raster (orientation {:?})",
        raster.width,
        raster.height,
        orientation
    );
    Ok(raster)
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
