//! Image decoding for uploaded product photos.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and WebP uploads into RGB rasters
//! - Applying EXIF orientation so phone photos come out upright
//! - Resizing rasters for compositing and previews
//!
//! # Architecture
//!
//! Every source is decoded exactly once at the start of a batch. The
//! resulting [`SourceImage`] is then only borrowed by the compositor.

mod resize;
mod source;
mod types;

pub use resize::{fit_within, resize, resize_to_fit};
pub use source::{decode_raster, decode_source, get_orientation};
pub use types::{DecodeError, FilterType, Orientation, Raster, SourceImage};
