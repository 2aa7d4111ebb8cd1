//! Vitrine Core - Product photo pipeline
//!
//! This crate turns arbitrary product photographs into the fixed set of
//! standardized images a storefront and its ERP expect, plus small
//! previews for an external content-generation service.
//!
//! # Architecture
//!
//! Leaf first:
//!
//! - [`decode`]: upload bytes to an upright RGB [`Raster`]
//! - [`composite`]: fit a raster into an exact frame by cover-crop or blur-pad
//! - [`encode`]: encode a raster under a byte budget
//! - [`batch`]: every source against every [`TargetSpec`], grouped per source
//! - [`preview`]: bounded-edge, fixed-quality previews
//! - [`group`]: collapse several sources of one product into a single set
//!
//! The pipeline holds no state between calls. Per-unit failures are
//! reported alongside the successful artifacts and never abort a batch.

pub mod batch;
pub mod composite;
pub mod config;
pub mod datauri;
pub mod decode;
pub mod encode;
pub mod error;
pub mod group;
pub mod preview;

pub use batch::{
    artifact_file_name, default_targets, process, process_files, process_unit, Artifact,
    ArtifactSet, TargetSpec, UnitFailure,
};
pub use composite::{composite, CompositeOptions, Strategy};
pub use config::{ConfigError, PipelineConfig, PreviewConfig, DEFAULT_BYTE_BUDGET};
pub use decode::{decode_source, Raster, SourceImage};
pub use encode::{encode_within_budget, EncodedImage, EncoderConfig, OutputFormat};
pub use error::PipelineError;
pub use group::{group_sets, Favorites, DEFAULT_GROUP_NAME};
pub use preview::{downsample, preview_uris, CompactPreview};

/// Map `f` over `items`, in parallel when the `parallel` feature is on.
///
/// Output order always matches input order.
#[cfg(feature = "parallel")]
pub(crate) fn parallel_map<T, R, F>(items: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    use rayon::prelude::*;
    items.into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn parallel_map<T, R, F>(items: Vec<T>, f: F) -> Vec<R>
where
    F: Fn(T) -> R,
{
    items.into_iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_map_keeps_order() {
        let items: Vec<u32> = (0..500).collect();
        let doubled = parallel_map(items, |n| n * 2);
        assert_eq!(doubled.len(), 500);
        assert!(doubled.iter().enumerate().all(|(i, &n)| n == i as u32 * 2));
    }

    #[test]
    fn test_public_surface_end_to_end() {
        let source = SourceImage::new(0, "tee.png", Raster::filled(90, 60, [20, 40, 60]));
        let specs = [TargetSpec::hero(50, 50), TargetSpec::catalog(26, 40)];
        let sets = process(&[source], &specs, &PipelineConfig::default()).unwrap();

        let group = group_sets(sets, &Favorites::new(), DEFAULT_GROUP_NAME);
        assert_eq!(group.artifacts.len(), 2);
        assert_eq!(group.artifacts[0].file_name, "processed_50x50_tee.jpg");
        assert!(group.artifacts.iter().all(|a| a.size_bytes() <= DEFAULT_BYTE_BUDGET));
    }
}
