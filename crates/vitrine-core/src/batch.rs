//! Batch orchestration: every source against every target.
//!
//! For N sources and M targets the orchestrator runs N x M independent
//! units (composite, then encode within the byte budget). Units fan out
//! over rayon when the `parallel` feature is enabled; results are always
//! reassembled in input order, sources outer and targets inner, so a given
//! (source index, target) pair maps to the same artifact on every run.
//!
//! A failing unit is recorded as a [`UnitFailure`] in its source's set and
//! never aborts the rest of the batch.

use serde::{Deserialize, Serialize};

use crate::composite::{composite, Strategy};
use crate::config::PipelineConfig;
use crate::decode::{decode_source, SourceImage};
use crate::encode::{encode_within_budget, OutputFormat};
use crate::error::PipelineError;
use crate::{datauri, parallel_map};

/// One requested output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSpec {
    pub width: u32,
    pub height: u32,
    pub strategy: Strategy,
}

impl TargetSpec {
    /// A `width x height` frame fitted with `strategy`.
    pub fn new(width: u32, height: u32, strategy: Strategy) -> Self {
        Self {
            width,
            height,
            strategy,
        }
    }

    /// Storefront catalog frame: cover-crop, fixed framing.
    pub fn catalog(width: u32, height: u32) -> Self {
        Self::new(width, height, Strategy::CoverCrop)
    }

    /// ERP hero frame: blur-pad, whole product visible.
    pub fn hero(width: u32, height: u32) -> Self {
        Self::new(width, height, Strategy::BlurPad)
    }

    /// `(width, height)` of the frame.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// The storefront's standard outputs: a 2000x2000 hero and a 1300x2000
/// catalog image.
pub fn default_targets() -> Vec<TargetSpec> {
    vec![TargetSpec::hero(2000, 2000), TargetSpec::catalog(1300, 2000)]
}

/// One named, size-bounded encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub source_index: usize,
    pub strategy: Strategy,
    /// JPEG quality used, `None` for lossless output.
    pub quality: Option<u8>,
    /// False when the encoder had to give up at its quality floor.
    pub within_budget: bool,
}

impl Artifact {
    /// Encoded payload size; this is what the byte budget bounds.
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// `data:{mime};base64,...` URI carrying exactly `bytes`.
    pub fn data_uri(&self) -> String {
        datauri::to_data_uri(self.format.mime_type(), &self.bytes)
    }
}

/// A unit that produced no artifact.
#[derive(Debug, Clone)]
pub struct UnitFailure {
    pub source_index: usize,
    /// `None` when the source itself could not be decoded.
    pub target: Option<TargetSpec>,
    pub error: PipelineError,
}

/// Artifacts grouped by source.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    /// Source filename, or a group label for aggregated sets.
    pub name: String,
    /// Indices of every source that contributed.
    pub source_indices: Vec<usize>,
    /// Successful artifacts in target order.
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<UnitFailure>,
}

impl ArtifactSet {
    fn for_source(source: &SourceImage) -> Self {
        Self {
            name: source.name.clone(),
            source_indices: vec![source.index],
            ..Self::default()
        }
    }

    fn failed_decode(index: usize, name: &str, error: PipelineError) -> Self {
        Self {
            name: name.to_string(),
            source_indices: vec![index],
            artifacts: Vec::new(),
            failures: vec![UnitFailure {
                source_index: index,
                target: None,
                error,
            }],
        }
    }

    /// True when no unit failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The artifact with the given dimensions, if one was produced.
    pub fn artifact(&self, width: u32, height: u32) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|a| a.width == width && a.height == height)
    }
}

/// Run every (source, target) unit and group the results per source.
///
/// Sets come back in source order, artifacts within a set in target order.
///
/// # Errors
///
/// Fails the whole call only for caller bugs: an invalid configuration or
/// a target with a zero dimension. Everything else is reported per unit.
pub fn process(
    sources: &[SourceImage],
    specs: &[TargetSpec],
    config: &PipelineConfig,
) -> Result<Vec<ArtifactSet>, PipelineError> {
    config.validate()?;
    for spec in specs {
        spec.validate()?;
    }

    let units: Vec<(&SourceImage, &TargetSpec)> = sources
        .iter()
        .flat_map(|source| specs.iter().map(move |spec| (source, spec)))
        .collect();

    log::debug!(
        "processing {} sources x {} targets = {} units",
        sources.len(),
        specs.len(),
        units.len()
    );

    let mut results = parallel_map(units, |(source, spec)| process_unit(source, spec, config))
        .into_iter();

    let sets = sources
        .iter()
        .map(|source| collect_set(source, specs, results.by_ref()))
        .collect();

    Ok(sets)
}

/// Decode `(name, bytes)` uploads and run every target against each.
///
/// Indices follow input order. A file that fails to decode gets a set with
/// a single failure whose `target` is `None`; the other files are processed
/// normally. Each file is decoded, processed and released within one task,
/// so at most one decoded raster per worker is alive at a time. The sets
/// are the same as [`process`] would return for the decoded sources.
pub fn process_files<N, B>(
    files: &[(N, B)],
    specs: &[TargetSpec],
    config: &PipelineConfig,
) -> Result<Vec<ArtifactSet>, PipelineError>
where
    N: AsRef<str> + Sync,
    B: AsRef<[u8]> + Sync,
{
    config.validate()?;
    for spec in specs {
        spec.validate()?;
    }

    log::debug!("processing {} files x {} targets", files.len(), specs.len());

    Ok(parallel_map(
        files.iter().enumerate().collect(),
        |(index, (name, bytes))| {
            let source = match decode_source(index, name.as_ref(), bytes.as_ref()) {
                Ok(source) => source,
                Err(err) => {
                    log::warn!("could not decode {} ({}): {}", index, name.as_ref(), err);
                    return ArtifactSet::failed_decode(index, name.as_ref(), err.into());
                }
            };
            let results = specs.iter().map(|spec| process_unit(&source, spec, config));
            collect_set(&source, specs, results)
        },
    ))
}

/// Gather one source's unit results, in target order, into its set.
///
/// `results` is consumed only as far as `specs` reaches, so a shared
/// iterator can be handed to one source after another.
fn collect_set(
    source: &SourceImage,
    specs: &[TargetSpec],
    results: impl Iterator<Item = Result<Artifact, PipelineError>>,
) -> ArtifactSet {
    let mut set = ArtifactSet::for_source(source);
    for (spec, result) in specs.iter().zip(results) {
        match result {
            Ok(artifact) => set.artifacts.push(artifact),
            Err(error) => {
                log::warn!(
                    "source {} ({}) failed for {}x{}: {}",
                    source.index,
                    source.name,
                    spec.width,
                    spec.height,
                    error
                );
                set.failures.push(UnitFailure {
                    source_index: source.index,
                    target: Some(*spec),
                    error,
                });
            }
        }
    }
    set
}

/// Produce the artifact for one (source, target) pair.
///
/// Used by [`process`] and directly by callers re-processing a single pair.
pub fn process_unit(
    source: &SourceImage,
    spec: &TargetSpec,
    config: &PipelineConfig,
) -> Result<Artifact, PipelineError> {
    let raster = composite(
        &source.raster,
        spec.width,
        spec.height,
        spec.strategy,
        &config.composite,
    )?;
    let encoded = encode_within_budget(&raster, config.byte_budget, &config.encoder)?;

    log::debug!(
        "source {} -> {}x{} {:?}: {} bytes as {:?} (quality {:?})",
        source.index,
        spec.width,
        spec.height,
        spec.strategy,
        encoded.size_bytes(),
        encoded.format,
        encoded.quality
    );

    Ok(Artifact {
        file_name: artifact_file_name(spec.width, spec.height, &source.name, encoded.format),
        format: encoded.format,
        width: spec.width,
        height: spec.height,
        source_index: source.index,
        strategy: spec.strategy,
        quality: encoded.quality,
        within_budget: encoded.within_budget,
        bytes: encoded.bytes,
    })
}

/// `processed_{width}x{height}_{stem}.{ext}`.
///
/// `stem` is the last path component of `source_name` without its final
/// extension, with characters that are not allowed in file names replaced
/// by `_`. The extension follows the encoded format.
pub fn artifact_file_name(
    width: u32,
    height: u32,
    source_name: &str,
    format: OutputFormat,
) -> String {
    format!(
        "processed_{}x{}_{}.{}",
        width,
        height,
        sanitized_stem(source_name),
        format.extension()
    )
}

fn sanitized_stem(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };

    let cleaned: String = stem
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.trim().is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
