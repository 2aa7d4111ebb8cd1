//! JavaScript-facing views of the pipeline's results.
//!
//! Core types carry raw bytes and Rust enums; these views carry data URIs
//! and camelCase fields so the browser can use them directly. Views also
//! come back from JavaScript when the UI asks for a group, so every view
//! can be converted back into its core counterpart.

use serde::{Deserialize, Serialize};
use vitrine_core::datauri;
use vitrine_core::{
    Artifact, ArtifactSet, Favorites, OutputFormat, Strategy, TargetSpec, UnitFailure,
};

/// Compositing strategy as spelled in JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JsStrategy {
    CoverCrop,
    BlurPad,
}

impl From<Strategy> for JsStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::CoverCrop => JsStrategy::CoverCrop,
            Strategy::BlurPad => JsStrategy::BlurPad,
        }
    }
}

impl From<JsStrategy> for Strategy {
    fn from(strategy: JsStrategy) -> Self {
        match strategy {
            JsStrategy::CoverCrop => Strategy::CoverCrop,
            JsStrategy::BlurPad => Strategy::BlurPad,
        }
    }
}

/// `{ width, height, strategy }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetView {
    pub width: u32,
    pub height: u32,
    pub strategy: JsStrategy,
}

impl From<TargetSpec> for TargetView {
    fn from(spec: TargetSpec) -> Self {
        Self {
            width: spec.width,
            height: spec.height,
            strategy: spec.strategy.into(),
        }
    }
}

impl From<TargetView> for TargetSpec {
    fn from(view: TargetView) -> Self {
        TargetSpec::new(view.width, view.height, view.strategy.into())
    }
}

/// One artifact, ready for an `<img src>` or a download link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactView {
    pub file_name: String,
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
    pub source_index: usize,
    pub strategy: JsStrategy,
    pub quality: Option<u8>,
    pub within_budget: bool,
}

impl From<&Artifact> for ArtifactView {
    fn from(artifact: &Artifact) -> Self {
        Self {
            file_name: artifact.file_name.clone(),
            data_uri: artifact.data_uri(),
            width: artifact.width,
            height: artifact.height,
            size_bytes: artifact.size_bytes(),
            source_index: artifact.source_index,
            strategy: artifact.strategy.into(),
            quality: artifact.quality,
            within_budget: artifact.within_budget,
        }
    }
}

impl TryFrom<ArtifactView> for Artifact {
    type Error = String;

    fn try_from(view: ArtifactView) -> Result<Self, Self::Error> {
        let format = match datauri::mime_type(&view.data_uri) {
            Some(mime) if mime == OutputFormat::Jpeg.mime_type() => OutputFormat::Jpeg,
            Some(mime) if mime == OutputFormat::Png.mime_type() => OutputFormat::Png,
            other => {
                return Err(format!(
                    "Unsupported artifact type {:?} in {}",
                    other, view.file_name
                ))
            }
        };
        let bytes = datauri::decode_payload(&view.data_uri)
            .ok_or_else(|| format!("Invalid data URI in {}", view.file_name))?;

        Ok(Artifact {
            file_name: view.file_name,
            format,
            bytes,
            width: view.width,
            height: view.height,
            source_index: view.source_index,
            strategy: view.strategy.into(),
            quality: view.quality,
            within_budget: view.within_budget,
        })
    }
}

/// A unit that produced nothing. `target` is absent for undecodable files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureView {
    pub source_index: usize,
    pub target: Option<TargetView>,
    pub message: String,
}

impl From<&UnitFailure> for FailureView {
    fn from(failure: &UnitFailure) -> Self {
        Self {
            source_index: failure.source_index,
            target: failure.target.map(TargetView::from),
            message: failure.error.to_string(),
        }
    }
}

/// Artifacts and failures of one source, or of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSetView {
    pub name: String,
    pub source_indices: Vec<usize>,
    pub artifacts: Vec<ArtifactView>,
    pub failures: Vec<FailureView>,
}

impl From<&ArtifactSet> for ArtifactSetView {
    fn from(set: &ArtifactSet) -> Self {
        Self {
            name: set.name.clone(),
            source_indices: set.source_indices.clone(),
            artifacts: set.artifacts.iter().map(ArtifactView::from).collect(),
            failures: set.failures.iter().map(FailureView::from).collect(),
        }
    }
}

/// `{ width, height, sourceIndex }`: the source picked for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteView {
    pub width: u32,
    pub height: u32,
    pub source_index: usize,
}

pub(crate) fn favorites_from_views(views: &[FavoriteView]) -> Favorites {
    views
        .iter()
        .map(|f| ((f.width, f.height), f.source_index))
        .collect()
}
