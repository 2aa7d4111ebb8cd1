//! Pipeline bindings: batches, groups and previews.
//!
//! # Functions
//!
//! - [`process_images`] - Run every upload against every target
//! - [`group_artifact_sets`] - Collapse per-source sets into one product group
//! - [`compressed_image_uris`] - Small JPEG previews for the content service
//! - [`default_targets`] - The storefront's standard target list
//!
//! # Example
//!
//! ```typescript
//! import { process_images, group_artifact_sets } from '@vitrine/wasm';
//!
//! const bytes = await Promise.all(files.map(async f => new Uint8Array(await f.arrayBuffer())));
//! const sets = process_images(bytes, files.map(f => f.name), undefined, undefined);
//! const group = group_artifact_sets(sets, [{ width: 2000, height: 2000, sourceIndex: 1 }]);
//! ```

use js_sys::Uint8Array;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::types::{favorites_from_views, ArtifactSetView, FavoriteView, TargetView};
use vitrine_core::{
    decode_source, group_sets, preview_uris, process_files, Artifact, ArtifactSet,
    PipelineConfig, PipelineError, PreviewConfig, TargetSpec, DEFAULT_GROUP_NAME,
};

/// Process uploads against a target list.
///
/// # Arguments
///
/// * `files` - Raw file bytes, one `Uint8Array` per upload
/// * `names` - Original filenames, same order as `files`
/// * `specs` - Array of `{ width, height, strategy: "coverCrop" | "blurPad" }`;
///   `undefined` uses [`default_targets`]
/// * `config` - Partial pipeline configuration with camelCase keys, e.g.
///   `{ byteBudget, encoder: { startQuality, candidates: ["jpeg"] } }`;
///   `undefined` uses the defaults
///
/// # Returns
///
/// One set per upload, in upload order:
/// `{ name, sourceIndices, artifacts: [...], failures: [...] }`.
/// A file that cannot be decoded or a target that fails is reported in
/// `failures` and does not affect the others.
///
/// # Errors
///
/// Returns an error if the arguments cannot be deserialized, `names` and
/// `files` differ in length, the config is invalid or a target has a zero
/// dimension.
#[wasm_bindgen]
pub fn process_images(
    files: Vec<Uint8Array>,
    names: Vec<String>,
    specs: JsValue,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    if files.len() != names.len() {
        return Err(JsValue::from_str(&format!(
            "Expected one name per file: got {} files and {} names",
            files.len(),
            names.len()
        )));
    }

    let specs: Vec<TargetView> = match optional_from_js(specs, "target list")? {
        Some(specs) => specs,
        None => vitrine_core::default_targets()
            .into_iter()
            .map(TargetView::from)
            .collect(),
    };
    let config: PipelineConfig = optional_from_js(config, "pipeline config")?.unwrap_or_default();

    let uploads: Vec<(String, Vec<u8>)> = names
        .into_iter()
        .zip(files.iter().map(Uint8Array::to_vec))
        .collect();

    let sets = run_batch(&uploads, specs, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&sets)
}

/// Merge sets returned by [`process_images`] into one group.
///
/// For each output dimension the artifact of the favorite source is kept;
/// without a favorite the last source wins.
///
/// # Arguments
///
/// * `sets` - Sets exactly as returned by `process_images`
/// * `favorites` - Array of `{ width, height, sourceIndex }`, or `undefined`
/// * `name` - Group name, defaults to "Product group"
#[wasm_bindgen]
pub fn group_artifact_sets(
    sets: JsValue,
    favorites: JsValue,
    name: Option<String>,
) -> Result<JsValue, JsValue> {
    let sets: Vec<ArtifactSetView> = from_js(sets, "artifact sets")?;
    let favorites: Vec<FavoriteView> = optional_from_js(favorites, "favorites")?.unwrap_or_default();
    let name = name.as_deref().unwrap_or(DEFAULT_GROUP_NAME);

    let group = regroup(sets, &favorites, name).map_err(|e| JsValue::from_str(&e))?;
    to_js(&group)
}

/// Compressed previews of the given files as JPEG data URIs.
///
/// Each image is scaled so its longest edge is at most `config.maxEdge`
/// (default 512) and encoded once at `config.quality` (default 85).
///
/// # Errors
///
/// Fails on the first file that cannot be decoded or previewed.
#[wasm_bindgen]
pub fn compressed_image_uris(files: Vec<Uint8Array>, config: JsValue) -> Result<Vec<String>, JsValue> {
    let config: PreviewConfig = optional_from_js(config, "preview config")?.unwrap_or_default();
    let files: Vec<Vec<u8>> = files.iter().map(Uint8Array::to_vec).collect();
    compress_files(&files, &config).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The storefront's standard targets: a 2000x2000 blur-padded hero and a
/// 1300x2000 cover-cropped catalog image.
#[wasm_bindgen]
pub fn default_targets() -> Result<JsValue, JsValue> {
    let targets: Vec<TargetView> = vitrine_core::default_targets()
        .into_iter()
        .map(TargetView::from)
        .collect();
    to_js(&targets)
}

pub(crate) fn run_batch(
    uploads: &[(String, Vec<u8>)],
    specs: Vec<TargetView>,
    config: &PipelineConfig,
) -> Result<Vec<ArtifactSetView>, PipelineError> {
    let specs: Vec<TargetSpec> = specs.into_iter().map(TargetSpec::from).collect();
    let sets = process_files(uploads, &specs, config)?;
    Ok(sets.iter().map(ArtifactSetView::from).collect())
}

pub(crate) fn regroup(
    sets: Vec<ArtifactSetView>,
    favorites: &[FavoriteView],
    name: &str,
) -> Result<ArtifactSetView, String> {
    let mut failures = Vec::new();
    let mut core_sets = Vec::with_capacity(sets.len());

    for view in sets {
        failures.extend(view.failures);
        let artifacts = view
            .artifacts
            .into_iter()
            .map(Artifact::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        core_sets.push(ArtifactSet {
            name: view.name,
            source_indices: view.source_indices,
            artifacts,
            failures: Vec::new(),
        });
    }

    let group = group_sets(core_sets, &favorites_from_views(favorites), name);
    let mut view = ArtifactSetView::from(&group);
    // Failures only survive the JS round trip as messages
    view.failures = failures;
    Ok(view)
}

pub(crate) fn compress_files(
    files: &[Vec<u8>],
    config: &PreviewConfig,
) -> Result<Vec<String>, PipelineError> {
    let sources = files
        .iter()
        .enumerate()
        .map(|(index, bytes)| decode_source(index, format!("file-{}", index), bytes))
        .collect::<Result<Vec<_>, _>>()?;
    preview_uris(&sources, config)
}

fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

/// `undefined` and `null` mean "use the default".
fn optional_from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<Option<T>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    from_js(value, what).map(Some)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize result: {}", e)))
}
