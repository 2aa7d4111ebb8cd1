//! Vitrine WASM - WebAssembly bindings for Vitrine
//!
//! This crate exposes the vitrine-core pipeline to the browser application.
//!
//! # Module Structure
//!
//! - `process` - Batch processing, grouping and preview bindings
//! - `types` - camelCase views of artifacts, failures and targets
//! - `logger` - Routes the core crate's `log` output to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { process_images, compressed_image_uris } from '@vitrine/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const sets = process_images(bytes, names, undefined, undefined);
//! for (const artifact of sets[0].artifacts) {
//!   console.log(`${artifact.fileName}: ${artifact.sizeBytes} bytes`);
//! }
//! ```

use wasm_bindgen::prelude::*;

mod logger;
mod process;
mod types;

pub use process::{compressed_image_uris, default_targets, group_artifact_sets, process_images};
pub use types::{ArtifactSetView, ArtifactView, FailureView, FavoriteView, JsStrategy, TargetView};

/// Initialize the WASM module (called automatically on load).
///
/// Installs the console logger at `info` level.
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Change how much of the pipeline's logging reaches the console.
///
/// Accepts `"off"`, `"error"`, `"warn"`, `"info"`, `"debug"` or `"trace"`;
/// anything else means `"info"`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logger::install(logger::parse_level(level));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
