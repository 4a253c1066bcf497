pub mod aiff;
pub mod dsp;
pub mod error;
pub mod preset;

pub use crate::aiff::{encode_aiff, write_aiff};
pub use crate::dsp::renderer::{render, render_with, RenderOptions, DEFAULT_SAMPLE_RATE};
pub use crate::dsp::sequence::generate_sequence;
pub use crate::dsp::tone::generate_tone;
pub use crate::error::{Result, SynthError};
pub use crate::preset::{Harmonic, Note, Preset, PresetLibrary, SequencePreset, TonePreset};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the sand-notify core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Parse `library_json`, or fall back to the bundled presets when it is empty.
fn load_library(library_json: &str) -> Result<PresetLibrary> {
    if library_json.trim().is_empty() {
        PresetLibrary::builtin()
    } else {
        PresetLibrary::from_json_str(library_json)
    }
}

fn to_js(source: &str, err: SynthError) -> JsValue {
    JsValue::from_str(&err.report("presets.json", source))
}

/// WASM-exposed: render preset `name` from a preset file to AIFF bytes.
/// An empty `library_json` selects the bundled presets.
#[wasm_bindgen]
pub fn render_preset_aiff(library_json: &str, name: &str) -> std::result::Result<Vec<u8>, JsValue> {
    let library = load_library(library_json).map_err(|e| to_js(library_json, e))?;
    let preset = library.get(name).map_err(|e| to_js(library_json, e))?;
    dsp::renderer::render_aiff(name, preset, &RenderOptions::default())
        .map_err(|e| to_js(library_json, e))
}

/// WASM-exposed: render preset `name` to raw mono 16-bit samples.
#[wasm_bindgen]
pub fn render_preset_samples(
    library_json: &str,
    name: &str,
) -> std::result::Result<Vec<i16>, JsValue> {
    let library = load_library(library_json).map_err(|e| to_js(library_json, e))?;
    library.render(name).map_err(|e| to_js(library_json, e))
}

/// WASM-exposed: the preset names in a preset file, sorted.
#[wasm_bindgen]
pub fn list_presets(library_json: &str) -> std::result::Result<JsValue, JsValue> {
    let library = load_library(library_json).map_err(|e| to_js(library_json, e))?;
    let names: Vec<&str> = library.names().collect();
    serde_wasm_bindgen::to_value(&names).map_err(|e| JsValue::from_str(&format!("{e}")))
}
