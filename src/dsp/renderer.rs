//! Preset renderer — dispatches a preset to its generator and optionally
//! wraps the result in an AIFF file.

use std::path::Path;

use log::debug;

use crate::aiff::{encode_aiff, write_aiff};
use crate::error::{Result, SynthError};
use crate::preset::{Preset, PresetLibrary};

use super::envelope::checked_sample_count;

/// Sample rate used when none is given.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Rendering settings that are not part of a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub sample_rate: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

/// Render `preset` at the default sample rate. `name` is only used in errors.
pub fn render(name: &str, preset: &Preset) -> Result<Vec<i16>> {
    render_with(name, preset, &RenderOptions::default())
}

/// Render `preset` with explicit options.
pub fn render_with(name: &str, preset: &Preset, options: &RenderOptions) -> Result<Vec<i16>> {
    let samples = match preset {
        Preset::Tone(tone) => {
            check_length(tone.duration, options.sample_rate)?;
            tone.generate(options.sample_rate)
        }
        Preset::Sequence(seq) => {
            check_length(seq.duration, options.sample_rate)?;
            seq.generate(options.sample_rate)
        }
        Preset::Unrecognized(kind) => {
            return Err(SynthError::UnknownPresetType {
                kind: kind.clone(),
                name: name.to_string(),
            });
        }
    };
    debug!(
        "rendered {} preset '{name}': {} frames at {} Hz",
        preset.kind(),
        samples.len(),
        options.sample_rate
    );
    Ok(samples)
}

/// Refuse durations whose buffer would not fit an AIFF container.
fn check_length(duration: f64, sample_rate: u32) -> Result<()> {
    match checked_sample_count(duration, sample_rate) {
        Some(_) => Ok(()),
        None => Err(SynthError::BufferTooLarge(
            (f64::from(sample_rate) * duration) as usize,
        )),
    }
}

/// Render `preset` straight to AIFF bytes.
pub fn render_aiff(name: &str, preset: &Preset, options: &RenderOptions) -> Result<Vec<u8>> {
    let samples = render_with(name, preset, options)?;
    encode_aiff(&samples, options.sample_rate)
}

/// Render `preset` and write it as an AIFF file at `path`.
pub fn render_to_file<P: AsRef<Path>>(
    name: &str,
    preset: &Preset,
    options: &RenderOptions,
    path: P,
) -> Result<()> {
    let samples = render_with(name, preset, options)?;
    write_aiff(path, &samples, options.sample_rate)
}

impl PresetLibrary {
    /// Look up `name` and render it at the default sample rate.
    pub fn render(&self, name: &str) -> Result<Vec<i16>> {
        render(name, self.get(name)?)
    }

    /// Look up `name` and write it as an AIFF file at `path`.
    pub fn render_to_file<P: AsRef<Path>>(
        &self,
        name: &str,
        options: &RenderOptions,
        path: P,
    ) -> Result<()> {
        render_to_file(name, self.get(name)?, options, path)
    }
}
