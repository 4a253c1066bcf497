//! Tone generator — one enveloped waveform from a fundamental and harmonics.

use crate::preset::{Harmonic, TonePreset};

use super::envelope::{apply_fade_in, apply_fade_out, normalize, quantize, sample_count, time_axis};
use super::oscillator::synthesize;

/// Render a single tone to 16-bit samples.
///
/// The fundamental decays at `decay`; each harmonic adds its own decaying
/// partial at `amplitude` relative to the fundamental. The result gets a
/// 2 ms fade-in, a fade-out over the last 10% and is normalized so its
/// peak sits at `volume * 32767`.
pub fn generate_tone(
    freq: f64,
    duration: f64,
    decay: f64,
    harmonics: &[Harmonic],
    volume: f64,
    sample_rate: u32,
) -> Vec<i16> {
    let times = time_axis(duration, sample_count(duration, sample_rate));
    let mut signal = synthesize(freq, decay, harmonics, 1.0, &times);

    apply_fade_in(&mut signal, sample_rate);
    apply_fade_out(&mut signal);
    normalize(&mut signal, volume);
    quantize(&signal)
}

impl TonePreset {
    pub fn generate(&self, sample_rate: u32) -> Vec<i16> {
        generate_tone(
            self.freq,
            self.duration,
            self.decay,
            &self.harmonics,
            self.volume,
            sample_rate,
        )
    }
}
