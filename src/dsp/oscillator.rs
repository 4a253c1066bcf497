//! Exponentially decaying sine partials.

use std::f64::consts::PI;

use crate::preset::Harmonic;

/// A sine partial at `frequency` Hz whose amplitude decays as `exp(-decay * t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    pub frequency: f64,
    pub amplitude: f64,
    pub decay: f64,
}

impl Partial {
    pub fn new(frequency: f64, amplitude: f64, decay: f64) -> Self {
        Partial {
            frequency,
            amplitude,
            decay,
        }
    }

    /// The overtone `harmonic` describes over `fundamental`, scaled by `gain`.
    pub fn overtone(fundamental: f64, harmonic: &Harmonic, gain: f64) -> Self {
        Partial {
            frequency: fundamental * harmonic.multiplier,
            amplitude: gain * harmonic.amplitude,
            decay: harmonic.decay,
        }
    }

    /// Instantaneous value at time `t` seconds.
    pub fn value_at(&self, t: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency * t).sin() * (-self.decay * t).exp()
    }

    /// Add this partial into `signal`, sample `i` taken at `times[i]`.
    pub fn add_to(&self, signal: &mut [f64], times: &[f64]) {
        for (s, &t) in signal.iter_mut().zip(times) {
            *s += self.value_at(t);
        }
    }
}

/// Sum a fundamental and its harmonics over `times`.
///
/// The fundamental has amplitude `gain`; each harmonic contributes
/// `gain * harmonic.amplitude`. Harmonic amplitudes are not normalized
/// against each other.
pub fn synthesize(
    frequency: f64,
    decay: f64,
    harmonics: &[Harmonic],
    gain: f64,
    times: &[f64],
) -> Vec<f64> {
    let mut signal = vec![0.0; times.len()];
    Partial::new(frequency, gain, decay).add_to(&mut signal, times);
    for harmonic in harmonics {
        Partial::overtone(frequency, harmonic, gain).add_to(&mut signal, times);
    }
    signal
}
