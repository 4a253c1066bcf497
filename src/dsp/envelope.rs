//! Envelope shaping shared by the tone and sequence generators:
//! time axis, anti-click fade-in, linear fade-out, peak normalization
//! and 16-bit quantization.

use crate::aiff::MAX_FRAMES;

/// Length of the anti-click fade-in, in seconds.
pub const FADE_IN_SECONDS: f64 = 0.002;
/// Share of the buffer (by sample count) covered by the fade-out.
pub const FADE_OUT_FRACTION: f64 = 0.1;
/// Largest positive 16-bit sample.
pub const FULL_SCALE: f64 = 32767.0;

/// Number of samples covering `duration` seconds, or `None` when that
/// exceeds what an AIFF container can hold.
///
/// Degenerate durations (zero, negative, NaN) give an empty buffer.
pub fn checked_sample_count(duration: f64, sample_rate: u32) -> Option<usize> {
    let count = (f64::from(sample_rate) * duration).round();
    if count.is_nan() || count <= 0.0 {
        Some(0)
    } else if count > MAX_FRAMES as f64 {
        None
    } else {
        Some(count as usize)
    }
}

/// Number of samples covering `duration` seconds, clamped to [`MAX_FRAMES`].
///
/// Untrusted durations should be checked with [`checked_sample_count`]
/// first; the renderer does so and reports `BufferTooLarge`.
pub fn sample_count(duration: f64, sample_rate: u32) -> usize {
    checked_sample_count(duration, sample_rate).unwrap_or(MAX_FRAMES)
}

/// `count` evenly spaced instants over `[0, duration)`.
pub fn time_axis(duration: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let step = duration / count as f64;
    (0..count).map(|i| i as f64 * step).collect()
}

/// Value `i` of a linear ramp from 0 to 1 over `n` points, both ends included.
fn ramp(i: usize, n: usize) -> f64 {
    if n <= 1 { 0.0 } else { i as f64 / (n - 1) as f64 }
}

/// Ramp the first 2 ms of `signal` up from silence.
///
/// Skipped when the buffer is no longer than the fade itself.
pub fn apply_fade_in(signal: &mut [f64], sample_rate: u32) {
    let fade = (FADE_IN_SECONDS * f64::from(sample_rate)).round() as usize;
    if fade == 0 || fade >= signal.len() {
        return;
    }
    for (i, s) in signal[..fade].iter_mut().enumerate() {
        *s *= ramp(i, fade);
    }
}

/// Ramp the last 10% of `signal` (truncated count) down to silence.
pub fn apply_fade_out(signal: &mut [f64]) {
    let fade = (FADE_OUT_FRACTION * signal.len() as f64) as usize;
    if fade == 0 {
        return;
    }
    let start = signal.len() - fade;
    for (i, s) in signal[start..].iter_mut().enumerate() {
        *s *= 1.0 - ramp(i, fade);
    }
}

/// Peak absolute value of `signal`, 0 for an empty buffer.
pub fn peak(signal: &[f64]) -> f64 {
    signal.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()))
}

/// Scale `signal` so its peak lands on `volume * 32767`.
///
/// An all-zero buffer is left untouched.
pub fn normalize(signal: &mut [f64], volume: f64) {
    let peak = peak(signal);
    if peak > 0.0 {
        let gain = volume * FULL_SCALE / peak;
        for s in signal.iter_mut() {
            *s *= gain;
        }
    }
}

/// Convert to 16-bit samples, truncating toward zero.
pub fn quantize(signal: &[f64]) -> Vec<i16> {
    signal.iter().map(|&s| s as i16).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sample_count_rounds() {
        assert_eq!(sample_count(1.0, 44100), 44100);
        assert_eq!(sample_count(0.5, 44100), 22050);
        // 0.35 * 44100 is 15434.999... in binary floating point
        assert_eq!(sample_count(0.35, 44100), 15435);
    }

    #[test]
    fn degenerate_durations_are_empty() {
        assert_eq!(sample_count(0.0, 44100), 0);
        assert_eq!(sample_count(-1.0, 44100), 0);
        assert_eq!(sample_count(f64::NAN, 44100), 0);
        assert_eq!(sample_count(f64::NEG_INFINITY, 44100), 0);
        assert!(time_axis(1.0, 0).is_empty());
    }

    #[test]
    fn oversized_durations_are_clamped() {
        assert_eq!(checked_sample_count(1e300, 44100), None);
        assert_eq!(checked_sample_count(f64::INFINITY, 44100), None);
        assert_eq!(sample_count(1e300, 44100), MAX_FRAMES);
        assert_eq!(checked_sample_count(2.0, 44100), Some(88200));
    }

    #[test]
    fn time_axis_excludes_endpoint() {
        let t = time_axis(1.0, 4);
        assert_eq!(t, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn fade_in_ramps_from_zero_to_one() {
        let mut signal = vec![1.0; 1000];
        apply_fade_in(&mut signal, 44100);
        // 0.002 * 44100 = 88.2 -> 88 samples
        assert_eq!(signal[0], 0.0);
        assert_abs_diff_eq!(signal[87], 1.0);
        assert_abs_diff_eq!(signal[44], 44.0 / 87.0);
        assert!(signal[88..].iter().all(|&s| s == 1.0));
    }

    #[test]
    fn fade_in_skipped_on_short_buffer() {
        let mut signal = vec![1.0; 88];
        apply_fade_in(&mut signal, 44100);
        assert!(signal.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn fade_out_covers_last_tenth() {
        let mut signal = vec![1.0; 105];
        apply_fade_out(&mut signal);
        // trunc(10.5) = 10 samples
        assert!(signal[..95].iter().all(|&s| s == 1.0));
        assert_abs_diff_eq!(signal[95], 1.0);
        assert_abs_diff_eq!(signal[104], 0.0);
    }

    #[test]
    fn fade_out_skipped_on_tiny_buffer() {
        let mut signal = vec![1.0; 9];
        apply_fade_out(&mut signal);
        assert!(signal.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn normalize_hits_target_peak() {
        let mut signal = vec![0.1, -0.4, 0.2];
        normalize(&mut signal, 0.5);
        assert_abs_diff_eq!(signal[1], -0.5 * FULL_SCALE, epsilon = 1e-9);
        assert_abs_diff_eq!(peak(&signal), 0.5 * FULL_SCALE, epsilon = 1e-9);
    }

    #[test]
    fn normalize_leaves_silence_alone() {
        let mut signal = vec![0.0; 16];
        normalize(&mut signal, 0.7);
        assert!(signal.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn quantize_truncates() {
        assert_eq!(quantize(&[22936.9, -22936.9, 0.4]), vec![22936, -22936, 0]);
    }
}
