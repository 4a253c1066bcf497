//! Sequence generator — time-offset notes summed into one fixed-length buffer.
//!
//! Notes only get the anti-click fade-in individually. Fade-out and
//! normalization run once over the whole mix, so relative loudness between
//! notes comes from their `amp` values alone.

use crate::preset::{Note, SequencePreset};

use super::envelope::{apply_fade_in, apply_fade_out, normalize, quantize, sample_count, time_axis};
use super::mixer::Mixer;
use super::oscillator::synthesize;

/// Render a note sequence to exactly `round(sample_rate * duration)` samples.
pub fn generate_sequence(notes: &[Note], duration: f64, volume: f64, sample_rate: u32) -> Vec<i16> {
    let mut signal = mix_notes(notes, duration, sample_rate);
    apply_fade_out(&mut signal);
    normalize(&mut signal, volume);
    quantize(&signal)
}

/// Sum every note into a silent buffer of the sequence's length, before the
/// global envelope is applied.
pub(crate) fn mix_notes(notes: &[Note], duration: f64, sample_rate: u32) -> Vec<f64> {
    let mut mixer = Mixer::new(sample_count(duration, sample_rate));

    for note in notes {
        // Notes cannot begin before the sequence does.
        let start = note.start.max(0.0);
        let note_duration = duration - start;
        if note_duration.is_nan() || note_duration <= 0.0 {
            continue;
        }

        let times = time_axis(note_duration, sample_count(note_duration, sample_rate));
        let mut tone = synthesize(note.freq, note.decay, &note.harmonics, note.amp, &times);
        apply_fade_in(&mut tone, sample_rate);

        let offset = (start * f64::from(sample_rate)).round() as usize;
        mixer.mix_at(offset, &tone);
    }

    mixer.into_inner()
}

impl SequencePreset {
    pub fn generate(&self, sample_rate: u32) -> Vec<i16> {
        generate_sequence(&self.notes, self.duration, self.volume, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::Harmonic;

    fn note(freq: f64, start: f64, amp: f64) -> Note {
        Note {
            freq,
            start,
            decay: 4.0,
            amp,
            harmonics: Vec::new(),
        }
    }

    #[test]
    fn length_is_fixed() {
        let notes = [note(440.0, 0.0, 1.0), note(660.0, 0.9, 1.0)];
        assert_eq!(generate_sequence(&notes, 1.0, 0.7, 44100).len(), 44100);
        assert_eq!(generate_sequence(&[], 0.5, 0.7, 44100).len(), 22050);
    }

    #[test]
    fn second_note_enters_at_its_offset() {
        let first = note(440.0, 0.0, 1.0);
        let second = note(660.0, 0.5, 0.8);

        let solo = mix_notes(&[first.clone()], 1.0, 44100);
        let both = mix_notes(&[first, second], 1.0, 44100);

        assert_eq!(both.len(), 44100);
        assert_eq!(&both[..22050], &solo[..22050]);
        assert!(both[22050..].iter().zip(&solo[22050..]).any(|(a, b)| a != b));
    }

    #[test]
    fn global_normalization_hits_volume() {
        let notes = [note(440.0, 0.0, 1.0), note(660.0, 0.5, 1.0)];
        let samples = generate_sequence(&notes, 1.0, 0.7, 44100);
        let peak = samples.iter().map(|&s| i32::from(s).abs()).max().unwrap();
        assert!((f64::from(peak) - 0.7 * 32767.0).abs() <= 1.0, "peak {peak}");
    }

    #[test]
    fn amp_sets_relative_loudness() {
        // The quiet note gets no per-note normalization of its own.
        let loud = note(440.0, 0.0, 1.0);
        let quiet = note(440.0, 0.5, 0.25);
        let samples = generate_sequence(&[loud, quiet], 1.0, 0.7, 44100);

        let early = samples[..11025].iter().map(|&s| i32::from(s).abs()).max().unwrap();
        let late_solo = generate_sequence(&[note(440.0, 0.5, 0.25)], 1.0, 0.7, 44100);
        let late_solo_peak = late_solo.iter().map(|&s| i32::from(s).abs()).max().unwrap();

        assert!(early > 22000, "loud note should carry the global peak, got {early}");
        // Alone, the quiet note is scaled back up to full volume.
        assert!(late_solo_peak > 22000);
    }

    #[test]
    fn note_harmonics_scale_with_note_amp() {
        let mut a = note(300.0, 0.0, 0.5);
        a.harmonics.push(Harmonic::new(2.0, 0.5, 4.0));
        let mixed = mix_notes(&[a], 0.01, 44100);

        let t = 200.0 / 44100.0;
        let expected = 0.5 * (2.0 * std::f64::consts::PI * 300.0 * t).sin() * (-4.0 * t).exp()
            + 0.25 * (2.0 * std::f64::consts::PI * 600.0 * t).sin() * (-4.0 * t).exp();
        approx::assert_abs_diff_eq!(mixed[200], expected, epsilon = 1e-9);
    }

    #[test]
    fn notes_starting_at_or_after_end_are_skipped() {
        let notes = [note(440.0, 1.0, 1.0), note(440.0, 2.0, 1.0)];
        let samples = generate_sequence(&notes, 1.0, 0.7, 44100);
        assert_eq!(samples.len(), 44100);
        assert!(samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn late_note_leaves_leading_silence() {
        let notes = [note(440.0, 0.33333, 1.0)];
        let mixed = mix_notes(&notes, 1.0, 44100);
        assert_eq!(mixed.len(), 44100);
        assert!(mixed[..14700].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn negative_start_plays_from_zero() {
        let early = note(440.0, -1e300, 1.0);
        let mixed = mix_notes(&[early], 0.5, 44100);
        assert_eq!(mixed, mix_notes(&[note(440.0, 0.0, 1.0)], 0.5, 44100));
    }

    #[test]
    fn ends_with_fade_out() {
        let samples = generate_sequence(&[note(440.0, 0.0, 1.0)], 0.5, 0.7, 44100);
        assert_eq!(*samples.last().unwrap(), 0);
    }

    #[test]
    fn preset_uses_its_fields() {
        let preset = SequencePreset {
            notes: vec![note(523.25, 0.0, 1.0), note(659.25, 0.1, 0.9)],
            duration: 0.4,
            volume: 0.6,
        };
        assert_eq!(
            preset.generate(44100),
            generate_sequence(&preset.notes, 0.4, 0.6, 44100)
        );
    }
}
