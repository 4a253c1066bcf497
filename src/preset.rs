//! Preset types for notification sounds.
//!
//! A preset file is a JSON object mapping preset names to descriptions.
//! Each description carries a `type` discriminant selecting the generator:
//!
//! ```json
//! {
//!   "ping": { "type": "tone", "freq": 880, "duration": 0.4,
//!             "harmonics": [[2, 0.3, 8]] },
//!   "chime": { "type": "sequence", "duration": 1.0, "notes": [
//!     { "freq": 660, "start": 0.0, "decay": 4, "amp": 1.0 },
//!     { "freq": 990, "start": 0.15, "decay": 4, "amp": 0.8 } ] }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};

/// Preset file shipped with the crate.
const BUILTIN_PRESETS: &str = include_str!("../presets/default.json");

// ── Harmonics ───────────────────────────────────────────────

/// One overtone relative to a fundamental.
///
/// Serialized as a `[multiplier, amplitude, decay]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64)", into = "(f64, f64, f64)")]
pub struct Harmonic {
    /// Frequency multiple of the fundamental.
    pub multiplier: f64,
    /// Amplitude relative to the fundamental.
    pub amplitude: f64,
    /// Exponential decay rate (per second).
    pub decay: f64,
}

impl Harmonic {
    pub fn new(multiplier: f64, amplitude: f64, decay: f64) -> Self {
        Harmonic {
            multiplier,
            amplitude,
            decay,
        }
    }
}

impl From<(f64, f64, f64)> for Harmonic {
    fn from((multiplier, amplitude, decay): (f64, f64, f64)) -> Self {
        Harmonic::new(multiplier, amplitude, decay)
    }
}

impl From<Harmonic> for (f64, f64, f64) {
    fn from(h: Harmonic) -> Self {
        (h.multiplier, h.amplitude, h.decay)
    }
}

// ── Tone ────────────────────────────────────────────────────

fn default_decay() -> f64 {
    5.0
}

fn default_volume() -> f64 {
    0.7
}

/// A single enveloped tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TonePreset {
    /// Fundamental frequency in Hz.
    pub freq: f64,
    /// Length in seconds.
    pub duration: f64,
    /// Decay rate of the fundamental.
    #[serde(default = "default_decay")]
    pub decay: f64,
    #[serde(default)]
    pub harmonics: Vec<Harmonic>,
    /// Output peak as a fraction of full scale [0, 1].
    #[serde(default = "default_volume")]
    pub volume: f64,
}

// ── Sequence ────────────────────────────────────────────────

/// One note in a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub freq: f64,
    /// Start offset in seconds from the beginning of the sequence.
    pub start: f64,
    pub decay: f64,
    /// Note-level gain; also scales this note's harmonics.
    pub amp: f64,
    #[serde(default)]
    pub harmonics: Vec<Harmonic>,
}

/// Several time-offset notes mixed into one fixed-length buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencePreset {
    pub notes: Vec<Note>,
    /// Total length in seconds.
    pub duration: f64,
    #[serde(default = "default_volume")]
    pub volume: f64,
}

// ── Preset ──────────────────────────────────────────────────

/// A preset description, tagged by its `type` field.
///
/// Descriptions with a `type` this crate does not know deserialize to
/// [`Preset::Unrecognized`] so the renderer can report them by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Preset {
    Tone(TonePreset),
    Sequence(SequencePreset),
    #[serde(skip)]
    Unrecognized(String),
}

impl Preset {
    /// The `type` discriminant as written in JSON.
    pub fn kind(&self) -> &str {
        match self {
            Preset::Tone(_) => "tone",
            Preset::Sequence(_) => "sequence",
            Preset::Unrecognized(kind) => kind,
        }
    }
}

impl<'de> Deserialize<'de> for Preset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .ok_or_else(|| <D::Error as de::Error>::missing_field("type"))?
            .as_str()
            .ok_or_else(|| <D::Error as de::Error>::custom("preset `type` must be a string"))?
            .to_owned();

        match kind.as_str() {
            "tone" => serde_json::from_value(value)
                .map(Preset::Tone)
                .map_err(<D::Error as de::Error>::custom),
            "sequence" => serde_json::from_value(value)
                .map(Preset::Sequence)
                .map_err(<D::Error as de::Error>::custom),
            _ => Ok(Preset::Unrecognized(kind)),
        }
    }
}

impl From<TonePreset> for Preset {
    fn from(p: TonePreset) -> Self {
        Preset::Tone(p)
    }
}

impl From<SequencePreset> for Preset {
    fn from(p: SequencePreset) -> Self {
        Preset::Sequence(p)
    }
}

// ── Library ─────────────────────────────────────────────────

/// Named presets loaded from a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetLibrary {
    presets: BTreeMap<String, Preset>,
}

impl PresetLibrary {
    /// Parse a preset file's contents.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a preset file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The presets bundled with this crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_PRESETS)
    }

    pub fn get(&self, name: &str) -> Result<&Preset> {
        self.presets
            .get(name)
            .ok_or_else(|| SynthError::PresetNotFound(name.to_string()))
    }

    pub fn insert(&mut self, name: impl Into<String>, preset: impl Into<Preset>) {
        self.presets.insert(name.into(), preset.into());
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Preset)> {
        self.presets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
