//! DSP — procedural synthesis of notification sounds.
//!
//! Everything here is pure computation over in-memory `f64` buffers; the
//! generators hand back finished 16-bit samples for the AIFF encoder.

pub mod envelope;
pub mod mixer;
pub mod oscillator;
pub mod renderer;
pub mod sequence;
pub mod tone;
