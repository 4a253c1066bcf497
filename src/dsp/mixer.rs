//! Mixer — fixed-length accumulation buffer for time-offset sources.

/// Sums sources into a buffer whose length never changes.
#[derive(Debug, Clone)]
pub struct Mixer {
    buffer: Vec<f64>,
}

impl Mixer {
    /// A silent buffer of `num_samples` samples.
    pub fn new(num_samples: usize) -> Self {
        Mixer {
            buffer: vec![0.0; num_samples],
        }
    }

    /// Add `source` starting at sample `offset`.
    ///
    /// Whatever runs past the end of the buffer is dropped. Returns the
    /// number of samples actually mixed in.
    pub fn mix_at(&mut self, offset: usize, source: &[f64]) -> usize {
        let Some(dest) = self.buffer.get_mut(offset..) else {
            return 0;
        };
        let n = dest.len().min(source.len());
        for (d, &s) in dest[..n].iter_mut().zip(source) {
            *d += s;
        }
        n
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Give up the mixed buffer.
    pub fn into_inner(self) -> Vec<f64> {
        self.buffer
    }
}
