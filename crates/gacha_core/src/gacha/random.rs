//! Random source abstraction
//!
//! The engine never reaches for a thread-local generator; callers hand it a
//! source. Any `rand::Rng` works as-is (use `ChaCha8Rng::seed_from_u64` for
//! reproducible runs), and `SequenceSource` replays scripted samples in tests.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform sample in [0, 1)
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let index = (self.next_f64() * len as f64) as usize;
        index.min(len.saturating_sub(1))
    }
}

impl<R: Rng> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Seeded generator used across the crate for reproducible runs
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Indices are derived from the samples the same way as the default
/// `next_index`, so a script fully determines every choice.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    samples: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// Samples outside [0, 1) are clamped into range; an empty script yields 0.0.
    pub fn new(samples: impl Into<Vec<f64>>) -> Self {
        let samples = samples
            .into()
            .into_iter()
            .map(|s| if s.is_nan() { 0.0 } else { s.clamp(0.0, 1.0 - f64::EPSILON) })
            .collect();
        Self { samples, cursor: 0 }
    }

    /// Number of samples consumed so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sample = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        sample
    }
}
