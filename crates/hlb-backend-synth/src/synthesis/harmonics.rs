//! Harmonic stack synthesis.
//!
//! A fundamental at relative amplitude 1.0 plus ordered overtones. The sum is
//! divided by the total relative amplitude so the stack peaks at no more than
//! the layer amplitude.

use hlb_spec::{Harmonic, HarmonicStackParams};

use super::Synthesizer;
use crate::oscillator::sine_at;

/// Harmonic stack synthesizer.
#[derive(Debug, Clone)]
pub struct HarmonicSynth {
    /// Fundamental frequency in Hz.
    pub fundamental: f64,
    /// Overtones relative to the fundamental.
    pub harmonics: Vec<Harmonic>,
    /// Peak amplitude of the whole stack.
    pub amplitude: f64,
}

impl HarmonicSynth {
    /// Sum of relative amplitudes, fundamental included.
    pub fn total_weight(&self) -> f64 {
        1.0 + self.harmonics.iter().map(|h| h.amplitude).sum::<f64>()
    }
}

impl From<&HarmonicStackParams> for HarmonicSynth {
    fn from(p: &HarmonicStackParams) -> Self {
        Self {
            fundamental: p.fundamental,
            harmonics: p.harmonics.clone(),
            amplitude: p.amplitude,
        }
    }
}

impl Synthesizer for HarmonicSynth {
    fn synthesize(&self, sample_rate: f64, start_sample: u64, num_samples: usize) -> Vec<f64> {
        let scale = self.amplitude / self.total_weight();

        (0..num_samples as u64)
            .map(|i| {
                let n = start_sample + i;
                let mut sum = sine_at(self.fundamental, n, sample_rate, 0.0);
                for h in &self.harmonics {
                    sum += h.amplitude * sine_at(self.fundamental * h.multiplier, n, sample_rate, 0.0);
                }
                sum * scale
            })
            .collect()
    }
}
