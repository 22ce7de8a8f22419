//! AM (Amplitude Modulation) synthesis.
//!
//! A sine carrier whose amplitude follows `1 + depth * sin(2π f_m t)`. The
//! modulation factor is floored at zero so it never inverts the carrier, and
//! divided by `1 + depth` so the peak never exceeds the layer amplitude.

use hlb_spec::AmToneParams;

use super::Synthesizer;
use crate::oscillator::sine_at;

/// AM tone parameters.
#[derive(Debug, Clone)]
pub struct AmSynth {
    /// Carrier frequency in Hz.
    pub carrier_freq: f64,
    /// Modulator frequency in Hz.
    pub modulator_freq: f64,
    /// Modulation depth (0.0 to 1.0).
    pub depth: f64,
    /// Peak amplitude.
    pub amplitude: f64,
}

impl AmSynth {
    /// Creates a new AM synthesizer.
    ///
    /// # Arguments
    /// * `carrier_freq` - Carrier frequency in Hz
    /// * `modulator_freq` - Modulator frequency in Hz
    /// * `depth` - Modulation depth (0.0 to 1.0)
    /// * `amplitude` - Peak amplitude
    pub fn new(carrier_freq: f64, modulator_freq: f64, depth: f64, amplitude: f64) -> Self {
        Self {
            carrier_freq,
            modulator_freq,
            depth: depth.clamp(0.0, 1.0),
            amplitude,
        }
    }

    /// Modulation factor at an absolute sample index, in [0, 1].
    #[inline]
    pub fn modulation_at(&self, sample_index: u64, sample_rate: f64) -> f64 {
        let m = sine_at(self.modulator_freq, sample_index, sample_rate, 0.0);
        (1.0 + self.depth * m).max(0.0) / (1.0 + self.depth)
    }
}

impl From<&AmToneParams> for AmSynth {
    fn from(p: &AmToneParams) -> Self {
        Self::new(p.carrier_freq, p.modulator_freq, p.depth, p.amplitude)
    }
}

impl Synthesizer for AmSynth {
    fn synthesize(&self, sample_rate: f64, start_sample: u64, num_samples: usize) -> Vec<f64> {
        (0..num_samples as u64)
            .map(|i| {
                let n = start_sample + i;
                let carrier = sine_at(self.carrier_freq, n, sample_rate, 0.0);
                self.amplitude * carrier * self.modulation_at(n, sample_rate)
            })
            .collect()
    }
}
