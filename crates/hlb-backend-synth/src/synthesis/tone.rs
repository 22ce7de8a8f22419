//! Pure sine tone.

use hlb_spec::ToneParams;

use super::Synthesizer;
use crate::oscillator::sine_at;

/// Sine tone: `amplitude * sin(2π f t + phase)`.
#[derive(Debug, Clone)]
pub struct ToneSynth {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Peak amplitude.
    pub amplitude: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

impl ToneSynth {
    /// Creates a zero-phase tone.
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
            phase: 0.0,
        }
    }
}

impl From<&ToneParams> for ToneSynth {
    fn from(p: &ToneParams) -> Self {
        Self {
            frequency: p.frequency,
            amplitude: p.amplitude,
            phase: p.phase,
        }
    }
}

impl Synthesizer for ToneSynth {
    fn synthesize(&self, sample_rate: f64, start_sample: u64, num_samples: usize) -> Vec<f64> {
        (0..num_samples as u64)
            .map(|i| self.amplitude * sine_at(self.frequency, start_sample + i, sample_rate, self.phase))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_peak_matches_amplitude() {
        let samples = ToneSynth::new(100.0, 0.8).synthesize(8_000.0, 0, 8_000);
        let peak = samples.iter().fold(0.0f64, |a, s| a.max(s.abs()));
        assert!((peak - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_tone_zero_frequency_with_phase_is_dc() {
        let synth = ToneSynth {
            frequency: 0.0,
            amplitude: 1.0,
            phase: std::f64::consts::FRAC_PI_2,
        };
        let samples = synth.synthesize(1_000.0, 0, 10);
        assert!(samples.iter().all(|s| (s - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_tone_starts_at_zero() {
        let samples = ToneSynth::new(7.83, 1.0).synthesize(44_100.0, 0, 4);
        assert_eq!(samples[0], 0.0);
    }
}
