//! Periodic amplitude envelopes.
//!
//! Envelopes are unit-range multipliers applied to a layer's source signal.

use hlb_spec::{EnvelopeCurve, EnvelopeParams};

use super::Synthesizer;
use crate::oscillator::sine_at;

/// Envelope synthesizer.
#[derive(Debug, Clone)]
pub struct EnvelopeSynth {
    /// Curve shape.
    pub curve: EnvelopeCurve,
}

impl EnvelopeSynth {
    /// Creates an envelope from a curve.
    pub fn new(curve: EnvelopeCurve) -> Self {
        Self { curve }
    }

    /// Envelope value at an absolute sample index, in [0, 1].
    pub fn value_at(&self, sample_index: u64, sample_rate: f64) -> f64 {
        match &self.curve {
            EnvelopeCurve::RaisedSine { period, depth } => {
                let s = sine_at(1.0 / period, sample_index, sample_rate, 0.0);
                1.0 - depth + depth * 0.5 * (1.0 + s)
            }
            EnvelopeCurve::Breathing { period, depth } => {
                let s = sine_at(1.0 / period, sample_index, sample_rate, 0.0);
                let half = 0.5 * (1.0 + s);
                1.0 - depth + depth * half * half
            }
            EnvelopeCurve::Composite { partials } => {
                let bound: f64 = partials.iter().map(|p| p.weight.abs()).sum();
                if bound == 0.0 {
                    return 1.0;
                }
                let sum: f64 = partials
                    .iter()
                    .map(|p| p.weight * sine_at(p.frequency, sample_index, sample_rate, 0.0))
                    .sum();
                ((sum + bound) / (2.0 * bound)).clamp(0.0, 1.0)
            }
        }
    }
}

impl From<&EnvelopeParams> for EnvelopeSynth {
    fn from(p: &EnvelopeParams) -> Self {
        Self::new(p.curve.clone())
    }
}

impl Synthesizer for EnvelopeSynth {
    fn synthesize(&self, sample_rate: f64, start_sample: u64, num_samples: usize) -> Vec<f64> {
        (0..num_samples as u64)
            .map(|i| self.value_at(start_sample + i, sample_rate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlb_spec::Partial;

    fn in_unit_range(samples: &[f64]) -> bool {
        samples.iter().all(|s| (0.0..=1.0).contains(s))
    }

    #[test]
    fn test_raised_sine_range_and_floor() {
        let env = EnvelopeSynth::new(EnvelopeCurve::RaisedSine {
            period: 1.0,
            depth: 0.2,
        });
        let samples = env.synthesize(1_000.0, 0, 1_000);
        assert!(in_unit_range(&samples));
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        assert!((min - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_breathing_full_depth_reaches_zero_and_one() {
        let env = EnvelopeSynth::new(EnvelopeCurve::Breathing {
            period: 4.0,
            depth: 1.0,
        });
        // Peak at t = 1 s, trough at t = 3 s.
        assert!((env.value_at(1_000, 1_000.0) - 1.0).abs() < 1e-12);
        assert!(env.value_at(3_000, 1_000.0) < 1e-12);
        assert!(in_unit_range(&env.synthesize(1_000.0, 0, 4_000)));
    }

    #[test]
    fn test_composite_analytic_bound() {
        let env = EnvelopeSynth::new(EnvelopeCurve::Composite {
            partials: vec![
                Partial {
                    frequency: 7.83,
                    weight: 1.0,
                },
                Partial {
                    frequency: 14.3,
                    weight: -0.7,
                },
                Partial {
                    frequency: 20.8,
                    weight: 0.5,
                },
            ],
        });
        let samples = env.synthesize(1_000.0, 0, 10_000);
        assert!(in_unit_range(&samples));
        // Zero sum maps to the midpoint.
        assert!((samples[0] - 0.5).abs() < 1e-12);
    }
}
