//! Deterministic pulse gate.
//!
//! The gate alternates on and off for `sequence[i] * unit` seconds, starting
//! on. When the sequence runs out it wraps while the on/off alternation
//! carries on, so an odd-length sequence repeats every two passes. Each on
//! segment rises and falls over `ramp` seconds with a raised-cosine edge.

use hlb_spec::PulseGateParams;

use super::Synthesizer;
use crate::oscillator::{raised_cosine, time_at};

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: f64,
    duration: f64,
    on: bool,
}

/// Pulse gate synthesizer.
#[derive(Debug, Clone)]
pub struct PulseGateSynth {
    segments: Vec<Segment>,
    period: f64,
    ramp: f64,
}

impl PulseGateSynth {
    /// Creates a gate.
    ///
    /// # Arguments
    /// * `sequence` - Alternating on/off durations in units (non-empty, non-zero)
    /// * `unit` - Seconds per unit
    /// * `ramp` - Edge length in seconds
    pub fn new(sequence: &[u32], unit: f64, ramp: f64) -> Self {
        let passes = if sequence.len() % 2 == 0 { 1 } else { 2 };
        let mut segments = Vec::with_capacity(sequence.len() * passes);
        let mut start = 0.0;
        for (j, &count) in sequence.iter().cycle().take(sequence.len() * passes).enumerate() {
            let duration = count as f64 * unit;
            segments.push(Segment {
                start,
                duration,
                on: j % 2 == 0,
            });
            start += duration;
        }
        Self {
            segments,
            period: start,
            ramp,
        }
    }

    /// Length of one full on/off pattern in seconds.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Gate value at time `t`, in [0, 1].
    pub fn value_at_time(&self, t: f64) -> f64 {
        if self.period <= 0.0 {
            return 0.0;
        }
        let position = t.rem_euclid(self.period);
        let idx = self
            .segments
            .partition_point(|s| s.start <= position)
            .saturating_sub(1);
        let segment = self.segments[idx];
        if !segment.on {
            return 0.0;
        }
        if self.ramp <= 0.0 {
            return 1.0;
        }
        let tau = position - segment.start;
        let rise = raised_cosine(tau / self.ramp);
        let fall = raised_cosine((segment.duration - tau) / self.ramp);
        rise.min(fall)
    }

    /// Returns true if the gate is in an on segment at time `t`.
    pub fn is_on(&self, t: f64) -> bool {
        self.value_at_time(t) > 0.0
    }
}

impl From<&PulseGateParams> for PulseGateSynth {
    fn from(p: &PulseGateParams) -> Self {
        Self::new(&p.sequence, p.unit, p.ramp)
    }
}

impl Synthesizer for PulseGateSynth {
    fn synthesize(&self, sample_rate: f64, start_sample: u64, num_samples: usize) -> Vec<f64> {
        (0..num_samples as u64)
            .map(|i| self.value_at_time(time_at(start_sample + i, sample_rate)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prime_gate_without_ramp() {
        let gate = PulseGateSynth::new(&[2, 3, 5, 7], 1.0, 0.0);
        assert_eq!(gate.period(), 17.0);
        assert_eq!(gate.value_at_time(0.5), 1.0);
        assert_eq!(gate.value_at_time(1.9), 1.0);
        assert_eq!(gate.value_at_time(2.5), 0.0);
        assert_eq!(gate.value_at_time(5.0), 1.0);
        assert_eq!(gate.value_at_time(9.9), 1.0);
        assert_eq!(gate.value_at_time(10.0), 0.0);
        // Wraps
        assert_eq!(gate.value_at_time(17.5), 1.0);
    }

    #[test]
    fn test_odd_sequence_keeps_alternating() {
        let gate = PulseGateSynth::new(&[2, 3, 5], 1.0, 0.0);
        // on 2, off 3, on 5, off 2, on 3, off 5
        assert_eq!(gate.period(), 20.0);
        assert_eq!(gate.value_at_time(10.5), 0.0);
        assert_eq!(gate.value_at_time(12.5), 1.0);
        assert_eq!(gate.value_at_time(16.0), 0.0);
        assert_eq!(gate.value_at_time(20.5), 1.0);
    }

    #[test]
    fn test_ramped_edges() {
        let gate = PulseGateSynth::new(&[2, 3], 1.0, 0.1);
        assert_eq!(gate.value_at_time(0.0), 0.0);
        assert!((gate.value_at_time(0.05) - 0.5).abs() < 1e-9);
        assert_eq!(gate.value_at_time(1.0), 1.0);
        assert!((gate.value_at_time(1.95) - 0.5).abs() < 1e-9);
        assert_eq!(gate.value_at_time(2.5), 0.0);
    }

    #[test]
    fn test_values_in_unit_range() {
        let gate = PulseGateSynth::new(&[2, 3, 5, 7, 11], 0.01, 0.004);
        let samples = gate.synthesize(8_000.0, 0, 8_000);
        assert!(samples.iter().all(|s| (0.0..=1.0).contains(s)));
        assert!(samples.iter().any(|&s| s == 1.0));
        assert!(samples.iter().any(|&s| s == 0.0));
    }
}
