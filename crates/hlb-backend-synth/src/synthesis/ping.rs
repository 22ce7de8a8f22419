//! Decaying tone pings.
//!
//! Every `interval` seconds a ping of `length` seconds sounds:
//! `amplitude * sin(2π f τ) * exp(-decay τ)` where `τ` restarts at each onset.

use std::f64::consts::TAU;

use hlb_spec::PingParams;

use super::Synthesizer;
use crate::oscillator::time_at;

/// Ping synthesizer.
#[derive(Debug, Clone)]
pub struct PingSynth {
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Seconds between onsets.
    pub interval: f64,
    /// Ping length in seconds.
    pub length: f64,
    /// Exponential decay rate per second.
    pub decay: f64,
    /// Peak amplitude.
    pub amplitude: f64,
}

impl From<&PingParams> for PingSynth {
    fn from(p: &PingParams) -> Self {
        Self {
            frequency: p.frequency,
            interval: p.interval,
            length: p.length,
            decay: p.decay,
            amplitude: p.amplitude,
        }
    }
}

impl Synthesizer for PingSynth {
    fn synthesize(&self, sample_rate: f64, start_sample: u64, num_samples: usize) -> Vec<f64> {
        (0..num_samples as u64)
            .map(|i| {
                let tau = time_at(start_sample + i, sample_rate).rem_euclid(self.interval);
                if tau >= self.length {
                    return 0.0;
                }
                let cycles = (self.frequency * tau).fract();
                self.amplitude * (TAU * cycles).sin() * (-self.decay * tau).exp()
            })
            .collect()
    }
}
