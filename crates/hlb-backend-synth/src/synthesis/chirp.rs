//! Linear chirp synthesis.
//!
//! The phase is the closed-form integral of the instantaneous frequency.
//! Within sweep `k` at offset `τ`:
//!
//! ```text
//! cycles(τ) = f0 τ + (f1 - f0) τ² / (2T)
//! ```
//!
//! and every completed sweep contributes `T (f0 + f1) / 2` cycles, so the
//! phase stays continuous when the frequency wraps back to `f0`.

use std::f64::consts::{PI, TAU};

use hlb_spec::ChirpParams;

use super::Synthesizer;

/// Chirp synthesizer.
#[derive(Debug, Clone)]
pub struct ChirpSynth {
    /// Start frequency in Hz.
    pub start_freq: f64,
    /// End frequency in Hz.
    pub end_freq: f64,
    /// Sweep length in seconds.
    pub sweep_period: f64,
    /// Peak amplitude.
    pub amplitude: f64,
    /// One half-sine windowed sweep per interval when set.
    pub burst_interval: Option<f64>,
}

impl ChirpSynth {
    /// Creates a continuously repeating chirp.
    pub fn new(start_freq: f64, end_freq: f64, sweep_period: f64, amplitude: f64) -> Self {
        Self {
            start_freq,
            end_freq,
            sweep_period,
            amplitude,
            burst_interval: None,
        }
    }

    /// Switches to burst mode.
    pub fn with_burst_interval(mut self, interval: f64) -> Self {
        self.burst_interval = Some(interval);
        self
    }

    /// Phase in cycles reached `tau` seconds into one sweep.
    #[inline]
    fn sweep_cycles(&self, tau: f64) -> f64 {
        self.start_freq * tau + (self.end_freq - self.start_freq) * tau * tau / (2.0 * self.sweep_period)
    }

    /// Instantaneous frequency at time `t`.
    pub fn frequency_at(&self, t: f64) -> f64 {
        let tau = t.rem_euclid(self.sweep_period);
        self.start_freq + (self.end_freq - self.start_freq) * tau / self.sweep_period
    }

    fn continuous_sample(&self, t: f64) -> f64 {
        let k = (t / self.sweep_period).floor();
        let tau = t - k * self.sweep_period;
        let per_sweep = self.sweep_period * (self.start_freq + self.end_freq) / 2.0;
        let completed = (k * per_sweep).rem_euclid(1.0);
        let cycles = completed + self.sweep_cycles(tau);
        self.amplitude * (TAU * cycles.rem_euclid(1.0)).sin()
    }

    fn burst_sample(&self, t: f64, interval: f64) -> f64 {
        let tau = t.rem_euclid(interval);
        if tau >= self.sweep_period {
            return 0.0;
        }
        let window = (PI * tau / self.sweep_period).sin();
        self.amplitude * window * (TAU * self.sweep_cycles(tau).rem_euclid(1.0)).sin()
    }
}

impl From<&ChirpParams> for ChirpSynth {
    fn from(p: &ChirpParams) -> Self {
        Self {
            start_freq: p.start_freq,
            end_freq: p.end_freq,
            sweep_period: p.sweep_period,
            amplitude: p.amplitude,
            burst_interval: p.burst_interval,
        }
    }
}

impl Synthesizer for ChirpSynth {
    fn synthesize(&self, sample_rate: f64, start_sample: u64, num_samples: usize) -> Vec<f64> {
        (0..num_samples as u64)
            .map(|i| {
                let t = (start_sample + i) as f64 / sample_rate;
                match self.burst_interval {
                    Some(interval) => self.burst_sample(t, interval),
                    None => self.continuous_sample(t),
                }
            })
            .collect()
    }
}
