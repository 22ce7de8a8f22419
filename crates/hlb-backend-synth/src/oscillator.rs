//! Basic oscillator helpers.
//!
//! Every primitive evaluates its waveform at an absolute sample index, so a
//! slice generated from an offset matches the same range of a full render.
//! Phase is reduced to whole cycles before the `sin` call to keep precision
//! over hour-long renders.

use std::f64::consts::{PI, TAU};

/// Returns the phase in cycles, reduced to [0, 1), of a `frequency` Hz
/// oscillator at absolute sample `sample_index`.
#[inline]
pub fn cycles_at(frequency: f64, sample_index: u64, sample_rate: f64) -> f64 {
    let cycles = frequency * sample_index as f64 / sample_rate;
    cycles - cycles.floor()
}

/// Sine oscillator sampled at an absolute index.
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_index` - Absolute sample index from the programme origin
/// * `sample_rate` - Sample rate in Hz
/// * `phase` - Phase offset in radians
#[inline]
pub fn sine_at(frequency: f64, sample_index: u64, sample_rate: f64, phase: f64) -> f64 {
    (TAU * cycles_at(frequency, sample_index, sample_rate) + phase).sin()
}

/// Time in seconds of an absolute sample index.
#[inline]
pub fn time_at(sample_index: u64, sample_rate: f64) -> f64 {
    sample_index as f64 / sample_rate
}

/// Raised-cosine ramp from 0 at `x <= 0` to 1 at `x >= 1`.
#[inline]
pub fn raised_cosine(x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else if x >= 1.0 {
        1.0
    } else {
        0.5 - 0.5 * (PI * x).cos()
    }
}

/// Uniform white noise sample in [-1, 1).
#[inline]
pub fn white_noise_sample<R: rand::Rng>(rng: &mut R) -> f64 {
    rng.gen::<f64>() * 2.0 - 1.0
}
