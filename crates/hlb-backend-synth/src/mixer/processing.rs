//! Sample processing: modulation, windowing and normalization.

use hlb_spec::LayerWindow;

use crate::oscillator::{raised_cosine, time_at};

/// Largest absolute sample value.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0_f64, |a, s| a.max(s.abs()))
}

/// Normalizes a mix to `ceiling`.
///
/// The divisor is the observed peak when it is non-zero and below the
/// theoretical peak, otherwise the theoretical peak. Returns the divisor used.
///
/// # Arguments
/// * `samples` - Summed samples
/// * `theoretical_peak` - Sum of the layer amplitudes
/// * `ceiling` - Target peak (e.g., 0.9)
pub fn normalize_to_ceiling(samples: &mut [f64], theoretical_peak: f64, ceiling: f64) -> f64 {
    let observed = peak(samples);
    let divisor = if observed > 0.0 && observed < theoretical_peak {
        observed
    } else {
        theoretical_peak
    };

    if divisor > 0.0 {
        let gain = ceiling / divisor;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
    divisor
}

/// Multiplies `samples` by a modulator of the same length.
pub fn apply_modulator(samples: &mut [f64], modulator: &[f64]) {
    for (sample, &m) in samples.iter_mut().zip(modulator) {
        *sample *= m;
    }
}

/// Silences samples outside a fractional window of a repeating timeline.
///
/// Edges inside the timeline fade over `fade` seconds with a raised cosine;
/// a window starting at 0 or ending at 1 keeps a hard edge there.
///
/// # Arguments
/// * `samples` - Samples to shape in place
/// * `window` - Fractional window
/// * `timeline` - Timeline length in seconds
/// * `sample_rate` - Sample rate in Hz
/// * `start_sample` - Absolute index of `samples[0]`
/// * `fade` - Edge fade length in seconds
pub fn apply_window(
    samples: &mut [f64],
    window: &LayerWindow,
    timeline: f64,
    sample_rate: f64,
    start_sample: u64,
    fade: f64,
) {
    let open = window.start * timeline;
    let close = window.end * timeline;

    for (i, sample) in samples.iter_mut().enumerate() {
        let t = time_at(start_sample + i as u64, sample_rate).rem_euclid(timeline);
        if t < open || t >= close {
            *sample = 0.0;
            continue;
        }
        if fade <= 0.0 {
            continue;
        }
        let rise = if window.start > 0.0 {
            raised_cosine((t - open) / fade)
        } else {
            1.0
        };
        let fall = if window.end < 1.0 {
            raised_cosine((close - t) / fade)
        } else {
            1.0
        };
        *sample *= rise.min(fall);
    }
}
