//! Synthesis primitives.
//!
//! Each module implements one [`SignalSpec`] variant:
//! - `tone` - Pure sine tone
//! - `am` - Sine carrier with non-inverting amplitude modulation
//! - `harmonics` - Fundamental plus weighted overtones
//! - `chirp` - Repeating linear sweep with continuous phase
//! - `noise` - Seeded, band-limited noise with optional breathing
//! - `envelope` - Raised sine, breathing and composite multipliers
//! - `gate` - Prime-style on/off gate with raised-cosine edges
//! - `ping` - Short decaying tone bursts
//!
//! All primitives are pure: the output depends only on the parameters, the
//! sample rate and the absolute sample range requested.

pub mod am;
pub mod chirp;
pub mod envelope;
pub mod gate;
pub mod harmonics;
pub mod noise;
pub mod ping;
pub mod tone;

use hlb_spec::validation::validate_signal;
use hlb_spec::SignalSpec;
use tracing::debug;

use crate::error::{SynthError, SynthResult};

pub use am::AmSynth;
pub use chirp::ChirpSynth;
pub use envelope::EnvelopeSynth;
pub use gate::PulseGateSynth;
pub use harmonics::HarmonicSynth;
pub use noise::NoiseSynth;
pub use ping::PingSynth;
pub use tone::ToneSynth;

/// Common trait for all synthesis primitives.
pub trait Synthesizer {
    /// Generates samples.
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `start_sample` - Absolute index of the first sample, from the programme origin
    /// * `num_samples` - Number of samples to generate
    ///
    /// # Returns
    /// `num_samples` values; sample `i` is the signal at `t = (start_sample + i) / sample_rate`
    fn synthesize(&self, sample_rate: f64, start_sample: u64, num_samples: usize) -> Vec<f64>;
}

/// Validates `spec` and renders the requested sample range.
///
/// # Arguments
/// * `spec` - Signal to render
/// * `sample_rate` - Sample rate in Hz
/// * `start_sample` - Absolute index of the first sample
/// * `num_samples` - Number of samples to generate
///
/// # Returns
/// * `SynthError::InvalidParameter` for malformed parameters
/// * `SynthError::UnsupportedFrequency` for components at or above the Nyquist limit
///
/// # Example
/// ```
/// use hlb_backend_synth::synthesis::render;
/// use hlb_spec::SignalSpec;
///
/// let samples = render(&SignalSpec::tone(7.83, 0.5), 44_100, 0, 1000).unwrap();
/// assert_eq!(samples.len(), 1000);
/// assert!(samples.iter().all(|s| s.abs() <= 0.5));
/// ```
pub fn render(
    spec: &SignalSpec,
    sample_rate: u32,
    start_sample: u64,
    num_samples: usize,
) -> SynthResult<Vec<f64>> {
    validate_signal(spec, sample_rate).map_err(SynthError::from)?;
    debug!(
        kind = %spec.kind(),
        sample_rate,
        start_sample,
        num_samples,
        "rendering signal"
    );

    let sr = sample_rate as f64;
    let samples = match spec {
        SignalSpec::Tone(p) => ToneSynth::from(p).synthesize(sr, start_sample, num_samples),
        SignalSpec::AmTone(p) => AmSynth::from(p).synthesize(sr, start_sample, num_samples),
        SignalSpec::HarmonicStack(p) => {
            HarmonicSynth::from(p).synthesize(sr, start_sample, num_samples)
        }
        SignalSpec::Chirp(p) => ChirpSynth::from(p).synthesize(sr, start_sample, num_samples),
        SignalSpec::Noise(p) => NoiseSynth::from_params(p)?.synthesize(sr, start_sample, num_samples),
        SignalSpec::Envelope(p) => {
            EnvelopeSynth::from(p).synthesize(sr, start_sample, num_samples)
        }
        SignalSpec::PulseGate(p) => {
            PulseGateSynth::from(p).synthesize(sr, start_sample, num_samples)
        }
        SignalSpec::Ping(p) => PingSynth::from(p).synthesize(sr, start_sample, num_samples),
    };
    Ok(samples)
}

/// Renders a duration in seconds from the origin.
///
/// Zero, negative or non-finite durations are rejected.
pub fn render_duration(spec: &SignalSpec, sample_rate: u32, duration: f64) -> SynthResult<Vec<f64>> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(SynthError::invalid_param(
            "duration",
            format!("duration must be positive, got {}", duration),
        ));
    }
    let num_samples = (duration * sample_rate as f64).round() as usize;
    render(spec, sample_rate, 0, num_samples)
}
