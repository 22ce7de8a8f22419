//! Signal and layer validation.
//!
//! Every primitive's parameters are checked here before any sample is
//! generated, so synthesis code can assume well-formed input.

pub mod common;

pub use common::{
    is_below_nyquist, validate_non_negative, validate_positive, validate_range,
    validate_unit_interval, CommonValidationError,
};

use crate::error::ValidationError;
use crate::signal::{EnvelopeCurve, Layer, SignalSpec};

fn field<T>(path: &str, result: Result<T, CommonValidationError>) -> Result<T, ValidationError> {
    result.map_err(|e| ValidationError::invalid_param(path, e.message))
}

/// Validates the parameters of one signal, including the Nyquist guard.
///
/// # Arguments
/// * `spec` - The signal to validate
/// * `sample_rate` - Rate the signal will be generated at
///
/// # Returns
/// * `Err` with `InvalidParameter` for malformed values
/// * `Err` with `UnsupportedFrequency` if any component is at or above `sample_rate / 2`
///
/// # Example
/// ```
/// use hlb_spec::validation::validate_signal;
/// use hlb_spec::{ErrorCode, SignalSpec};
///
/// assert!(validate_signal(&SignalSpec::tone(7.83, 1.0), 44_100).is_ok());
/// let err = validate_signal(&SignalSpec::tone(30_000.0, 1.0), 44_100).unwrap_err();
/// assert_eq!(err.code, ErrorCode::UnsupportedFrequency);
/// ```
pub fn validate_signal(spec: &SignalSpec, sample_rate: u32) -> Result<(), ValidationError> {
    if sample_rate == 0 {
        return Err(ValidationError::invalid_param(
            "sample_rate",
            "sample_rate must be positive",
        ));
    }

    validate_parameters(spec)?;

    for (path, frequency) in spec.frequency_components() {
        if !is_below_nyquist(frequency, sample_rate) {
            return Err(ValidationError::unsupported_frequency(
                path,
                frequency,
                sample_rate,
            ));
        }
    }

    Ok(())
}

fn validate_parameters(spec: &SignalSpec) -> Result<(), ValidationError> {
    match spec {
        SignalSpec::Tone(p) => {
            field("frequency", validate_non_negative("frequency", p.frequency))?;
            field("amplitude", validate_unit_interval("amplitude", p.amplitude))?;
            if !p.phase.is_finite() {
                return Err(ValidationError::invalid_param(
                    "phase",
                    "phase must be finite",
                ));
            }
        }
        SignalSpec::AmTone(p) => {
            field(
                "carrier_freq",
                validate_non_negative("carrier_freq", p.carrier_freq),
            )?;
            field(
                "modulator_freq",
                validate_non_negative("modulator_freq", p.modulator_freq),
            )?;
            field("depth", validate_unit_interval("depth", p.depth))?;
            field("amplitude", validate_unit_interval("amplitude", p.amplitude))?;
        }
        SignalSpec::HarmonicStack(p) => {
            field("fundamental", validate_non_negative("fundamental", p.fundamental))?;
            field("amplitude", validate_unit_interval("amplitude", p.amplitude))?;
            for (i, h) in p.harmonics.iter().enumerate() {
                let path = format!("harmonics[{}]", i);
                field(&path, validate_positive("multiplier", h.multiplier))?;
                field(&path, validate_non_negative("amplitude", h.amplitude))?;
            }
        }
        SignalSpec::Chirp(p) => {
            field("start_freq", validate_non_negative("start_freq", p.start_freq))?;
            field("end_freq", validate_non_negative("end_freq", p.end_freq))?;
            field("sweep_period", validate_positive("sweep_period", p.sweep_period))?;
            field("amplitude", validate_unit_interval("amplitude", p.amplitude))?;
            if let Some(interval) = p.burst_interval {
                field("burst_interval", validate_positive("burst_interval", interval))?;
                if interval < p.sweep_period {
                    return Err(ValidationError::invalid_param(
                        "burst_interval",
                        format!(
                            "burst_interval ({}) must not be shorter than sweep_period ({})",
                            interval, p.sweep_period
                        ),
                    ));
                }
            }
        }
        SignalSpec::Noise(p) => {
            field("amplitude", validate_unit_interval("amplitude", p.amplitude))?;
            if let Some(band) = p.band {
                field("band.low", validate_non_negative("low", band.low))?;
                field("band.high", validate_positive("high", band.high))?;
                if band.low >= band.high {
                    return Err(ValidationError::invalid_param(
                        "band",
                        format!(
                            "band low ({}) must be below band high ({})",
                            band.low, band.high
                        ),
                    ));
                }
            }
            if let Some(rate) = p.breathing_rate {
                field("breathing_rate", validate_positive("breathing_rate", rate))?;
            }
        }
        SignalSpec::Envelope(p) => match &p.curve {
            EnvelopeCurve::RaisedSine { period, depth } | EnvelopeCurve::Breathing { period, depth } => {
                field("curve.period", validate_positive("period", *period))?;
                field("curve.depth", validate_unit_interval("depth", *depth))?;
            }
            EnvelopeCurve::Composite { partials } => {
                if partials.is_empty() {
                    return Err(ValidationError::invalid_param(
                        "curve.partials",
                        "composite envelope needs at least one partial",
                    ));
                }
                let mut total_weight = 0.0;
                for (i, partial) in partials.iter().enumerate() {
                    let path = format!("curve.partials[{}]", i);
                    field(&path, validate_non_negative("frequency", partial.frequency))?;
                    if !partial.weight.is_finite() {
                        return Err(ValidationError::invalid_param(
                            path,
                            "weight must be finite",
                        ));
                    }
                    total_weight += partial.weight.abs();
                }
                if total_weight == 0.0 {
                    return Err(ValidationError::invalid_param(
                        "curve.partials",
                        "composite envelope weights must not all be zero",
                    ));
                }
            }
        },
        SignalSpec::PulseGate(p) => {
            if p.sequence.is_empty() {
                return Err(ValidationError::invalid_param(
                    "sequence",
                    "pulse gate sequence must not be empty",
                ));
            }
            if let Some(i) = p.sequence.iter().position(|&n| n == 0) {
                return Err(ValidationError::invalid_param(
                    format!("sequence[{}]", i),
                    "pulse gate durations must be non-zero",
                ));
            }
            field("unit", validate_positive("unit", p.unit))?;
            field("ramp", validate_non_negative("ramp", p.ramp))?;
            if p.ramp * 2.0 > p.unit {
                return Err(ValidationError::invalid_param(
                    "ramp",
                    format!(
                        "ramp ({}) must be at most half the gate unit ({})",
                        p.ramp, p.unit
                    ),
                ));
            }
        }
        SignalSpec::Ping(p) => {
            field("frequency", validate_non_negative("frequency", p.frequency))?;
            field("interval", validate_positive("interval", p.interval))?;
            field("length", validate_positive("length", p.length))?;
            field("decay", validate_non_negative("decay", p.decay))?;
            field("amplitude", validate_unit_interval("amplitude", p.amplitude))?;
            if p.length > p.interval {
                return Err(ValidationError::invalid_param(
                    "length",
                    format!(
                        "ping length ({}) must not exceed its interval ({})",
                        p.length, p.interval
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Validates one layer: source kind, modulator kinds, window and every signal.
pub fn validate_layer(layer: &Layer, sample_rate: u32) -> Result<(), ValidationError> {
    if layer.signal.is_modulator() {
        return Err(ValidationError::invalid_param(
            "signal",
            format!("{} cannot be a layer source", layer.signal.kind()),
        ));
    }
    validate_signal(&layer.signal, sample_rate).map_err(|e| e.nested("signal"))?;

    for (i, modulator) in layer.modulators.iter().enumerate() {
        let path = format!("modulators[{}]", i);
        if !modulator.is_modulator() {
            return Err(ValidationError::invalid_param(
                path,
                format!("{} cannot modulate a layer", modulator.kind()),
            ));
        }
        validate_signal(modulator, sample_rate).map_err(|e| e.nested(&path))?;
    }

    if let Some(window) = layer.window {
        field("window.start", validate_unit_interval("start", window.start))?;
        field("window.end", validate_unit_interval("end", window.end))?;
        if window.start >= window.end {
            return Err(ValidationError::invalid_param(
                "window",
                format!(
                    "window start ({}) must be before its end ({})",
                    window.start, window.end
                ),
            ));
        }
    }

    Ok(())
}
