//! Integration tests for the synthesis primitives.

use hlb_backend_synth::synthesis::{render, render_duration};
use hlb_backend_synth::SynthError;
use hlb_spec::{NoiseBand, NoiseParams, SignalSpec};

fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0f64, |a, s| a.max(s.abs()))
}

/// Counts rising zero crossings.
fn rising_crossings(samples: &[f64]) -> usize {
    samples.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count()
}

// ============================================================================
// Tones
// ============================================================================

#[test]
fn test_tone_frequency_by_zero_crossings() {
    let samples = render_duration(&SignalSpec::tone(10.0, 1.0), 1_000, 1.0).unwrap();
    let crossings = rising_crossings(&samples);
    assert!((9..=10).contains(&crossings), "crossings = {}", crossings);
}

#[test]
fn test_am_tone_stays_within_amplitude() {
    let spec = SignalSpec::am_tone(100.0, 7.83, 1.0, 0.3);
    let samples = render_duration(&spec, 8_000, 1.0).unwrap();
    assert!(peak(&samples) <= 0.3 + 1e-12);
    assert!(peak(&samples) > 0.25);
}

#[test]
fn test_harmonic_stack_is_bounded_by_amplitude() {
    let spec = SignalSpec::harmonic_falloff(55.0, 6, 0.6, 0.5);
    let samples = render_duration(&spec, 8_000, 1.0).unwrap();
    assert!(peak(&samples) <= 0.5 + 1e-12);
}

// ============================================================================
// Chirp and ping
// ============================================================================

#[test]
fn test_chirp_is_continuous_across_sweep_boundary() {
    // 1 s sweeps at 1 kHz: no jump larger than one step at the top frequency.
    let spec = SignalSpec::chirp(5.0, 50.0, 1.0, 1.0);
    let samples = render_duration(&spec, 1_000, 3.0).unwrap();
    let max_step = std::f64::consts::TAU * 50.0 / 1_000.0 + 1e-9;
    for w in samples.windows(2) {
        assert!((w[1] - w[0]).abs() <= max_step);
    }
}

#[test]
fn test_ping_is_silent_between_pings() {
    let spec = SignalSpec::Ping(hlb_spec::PingParams {
        frequency: 1_000.0,
        interval: 1.0,
        length: 0.1,
        decay: 10.0,
        amplitude: 0.5,
    });
    let samples = render_duration(&spec, 8_000, 2.0).unwrap();
    assert!(samples[1_000..8_000].iter().all(|&s| s == 0.0));
    assert!(samples[8_000..8_800].iter().any(|&s| s != 0.0));
}

// ============================================================================
// Noise
// ============================================================================

#[test]
fn test_noise_same_seed_same_samples() {
    let spec = SignalSpec::Noise(NoiseParams {
        amplitude: 0.5,
        band: None,
        breathing_rate: None,
        seed: Some(7),
    });
    let a = render(&spec, 8_000, 0, 4_000).unwrap();
    let b = render(&spec, 8_000, 0, 4_000).unwrap();
    assert_eq!(a, b);
    assert!(peak(&a) <= 0.5);
}

#[test]
fn test_noise_different_seeds_differ() {
    let make = |seed| {
        SignalSpec::Noise(NoiseParams {
            amplitude: 0.5,
            band: None,
            breathing_rate: None,
            seed: Some(seed),
        })
    };
    let a = render(&make(1), 8_000, 0, 1_000).unwrap();
    let b = render(&make(2), 8_000, 0, 1_000).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_band_noise_is_bounded() {
    let spec = SignalSpec::Noise(NoiseParams {
        amplitude: 0.4,
        band: Some(NoiseBand {
            low: 100.0,
            high: 400.0,
        }),
        breathing_rate: Some(0.5),
        seed: None,
    });
    let samples = render_duration(&spec, 8_000, 1.0).unwrap();
    assert!(peak(&samples) <= 0.4 + 1e-12);
    assert!(peak(&samples) > 0.0);
}

// ============================================================================
// Modulators
// ============================================================================

#[test]
fn test_envelopes_stay_in_unit_interval() {
    let specs = [
        SignalSpec::breathing(4.0),
        SignalSpec::raised_sine(2.0, 0.5),
        SignalSpec::composite_envelope(&[(7.83, 0.7), (14.3, 0.5), (20.8, 0.3)]),
        SignalSpec::pulse_gate(&[2, 3, 5], 0.1),
    ];
    for spec in &specs {
        let samples = render_duration(spec, 1_000, 5.0).unwrap();
        assert!(
            samples.iter().all(|&s| (0.0..=1.0).contains(&s)),
            "{} left [0, 1]",
            spec.kind()
        );
    }
}

#[test]
fn test_pulse_gate_odd_sequence_alternates_across_wrap() {
    // [1, 2, 3] at 1 s units: on 0-1, off 1-3, on 3-6, then off 6-7, on 7-9, off 9-12.
    let spec = SignalSpec::pulse_gate(&[1, 2, 3], 1.0);
    let samples = render_duration(&spec, 100, 12.0).unwrap();
    assert_eq!(samples[50], 1.0);
    assert_eq!(samples[200], 0.0);
    assert_eq!(samples[450], 1.0);
    assert_eq!(samples[650], 0.0);
    assert_eq!(samples[800], 1.0);
    assert_eq!(samples[1_050], 0.0);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_nyquist_is_rejected() {
    let err = render(&SignalSpec::tone(22_050.0, 1.0), 44_100, 0, 10).unwrap_err();
    match err {
        SynthError::UnsupportedFrequency {
            frequency,
            sample_rate,
            ..
        } => {
            assert_eq!(frequency, 22_050.0);
            assert_eq!(sample_rate, 44_100);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_empty_pulse_sequence_is_rejected() {
    let err = render(&SignalSpec::pulse_gate(&[], 1.0), 1_000, 0, 10).unwrap_err();
    assert!(matches!(err, SynthError::InvalidParameter { .. }));
}

#[test]
fn test_zero_duration_is_rejected() {
    assert!(render_duration(&SignalSpec::tone(10.0, 1.0), 1_000, 0.0).is_err());
}
