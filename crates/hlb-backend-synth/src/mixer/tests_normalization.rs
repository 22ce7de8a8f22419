//! Tests for the normalization pass.

use super::*;

#[test]
fn test_normalize_uses_observed_peak() {
    let mut samples = vec![0.5, -0.25, 0.1];
    let divisor = normalize_to_ceiling(&mut samples, 2.0, 0.9);
    assert_eq!(divisor, 0.5);
    assert!((peak(&samples) - 0.9).abs() < 1e-12);
}

#[test]
fn test_normalize_falls_back_to_theoretical_peak() {
    // Observed peak equal to the theoretical peak.
    let mut samples = vec![1.0, -0.5];
    let divisor = normalize_to_ceiling(&mut samples, 1.0, 0.9);
    assert_eq!(divisor, 1.0);
    assert!((samples[0] - 0.9).abs() < 1e-12);
}

#[test]
fn test_normalize_silent_mix() {
    let mut samples = vec![0.0; 8];
    let divisor = normalize_to_ceiling(&mut samples, 1.5, 0.9);
    assert_eq!(divisor, 1.5);
    assert!(samples.iter().all(|&s| s == 0.0));
}

#[test]
fn test_normalize_zero_theoretical_peak() {
    let mut samples = vec![0.0; 4];
    normalize_to_ceiling(&mut samples, 0.0, 0.9);
    assert!(samples.iter().all(|&s| s == 0.0));
}

#[test]
fn test_mixer_normalized_peak_at_ceiling() {
    let mut mixer = Mixer::new(4);
    mixer.add_layer(vec![0.3, 0.2, -0.1, 0.0], 0.5);
    mixer.add_layer(vec![0.3, -0.2, 0.0, 0.1], 0.5);
    let out = mixer.mix_normalized(0.9);
    assert!((peak(&out) - 0.9).abs() < 1e-12);
    assert!(out.iter().all(|s| s.abs() <= 0.9 + 1e-12));
}
