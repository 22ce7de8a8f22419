//! Tests for summing, modulation and windowing.

use hlb_spec::LayerWindow;

use super::*;

#[test]
fn test_mix_sums_layers() {
    let mut mixer = Mixer::new(3);
    mixer.add_layer(vec![0.1, 0.2, 0.3], 0.3);
    mixer.add_layer(vec![0.1, -0.2, 0.0], 0.2);
    assert_eq!(mixer.layer_count(), 2);
    assert_eq!(mixer.theoretical_peak(), 0.5);
    let out = mixer.mix();
    assert!((out[0] - 0.2).abs() < 1e-12);
    assert!(out[1].abs() < 1e-12);
    assert!((out[2] - 0.3).abs() < 1e-12);
}

#[test]
fn test_short_layer_is_zero_padded() {
    let mut mixer = Mixer::new(4);
    mixer.add_layer(vec![1.0, 1.0], 1.0);
    assert_eq!(mixer.mix(), vec![1.0, 1.0, 0.0, 0.0]);
}

#[test]
fn test_apply_modulator() {
    let mut samples = vec![1.0, 1.0, -1.0];
    apply_modulator(&mut samples, &[0.0, 0.5, 1.0]);
    assert_eq!(samples, vec![0.0, 0.5, -1.0]);
}

#[test]
fn test_window_silences_outside() {
    // 10 s timeline at 10 Hz, window 0.2..0.5 => samples 20..50 sound.
    let mut samples = vec![1.0; 100];
    apply_window(&mut samples, &LayerWindow::new(0.2, 0.5), 10.0, 10.0, 0, 0.0);
    assert!(samples[..20].iter().all(|&s| s == 0.0));
    assert!(samples[20..50].iter().all(|&s| s == 1.0));
    assert!(samples[50..].iter().all(|&s| s == 0.0));
}

#[test]
fn test_window_repeats_with_timeline() {
    let mut samples = vec![1.0; 200];
    apply_window(&mut samples, &LayerWindow::new(0.0, 0.5), 10.0, 10.0, 0, 0.0);
    assert_eq!(samples[100], 1.0);
    assert_eq!(samples[150], 0.0);
}

#[test]
fn test_window_fades_inner_edges() {
    let mut samples = vec![1.0; 1_000];
    apply_window(&mut samples, &LayerWindow::new(0.25, 0.75), 1.0, 1_000.0, 0, 0.01);
    assert_eq!(samples[250], 0.0);
    assert!((samples[255] - 0.5).abs() < 1e-9);
    assert_eq!(samples[500], 1.0);
    assert!(samples[749] < 0.2);
}
