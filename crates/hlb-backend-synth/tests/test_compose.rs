//! Programme composition and channel integration tests.

use hlb_backend_synth::channel::{Channel, MechanicalChannel, RfChannel};
use hlb_backend_synth::{Composer, PresetDomain, PresetTable, SynthError};
use hlb_spec::constants::OUTPUT_CEILING;
use hlb_spec::{Layer, NoiseParams, Programme, SignalSpec};
use pretty_assertions::assert_eq;

fn composer() -> Composer {
    Composer::new(PresetTable::standard())
}

fn rms(samples: &[f64]) -> f64 {
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}

#[test]
fn test_every_mechanical_preset_respects_ceiling() {
    let composer = composer();
    for name in composer.presets().names(Some(PresetDomain::Mechanical)) {
        let buffer = composer
            .compose_named(name, PresetDomain::Mechanical, 2.0, 44_100)
            .unwrap();
        assert_eq!(buffer.len(), 88_200, "{}", name);
        assert!(buffer.peak() <= OUTPUT_CEILING + 1e-9, "{} peaked at {}", name, buffer.peak());
    }
}

#[test]
fn test_same_programme_same_hash() {
    let composer = composer();
    let a = composer
        .compose_named("ambient", PresetDomain::Mechanical, 1.0, 44_100)
        .unwrap();
    let b = composer
        .compose_named("ambient", PresetDomain::Mechanical, 1.0, 44_100)
        .unwrap();
    assert_eq!(a.content_hash(), b.content_hash());
    assert_eq!(a.to_pcm16(), b.to_pcm16());
}

#[test]
fn test_noise_seed_changes_output() {
    let layers = |seed| {
        vec![
            Layer::new(SignalSpec::tone(50.0, 0.5)),
            Layer::new(SignalSpec::Noise(NoiseParams {
                amplitude: 0.5,
                band: None,
                breathing_rate: None,
                seed: Some(seed),
            })),
        ]
    };
    let a = Programme::new("a", layers(1), 0.5, 8_000).unwrap();
    let b = Programme::new("b", layers(2), 0.5, 8_000).unwrap();
    let composer = composer();
    assert_ne!(
        composer.compose(&a).unwrap().content_hash(),
        composer.compose(&b).unwrap().content_hash()
    );
}

#[test]
fn test_full_programme_follows_its_cycle() {
    // 200 Hz covers every component of the full cycle (highest is 33.8 Hz).
    let sr = 200;
    let buffer = composer()
        .compose_named("full", PresetDomain::Mechanical, 600.0, sr)
        .unwrap();
    let samples = buffer.samples();
    let segment = |start: f64, end: f64| {
        &samples[(start * sr as f64) as usize..(end * sr as f64) as usize]
    };

    // Each segment carries signal.
    for (start, end) in [(0.0, 30.0), (30.0, 60.0), (60.0, 120.0), (120.0, 180.0), (480.0, 600.0)] {
        assert!(rms(segment(start + 1.0, end - 1.0)) > 0.01, "{}..{}", start, end);
    }

    // The prime gate runs from the programme origin: 281..328 s is an on
    // segment (47 units) and 328..381 s is off (53 units).
    assert!(rms(segment(301.0, 327.0)) > 0.01);
    assert!(segment(329.0, 380.0).iter().all(|&s| s == 0.0));
}

#[test]
fn test_invalid_programme_reports_layer_path() {
    let programme = Programme {
        name: "bad".to_string(),
        layers: vec![
            Layer::new(SignalSpec::tone(10.0, 0.5)),
            Layer::new(SignalSpec::tone(30_000.0, 0.5)),
        ],
        duration: 1.0,
        sample_rate: 44_100,
        cycle: None,
    };
    match composer().compose(&programme).unwrap_err() {
        SynthError::UnsupportedFrequency { name, .. } => {
            assert!(name.starts_with("layers[1]"), "{}", name)
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_channels_share_one_table() {
    let composer = composer();
    let mech = MechanicalChannel::with_sample_rate(composer.clone(), 1_000);
    let rf = RfChannel::new(composer).with_sample_rate(4_000);

    let audio = mech.produce("fundamental", 1.0).unwrap();
    let iq = rf.produce("single", 1.0).unwrap();
    assert_eq!(audio.len(), 1_000);
    assert_eq!(iq.len(), 4_000);
    assert_eq!(iq.to_iq_int8().len(), 8_000);
    assert_eq!(audio.to_pcm16().len(), 2_000);
}
