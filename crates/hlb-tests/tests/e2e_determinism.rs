//! End-to-end determinism tests.
//!
//! Tests verify:
//! - Every preset renders to identical bytes on every run
//! - Separate composers over separate tables agree
//! - Two simulated sessions deliver identical buffers
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hlb-tests --test e2e_determinism
//! ```

use hlb_backend_synth::channel::{Channel, MechanicalChannel, RfChannel};
use hlb_backend_synth::{Composer, PresetDomain, PresetTable};
use hlb_protocol::Controller;
use hlb_spec::CarrierSelector;
use hlb_tests::fixtures::{simulated_config, ScriptedSensor, SimulatedSession};
use hlb_tests::verify_determinism;
use pretty_assertions::assert_eq;

// ============================================================================
// Presets
// ============================================================================

#[test]
fn test_mechanical_presets_are_deterministic() {
    let table = PresetTable::standard();
    for name in table.names(Some(PresetDomain::Mechanical)) {
        let result = verify_determinism(
            || {
                let channel = MechanicalChannel::new(Composer::new(PresetTable::standard()));
                channel.produce(name, 0.5).unwrap().to_pcm16()
            },
            3,
        );
        assert!(result.is_deterministic, "{} is not deterministic", name);
        assert_eq!(result.output_size, 44_100, "{}", name);
    }
}

#[test]
fn test_rf_presets_are_deterministic() {
    let table = PresetTable::standard();
    for name in table.names(Some(PresetDomain::Baseband)) {
        let result = verify_determinism(
            || {
                RfChannel::new(Composer::new(PresetTable::standard()))
                    .with_sample_rate(48_000)
                    .with_carrier_offset(1_000.0)
                    .with_pulsed(true)
                    .produce(name, 0.25)
                    .unwrap()
                    .to_iq_int8()
            },
            2,
        );
        result.assert_deterministic();
        assert_eq!(result.output_size, 24_000, "{}", name);
    }
}

#[test]
fn test_carrier_choice_does_not_change_baseband() {
    let composer = Composer::new(PresetTable::standard());
    let hydrogen = RfChannel::new(composer.clone())
        .with_sample_rate(10_000)
        .produce("schumann", 0.5)
        .unwrap();
    let ism = RfChannel::new(composer)
        .with_sample_rate(10_000)
        .with_carrier(CarrierSelector::from_name("433").unwrap())
        .produce("schumann", 0.5)
        .unwrap();
    assert_eq!(hydrogen.content_hash(), ism.content_hash());
}

#[test]
fn test_ambient_noise_seed_is_stable() {
    // The ambient noise layer has no explicit seed; it derives one from its parameters.
    let a = Composer::new(PresetTable::standard())
        .compose_named("ambient", PresetDomain::Mechanical, 0.5, 44_100)
        .unwrap();
    let b = Composer::default()
        .compose_named("ambient", PresetDomain::Mechanical, 0.5, 44_100)
        .unwrap();
    assert_eq!(a.content_hash(), b.content_hash());
}

// ============================================================================
// Sessions
// ============================================================================

fn session_hashes() -> (Vec<String>, Vec<String>) {
    let session = SimulatedSession::new();
    let config = hlb_spec::BeaconConfig {
        total_duration: 900.0,
        ..simulated_config()
    };
    let mut controller =
        Controller::new(config, session.collaborators(ScriptedSensor::unit_normal())).unwrap();
    controller.run().unwrap();
    (
        session.mechanical.deliveries().into_iter().map(|d| d.hash).collect(),
        session.rf.deliveries().into_iter().map(|d| d.hash).collect(),
    )
}

#[test]
fn test_sessions_deliver_identical_buffers() {
    let (mech_a, rf_a) = session_hashes();
    let (mech_b, rf_b) = session_hashes();
    assert_eq!(mech_a.len(), 4);
    assert_eq!(rf_a.len(), 4);
    assert_eq!(mech_a, mech_b);
    assert_eq!(rf_a, rf_b);
    // Every full transmit window carries the same programme.
    assert!(mech_a.windows(2).all(|w| w[0] == w[1]));
}
