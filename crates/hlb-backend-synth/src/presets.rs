//! Named programme presets.
//!
//! The table is built once and never mutated; the composer and the channels
//! read it through a shared handle.

use std::f64::consts::FRAC_PI_2;

use hlb_spec::constants::{
    FULL_PROGRAMME_CYCLE, PRIMES, SCHUMANN_FREQUENCIES, SCHUMANN_WEIGHTS,
};
use hlb_spec::{
    ChirpParams, Layer, NoiseParams, PingParams, SignalSpec, ToneParams,
};
use serde::Serialize;

use crate::error::{SynthError, SynthResult};

/// Output domain a preset is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetDomain {
    /// Audio-rate signal for the mechanical transducer.
    Mechanical,
    /// Real envelope for the RF baseband.
    Baseband,
}

/// A named layer template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    /// Preset name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Output domain.
    pub domain: PresetDomain,
    /// Layers, with windows relative to `cycle` or the full duration.
    pub layers: Vec<Layer>,
    /// Length of the repeating timeline in seconds.
    pub cycle: Option<f64>,
}

impl Preset {
    /// Creates a preset whose windows span the full duration.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        domain: PresetDomain,
        layers: Vec<Layer>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            domain,
            layers,
            cycle: None,
        }
    }

    /// Sets a repeating timeline.
    pub fn with_cycle(mut self, cycle: f64) -> Self {
        self.cycle = Some(cycle);
        self
    }
}

/// Immutable table of presets plus the pulse sequence used by overlays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetTable {
    presets: Vec<Preset>,
    pulse_sequence: Vec<u32>,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PresetTable {
    /// Creates a table from explicit presets.
    pub fn new(presets: Vec<Preset>, pulse_sequence: Vec<u32>) -> Self {
        Self {
            presets,
            pulse_sequence,
        }
    }

    /// The beacon's standard mechanical and baseband presets.
    pub fn standard() -> Self {
        let mechanical = PresetDomain::Mechanical;
        let baseband = PresetDomain::Baseband;

        let presets = vec![
            Preset::new(
                "fundamental",
                "7.83 Hz Schumann fundamental",
                mechanical,
                vec![Layer::new(SignalSpec::tone(SCHUMANN_FREQUENCIES[0], 1.0))],
            ),
            Preset::new(
                "combined",
                "All five Schumann modes, weighted",
                mechanical,
                vec![Layer::new(schumann_stack(1.0))],
            ),
            Preset::new(
                "scan",
                "Step through each Schumann mode in turn",
                mechanical,
                scan_layers(0.8),
            ),
            Preset::new(
                "chirp",
                "Infrasound sweep from 1 Hz to 20 Hz",
                mechanical,
                vec![Layer::new(SignalSpec::chirp(1.0, 20.0, 60.0, 1.0))],
            ),
            Preset::new(
                "breathing",
                "Schumann fundamental under a 4 s breathing envelope",
                mechanical,
                vec![breathing_layer(1.0)],
            ),
            Preset::new(
                "pulsed",
                "Combined Schumann modes gated by the prime sequence",
                mechanical,
                vec![Layer::new(schumann_stack(1.0))
                    .modulated_by(SignalSpec::pulse_gate(&PRIMES, 1.0))],
            ),
            Preset::new(
                "full",
                "Ten-minute protocol cycle of all mechanical programmes",
                mechanical,
                full_cycle_layers(0.5),
            )
            .with_cycle(FULL_PROGRAMME_CYCLE),
            Preset::new(
                "ambient",
                "Six-layer ambient programme with pings and chirp bursts",
                mechanical,
                ambient_layers(),
            ),
            Preset::new(
                "schumann",
                "Carrier envelope following all five Schumann modes",
                baseband,
                vec![Layer::new(dc(1.0)).modulated_by(schumann_envelope(&SCHUMANN_WEIGHTS))],
            ),
            Preset::new(
                "single",
                "Carrier envelope following the 7.83 Hz fundamental",
                baseband,
                vec![Layer::new(dc(1.0)).modulated_by(schumann_envelope(&[1.0]))],
            ),
            Preset::new("cw", "Unmodulated carrier", baseband, vec![Layer::new(dc(1.0))]),
        ];

        Self::new(presets, PRIMES.to_vec())
    }

    /// Returns a copy of the table with `preset` added or replaced.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.presets.retain(|p| p.name != preset.name);
        self.presets.push(preset);
        self
    }

    /// Looks up a preset by name.
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Looks up a preset written for `domain`.
    pub fn resolve(&self, name: &str, domain: PresetDomain) -> SynthResult<&Preset> {
        self.get(name)
            .filter(|p| p.domain == domain)
            .ok_or_else(|| SynthError::UnknownProgramme {
                name: name.to_string(),
                available: self.names(Some(domain)).join(", "),
            })
    }

    /// Preset names, optionally restricted to one domain, in table order.
    pub fn names(&self, domain: Option<PresetDomain>) -> Vec<&str> {
        self.presets
            .iter()
            .filter(|p| domain.map_or(true, |d| p.domain == d))
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Pulse sequence used by channel overlays.
    pub fn pulse_sequence(&self) -> &[u32] {
        &self.pulse_sequence
    }
}

/// Constant 1.0 scaled by `amplitude`: a zero-frequency tone at phase π/2.
fn dc(amplitude: f64) -> SignalSpec {
    SignalSpec::Tone(ToneParams {
        frequency: 0.0,
        amplitude,
        phase: FRAC_PI_2,
    })
}

/// All five Schumann modes as one harmonic stack on the fundamental.
fn schumann_stack(amplitude: f64) -> SignalSpec {
    let fundamental = SCHUMANN_FREQUENCIES[0];
    let overtones: Vec<(f64, f64)> = SCHUMANN_FREQUENCIES[1..]
        .iter()
        .zip(&SCHUMANN_WEIGHTS[1..])
        .map(|(&f, &w)| (f / fundamental, w))
        .collect();
    SignalSpec::harmonic_stack(fundamental, &overtones, amplitude)
}

fn schumann_envelope(weights: &[f64]) -> SignalSpec {
    let partials: Vec<(f64, f64)> = SCHUMANN_FREQUENCIES
        .iter()
        .zip(weights)
        .map(|(&f, &w)| (f, w))
        .collect();
    SignalSpec::composite_envelope(&partials)
}

fn breathing_layer(amplitude: f64) -> Layer {
    Layer::new(SignalSpec::tone(SCHUMANN_FREQUENCIES[0], amplitude))
        .modulated_by(SignalSpec::breathing(4.0))
}

fn scan_layers(amplitude: f64) -> Vec<Layer> {
    let step = 1.0 / SCHUMANN_FREQUENCIES.len() as f64;
    SCHUMANN_FREQUENCIES
        .iter()
        .enumerate()
        .map(|(i, &f)| {
            let end = if i + 1 == SCHUMANN_FREQUENCIES.len() {
                1.0
            } else {
                (i + 1) as f64 * step
            };
            Layer::new(SignalSpec::tone(f, amplitude)).windowed(i as f64 * step, end)
        })
        .collect()
}

/// Segments of the ten-minute cycle, as seconds into the cycle.
fn full_cycle_layers(amplitude: f64) -> Vec<Layer> {
    let at = |start: f64, end: f64| (start / FULL_PROGRAMME_CYCLE, end / FULL_PROGRAMME_CYCLE);

    let segments: Vec<(Layer, (f64, f64))> = vec![
        (
            Layer::new(SignalSpec::tone(SCHUMANN_FREQUENCIES[0], amplitude)),
            at(0.0, 30.0),
        ),
        (
            Layer::new(SignalSpec::tone(SCHUMANN_FREQUENCIES[1], amplitude)),
            at(30.0, 60.0),
        ),
        (Layer::new(schumann_stack(amplitude)), at(60.0, 120.0)),
        (
            Layer::new(SignalSpec::chirp(1.0, 20.0, 60.0, amplitude)),
            at(120.0, 180.0),
        ),
        (breathing_layer(amplitude), at(180.0, 300.0)),
        (
            Layer::new(schumann_stack(amplitude))
                .modulated_by(SignalSpec::pulse_gate(&PRIMES, 1.0)),
            at(300.0, 480.0),
        ),
        (Layer::new(schumann_stack(amplitude)), at(480.0, 600.0)),
    ];

    segments
        .into_iter()
        .map(|(layer, (start, end))| layer.windowed(start, end))
        .collect()
}

fn ambient_layers() -> Vec<Layer> {
    vec![
        Layer::new(SignalSpec::am_tone(100.0, SCHUMANN_FREQUENCIES[0], 1.0, 0.3)),
        Layer::new(SignalSpec::harmonic_stack(
            528.0,
            &[(2.0, 0.5), (3.0, 0.25), (4.0, 0.125)],
            0.15,
        )),
        Layer::new(SignalSpec::Ping(PingParams {
            frequency: 17_000.0,
            interval: 5.0,
            length: 0.05,
            decay: 40.0,
            amplitude: 0.2,
        })),
        Layer::new(SignalSpec::Chirp(ChirpParams {
            start_freq: 2_500.0,
            end_freq: 4_000.0,
            sweep_period: 0.3,
            amplitude: 0.15,
            burst_interval: Some(10.0),
        })),
        Layer::new(SignalSpec::harmonic_stack(
            432.0,
            &[(2.0, 0.4), (3.0, 0.2), (5.0, 0.1)],
            0.1,
        ))
        .modulated_by(SignalSpec::raised_sine(10.0, 0.2)),
        Layer::new(SignalSpec::Noise(NoiseParams {
            amplitude: 0.05,
            band: None,
            breathing_rate: Some(0.25),
            seed: None,
        })),
    ]
}
