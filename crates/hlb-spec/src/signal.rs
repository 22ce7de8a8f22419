//! Signal layer descriptions.
//!
//! A [`SignalSpec`] is an immutable description of one synthesis primitive.
//! Layers reference specs by value; nothing mutates a spec after creation.

use serde::{Deserialize, Serialize};

/// One synthesis primitive and its parameter record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalSpec {
    /// Pure sine tone.
    Tone(ToneParams),
    /// Sine carrier with sinusoidal amplitude modulation.
    AmTone(AmToneParams),
    /// Fundamental plus weighted overtones.
    HarmonicStack(HarmonicStackParams),
    /// Repeating linear frequency sweep.
    Chirp(ChirpParams),
    /// Seeded, optionally band-limited noise.
    Noise(NoiseParams),
    /// Periodic amplitude multiplier in [0, 1].
    Envelope(EnvelopeParams),
    /// Deterministic on/off gate in [0, 1].
    PulseGate(PulseGateParams),
    /// Short decaying tone bursts at a fixed interval.
    Ping(PingParams),
}

/// Tone parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneParams {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Peak amplitude (0.0 to 1.0).
    pub amplitude: f64,
    /// Phase offset in radians.
    #[serde(default)]
    pub phase: f64,
}

/// AM tone parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmToneParams {
    /// Carrier frequency in Hz.
    pub carrier_freq: f64,
    /// Modulator frequency in Hz.
    pub modulator_freq: f64,
    /// Modulation depth (0.0 to 1.0).
    pub depth: f64,
    /// Peak amplitude (0.0 to 1.0).
    pub amplitude: f64,
}

/// One overtone of a harmonic stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Harmonic {
    /// Frequency multiplier relative to the fundamental.
    pub multiplier: f64,
    /// Amplitude relative to the fundamental.
    pub amplitude: f64,
}

/// Harmonic stack parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicStackParams {
    /// Fundamental frequency in Hz.
    pub fundamental: f64,
    /// Ordered overtones; the fundamental itself has relative amplitude 1.0.
    pub harmonics: Vec<Harmonic>,
    /// Peak amplitude of the whole stack (0.0 to 1.0).
    pub amplitude: f64,
}

/// Chirp parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChirpParams {
    /// Frequency at the start of each sweep, in Hz.
    pub start_freq: f64,
    /// Frequency at the end of each sweep, in Hz.
    pub end_freq: f64,
    /// Sweep length in seconds.
    pub sweep_period: f64,
    /// Peak amplitude (0.0 to 1.0).
    pub amplitude: f64,
    /// When set, one windowed sweep per interval with silence in between.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst_interval: Option<f64>,
}

/// Noise pass band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseBand {
    /// High-pass corner in Hz.
    pub low: f64,
    /// Low-pass corner in Hz.
    pub high: f64,
}

/// Noise parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Peak amplitude (0.0 to 1.0).
    pub amplitude: f64,
    /// Optional pass band; full band when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<NoiseBand>,
    /// Rate of the breathing envelope in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breathing_rate: Option<f64>,
    /// Explicit seed; derived from the signal's canonical hash when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// One weighted partial of a composite envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Partial {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Weight (sign allowed).
    pub weight: f64,
}

/// Envelope curve shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum EnvelopeCurve {
    /// `1 - depth + depth * (1 + sin(2πt/T)) / 2`
    RaisedSine {
        /// Period in seconds.
        period: f64,
        /// Modulation depth (0.0 to 1.0).
        #[serde(default = "default_depth")]
        depth: f64,
    },
    /// `1 - depth + depth * ((1 + sin(2πt/T)) / 2)^2`
    Breathing {
        /// Period in seconds.
        period: f64,
        /// Modulation depth (0.0 to 1.0).
        #[serde(default = "default_depth")]
        depth: f64,
    },
    /// Weighted sum of sinusoids rescaled into [0, 1].
    Composite {
        /// Partials.
        partials: Vec<Partial>,
    },
}

fn default_depth() -> f64 {
    1.0
}

/// Envelope parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeParams {
    /// Curve shape.
    pub curve: EnvelopeCurve,
}

/// Pulse gate parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseGateParams {
    /// Alternating on/off durations in units, starting with "on".
    pub sequence: Vec<u32>,
    /// Seconds per sequence unit.
    #[serde(default = "default_gate_unit")]
    pub unit: f64,
    /// Raised-cosine edge length in seconds.
    #[serde(default = "default_gate_ramp")]
    pub ramp: f64,
}

fn default_gate_unit() -> f64 {
    1.0
}

fn default_gate_ramp() -> f64 {
    0.005
}

/// Ping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingParams {
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Seconds between ping onsets.
    pub interval: f64,
    /// Ping length in seconds.
    pub length: f64,
    /// Exponential decay rate per second.
    pub decay: f64,
    /// Peak amplitude (0.0 to 1.0).
    pub amplitude: f64,
}

/// Name of a primitive kind, for logging and error paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Tone,
    AmTone,
    HarmonicStack,
    Chirp,
    Noise,
    Envelope,
    PulseGate,
    Ping,
}

impl SignalKind {
    /// Returns the snake_case name used in serialized specs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Tone => "tone",
            SignalKind::AmTone => "am_tone",
            SignalKind::HarmonicStack => "harmonic_stack",
            SignalKind::Chirp => "chirp",
            SignalKind::Noise => "noise",
            SignalKind::Envelope => "envelope",
            SignalKind::PulseGate => "pulse_gate",
            SignalKind::Ping => "ping",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SignalSpec {
    /// Creates a zero-phase tone.
    pub fn tone(frequency: f64, amplitude: f64) -> Self {
        SignalSpec::Tone(ToneParams {
            frequency,
            amplitude,
            phase: 0.0,
        })
    }

    /// Creates an AM tone.
    pub fn am_tone(carrier_freq: f64, modulator_freq: f64, depth: f64, amplitude: f64) -> Self {
        SignalSpec::AmTone(AmToneParams {
            carrier_freq,
            modulator_freq,
            depth,
            amplitude,
        })
    }

    /// Creates a harmonic stack from explicit `(multiplier, relative amplitude)` pairs.
    pub fn harmonic_stack(fundamental: f64, harmonics: &[(f64, f64)], amplitude: f64) -> Self {
        SignalSpec::HarmonicStack(HarmonicStackParams {
            fundamental,
            harmonics: harmonics
                .iter()
                .map(|&(multiplier, amplitude)| Harmonic {
                    multiplier,
                    amplitude,
                })
                .collect(),
            amplitude,
        })
    }

    /// Creates a stack of integer overtones 2..=count+1 with geometric falloff.
    ///
    /// Overtone `k` (1-based) gets relative amplitude `falloff^k`.
    pub fn harmonic_falloff(fundamental: f64, count: usize, falloff: f64, amplitude: f64) -> Self {
        let harmonics = (1..=count)
            .map(|k| Harmonic {
                multiplier: (k + 1) as f64,
                amplitude: falloff.powi(k as i32),
            })
            .collect();
        SignalSpec::HarmonicStack(HarmonicStackParams {
            fundamental,
            harmonics,
            amplitude,
        })
    }

    /// Creates a continuously repeating chirp.
    pub fn chirp(start_freq: f64, end_freq: f64, sweep_period: f64, amplitude: f64) -> Self {
        SignalSpec::Chirp(ChirpParams {
            start_freq,
            end_freq,
            sweep_period,
            amplitude,
            burst_interval: None,
        })
    }

    /// Creates full-band noise with a hash-derived seed.
    pub fn noise(amplitude: f64) -> Self {
        SignalSpec::Noise(NoiseParams {
            amplitude,
            band: None,
            breathing_rate: None,
            seed: None,
        })
    }

    /// Creates a breathing envelope with full depth.
    pub fn breathing(period: f64) -> Self {
        SignalSpec::Envelope(EnvelopeParams {
            curve: EnvelopeCurve::Breathing { period, depth: 1.0 },
        })
    }

    /// Creates a raised-sine envelope.
    pub fn raised_sine(period: f64, depth: f64) -> Self {
        SignalSpec::Envelope(EnvelopeParams {
            curve: EnvelopeCurve::RaisedSine { period, depth },
        })
    }

    /// Creates a composite envelope from `(frequency, weight)` pairs.
    pub fn composite_envelope(partials: &[(f64, f64)]) -> Self {
        SignalSpec::Envelope(EnvelopeParams {
            curve: EnvelopeCurve::Composite {
                partials: partials
                    .iter()
                    .map(|&(frequency, weight)| Partial { frequency, weight })
                    .collect(),
            },
        })
    }

    /// Creates a pulse gate with the default edge ramp.
    pub fn pulse_gate(sequence: &[u32], unit: f64) -> Self {
        SignalSpec::PulseGate(PulseGateParams {
            sequence: sequence.to_vec(),
            unit,
            ramp: default_gate_ramp(),
        })
    }

    /// Returns the primitive kind.
    pub fn kind(&self) -> SignalKind {
        match self {
            SignalSpec::Tone(_) => SignalKind::Tone,
            SignalSpec::AmTone(_) => SignalKind::AmTone,
            SignalSpec::HarmonicStack(_) => SignalKind::HarmonicStack,
            SignalSpec::Chirp(_) => SignalKind::Chirp,
            SignalSpec::Noise(_) => SignalKind::Noise,
            SignalSpec::Envelope(_) => SignalKind::Envelope,
            SignalSpec::PulseGate(_) => SignalKind::PulseGate,
            SignalSpec::Ping(_) => SignalKind::Ping,
        }
    }

    /// Returns the peak amplitude this signal can reach.
    ///
    /// Envelopes and gates are unit-range multipliers.
    pub fn amplitude(&self) -> f64 {
        match self {
            SignalSpec::Tone(p) => p.amplitude,
            SignalSpec::AmTone(p) => p.amplitude,
            SignalSpec::HarmonicStack(p) => p.amplitude,
            SignalSpec::Chirp(p) => p.amplitude,
            SignalSpec::Noise(p) => p.amplitude,
            SignalSpec::Envelope(_) | SignalSpec::PulseGate(_) => 1.0,
            SignalSpec::Ping(p) => p.amplitude,
        }
    }

    /// Returns true for kinds that may multiply another layer.
    pub fn is_modulator(&self) -> bool {
        matches!(self, SignalSpec::Envelope(_) | SignalSpec::PulseGate(_))
    }

    /// Lists every frequency component with the field it comes from.
    ///
    /// AM sidebands are reported at `carrier + modulator`.
    pub fn frequency_components(&self) -> Vec<(&'static str, f64)> {
        match self {
            SignalSpec::Tone(p) => vec![("frequency", p.frequency)],
            SignalSpec::AmTone(p) => vec![
                ("carrier_freq", p.carrier_freq),
                ("modulator_freq", p.modulator_freq),
                ("carrier_freq", p.carrier_freq + p.modulator_freq),
            ],
            SignalSpec::HarmonicStack(p) => {
                let mut components = vec![("fundamental", p.fundamental)];
                components.extend(
                    p.harmonics
                        .iter()
                        .map(|h| ("harmonics", p.fundamental * h.multiplier)),
                );
                components
            }
            SignalSpec::Chirp(p) => vec![("start_freq", p.start_freq), ("end_freq", p.end_freq)],
            SignalSpec::Noise(p) => match p.band {
                Some(band) => vec![("band.low", band.low), ("band.high", band.high)],
                None => Vec::new(),
            },
            SignalSpec::Envelope(p) => match &p.curve {
                EnvelopeCurve::RaisedSine { period, .. } | EnvelopeCurve::Breathing { period, .. } => {
                    if *period > 0.0 {
                        vec![("curve.period", 1.0 / period)]
                    } else {
                        Vec::new()
                    }
                }
                EnvelopeCurve::Composite { partials } => partials
                    .iter()
                    .map(|p| ("curve.partials", p.frequency))
                    .collect(),
            },
            SignalSpec::PulseGate(_) => Vec::new(),
            SignalSpec::Ping(p) => vec![("frequency", p.frequency)],
        }
    }

    /// Returns the highest frequency component, if any.
    pub fn max_frequency(&self) -> Option<f64> {
        self.frequency_components()
            .into_iter()
            .map(|(_, f)| f)
            .fold(None, |acc, f| Some(acc.map_or(f, |a: f64| a.max(f))))
    }
}

/// Fractional window of the programme timeline in which a layer sounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerWindow {
    /// Start as a fraction of the timeline (0.0 to 1.0).
    pub start: f64,
    /// End as a fraction of the timeline (0.0 to 1.0).
    pub end: f64,
}

impl LayerWindow {
    /// Creates a window.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Returns true if the fractional position lies inside the window.
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position < self.end
    }
}

/// One layer of a programme: a source signal, its multipliers, and an optional window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Source signal.
    pub signal: SignalSpec,
    /// Envelope and gate multipliers applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modulators: Vec<SignalSpec>,
    /// Timeline window; the layer sounds everywhere when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<LayerWindow>,
}

impl Layer {
    /// Creates an always-on, unmodulated layer.
    pub fn new(signal: SignalSpec) -> Self {
        Self {
            signal,
            modulators: Vec::new(),
            window: None,
        }
    }

    /// Adds a multiplier.
    pub fn modulated_by(mut self, modulator: SignalSpec) -> Self {
        self.modulators.push(modulator);
        self
    }

    /// Restricts the layer to a fractional window of the timeline.
    pub fn windowed(mut self, start: f64, end: f64) -> Self {
        self.window = Some(LayerWindow::new(start, end));
        self
    }

    /// Returns the peak amplitude of the layer.
    pub fn amplitude(&self) -> f64 {
        self.signal.amplitude()
    }

    /// Returns the highest frequency across the source and its modulators.
    pub fn max_frequency(&self) -> Option<f64> {
        std::iter::once(&self.signal)
            .chain(self.modulators.iter())
            .filter_map(SignalSpec::max_frequency)
            .fold(None, |acc, f| Some(acc.map_or(f, |a: f64| a.max(f))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tone_serde_shape() {
        let tone = SignalSpec::tone(7.83, 0.5);
        let json = serde_json::to_value(&tone).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "tone", "frequency": 7.83, "amplitude": 0.5, "phase": 0.0})
        );
    }

    #[test]
    fn test_envelope_roundtrip_from_json() {
        let json = r#"{"type":"envelope","curve":{"shape":"breathing","period":4.0}}"#;
        let spec: SignalSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec, SignalSpec::breathing(4.0));
    }

    #[test]
    fn test_pulse_gate_defaults() {
        let json = r#"{"type":"pulse_gate","sequence":[2,3,5]}"#;
        let spec: SignalSpec = serde_json::from_str(json).unwrap();
        match spec {
            SignalSpec::PulseGate(p) => {
                assert_eq!(p.sequence, vec![2, 3, 5]);
                assert_eq!(p.unit, 1.0);
                assert_eq!(p.ramp, 0.005);
            }
            other => panic!("expected pulse gate, got {:?}", other),
        }
    }

    #[test]
    fn test_am_reports_upper_sideband() {
        let spec = SignalSpec::am_tone(100.0, 7.83, 1.0, 0.3);
        assert_eq!(spec.max_frequency(), Some(107.83));
    }

    #[test]
    fn test_harmonic_falloff_builder() {
        match SignalSpec::harmonic_falloff(528.0, 3, 0.5, 0.15) {
            SignalSpec::HarmonicStack(p) => {
                let multipliers: Vec<f64> = p.harmonics.iter().map(|h| h.multiplier).collect();
                let amplitudes: Vec<f64> = p.harmonics.iter().map(|h| h.amplitude).collect();
                assert_eq!(multipliers, vec![2.0, 3.0, 4.0]);
                assert_eq!(amplitudes, vec![0.5, 0.25, 0.125]);
            }
            other => panic!("expected harmonic stack, got {:?}", other),
        }
    }

    #[test]
    fn test_modulator_kinds() {
        assert!(SignalSpec::breathing(4.0).is_modulator());
        assert!(SignalSpec::pulse_gate(&[2, 3], 1.0).is_modulator());
        assert!(!SignalSpec::tone(7.83, 1.0).is_modulator());
        assert_eq!(SignalSpec::breathing(4.0).amplitude(), 1.0);
    }

    #[test]
    fn test_layer_max_frequency_includes_modulators() {
        let layer = Layer::new(SignalSpec::tone(7.83, 1.0))
            .modulated_by(SignalSpec::composite_envelope(&[(33.8, 0.2)]));
        assert_eq!(layer.max_frequency(), Some(33.8));
    }

    #[test]
    fn test_pulse_gate_has_no_frequency() {
        assert_eq!(SignalSpec::pulse_gate(&[2], 1.0).max_frequency(), None);
    }

    #[test]
    fn test_window_contains() {
        let window = LayerWindow::new(0.2, 0.4);
        assert!(window.contains(0.2));
        assert!(window.contains(0.3));
        assert!(!window.contains(0.4));
    }
}
