//! Physical constants and default rates.
//!
//! These are the seed values for the immutable preset table built by the
//! synthesis backend. Nothing in the workspace reads them as mutable globals.

/// Hydrogen line, the 21 cm spin-flip transition of neutral hydrogen, in Hz.
pub const HYDROGEN_LINE_HZ: f64 = 1_420_405_751.768;

/// Schumann resonance modes of the Earth-ionosphere cavity, in Hz.
pub const SCHUMANN_FREQUENCIES: [f64; 5] = [7.83, 14.3, 20.8, 27.3, 33.8];

/// Relative weights of the Schumann modes in combined programmes.
pub const SCHUMANN_WEIGHTS: [f64; 5] = [1.0, 0.7, 0.5, 0.3, 0.2];

/// Lower edge of the "water hole" between the H and OH lines, in Hz.
pub const WATER_HOLE_LOW_HZ: f64 = 1.42e9;

/// Upper edge of the "water hole", in Hz.
pub const WATER_HOLE_HIGH_HZ: f64 = 1.66e9;

/// Prime sequence used for pulse gate timing.
pub const PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Default mechanical (DAC) sample rate in Hz.
pub const AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Bit depth of the mechanical PCM encoding.
pub const AUDIO_BIT_DEPTH: u16 = 16;

/// Default RF baseband sample rate in Hz.
pub const RF_SAMPLE_RATE: u32 = 2_000_000;

/// Default RF transmit gain in dB.
pub const RF_DEFAULT_GAIN_DB: u32 = 20;

/// Maximum RF transmit gain accepted in a transmit request, in dB.
pub const RF_MAX_GAIN_DB: u32 = 47;

/// Seconds per transmit phase.
pub const PROTOCOL_TX_DURATION: f64 = 60.0;

/// Seconds per listen phase.
pub const PROTOCOL_RX_DURATION: f64 = 120.0;

/// Default total session length in seconds.
pub const PROTOCOL_TOTAL_DURATION: f64 = 3600.0;

/// Length of the repeating `full` mechanical programme, in seconds.
pub const FULL_PROGRAMME_CYCLE: f64 = 600.0;

/// Default anomaly threshold in standard deviations.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 3.0;

/// Maximum sum of layer amplitudes accepted by a programme.
pub const AMPLITUDE_BUDGET: f64 = 4.0;

/// Peak level of a composed buffer after normalization.
pub const OUTPUT_CEILING: f64 = 0.9;

/// Peak level used when quantizing I/Q to signed bytes.
pub const IQ_CEILING: f64 = 0.99;

/// Length of the raised-cosine fade applied at layer window edges, in seconds.
pub const WINDOW_FADE_SECONDS: f64 = 0.01;
