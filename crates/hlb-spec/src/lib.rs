//! Hydrogen Line Beacon Data Model
//!
//! This crate provides the types, validation, configuration and hashing shared
//! by the synthesis backend and the protocol controller.
//!
//! # Overview
//!
//! A beacon session is described by three kinds of value:
//!
//! - **Signals**: [`SignalSpec`] primitives grouped into [`Layer`]s and
//!   [`Programme`]s, rendered into [`SampleBuffer`]s
//! - **Timing**: a [`Cycle`] of [`PhaseWindow`]s replayed by a [`Schedule`]
//! - **Monitoring**: a [`Baseline`] and the [`AnomalyEvent`]s measured against it
//!
//! # Example
//!
//! ```
//! use hlb_spec::{Layer, Programme, SignalSpec};
//! use hlb_spec::hash::canonical_hash;
//!
//! let programme = Programme::new(
//!     "pulsed",
//!     vec![Layer::new(SignalSpec::tone(7.83, 1.0))
//!         .modulated_by(SignalSpec::pulse_gate(&[2, 3, 5, 7], 1.0))],
//!     10.0,
//!     44_100,
//! )
//! .unwrap();
//!
//! assert_eq!(programme.num_samples(), 441_000);
//! let hash = canonical_hash(&programme).unwrap();
//! assert_eq!(hash.len(), 64);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Validation errors, configuration errors and the [`BackendError`] trait
//! - [`signal`]: Signal primitives and layers
//! - [`programme`]: Validated programmes
//! - [`buffer`]: Sample buffers and their encodings
//! - [`schedule`]: Phases, cycles and schedules
//! - [`carrier`]: Logical carrier selection
//! - [`config`]: Flat key/value configuration
//! - [`anomaly`]: Baseline statistics and anomaly events
//! - [`validation`]: Parameter validation and the Nyquist guard
//! - [`hash`]: Canonical hashing and seed derivation
//! - [`constants`]: Physical constants and defaults

pub mod anomaly;
pub mod buffer;
pub mod carrier;
pub mod config;
pub mod constants;
pub mod error;
pub mod hash;
pub mod programme;
pub mod schedule;
pub mod signal;
pub mod validation;

// Re-export commonly used types at the crate root
pub use anomaly::{AnomalyEvent, Baseline};
pub use buffer::{IqBuffer, SampleBuffer, SampleEncoding, ScalarBuffer};
pub use carrier::{CarrierSelector, IsmBand};
pub use config::{BeaconConfig, ConfigResult};
pub use error::{BackendError, ConfigError, ErrorCode, ValidationError};
pub use hash::{blake3_hash, canonical_hash, derive_value_seed};
pub use programme::Programme;
pub use schedule::{Cycle, Phase, PhaseWindow, Schedule};
pub use signal::{
    AmToneParams, ChirpParams, EnvelopeCurve, EnvelopeParams, Harmonic, HarmonicStackParams,
    Layer, LayerWindow, NoiseBand, NoiseParams, Partial, PingParams, PulseGateParams, SignalKind,
    SignalSpec, ToneParams,
};
pub use validation::{validate_layer, validate_signal};
