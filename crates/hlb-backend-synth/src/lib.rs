//! Hydrogen Line Beacon synthesis backend.
//!
//! This crate turns signal descriptions from `hlb-spec` into sample buffers:
//!
//! - [`synthesis`] - the primitives (tone, AM tone, harmonic stack, chirp,
//!   noise, envelopes, pulse gate, ping), each rendered at absolute sample
//!   indices so offset renders match slices of a full render
//! - [`mixer`] - modulation, windowing, summing and normalization
//! - [`presets`] - the immutable table of named programmes
//! - [`compose`] - programme rendering
//! - [`channel`] - mechanical (PCM) and RF (I/Q) output channels
//!
//! # Determinism
//!
//! Output is a pure function of the programme, the sample rate and the
//! resolved noise seeds. Noise without an explicit seed derives one from a
//! BLAKE3 hash of its canonical parameters, so the same programme always
//! renders to the same bytes.
//!
//! # Example
//!
//! ```
//! use hlb_backend_synth::channel::{Channel, MechanicalChannel};
//! use hlb_backend_synth::{Composer, PresetTable};
//!
//! let channel = MechanicalChannel::with_sample_rate(Composer::new(PresetTable::standard()), 1_000);
//! let buffer = channel.produce("combined", 1.0).unwrap();
//! assert_eq!(buffer.len(), 1_000);
//! assert!(buffer.peak() <= 0.9 + 1e-12);
//! ```

pub mod channel;
pub mod compose;
pub mod error;
pub mod filter;
pub mod mixer;
pub mod oscillator;
pub mod presets;
pub mod rng;
pub mod synthesis;

pub use channel::{Channel, HardwareRequirements, MechanicalChannel, RfChannel};
pub use compose::Composer;
pub use error::{SynthError, SynthResult};
pub use presets::{Preset, PresetDomain, PresetTable};
pub use synthesis::{render, render_duration, Synthesizer};
