//! Hydrogen Line Beacon end-to-end test infrastructure.
//!
//! - [`fixtures`] - simulated sinks, scripted sensors and session configs
//! - [`determinism`] - byte-identical output checks
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hlb-tests
//! cargo test -p hlb-tests --test proptest_synthesis
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{verify_determinism, DeterminismResult};
