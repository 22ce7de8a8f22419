//! Layer summing and the single normalization pass.
//!
//! Layers are generated independently, shaped by their modulators and
//! windows, summed sample-wise, then normalized once. No layer is clipped on
//! its own.

#[allow(clippy::module_inception)]
mod mixer;
mod processing;

#[cfg(test)]
mod tests_mixing;
#[cfg(test)]
mod tests_normalization;

// Re-export public API
pub use mixer::{MixLayer, Mixer};
pub use processing::{apply_modulator, apply_window, normalize_to_ceiling, peak};
