//! Programme composition.
//!
//! A programme is rendered layer by layer: each source is synthesized over
//! the whole duration, multiplied by its modulators, shaped by its window,
//! then summed in the [`Mixer`] and normalized to the output ceiling.

use std::sync::Arc;

use hlb_spec::constants::{OUTPUT_CEILING, WINDOW_FADE_SECONDS};
use hlb_spec::{Layer, Programme, ScalarBuffer};
use tracing::{debug, info};

use crate::error::{SynthError, SynthResult};
use crate::mixer::{apply_modulator, apply_window, Mixer};
use crate::presets::{PresetDomain, PresetTable};
use crate::synthesis::render;

/// Renders programmes and resolves preset names.
///
/// Cloning is cheap; clones share one preset table.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    presets: Arc<PresetTable>,
}

impl Composer {
    /// Creates a composer over `presets`.
    pub fn new(presets: PresetTable) -> Self {
        Self {
            presets: Arc::new(presets),
        }
    }

    /// The preset table.
    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Builds a validated programme from a named preset.
    ///
    /// # Arguments
    /// * `name` - Preset name
    /// * `domain` - Domain the preset must belong to
    /// * `duration` - Duration in seconds
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Returns
    /// * `SynthError::UnknownProgramme` when no preset of that name exists in `domain`
    /// * `SynthError::UnsupportedFrequency` when a layer cannot be represented at `sample_rate`
    pub fn programme(
        &self,
        name: &str,
        domain: PresetDomain,
        duration: f64,
        sample_rate: u32,
    ) -> SynthResult<Programme> {
        let preset = self.presets.resolve(name, domain)?;
        let layers = preset.layers.clone();
        let programme = match preset.cycle {
            Some(cycle) => Programme::cyclic(name, layers, duration, sample_rate, cycle),
            None => Programme::new(name, layers, duration, sample_rate),
        };
        programme.map_err(SynthError::from)
    }

    /// Renders a programme to a normalized buffer.
    ///
    /// The output peak never exceeds [`OUTPUT_CEILING`].
    pub fn compose(&self, programme: &Programme) -> SynthResult<ScalarBuffer> {
        programme.validate()?;

        let num_samples = programme.num_samples();
        info!(
            programme = %programme.name,
            layers = programme.layers.len(),
            sample_rate = programme.sample_rate,
            num_samples,
            "composing programme"
        );

        let mut mixer = Mixer::new(num_samples);
        for (index, layer) in programme.layers.iter().enumerate() {
            let samples = render_layer(layer, programme, num_samples)
                .map_err(|e| nest_error(e, index))?;
            mixer.add_layer(samples, layer.amplitude());
        }

        let theoretical_peak = mixer.theoretical_peak();
        let output = mixer.mix_normalized(OUTPUT_CEILING);
        debug!(
            programme = %programme.name,
            theoretical_peak,
            "programme normalized"
        );
        Ok(ScalarBuffer::new(output, programme.sample_rate))
    }

    /// Resolves and renders a named preset.
    pub fn compose_named(
        &self,
        name: &str,
        domain: PresetDomain,
        duration: f64,
        sample_rate: u32,
    ) -> SynthResult<ScalarBuffer> {
        let programme = self.programme(name, domain, duration, sample_rate)?;
        self.compose(&programme)
    }
}

fn render_layer(layer: &Layer, programme: &Programme, num_samples: usize) -> SynthResult<Vec<f64>> {
    let sample_rate = programme.sample_rate;
    let mut samples = render(&layer.signal, sample_rate, 0, num_samples)?;

    for (i, modulator) in layer.modulators.iter().enumerate() {
        let envelope = render(modulator, sample_rate, 0, num_samples)
            .map_err(|e| nest_name(e, &format!("modulators[{}]", i)))?;
        apply_modulator(&mut samples, &envelope);
    }

    if let Some(window) = &layer.window {
        apply_window(
            &mut samples,
            window,
            programme.timeline(),
            sample_rate as f64,
            0,
            WINDOW_FADE_SECONDS,
        );
    }
    Ok(samples)
}

fn nest_error(err: SynthError, index: usize) -> SynthError {
    nest_name(err, &format!("layers[{}]", index))
}

fn nest_name(err: SynthError, prefix: &str) -> SynthError {
    let join = |name: String| {
        if name.is_empty() {
            prefix.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    };
    match err {
        SynthError::InvalidParameter { name, message } => SynthError::InvalidParameter {
            name: join(name),
            message,
        },
        SynthError::UnsupportedFrequency {
            name,
            frequency,
            sample_rate,
        } => SynthError::UnsupportedFrequency {
            name: join(name),
            frequency,
            sample_rate,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlb_spec::SignalSpec;

    fn composer() -> Composer {
        Composer::new(PresetTable::standard())
    }

    #[test]
    fn test_compose_single_tone_at_ceiling() {
        let programme =
            Programme::new("t", vec![Layer::new(SignalSpec::tone(100.0, 1.0))], 1.0, 8_000).unwrap();
        let buffer = composer().compose(&programme).unwrap();
        assert_eq!(buffer.len(), 8_000);
        assert!((buffer.peak() - OUTPUT_CEILING).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_programme_lists_names() {
        let err = composer()
            .programme("nope", PresetDomain::Mechanical, 1.0, 44_100)
            .unwrap_err();
        match err {
            SynthError::UnknownProgramme { name, available } => {
                assert_eq!(name, "nope");
                assert!(available.contains("fundamental"));
                assert!(!available.contains("cw"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_preset_too_fast_for_rate() {
        // The ambient ping sits at 17 kHz.
        let err = composer()
            .programme("ambient", PresetDomain::Mechanical, 1.0, 8_000)
            .unwrap_err();
        match err {
            SynthError::UnsupportedFrequency { name, frequency, .. } => {
                assert!(name.starts_with("layers["));
                assert!(frequency >= 4_000.0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_windowed_layer_is_silent_outside_window() {
        let layers = vec![Layer::new(SignalSpec::tone(50.0, 1.0)).windowed(0.5, 1.0)];
        let programme = Programme::new("w", layers, 2.0, 1_000).unwrap();
        let buffer = composer().compose(&programme).unwrap();
        assert!(buffer.samples()[..1_000].iter().all(|&s| s == 0.0));
        assert!(buffer.samples()[1_000..].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_cw_baseband_is_constant() {
        let buffer = composer()
            .compose_named("cw", PresetDomain::Baseband, 0.01, 100_000)
            .unwrap();
        assert!(buffer
            .samples()
            .iter()
            .all(|&s| (s - OUTPUT_CEILING).abs() < 1e-9));
    }

    #[test]
    fn test_schumann_baseband_is_non_negative() {
        let buffer = composer()
            .compose_named("schumann", PresetDomain::Baseband, 1.0, 1_000)
            .unwrap();
        assert!(buffer.samples().iter().all(|&s| s >= 0.0));
        assert!(buffer.peak() <= OUTPUT_CEILING + 1e-12);
    }
}
