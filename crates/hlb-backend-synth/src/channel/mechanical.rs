//! Mechanical (audio transducer) channel.

use hlb_spec::constants::AUDIO_SAMPLE_RATE;
use hlb_spec::{SampleEncoding, ScalarBuffer};
use tracing::info;

use super::{Channel, HardwareRequirements};
use crate::compose::Composer;
use crate::error::SynthResult;
use crate::presets::PresetDomain;

/// Renders mechanical presets as mono audio.
#[derive(Debug, Clone)]
pub struct MechanicalChannel {
    composer: Composer,
    sample_rate: u32,
}

impl MechanicalChannel {
    /// Creates a channel at the standard 44.1 kHz rate.
    pub fn new(composer: Composer) -> Self {
        Self::with_sample_rate(composer, AUDIO_SAMPLE_RATE)
    }

    /// Creates a channel at an explicit rate.
    pub fn with_sample_rate(composer: Composer, sample_rate: u32) -> Self {
        Self {
            composer,
            sample_rate,
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Channel for MechanicalChannel {
    type Sample = f64;

    fn name(&self) -> &'static str {
        "mechanical"
    }

    fn produce(&self, programme: &str, duration: f64) -> SynthResult<ScalarBuffer> {
        let buffer = self.composer.compose_named(
            programme,
            PresetDomain::Mechanical,
            duration,
            self.sample_rate,
        )?;
        info!(
            channel = self.name(),
            programme,
            samples = buffer.len(),
            peak = buffer.peak(),
            "mechanical buffer ready"
        );
        Ok(buffer)
    }

    fn describe_hardware_requirements(&self) -> HardwareRequirements {
        HardwareRequirements {
            channel: self.name(),
            sample_rate: self.sample_rate,
            channel_count: 1,
            complex_samples: false,
            encoding: SampleEncoding::Pcm16Le,
            carrier_hz: None,
            gain_db: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;
    use crate::presets::PresetTable;

    #[test]
    fn test_requirements() {
        let channel = MechanicalChannel::new(Composer::new(PresetTable::standard()));
        let req = channel.describe_hardware_requirements();
        assert_eq!(req.sample_rate, 44_100);
        assert_eq!(req.channel_count, 1);
        assert!(!req.complex_samples);
        assert_eq!(req.encoding, SampleEncoding::Pcm16Le);
    }

    #[test]
    fn test_produce_fundamental() {
        let channel =
            MechanicalChannel::with_sample_rate(Composer::new(PresetTable::standard()), 1_000);
        let buffer = channel.produce("fundamental", 2.0).unwrap();
        assert_eq!(buffer.len(), 2_000);
        assert_eq!(buffer.sample_rate(), 1_000);
        assert!(buffer.peak() <= 0.9 + 1e-12);
    }

    #[test]
    fn test_baseband_preset_is_rejected() {
        let channel = MechanicalChannel::new(Composer::new(PresetTable::standard()));
        assert!(matches!(
            channel.produce("cw", 1.0),
            Err(SynthError::UnknownProgramme { .. })
        ));
    }
}
