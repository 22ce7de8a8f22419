//! RF baseband channel.
//!
//! A baseband preset gives a real envelope in [0, ceiling]. The channel
//! optionally gates it with the prime pulse sequence and shifts it by the
//! carrier offset, producing complex samples for an SDR transmitter.

use hlb_spec::constants::{RF_DEFAULT_GAIN_DB, RF_SAMPLE_RATE};
use hlb_spec::{BeaconConfig, CarrierSelector, IqBuffer, SampleEncoding, SignalSpec};
use num_complex::Complex32;
use std::f64::consts::TAU;
use tracing::info;

use super::{Channel, HardwareRequirements};
use crate::compose::Composer;
use crate::error::{SynthError, SynthResult};
use crate::mixer::apply_modulator;
use crate::oscillator::cycles_at;
use crate::presets::PresetDomain;
use crate::synthesis::render;

/// Renders baseband presets as I/Q.
#[derive(Debug, Clone)]
pub struct RfChannel {
    composer: Composer,
    sample_rate: u32,
    carrier: CarrierSelector,
    carrier_offset: f64,
    gain_db: u32,
    pulsed: bool,
}

impl RfChannel {
    /// Creates an unpulsed channel on the hydrogen line at the standard rate.
    pub fn new(composer: Composer) -> Self {
        Self {
            composer,
            sample_rate: RF_SAMPLE_RATE,
            carrier: CarrierSelector::Hydrogen,
            carrier_offset: 0.0,
            gain_db: RF_DEFAULT_GAIN_DB,
            pulsed: false,
        }
    }

    /// Creates a channel from the RF settings of `config`.
    pub fn from_config(composer: Composer, config: &BeaconConfig) -> Self {
        Self {
            composer,
            sample_rate: config.rf_sample_rate,
            carrier: config.rf_carrier,
            carrier_offset: config.rf_carrier_offset,
            gain_db: config.rf_gain,
            pulsed: config.rf_pulsed,
        }
    }

    /// Sets the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Sets the carrier.
    pub fn with_carrier(mut self, carrier: CarrierSelector) -> Self {
        self.carrier = carrier;
        self
    }

    /// Sets the baseband offset from the carrier in Hz.
    pub fn with_carrier_offset(mut self, offset: f64) -> Self {
        self.carrier_offset = offset;
        self
    }

    /// Enables or disables the pulse overlay.
    pub fn with_pulsed(mut self, pulsed: bool) -> Self {
        self.pulsed = pulsed;
        self
    }

    /// Sets the transmit gain in dB.
    pub fn with_gain(mut self, gain_db: u32) -> Self {
        self.gain_db = gain_db;
        self
    }

    /// Carrier selection.
    pub fn carrier(&self) -> CarrierSelector {
        self.carrier
    }

    /// Transmit gain in dB.
    pub fn gain_db(&self) -> u32 {
        self.gain_db
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn check_offset(&self) -> SynthResult<()> {
        let nyquist = self.sample_rate as f64 / 2.0;
        if !self.carrier_offset.is_finite() || self.carrier_offset.abs() >= nyquist {
            return Err(SynthError::UnsupportedFrequency {
                name: "carrier_offset".to_string(),
                frequency: self.carrier_offset,
                sample_rate: self.sample_rate,
            });
        }
        Ok(())
    }
}

impl Channel for RfChannel {
    type Sample = Complex32;

    fn name(&self) -> &'static str {
        "rf"
    }

    fn produce(&self, programme: &str, duration: f64) -> SynthResult<IqBuffer> {
        self.check_offset()?;

        let envelope = self.composer.compose_named(
            programme,
            PresetDomain::Baseband,
            duration,
            self.sample_rate,
        )?;
        let mut envelope = envelope.into_samples();

        if self.pulsed {
            let gate = SignalSpec::pulse_gate(self.composer.presets().pulse_sequence(), 1.0);
            let gate = render(&gate, self.sample_rate, 0, envelope.len())
                .map_err(|e| SynthError::invalid_param("pulse_sequence", e.to_string()))?;
            apply_modulator(&mut envelope, &gate);
        }

        let sr = self.sample_rate as f64;
        let samples: Vec<Complex32> = if self.carrier_offset == 0.0 {
            envelope
                .iter()
                .map(|&e| Complex32::new(e as f32, 0.0))
                .collect()
        } else {
            envelope
                .iter()
                .enumerate()
                .map(|(i, &e)| {
                    let angle = TAU * cycles_at(self.carrier_offset, i as u64, sr);
                    Complex32::new((e * angle.cos()) as f32, (e * angle.sin()) as f32)
                })
                .collect()
        };

        let buffer = IqBuffer::new(samples, self.sample_rate);
        info!(
            channel = self.name(),
            programme,
            carrier = %self.carrier.label(),
            offset_hz = self.carrier_offset,
            pulsed = self.pulsed,
            samples = buffer.len(),
            "rf buffer ready"
        );
        Ok(buffer)
    }

    fn describe_hardware_requirements(&self) -> HardwareRequirements {
        HardwareRequirements {
            channel: self.name(),
            sample_rate: self.sample_rate,
            channel_count: 1,
            complex_samples: true,
            encoding: SampleEncoding::IqInt8,
            carrier_hz: Some(self.carrier.frequency_hz()),
            gain_db: Some(self.gain_db),
        }
    }
}
