//! Hardware sink interfaces.
//!
//! Sinks stand in for the DAC/amplifier and the SDR transceiver. They are
//! blocking: a call returns once the buffer has been played or transmitted.

use hlb_backend_synth::HardwareRequirements;
use hlb_spec::{CarrierSelector, IqBuffer, ScalarBuffer};
use serde::Serialize;
use thiserror::Error;

/// Errors reported by a sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// No device is connected.
    #[error("device absent: {0}")]
    Absent(String),

    /// The device failed during output.
    #[error("device failed: {0}")]
    Failed(String),
}

/// Carrier and gain for one RF transmission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransmitRequest {
    /// Logical carrier selection.
    pub carrier: CarrierSelector,
    /// Resolved carrier frequency in Hz.
    pub carrier_hz: f64,
    /// Transmit gain in dB.
    pub gain_db: u32,
}

impl TransmitRequest {
    /// Creates a request, resolving the carrier frequency.
    pub fn new(carrier: CarrierSelector, gain_db: u32) -> Self {
        Self {
            carrier,
            carrier_hz: carrier.frequency_hz(),
            gain_db,
        }
    }
}

/// Audio output for the mechanical transducer.
pub trait MechanicalSink: Send {
    /// Checks that the device exists and accepts `requirements`.
    fn probe(&mut self, requirements: &HardwareRequirements) -> Result<(), SinkError> {
        let _ = requirements;
        Ok(())
    }

    /// Plays a buffer to completion.
    fn play(&mut self, buffer: &ScalarBuffer) -> Result<(), SinkError>;
}

/// I/Q output for the RF transceiver.
pub trait RfSink: Send {
    /// Checks that the device exists and accepts `requirements`.
    fn probe(&mut self, requirements: &HardwareRequirements) -> Result<(), SinkError> {
        let _ = requirements;
        Ok(())
    }

    /// Transmits a buffer to completion.
    fn transmit(&mut self, buffer: &IqBuffer, request: &TransmitRequest) -> Result<(), SinkError>;
}

/// Sink that accepts and drops every buffer, for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl MechanicalSink for DiscardSink {
    fn play(&mut self, _buffer: &ScalarBuffer) -> Result<(), SinkError> {
        Ok(())
    }
}

impl RfSink for DiscardSink {
    fn transmit(&mut self, _buffer: &IqBuffer, _request: &TransmitRequest) -> Result<(), SinkError> {
        Ok(())
    }
}
