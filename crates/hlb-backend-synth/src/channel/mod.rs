//! Output channels.
//!
//! A channel turns a named programme into a buffer in the form its sink
//! consumes, and describes the hardware that sink needs.

pub mod mechanical;
pub mod rf;

use hlb_spec::{SampleBuffer, SampleEncoding};
use serde::Serialize;

use crate::error::SynthResult;

pub use mechanical::MechanicalChannel;
pub use rf::RfChannel;

/// What a channel's sink must support.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HardwareRequirements {
    /// Channel name.
    pub channel: &'static str,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of output channels.
    pub channel_count: u16,
    /// Whether samples are complex (I/Q).
    pub complex_samples: bool,
    /// Wire encoding.
    pub encoding: SampleEncoding,
    /// RF carrier in Hz, for transmitters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_hz: Option<f64>,
    /// Transmit gain in dB, for transmitters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain_db: Option<u32>,
}

/// A source of buffers for one output path.
pub trait Channel {
    /// Sample type of the produced buffers.
    type Sample;

    /// Short channel name for logs.
    fn name(&self) -> &'static str;

    /// Renders `programme` for `duration` seconds.
    fn produce(&self, programme: &str, duration: f64) -> SynthResult<SampleBuffer<Self::Sample>>;

    /// Describes the sink hardware this channel expects.
    fn describe_hardware_requirements(&self) -> HardwareRequirements;
}
