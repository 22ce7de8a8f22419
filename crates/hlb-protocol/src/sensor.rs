//! Ambient sensor interface.

use thiserror::Error;

/// Errors reported by a sensor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    /// No receiver is connected.
    #[error("sensor unavailable: {0}")]
    Unavailable(String),

    /// The read failed part way.
    #[error("sensor read failed: {0}")]
    ReadFailed(String),
}

/// Source of ambient readings (for example received power in dB).
pub trait SensorSource: Send {
    /// Reads up to `n` samples. Fewer than `n` is a short batch.
    fn read(&mut self, n: usize) -> Result<Vec<f64>, SensorError>;
}

/// Sensor that reports no receiver, for sessions without monitoring hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsentSensor;

impl SensorSource for AbsentSensor {
    fn read(&mut self, _n: usize) -> Result<Vec<f64>, SensorError> {
        Err(SensorError::Unavailable("no receiver configured".to_string()))
    }
}
