//! Error types for the monitor and the protocol controller.

use hlb_backend_synth::SynthError;
use hlb_spec::{BackendError, ConfigError, ValidationError};
use thiserror::Error;

/// Result type for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Result type for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Errors from baseline capture and anomaly detection.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Baseline capture did not produce usable statistics.
    #[error("baseline capture failed: {message}")]
    CaptureFailed {
        /// Error message.
        message: String,
    },

    /// Detection was requested before any successful capture.
    #[error("no baseline has been captured")]
    NoBaseline,

    /// The sensor could not deliver a batch.
    #[error("sensor unavailable: {message}")]
    SensorUnavailable {
        /// Error message.
        message: String,
    },

    /// Malformed argument.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },
}

impl MonitorError {
    /// Creates a capture failure.
    pub fn capture_failed(message: impl Into<String>) -> Self {
        Self::CaptureFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl BackendError for MonitorError {
    fn code(&self) -> &'static str {
        match self {
            MonitorError::CaptureFailed { .. } => "MONITOR_001",
            MonitorError::NoBaseline => "MONITOR_002",
            MonitorError::SensorUnavailable { .. } => "MONITOR_003",
            MonitorError::InvalidParameter { .. } => "MONITOR_004",
        }
    }

    fn category(&self) -> &'static str {
        "monitor"
    }
}

/// Controller errors.
///
/// `HardwareUnavailable` describes a failed probe and is reported as a
/// hardware fault event; the other variants stop the controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// A required device is missing or refused the requested format.
    #[error("{channel} hardware unavailable: {message}")]
    HardwareUnavailable {
        /// Channel name.
        channel: String,
        /// Error message.
        message: String,
    },

    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Schedule could not be built.
    #[error("invalid schedule: {0}")]
    Schedule(#[from] ValidationError),

    /// Synthesis or composition failed.
    #[error(transparent)]
    Synth(#[from] SynthError),
}

impl BackendError for ControllerError {
    fn code(&self) -> &'static str {
        match self {
            ControllerError::HardwareUnavailable { .. } => "CONTROLLER_001",
            ControllerError::Config(e) => e.code(),
            ControllerError::Schedule(_) => "CONTROLLER_002",
            ControllerError::Synth(e) => e.code(),
        }
    }

    fn category(&self) -> &'static str {
        match self {
            ControllerError::Config(e) => e.category(),
            ControllerError::Synth(e) => e.category(),
            _ => "controller",
        }
    }
}
