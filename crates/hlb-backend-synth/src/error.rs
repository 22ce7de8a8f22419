//! Error types for the synthesis backend.

use hlb_spec::{BackendError, ErrorCode, ValidationError};
use thiserror::Error;

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;

/// Errors that can occur while synthesizing or composing.
#[derive(Debug, Error)]
pub enum SynthError {
    /// Malformed signal or programme parameter.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter path.
        name: String,
        /// Error message.
        message: String,
    },

    /// A frequency component at or above the Nyquist limit.
    #[error("unsupported frequency {frequency} Hz at '{name}' for sample rate {sample_rate} Hz")]
    UnsupportedFrequency {
        /// Parameter path.
        name: String,
        /// Offending frequency in Hz.
        frequency: f64,
        /// Sample rate in Hz.
        sample_rate: u32,
    },

    /// Programme name missing from the preset table.
    #[error("unknown programme '{name}' (available: {available})")]
    UnknownProgramme {
        /// Requested name.
        name: String,
        /// Comma-separated preset names.
        available: String,
    },

    /// Internal synthesis error.
    #[error("synthesis error: {message}")]
    Synthesis {
        /// Error message.
        message: String,
    },
}

impl SynthError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a synthesis error.
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis {
            message: message.into(),
        }
    }
}

impl From<ValidationError> for SynthError {
    fn from(err: ValidationError) -> Self {
        let name = err.path.clone().unwrap_or_default();
        match (err.code, err.frequency) {
            (ErrorCode::UnsupportedFrequency, Some((frequency, sample_rate))) => {
                SynthError::UnsupportedFrequency {
                    name,
                    frequency,
                    sample_rate,
                }
            }
            (ErrorCode::UnknownProgramme, _) => SynthError::UnknownProgramme {
                name: err.message,
                available: String::new(),
            },
            _ => SynthError::InvalidParameter {
                name,
                message: err.message,
            },
        }
    }
}

impl From<serde_json::Error> for SynthError {
    fn from(err: serde_json::Error) -> Self {
        SynthError::synthesis(format!("failed to hash signal spec: {}", err))
    }
}

impl BackendError for SynthError {
    fn code(&self) -> &'static str {
        match self {
            SynthError::InvalidParameter { .. } => "SYNTH_001",
            SynthError::UnsupportedFrequency { .. } => "SYNTH_002",
            SynthError::UnknownProgramme { .. } => "SYNTH_003",
            SynthError::Synthesis { .. } => "SYNTH_004",
        }
    }

    fn category(&self) -> &'static str {
        "synth"
    }
}
