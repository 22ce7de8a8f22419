//! Error types for signal validation and configuration.

use thiserror::Error;

/// Error codes for spec-level validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Malformed SignalSpec or programme value
    InvalidParameter,
    /// E002: Frequency component at or above the Nyquist limit
    UnsupportedFrequency,
    /// E003: Unrecognized programme preset name
    UnknownProgramme,
    /// E004: Malformed configuration mapping
    InvalidConfiguration,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidParameter => "E001",
            ErrorCode::UnsupportedFrequency => "E002",
            ErrorCode::UnknownProgramme => "E003",
            ErrorCode::InvalidConfiguration => "E004",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Path to the problematic field (e.g., "layers\[2\].signal.frequency").
    pub path: Option<String>,
    /// Offending frequency and sample rate, set for Nyquist violations.
    pub frequency: Option<(f64, u32)>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            frequency: None,
        }
    }

    /// Creates a new validation error with a field path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
            frequency: None,
        }
    }

    /// Creates an invalid parameter error for the named field.
    pub fn invalid_param(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_path(ErrorCode::InvalidParameter, message, path)
    }

    /// Creates a Nyquist violation error.
    pub fn unsupported_frequency(path: impl Into<String>, frequency: f64, sample_rate: u32) -> Self {
        Self {
            code: ErrorCode::UnsupportedFrequency,
            message: format!(
                "{} Hz is at or above the Nyquist limit of {} Hz",
                frequency,
                sample_rate as f64 / 2.0
            ),
            path: Some(path.into()),
            frequency: Some((frequency, sample_rate)),
        }
    }

    /// Prefixes the path with a parent segment.
    pub fn nested(mut self, parent: &str) -> Self {
        self.path = Some(match self.path.take() {
            Some(path) => format!("{}.{}", parent, path),
            None => parent.to_string(),
        });
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while reading the flat configuration mapping.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A recognized key held a value of the wrong type or out of range.
    #[error("invalid configuration for '{key}': {message}")]
    InvalidConfiguration {
        /// The configuration key.
        key: String,
        /// Error message.
        message: String,
    },

    /// The configuration document could not be parsed.
    #[error("configuration is not a JSON object: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates an invalid configuration error for `key`.
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl BackendError for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidConfiguration { .. } => "CONFIG_001",
            ConfigError::Parse(_) => "CONFIG_002",
        }
    }

    fn category(&self) -> &'static str {
        "config"
    }
}

/// Trait implemented by every error type in the workspace so callers can
/// report a stable code and category regardless of the layer that failed.
pub trait BackendError: std::error::Error {
    /// Returns a stable error code (e.g., "SYNTH_002").
    fn code(&self) -> &'static str;

    /// Returns the error category (e.g., "synth", "monitor").
    fn category(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            ErrorCode::InvalidParameter.code(),
            ErrorCode::UnsupportedFrequency.code(),
            ErrorCode::UnknownProgramme.code(),
            ErrorCode::InvalidConfiguration.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_validation_error_display_includes_path() {
        let err = ValidationError::invalid_param("amplitude", "must be in [0, 1]");
        assert_eq!(err.to_string(), "E001: must be in [0, 1] (at amplitude)");
    }

    #[test]
    fn test_nested_path() {
        let err = ValidationError::invalid_param("frequency", "bad").nested("layers[1].signal");
        assert_eq!(err.path.as_deref(), Some("layers[1].signal.frequency"));
    }

    #[test]
    fn test_unsupported_frequency_carries_rate() {
        let err = ValidationError::unsupported_frequency("frequency", 30_000.0, 44_100);
        assert_eq!(err.code, ErrorCode::UnsupportedFrequency);
        assert_eq!(err.frequency, Some((30_000.0, 44_100)));
        assert!(err.message.contains("22050"));
    }

    #[test]
    fn test_config_error_code() {
        let err = ConfigError::invalid("tx_duration", "must be a number");
        assert_eq!(err.code(), "CONFIG_001");
        assert_eq!(err.category(), "config");
        assert!(err.to_string().contains("tx_duration"));
    }
}
