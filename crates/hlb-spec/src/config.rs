//! Beacon configuration read from a flat key/value mapping.
//!
//! Unknown keys are ignored and missing keys fall back to defaults. A
//! recognized key with the wrong type or an out-of-range value is an
//! [`ConfigError::InvalidConfiguration`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::carrier::CarrierSelector;
use crate::constants::{
    AUDIO_SAMPLE_RATE, DEFAULT_ANOMALY_THRESHOLD, PROTOCOL_RX_DURATION, PROTOCOL_TOTAL_DURATION,
    PROTOCOL_TX_DURATION, RF_DEFAULT_GAIN_DB, RF_MAX_GAIN_DB, RF_SAMPLE_RATE,
};
use crate::error::ConfigError;
use crate::validation::{validate_non_negative, validate_positive, CommonValidationError};

/// Result type for configuration parsing.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Resolved beacon configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconConfig {
    /// Whether the RF channel takes part in the cycle.
    pub rf_enabled: bool,
    /// Carrier requested from the RF sink.
    pub rf_carrier: CarrierSelector,
    /// Transmit gain in dB.
    pub rf_gain: u32,
    /// RF modulation preset.
    pub rf_programme: String,
    /// Whether the prime pulse overlay gates the RF envelope.
    pub rf_pulsed: bool,
    /// Baseband frequency offset in Hz.
    pub rf_carrier_offset: f64,
    /// Mechanical programme preset.
    pub mech_programme: String,
    /// Mechanical sample rate in Hz.
    pub mech_sample_rate: u32,
    /// RF baseband sample rate in Hz.
    pub rf_sample_rate: u32,
    /// Seconds per transmit window.
    pub tx_duration: f64,
    /// Seconds per listen window.
    pub rx_duration: f64,
    /// Total session length in seconds.
    pub total_duration: f64,
    /// Anomaly threshold in standard deviations.
    pub anomaly_threshold: f64,
    /// Samples pulled when capturing the baseline.
    pub baseline_samples: usize,
    /// Samples pulled per listen window.
    pub monitor_batch: usize,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            rf_enabled: false,
            rf_carrier: CarrierSelector::Hydrogen,
            rf_gain: RF_DEFAULT_GAIN_DB,
            rf_programme: "schumann".to_string(),
            rf_pulsed: true,
            rf_carrier_offset: 0.0,
            mech_programme: "pulsed".to_string(),
            mech_sample_rate: AUDIO_SAMPLE_RATE,
            rf_sample_rate: RF_SAMPLE_RATE,
            tx_duration: PROTOCOL_TX_DURATION,
            rx_duration: PROTOCOL_RX_DURATION,
            total_duration: PROTOCOL_TOTAL_DURATION,
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            baseline_samples: 1000,
            monitor_batch: 100,
        }
    }
}

impl BeaconConfig {
    /// Parses a JSON document holding a flat object.
    ///
    /// # Example
    /// ```
    /// use hlb_spec::config::BeaconConfig;
    ///
    /// let config = BeaconConfig::from_json_str(r#"{"rf_enabled": true, "tx_duration": 30}"#).unwrap();
    /// assert!(config.rf_enabled);
    /// assert_eq!(config.tx_duration, 30.0);
    /// assert_eq!(config.rx_duration, 120.0);
    /// ```
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let map: Map<String, Value> = serde_json::from_str(json)?;
        Self::from_map(&map)
    }

    /// Reads recognized keys from `map` over the defaults.
    pub fn from_map(map: &Map<String, Value>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(v) = map.get("rf_enabled") {
            config.rf_enabled = as_bool("rf_enabled", v)?;
        }
        if let Some(v) = map.get("rf_carrier") {
            config.rf_carrier = as_carrier(v)?;
        }
        if let Some(v) = map.get("rf_gain") {
            config.rf_gain = as_u32("rf_gain", v)?;
        }
        if let Some(v) = map.get("rf_programme") {
            config.rf_programme = as_string("rf_programme", v)?;
        }
        if let Some(v) = map.get("rf_pulsed") {
            config.rf_pulsed = as_bool("rf_pulsed", v)?;
        }
        if let Some(v) = map.get("rf_carrier_offset") {
            config.rf_carrier_offset = as_f64("rf_carrier_offset", v)?;
        }
        if let Some(v) = map.get("mech_programme") {
            config.mech_programme = as_string("mech_programme", v)?;
        }
        if let Some(v) = map.get("mech_sample_rate") {
            config.mech_sample_rate = as_u32("mech_sample_rate", v)?;
        }
        if let Some(v) = map.get("rf_sample_rate") {
            config.rf_sample_rate = as_u32("rf_sample_rate", v)?;
        }
        if let Some(v) = map.get("tx_duration") {
            config.tx_duration = as_f64("tx_duration", v)?;
        }
        if let Some(v) = map.get("rx_duration") {
            config.rx_duration = as_f64("rx_duration", v)?;
        }
        if let Some(v) = map.get("total_duration") {
            config.total_duration = as_f64("total_duration", v)?;
        }
        if let Some(v) = map.get("anomaly_threshold") {
            config.anomaly_threshold = as_f64("anomaly_threshold", v)?;
        }
        if let Some(v) = map.get("baseline_samples") {
            config.baseline_samples = as_u32("baseline_samples", v)? as usize;
        }
        if let Some(v) = map.get("monitor_batch") {
            config.monitor_batch = as_u32("monitor_batch", v)? as usize;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        check("tx_duration", validate_positive("tx_duration", self.tx_duration))?;
        check("rx_duration", validate_positive("rx_duration", self.rx_duration))?;
        check(
            "total_duration",
            validate_positive("total_duration", self.total_duration),
        )?;
        check(
            "anomaly_threshold",
            validate_non_negative("anomaly_threshold", self.anomaly_threshold),
        )?;

        if self.rf_gain > RF_MAX_GAIN_DB {
            return Err(ConfigError::invalid(
                "rf_gain",
                format!("must be in [0, {}], got {}", RF_MAX_GAIN_DB, self.rf_gain),
            ));
        }
        if self.mech_sample_rate == 0 {
            return Err(ConfigError::invalid("mech_sample_rate", "must be positive"));
        }
        if self.rf_sample_rate == 0 {
            return Err(ConfigError::invalid("rf_sample_rate", "must be positive"));
        }
        if !self.rf_carrier_offset.is_finite()
            || self.rf_carrier_offset.abs() >= self.rf_sample_rate as f64 / 2.0
        {
            return Err(ConfigError::invalid(
                "rf_carrier_offset",
                format!(
                    "must lie within +/- {} Hz, got {}",
                    self.rf_sample_rate as f64 / 2.0,
                    self.rf_carrier_offset
                ),
            ));
        }
        let carrier_hz = self.rf_carrier.frequency_hz();
        if !carrier_hz.is_finite() || carrier_hz <= 0.0 {
            return Err(ConfigError::invalid(
                "rf_carrier",
                format!("carrier frequency must be positive, got {}", carrier_hz),
            ));
        }
        if self.baseline_samples == 0 {
            return Err(ConfigError::invalid("baseline_samples", "must be at least 1"));
        }
        if self.monitor_batch == 0 {
            return Err(ConfigError::invalid("monitor_batch", "must be at least 1"));
        }
        Ok(())
    }
}

fn check(key: &str, result: Result<(), CommonValidationError>) -> ConfigResult<()> {
    result.map_err(|e| ConfigError::invalid(key, e.message))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn as_bool(key: &str, value: &Value) -> ConfigResult<bool> {
    value.as_bool().ok_or_else(|| {
        ConfigError::invalid(key, format!("expected a boolean, got {}", type_name(value)))
    })
}

fn as_f64(key: &str, value: &Value) -> ConfigResult<f64> {
    value.as_f64().ok_or_else(|| {
        ConfigError::invalid(key, format!("expected a number, got {}", type_name(value)))
    })
}

fn as_u32(key: &str, value: &Value) -> ConfigResult<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            ConfigError::invalid(
                key,
                format!("expected a non-negative integer, got {}", value),
            )
        })
}

fn as_string(key: &str, value: &Value) -> ConfigResult<String> {
    match value.as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(_) => Err(ConfigError::invalid(key, "must not be empty")),
        None => Err(ConfigError::invalid(
            key,
            format!("expected a string, got {}", type_name(value)),
        )),
    }
}

fn as_carrier(value: &Value) -> ConfigResult<CarrierSelector> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(CarrierSelector::Custom)
            .ok_or_else(|| ConfigError::invalid("rf_carrier", "carrier must be a finite number")),
        Value::String(s) => CarrierSelector::from_name(s)
            .or_else(|| s.trim().parse::<f64>().ok().map(CarrierSelector::Custom))
            .ok_or_else(|| {
                ConfigError::invalid(
                    "rf_carrier",
                    format!(
                        "unknown band '{}' (expected hydrogen, 433, 868, 2400 or a frequency in Hz)",
                        s
                    ),
                )
            }),
        other => Err(ConfigError::invalid(
            "rf_carrier",
            format!("expected a number or band name, got {}", type_name(other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::IsmBand;
    use crate::error::BackendError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_mapping_gives_defaults() {
        let config = BeaconConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BeaconConfig::default());
    }

    #[test]
    fn test_defaults_keep_rf_off() {
        let config = BeaconConfig::from_map(&Map::new()).unwrap();
        assert!(!config.rf_enabled);
        assert_eq!(config.mech_programme, "pulsed");
        assert_eq!(config.rf_programme, "schumann");
        assert_eq!(config.tx_duration, 60.0);
        assert_eq!(config.rx_duration, 120.0);
        assert_eq!(config.total_duration, 3600.0);
    }

    #[test]
    fn test_rf_enabled_on_request() {
        let config = BeaconConfig::from_json_str(r#"{"rf_enabled": true}"#).unwrap();
        assert!(config.rf_enabled);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = BeaconConfig::from_json_str(r#"{"colour": "blue", "rf_gain": 30}"#).unwrap();
        assert_eq!(config.rf_gain, 30);
    }

    #[test]
    fn test_carrier_by_band_name() {
        let config = BeaconConfig::from_json_str(r#"{"rf_carrier": "433"}"#).unwrap();
        assert_eq!(config.rf_carrier, CarrierSelector::Ism(IsmBand::Ism433));
    }

    #[test]
    fn test_carrier_by_frequency() {
        let config = BeaconConfig::from_json_str(r#"{"rf_carrier": 915000000}"#).unwrap();
        assert_eq!(config.rf_carrier, CarrierSelector::Custom(915e6));
    }

    #[test]
    fn test_unknown_band_rejected() {
        let err = BeaconConfig::from_json_str(r#"{"rf_carrier": "vhf"}"#).unwrap_err();
        assert_eq!(err.code(), "CONFIG_001");
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = BeaconConfig::from_json_str(r#"{"rf_enabled": "yes"}"#).unwrap_err();
        assert!(err.to_string().contains("rf_enabled"));
    }

    #[test]
    fn test_negative_duration_rejected() {
        assert!(BeaconConfig::from_json_str(r#"{"tx_duration": -1}"#).is_err());
        assert!(BeaconConfig::from_json_str(r#"{"total_duration": 0}"#).is_err());
    }

    #[test]
    fn test_gain_range() {
        assert!(BeaconConfig::from_json_str(r#"{"rf_gain": 47}"#).is_ok());
        assert!(BeaconConfig::from_json_str(r#"{"rf_gain": 48}"#).is_err());
        assert!(BeaconConfig::from_json_str(r#"{"rf_gain": 2.5}"#).is_err());
    }

    #[test]
    fn test_non_object_document() {
        let err = BeaconConfig::from_json_str("[1, 2]").unwrap_err();
        assert_eq!(err.code(), "CONFIG_002");
    }
}
